use anyhow::Context;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use secrecy::{ExposeSecret, Secret};

use crate::telemetry::spawn_blocking_with_tracing;

/// Hash a password with argon2 on a blocking thread
#[tracing::instrument(name = "Hash password", skip_all)]
pub async fn hash_password(password: Secret<String>) -> anyhow::Result<String> {
    spawn_blocking_with_tracing(move || {
        let salt = SaltString::generate(&mut rand::thread_rng());
        Argon2::default()
            .hash_password(password.expose_secret().as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
    })
    .await
    .context("Failed to spawn blocking task")?
}

/// Check a password against a stored hash on a blocking thread.
/// Hashes in any other format never match.
#[tracing::instrument(name = "Verify password hash", skip_all)]
pub async fn verify_password(
    password: Secret<String>,
    password_hash: Secret<String>,
) -> anyhow::Result<bool> {
    spawn_blocking_with_tracing(move || verify_password_hash(&password, &password_hash))
        .await
        .context("Failed to spawn blocking task")
}

fn verify_password_hash(password: &Secret<String>, password_hash: &Secret<String>) -> bool {
    let password_hash = match PasswordHash::new(password_hash.expose_secret()) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be parsed");
            return false;
        }
    };

    match Argon2::default().verify_password(password.expose_secret().as_bytes(), &password_hash) {
        Ok(()) => true,
        Err(argon2::password_hash::Error::Password) => false,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is not a supported argon2 hash");
            false
        }
    }
}
