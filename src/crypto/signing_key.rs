use hmac::{Hmac, Mac};

use sha2::Sha256;

use secrecy::Secret;

const GENERATED_KEY_LEN: usize = 64;

/// HMAC-SHA256 key used to sign access tokens
#[derive(Clone)]
pub struct SigningKey(Hmac<Sha256>);

impl SigningKey {
    pub fn new(key: &Secret<String>) -> anyhow::Result<Self> {
        use secrecy::ExposeSecret;

        let hmac = Hmac::new_from_slice(key.expose_secret().as_bytes())?;

        Ok(Self(hmac))
    }

    /// A throwaway key; tokens signed with it die with the process
    pub fn random() -> anyhow::Result<Self> {
        use rand::{distributions::Alphanumeric, Rng};

        let key: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(GENERATED_KEY_LEN)
            .map(char::from)
            .collect();

        Self::new(&Secret::new(key))
    }

    pub fn sign(&self, msg: &[u8]) -> Vec<u8> {
        self.0
            .clone()
            .chain_update(msg)
            .finalize()
            .into_bytes()
            .to_vec()
    }

    /// Constant-time signature check
    pub fn verify(&self, msg: &[u8], signature: &[u8]) -> bool {
        self.0
            .clone()
            .chain_update(msg)
            .verify_slice(signature)
            .is_ok()
    }
}
