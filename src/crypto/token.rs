use chrono::{Duration, Utc};

use serde::{Deserialize, Serialize};

use base64::{
    alphabet,
    engine::{self, general_purpose},
    Engine as _,
};

use crate::model::TokenData;
use crate::settings::ApplicationSettings;

use super::SigningKey;

lazy_static::lazy_static! {
    // Base64 engine for both token segments
    static ref BASE64_ENGINE: engine::GeneralPurpose =
        engine::GeneralPurpose::new(&alphabet::URL_SAFE, general_purpose::NO_PAD);
}

/// Errors raised while issuing or checking access tokens
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,
    #[error("Token signature does not match")]
    SignatureMismatch,
    #[error("Token is expired")]
    Expired,
    #[error("Failed to sign token: {0}")]
    Signing(#[source] serde_json::Error),
}

pub type TokenResult<T> = Result<T, TokenError>;

/// Signed message: claims plus a unix expiry
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    exp: i64,
    #[serde(flatten)]
    data: TokenData,
}

/// Issues and verifies `<base64 claims>.<base64 signature>` access tokens
#[derive(Clone)]
pub struct TokenIssuer {
    key: SigningKey,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(key: SigningKey, lifetime: Duration) -> Self {
        Self { key, lifetime }
    }

    /// Use the configured secret, or a random key when none is set
    pub fn from_settings(settings: &ApplicationSettings) -> anyhow::Result<Self> {
        let key = match settings.secret_key() {
            Some(secret) => SigningKey::new(secret)?,
            None => SigningKey::random()?,
        };
        Ok(Self::new(key, settings.access_token_lifetime()))
    }

    pub fn issue(&self, data: &TokenData) -> TokenResult<String> {
        let claims = Claims {
            exp: (Utc::now() + self.lifetime).timestamp(),
            data: data.clone(),
        };
        let msg = serde_json::to_vec(&claims).map_err(TokenError::Signing)?;
        let sig = self.key.sign(&msg);

        Ok(format!(
            "{}.{}",
            BASE64_ENGINE.encode(msg),
            BASE64_ENGINE.encode(sig)
        ))
    }

    pub fn verify(&self, token: &str) -> TokenResult<TokenData> {
        let (msg, sig) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let msg = BASE64_ENGINE
            .decode(msg)
            .map_err(|_| TokenError::Malformed)?;
        let sig = BASE64_ENGINE
            .decode(sig)
            .map_err(|_| TokenError::Malformed)?;

        // Check the signature before looking at the contents
        if !self.key.verify(&msg, &sig) {
            return Err(TokenError::SignatureMismatch);
        }
        let claims: Claims = serde_json::from_slice(&msg).map_err(|_| TokenError::Malformed)?;
        if Utc::now().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims.data)
    }
}
