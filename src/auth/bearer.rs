use actix_web::http::header::{self, HeaderMap};

use anyhow::Context;

use secrecy::Secret;

const BEARER_AUTH_PREFIX: &str = "Bearer ";

/// Access token sent in an `Authorization: Bearer` header
#[derive(Debug)]
pub struct BearerToken(Secret<String>);

impl BearerToken {
    /// Extract the token from the headers of a request
    pub fn from_headers(headers: &HeaderMap) -> anyhow::Result<Self> {
        let header_value = headers
            .get(header::AUTHORIZATION)
            .context("Missing authorization in header")?
            .to_str()?;
        Self::from_bearer(header_value)
    }

    /// Extract the token from a string formatted as 'Bearer <token>'
    pub fn from_bearer(header_value: &str) -> anyhow::Result<Self> {
        let token = header_value
            .strip_prefix(BEARER_AUTH_PREFIX)
            .context("Authorization scheme not bearer")?
            .trim();
        anyhow::ensure!(!token.is_empty(), "Missing token in authorization");

        Ok(Self(Secret::new(token.into())))
    }
}

impl AsRef<Secret<String>> for BearerToken {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
