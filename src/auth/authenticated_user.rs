use std::future::{ready, Ready};

use actix_web::{dev, web, FromRequest, HttpRequest};

use secrecy::ExposeSecret;

use crate::crypto::TokenIssuer;
use crate::error::{RestError, RestResult};
use crate::model::TokenData;

use super::BearerToken;

/// The caller identified by a valid access token
#[derive(Debug)]
pub struct AuthenticatedUser(TokenData);

impl AuthenticatedUser {
    pub fn into_inner(self) -> TokenData {
        self.0
    }
}

impl AsRef<TokenData> for AuthenticatedUser {
    fn as_ref(&self) -> &TokenData {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = RestError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> RestResult<AuthenticatedUser> {
    // Registered with the application at startup
    let issuer = req
        .app_data::<web::Data<TokenIssuer>>()
        .ok_or_else(|| RestError::InternalError("Token issuer not configured".into()))?;

    let token = BearerToken::from_headers(req.headers()).map_err(|e| {
        tracing::debug!(error = %e, "Request carried no usable bearer token");
        RestError::Unauthorized("Not authenticated".into())
    })?;
    let data = issuer.verify(token.as_ref().expose_secret())?;

    Ok(AuthenticatedUser(data))
}
