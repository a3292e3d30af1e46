use actix_web::http::header::{self, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use serde::Serialize;

use thiserror::Error;

use crate::client::{LlmError, SupabaseError};
use crate::crypto::TokenError;

pub type RestResult<T> = Result<T, RestError>;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    InternalError(String),

    #[error("Internal Server Error")]
    Other(#[from] anyhow::Error),
}

impl RestError {
    /// The shared body for updates that carry no fields
    pub fn empty_update() -> Self {
        Self::BadRequest("No update data provided.".into())
    }
}

impl From<SupabaseError> for RestError {
    fn from(e: SupabaseError) -> Self {
        tracing::error!(error.cause_chain = ?e, "Supabase request failed");
        Self::InternalError(format!("Database error: {}", e))
    }
}

impl From<LlmError> for RestError {
    fn from(e: LlmError) -> Self {
        tracing::error!(error.cause_chain = ?e, "Language model request failed");
        Self::InternalError("An error occurred while generating the report.".into())
    }
}

impl From<TokenError> for RestError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Signing(_) => {
                tracing::error!(error.cause_chain = ?e, "Failed to sign access token");
                Self::InternalError("Failed to issue access token".into())
            }
            other => Self::Unauthorized(format!("Could not validate credentials: {}", other)),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InternalError(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let detail = self.to_string();
        let mut res = HttpResponse::build(self.status_code());
        if let Self::Unauthorized(_) = self {
            res.insert_header((header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer")));
        }
        res.json(ErrorBody { detail: &detail })
    }
}

/// Turn extractor failures (bad JSON, form or path) into 422 responses
pub fn validation_error<E: std::fmt::Display>(e: E) -> actix_web::Error {
    RestError::Validation(e.to_string()).into()
}

/// Fallback for paths no route matches
pub async fn route_not_found() -> RestResult<HttpResponse> {
    Err(RestError::NotFound("Not Found".into()))
}

/// Fallback for a known path called with an unsupported method
pub async fn method_not_allowed() -> RestResult<HttpResponse> {
    Err(RestError::MethodNotAllowed("Method Not Allowed".into()))
}
