use chrono::{DateTime, Utc};

use secrecy::Secret;

use serde::{Deserialize, Serialize};

use crate::domain::{timestamp, EmailAddress, NewPassword, RecordId};

/// Registration request: credentials for an existing user
#[derive(Debug, Deserialize)]
pub struct NewLogin {
    pub user_id: RecordId,
    pub email: EmailAddress,
    pub password: NewPassword,
}

/// Body written to `user_logins`
#[derive(Debug, Serialize)]
pub struct LoginRecord<'a> {
    pub user_id: i64,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Stored login without the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLogin {
    pub login_id: i64,
    pub user_id: i64,
    pub email: String,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Just what is needed to check a password
#[derive(Debug, Deserialize)]
pub struct StoredCredentials {
    pub user_id: i64,
    pub email: String,
    #[serde(default)]
    pub password_hash: Option<Secret<String>>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: EmailAddress,
    pub password: Secret<String>,
}

/// OAuth2 password-flow form
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: Secret<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginSuccess {
    pub user_id: i64,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LastLoginUpdate {
    pub last_login: DateTime<Utc>,
}

/// Access token response
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

impl AccessToken {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".into(),
        }
    }
}

/// Claims carried inside an access token
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TokenData {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
}
