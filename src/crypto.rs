mod password;
mod signing_key;
mod token;

pub use password::{hash_password, verify_password};
pub use signing_key::SigningKey;
pub use token::{TokenError, TokenIssuer, TokenResult};
