use std::str::FromStr;

use secrecy::Secret;

use serde::{Deserialize, Deserializer};

use unicode_segmentation::UnicodeSegmentation;

const MIN_LEN: usize = 8;

/// A new password, at least eight characters long
#[derive(Debug, Clone)]
pub struct NewPassword(Secret<String>);

impl FromStr for NewPassword {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.graphemes(true).count() < MIN_LEN {
            return Err(format!(
                "Password must be at least {} characters long",
                MIN_LEN
            ));
        }
        Ok(Self(Secret::new(value.to_string())))
    }
}

impl<'de> Deserialize<'de> for NewPassword {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

impl From<NewPassword> for Secret<String> {
    fn from(value: NewPassword) -> Self {
        value.0
    }
}
