use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use config::{Config, Environment, File};

use secrecy::Secret;

use serde::Deserialize;
use serde_aux::prelude::*;

use url::Url;

use crate::app::AppInfo;

const SUPABASE_URL_PLACEHOLDER: &str = "your_supabase_url_here";
const SUPABASE_KEY_PLACEHOLDER: &str = "your_supabase_service_key_here";

/// Runtime environment, either `Dev` for local development, or `Prod` for release
#[derive(Debug, PartialEq)]
pub enum Runtime {
    Dev,
    Prod,
}

impl Runtime {
    pub fn as_str(&self) -> &str {
        match self {
            Runtime::Dev => "dev",
            Runtime::Prod => "prod",
        }
    }
}

impl TryFrom<String> for Runtime {
    type Error = anyhow::Error;

    fn try_from(s: String) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => anyhow::bail!("{} is not a valid runtime environment", other),
        }
    }
}

/// Application settings wrapper
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: ApplicationSettings,
    pub supabase: SupabaseSettings,
    pub gemini: GeminiSettings,
}

impl Settings {
    /// Load application settings from the settings directory
    pub fn load() -> anyhow::Result<Self> {
        let path = env::current_dir()?.join("settings");
        // Get the current environment based on the `APP_ENV` environment variable, default to `Dev`
        let runtime: Runtime = env::var("APP_ENV")
            .unwrap_or_else(|_| "dev".into())
            .try_into()?;

        Self::load_from(runtime, &path)
    }

    /// Load application settings from a specified path and runtime
    pub fn load_from(runtime: Runtime, base_path: &Path) -> anyhow::Result<Self> {
        Config::builder()
            .add_source(File::from(base_path.join("base")).required(true))
            .add_source(File::from(base_path.join(runtime.as_str())).required(false))
            // Takes the form `APP_<settings category>__<setting name>`
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__"),
            )
            // The well-known deployment variables win over everything else
            .set_override_option("supabase.url", plain_env("SUPABASE_URL"))?
            .set_override_option("supabase.service_key", plain_env("SUPABASE_SERVICE_KEY"))?
            .set_override_option("gemini.api_key", plain_env("GEMINI_API_KEY"))?
            .set_override_option("app.secret_key", plain_env("JWT_SECRET_KEY"))?
            .build()?
            .try_deserialize()
            .context("Failed to load/deserialize settings")
    }

    /// Log every missing piece of critical configuration.
    /// Nothing here is fatal: requests needing a missing service fail on their own.
    pub fn report_missing(&self) {
        match self.supabase.url() {
            Some(url) => {
                let tail: String = url
                    .chars()
                    .rev()
                    .take(10)
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                tracing::info!("Config loaded: SUPABASE_URL (ending): ...{}", tail);
            }
            None => tracing::error!(
                "SUPABASE_URL must be set in environment variables or .env file and not be the placeholder value"
            ),
        }
        if self.supabase.service_key().is_none() {
            tracing::error!(
                "SUPABASE_SERVICE_KEY must be set in environment variables or .env file and not be the placeholder value"
            );
        }
        if self.gemini.api_key().is_none() {
            tracing::warn!("GEMINI_API_KEY is not set, insight generation will use placeholders");
        }
        if self.app.secret_key().is_none() {
            tracing::warn!("JWT_SECRET_KEY is not set, a random signing key will be generated");
        }
    }
}

/// Read a non-empty environment variable
fn plain_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn is_configured(value: &str, placeholder: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != placeholder
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    port: u16,

    title: String,
    version: String,
    description: String,

    #[serde(default)]
    secret_key: Option<Secret<String>>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    access_token_expire_minutes: i64,
}

impl ApplicationSettings {
    /// The application address to bind to
    pub fn addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
    /// The key used to sign access tokens, if one was configured
    pub fn secret_key(&self) -> Option<&Secret<String>> {
        use secrecy::ExposeSecret;

        self.secret_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
    }
    /// How long an issued access token stays valid
    pub fn access_token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_expire_minutes)
    }
    /// Public metadata served from the root endpoint
    pub fn info(&self) -> AppInfo {
        AppInfo {
            title: self.title.clone(),
            version: self.version.clone(),
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SupabaseSettings {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    service_key: Option<Secret<String>>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    api_timeout_milliseconds: u64,
}

impl SupabaseSettings {
    /// The project URL, unless unset or left at the placeholder
    pub fn url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .filter(|url| is_configured(url, SUPABASE_URL_PLACEHOLDER))
    }
    /// The service role key, unless unset or left at the placeholder
    pub fn service_key(&self) -> Option<&Secret<String>> {
        use secrecy::ExposeSecret;

        self.service_key
            .as_ref()
            .filter(|key| is_configured(key.expose_secret(), SUPABASE_KEY_PLACEHOLDER))
    }
    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_milliseconds)
    }
}

#[derive(Debug, Deserialize)]
pub struct GeminiSettings {
    #[serde(default)]
    api_key: Option<Secret<String>>,
    api_base_url: String,
    model: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    api_timeout_milliseconds: u64,
}

impl GeminiSettings {
    pub fn api_key(&self) -> Option<&Secret<String>> {
        use secrecy::ExposeSecret;

        self.api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
    }
    pub fn api_base_url(&self) -> anyhow::Result<Url> {
        Url::parse(&self.api_base_url).context("Failed to parse Gemini base URL")
    }
    /// Model name, e.g. `gemini-2.0-flash`
    pub fn model(&self) -> &str {
        &self.model
    }
    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_milliseconds)
    }
}
