use anyhow::Context;

use url::Url;

use crate::client::SupabaseClient;
use crate::error::{RestError, RestResult};
use crate::settings::SupabaseSettings;

/// Shared handle to the Supabase project.
/// The client is absent when the project is not configured; the app still serves.
#[derive(Debug)]
pub struct Database {
    client: Option<SupabaseClient>,
}

impl Database {
    pub fn new(client: SupabaseClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// A database that answers every request with 503
    pub fn unconfigured() -> Self {
        Self { client: None }
    }

    /// Build the client from settings, degrading to `unconfigured` on any problem
    pub fn from_settings(settings: &SupabaseSettings) -> Self {
        match Self::try_from_settings(settings) {
            Ok(Some(client)) => {
                tracing::info!("Supabase client configured");
                Self::new(client)
            }
            Ok(None) => Self::unconfigured(),
            Err(e) => {
                tracing::error!(error.cause_chain = ?e, "Could not create the Supabase client");
                Self::unconfigured()
            }
        }
    }

    fn try_from_settings(settings: &SupabaseSettings) -> anyhow::Result<Option<SupabaseClient>> {
        let (Some(url), Some(key)) = (settings.url(), settings.service_key()) else {
            return Ok(None);
        };
        let url = Url::parse(url).context("Failed to parse SUPABASE_URL")?;

        SupabaseClient::new(url, key.clone(), settings.api_timeout()).map(Some)
    }

    pub fn client(&self) -> RestResult<&SupabaseClient> {
        self.client.as_ref().ok_or_else(|| {
            RestError::Unavailable(
                "Supabase configuration missing. Server is not properly configured.".into(),
            )
        })
    }
}
