use std::fmt;
use std::time::Duration;

use anyhow::Context;

use reqwest::{Client, Method, RequestBuilder};

use secrecy::Secret;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use thiserror::Error;

use url::Url;

const API_KEY_HEADER: &str = "apikey";
const PREFER_HEADER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=representation";

/// Postgres error codes surfaced through PostgREST
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

pub type SupabaseResult<T> = Result<T, SupabaseError>;

#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("Failed to reach Supabase: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Supabase returned {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
        details: Option<String>,
    },

    #[error("Failed to decode Supabase response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SupabaseError {
    /// Postgres/PostgREST error code, when the API reported one
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.code() == Some(UNIQUE_VIOLATION)
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        self.code() == Some(FOREIGN_KEY_VIOLATION)
    }

    /// Whether the message or details name `needle`, e.g. a constraint
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        match self {
            Self::Api {
                message, details, ..
            } => {
                message.to_lowercase().contains(&needle)
                    || details
                        .as_deref()
                        .map(|d| d.to_lowercase().contains(&needle))
                        .unwrap_or(false)
            }
            _ => false,
        }
    }
}

/// Error payload returned by PostgREST
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
}

/// Client for the PostgREST gateway of a Supabase project
#[derive(Debug)]
pub struct SupabaseClient {
    client: Client,
    rest_url: Url,
    service_key: Secret<String>,
}

impl SupabaseClient {
    pub fn new(base_url: Url, service_key: Secret<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build http client")?;

        let rest_url = base_url
            .join("rest/v1/")
            .context("Failed to create Supabase REST URL")?;

        Ok(Self {
            client,
            rest_url,
            service_key,
        })
    }

    /// Start a query against a table
    pub fn table(&self, name: &str) -> Query<'_> {
        Query {
            client: self,
            table: name.to_string(),
            columns: None,
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
            on_conflict: None,
        }
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        use secrecy::ExposeSecret;

        let key = self.service_key.expose_secret();
        self.client
            .request(method, format!("{}{}", self.rest_url, table))
            .header(API_KEY_HEADER, key)
            .bearer_auth(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Direction {
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// A single PostgREST request under construction
#[derive(Debug)]
pub struct Query<'a> {
    client: &'a SupabaseClient,
    table: String,
    columns: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<usize>,
    on_conflict: Option<String>,
}

impl<'a> Query<'a> {
    /// Columns to return, `*` when never called
    pub fn select(mut self, columns: &str) -> Self {
        self.columns = Some(columns.to_string());
        self
    }

    pub fn eq(mut self, column: &str, value: impl fmt::Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{}", value)));
        self
    }

    /// Add a sort key; repeated calls sort by each key in turn
    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order.push(format!("{}.{}", column, direction));
        self
    }

    pub fn limit(mut self, count: usize) -> Self {
        self.limit = Some(count);
        self
    }

    /// Columns of the unique constraint an upsert resolves against
    pub fn on_conflict(mut self, columns: &str) -> Self {
        self.on_conflict = Some(columns.to_string());
        self
    }

    fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![(
            "select".to_string(),
            self.columns.clone().unwrap_or_else(|| "*".into()),
        )];
        params.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            params.push(("order".into(), self.order.join(",")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".into(), limit.to_string()));
        }
        if let Some(columns) = &self.on_conflict {
            params.push(("on_conflict".into(), columns.clone()));
        }
        params
    }

    fn build(&self, method: Method) -> RequestBuilder {
        tracing::debug!(table = %self.table, %method, "Supabase request");
        self.client
            .request(method, &self.table)
            .query(&self.params())
    }

    pub async fn fetch<T: DeserializeOwned>(self) -> SupabaseResult<Vec<T>> {
        execute(self.build(Method::GET)).await
    }

    /// Fetch at most one row
    pub async fn fetch_optional<T: DeserializeOwned>(self) -> SupabaseResult<Option<T>> {
        let rows: Vec<T> = self.limit(1).fetch().await?;
        Ok(rows.into_iter().next())
    }

    pub async fn insert<B, T>(self, body: &B) -> SupabaseResult<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self
            .build(Method::POST)
            .header(PREFER_HEADER, RETURN_REPRESENTATION)
            .json(body);
        execute(req).await
    }

    /// Insert, merging into the existing row on a conflict
    pub async fn upsert<B, T>(self, body: &B) -> SupabaseResult<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self
            .build(Method::POST)
            .header(PREFER_HEADER, MERGE_DUPLICATES)
            .json(body);
        execute(req).await
    }

    pub async fn update<B, T>(self, body: &B) -> SupabaseResult<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self
            .build(Method::PATCH)
            .header(PREFER_HEADER, RETURN_REPRESENTATION)
            .json(body);
        execute(req).await
    }

    /// Delete the matching rows, returning what was removed
    pub async fn delete<T: DeserializeOwned>(self) -> SupabaseResult<Vec<T>> {
        let req = self
            .build(Method::DELETE)
            .header(PREFER_HEADER, RETURN_REPRESENTATION);
        execute(req).await
    }
}

async fn execute<T: DeserializeOwned>(req: RequestBuilder) -> SupabaseResult<Vec<T>> {
    let res = req.send().await?;
    let status = res.status();
    let body = res.bytes().await?;

    if !status.is_success() {
        let parsed: Option<ApiErrorBody> = serde_json::from_slice(&body).ok();
        let (code, message, details) = match parsed {
            Some(err) => (err.code, err.message, err.details),
            None => (None, None, None),
        };
        return Err(SupabaseError::Api {
            status: status.as_u16(),
            code,
            message: message.unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned()),
            details,
        });
    }
    // `return=minimal` and some deletes answer with no body
    if body.is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_slice(&body)?)
}
