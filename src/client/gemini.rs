use std::time::Duration;

use anyhow::Context;

use async_trait::async_trait;

use reqwest::Client;

use secrecy::Secret;

use serde::{Deserialize, Serialize};

use thiserror::Error;

use url::Url;

use crate::insights::{GenerationRequest, LanguageModel};

const API_KEY_HEADER: &str = "x-goog-api-key";
const JSON_MIME_TYPE: &str = "application/json";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Failed to reach the language model: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Language model returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Language model returned no text")]
    EmptyResponse,

    #[error("Failed to decode language model output: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for the Gemini `generateContent` endpoint
#[derive(Debug)]
pub struct GeminiClient {
    client: Client,
    endpoint: Url,
    api_key: Secret<String>,
}

impl GeminiClient {
    pub fn new(
        api_base_url: Url,
        model: &str,
        api_key: Secret<String>,
        api_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(api_timeout)
            .build()
            .context("Failed to build http client")?;

        let endpoint = api_base_url
            .join(&format!("v1beta/models/{}:generateContent", model))
            .context("Failed to create Gemini endpoint URL")?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    #[tracing::instrument(name = "Generate content with Gemini", skip_all)]
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        use secrecy::ExposeSecret;

        let body = GenerateContentRequest::from(request);

        let res = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(LlmError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let res: GenerateContentResponse = serde_json::from_slice(&res.bytes().await?)?;
        res.into_text().ok_or(LlmError::EmptyResponse)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a serde_json::Value,
}

impl<'a> From<&'a GenerationRequest> for GenerateContentRequest<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        let system_instruction = Content {
            role: None,
            parts: vec![TextPart {
                text: &request.system_prompt,
            }],
        };
        let contents = vec![Content {
            role: Some("user"),
            parts: vec![TextPart {
                text: &request.input,
            }],
        }];
        let generation_config = request
            .response_schema
            .as_ref()
            .map(|schema| GenerationConfig {
                response_mime_type: JSON_MIME_TYPE,
                response_schema: schema,
            });

        Self {
            system_instruction,
            contents,
            generation_config,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    // May be absent when generation stops at a limit
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
