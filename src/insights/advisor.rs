use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::client::{GeminiClient, LlmError};
use crate::model::{InsightOutput, PriorityOutput};
use crate::settings::GeminiSettings;

use super::{prompts, FinancialSnapshot, GenerationRequest, LanguageModel};

const PLACEHOLDER_REPORT: &str =
    "Financial report placeholder. AI agents were not run because no language model is configured.";

/// Result of one advisory run
#[derive(Debug, Clone)]
pub struct Advice {
    pub report_markdown: String,
    pub priority: PriorityOutput,
    pub debt: InsightOutput,
    pub savings: InsightOutput,
}

impl Advice {
    /// What gets stored when no model is available
    pub fn placeholder(user_id: i64) -> Self {
        Self {
            report_markdown: PLACEHOLDER_REPORT.into(),
            priority: PriorityOutput::empty(user_id),
            debt: InsightOutput::not_available(),
            savings: InsightOutput::not_available(),
        }
    }
}

/// Runs the chain of advisory agents over a user's snapshot
pub struct Advisor {
    model: Option<Arc<dyn LanguageModel>>,
}

impl Advisor {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model: Some(model) }
    }

    /// An advisor that only produces placeholders
    pub fn disabled() -> Self {
        Self { model: None }
    }

    /// Build a Gemini-backed advisor, or a disabled one if Gemini is not configured
    pub fn from_settings(settings: &GeminiSettings) -> Self {
        let Some(api_key) = settings.api_key() else {
            return Self::disabled();
        };
        let client = settings.api_base_url().and_then(|base_url| {
            GeminiClient::new(base_url, settings.model(), api_key.clone(), settings.api_timeout())
        });
        match client {
            Ok(client) => {
                tracing::info!(model = settings.model(), "Gemini client configured");
                Self::new(Arc::new(client))
            }
            Err(e) => {
                tracing::error!(error.cause_chain = ?e, "Could not create the Gemini client");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    #[tracing::instrument(name = "Run financial advisory agents", skip(self, snapshot))]
    pub async fn advise(&self, user_id: i64, snapshot: &FinancialSnapshot) -> Result<Advice, LlmError> {
        let Some(model) = self.model.as_deref() else {
            tracing::warn!("No language model configured, storing placeholder insights");
            return Ok(Advice::placeholder(user_id));
        };

        let report_markdown = diagnose(model, snapshot).await?;
        let context = format!(
            "{}Financial Report:\n{}\n",
            snapshot.as_str(),
            report_markdown
        );

        let mut priority = prioritize(model, &context).await?;
        // The model only echoes the id; the path is authoritative
        priority.user_id = user_id;

        let priority_json = serde_json::to_string_pretty(&priority)?;
        let context = format!("{}\nPriority Assessment:\n{}\n", context, priority_json);

        let (debt, savings) = tokio::try_join!(
            strategize(model, prompts::DEBT_STRATEGY, &context, snapshot, "debt"),
            strategize(model, prompts::SAVINGS_STRATEGY, &context, snapshot, "savings"),
        )?;

        Ok(Advice {
            report_markdown,
            priority,
            debt,
            savings,
        })
    }
}

#[tracing::instrument(name = "Diagnostics agent", skip_all)]
async fn diagnose(model: &dyn LanguageModel, snapshot: &FinancialSnapshot) -> Result<String, LlmError> {
    let request = GenerationRequest::new(prompts::DIAGNOSTICS, snapshot.as_str());
    model.generate(&request).await
}

#[tracing::instrument(name = "Prioritization agent", skip_all)]
async fn prioritize(model: &dyn LanguageModel, context: &str) -> Result<PriorityOutput, LlmError> {
    let request =
        GenerationRequest::new(prompts::PRIORITIZATION, context).with_schema(prompts::priority_schema());
    let text = model.generate(&request).await?;
    parse_structured(&text)
}

/// Write a strategy, then condense it for the user's knowledge level
#[tracing::instrument(name = "Strategy agent", skip(model, system_prompt, context, snapshot))]
async fn strategize(
    model: &dyn LanguageModel,
    system_prompt: &str,
    context: &str,
    snapshot: &FinancialSnapshot,
    kind: &str,
) -> Result<InsightOutput, LlmError> {
    let strategy = model
        .generate(&GenerationRequest::new(system_prompt, context))
        .await?;

    let input = format!(
        "User's financial knowledge:\n{}\n\nStrategy to summarize:\n{}",
        snapshot.knowledge_summary(),
        strategy
    );
    let request = GenerationRequest::new(prompts::SUMMARIZER, input).with_schema(prompts::insight_schema());
    let text = model.generate(&request).await?;
    parse_structured(&text)
}

/// Decode JSON output, tolerating a surrounding markdown code fence
fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);
    Ok(serde_json::from_str(body.trim())?)
}
