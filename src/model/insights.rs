use chrono::{DateTime, Utc};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::timestamp;

const NOT_AVAILABLE: &str = "N/A";

/// What the user should put money toward first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Debt,
    Savings,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debt => "debt",
            Self::Savings => "savings",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityOutput {
    pub user_id: i64,
    #[serde(default)]
    pub priority: Vec<Commitment>,
    #[serde(default)]
    pub justification: Vec<String>,
}

impl PriorityOutput {
    pub fn empty(user_id: i64) -> Self {
        Self {
            user_id,
            priority: Vec::new(),
            justification: Vec::new(),
        }
    }

    /// The top priority, or "N/A" when there is none
    pub fn first_label(&self) -> &'static str {
        self.priority
            .first()
            .map(Commitment::as_str)
            .unwrap_or(NOT_AVAILABLE)
    }
}

/// A strategy condensed for the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightOutput {
    pub financial_goal: String,
    pub detailed_insight: String,
    pub implications: String,
    pub recommended_actions: String,
}

impl InsightOutput {
    pub fn not_available() -> Self {
        Self {
            financial_goal: NOT_AVAILABLE.into(),
            detailed_insight: NOT_AVAILABLE.into(),
            implications: NOT_AVAILABLE.into(),
            recommended_actions: NOT_AVAILABLE.into(),
        }
    }
}

/// JSON document stored in `users_insights.insights`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredInsights {
    pub debt_insights: InsightOutput,
    pub savings_insights: InsightOutput,
    pub financial_report_markdown_summary: String,
    pub priority_assessment: PriorityOutput,
    pub report_generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct NewUserInsight<'a> {
    pub user_id: i64,
    pub insights: &'a StoredInsights,
    pub updated_at: DateTime<Utc>,
}

/// Stored insight row. `insights` is kept as raw JSON so older documents still load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInsight {
    pub insight_id: i64,
    pub user_id: i64,
    pub insights: Value,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InsightsSummary {
    pub debt_insight_goal: String,
    pub savings_insight_goal: String,
    pub priority_type: String,
    pub report_generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportCreated {
    pub message: String,
    pub user_id: i64,
    pub stored_insights_summary: InsightsSummary,
}

impl ReportCreated {
    pub fn new(user_id: i64, insights: &StoredInsights) -> Self {
        Self {
            message: "Financial report and insights generated and stored successfully.".into(),
            user_id,
            stored_insights_summary: InsightsSummary {
                debt_insight_goal: insights.debt_insights.financial_goal.clone(),
                savings_insight_goal: insights.savings_insights.financial_goal.clone(),
                priority_type: insights.priority_assessment.first_label().into(),
                report_generated_at: insights.report_generated_at,
            },
        }
    }
}
