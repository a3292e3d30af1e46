use serde::{Deserialize, Serialize};

/// A category/level pair and what it means
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialKnowledgeDefinition {
    pub id: i64,
    pub category: String,
    pub level: i32,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDefinition {
    pub category: String,
    pub level: i32,
    pub description: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct DefinitionFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DefinitionFields {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.level.is_none() && self.description.is_none()
    }
}

/// Raw definition row, tolerant of incomplete data
#[derive(Debug, Deserialize)]
pub struct DefinitionRow {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Raw `user_financial_knowledge` row
#[derive(Debug, Deserialize)]
pub struct KnowledgeRow {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub level: Option<i32>,
}

/// A user's level in one category, with the catalog description attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFinancialKnowledgeDetail {
    pub user_id: Option<i64>,
    pub category: String,
    pub level: i32,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUserKnowledge {
    pub category: String,
    pub level: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserKnowledgeLevel {
    pub level: i32,
}

/// Body written to `user_financial_knowledge`
#[derive(Debug, Serialize)]
pub struct UserKnowledgeRecord<'a> {
    pub user_id: i64,
    pub category: &'a str,
    pub level: i32,
}
