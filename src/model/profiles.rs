use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stored user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub num_children: Option<i32>,
    #[serde(default)]
    pub marital_status: Option<String>,
    #[serde(default)]
    pub retirement_status: Option<String>,
    /// Free-form goals, usually keyed by rank
    #[serde(default)]
    pub goals: Option<Map<String, Value>>,
}

/// Profile fields for create and update requests.
/// Absent or null fields are left out of the write.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProfileFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_children: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retirement_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Map<String, Value>>,
}

impl ProfileFields {
    pub fn is_empty(&self) -> bool {
        self.age.is_none()
            && self.num_children.is_none()
            && self.marital_status.is_none()
            && self.retirement_status.is_none()
            && self.goals.is_none()
    }
}
