use std::fmt::Write;

use serde::Serialize;

use crate::model::{DebtDetail, ExpenseDetail, IncomeDetail, UserFinancialKnowledgeDetail, UserProfile};

/// Everything the advisor is told about a user, rendered as text
#[derive(Debug, Clone)]
pub struct FinancialSnapshot {
    text: String,
    knowledge_summary: String,
}

#[derive(Serialize)]
struct KnowledgeEntry<'a> {
    category: &'a str,
    level: i32,
    description: Option<&'a str>,
}

impl FinancialSnapshot {
    pub fn new(
        profile: &UserProfile,
        knowledge: &[UserFinancialKnowledgeDetail],
        income: &[IncomeDetail],
        debts: &[DebtDetail],
        expenses: &[ExpenseDetail],
    ) -> Self {
        let knowledge_entries: Vec<_> = knowledge
            .iter()
            .map(|k| KnowledgeEntry {
                category: &k.category,
                level: k.level,
                description: k.description.as_deref(),
            })
            .collect();

        let mut text = String::new();
        section(&mut text, "User Profile", profile);
        section(&mut text, "Financial Knowledge", &knowledge_entries);
        section(&mut text, "Income Details", income);
        section(&mut text, "Debt Details", debts);
        section(&mut text, "Expense Details (Transactions)", expenses);

        Self {
            text,
            knowledge_summary: summarize_knowledge(knowledge),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// One line per category, for tuning the reading level of a summary
    pub fn knowledge_summary(&self) -> &str {
        &self.knowledge_summary
    }
}

fn section<T: Serialize + ?Sized>(out: &mut String, title: &str, value: &T) {
    let body = serde_json::to_string_pretty(value).unwrap_or_else(|_| "N/A".into());
    // Writing into a String cannot fail
    let _ = write!(out, "{}:\n{}\n\n", title, body);
}

fn summarize_knowledge(knowledge: &[UserFinancialKnowledgeDetail]) -> String {
    if knowledge.is_empty() {
        return "No financial knowledge levels recorded; assume a beginner.".into();
    }
    knowledge
        .iter()
        .map(|k| match &k.description {
            Some(description) => format!("- {}: level {} ({})", k.category, k.level, description),
            None => format!("- {}: level {}", k.category, k.level),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
