use std::fmt::Debug;

use chrono::{DateTime, Utc};

use rust_decimal::Decimal;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::Direction;
use crate::domain::timestamp;

use super::{UserFinancialKnowledgeDetail, UserProfile};

/// A per-user financial record stored in its own table
pub trait FinancialRecord: Debug + Serialize + DeserializeOwned + Send + 'static {
    /// Writable fields, shared by create and update bodies
    type Fields: Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    const TABLE: &'static str;
    const ID_COLUMN: &'static str;
    /// Path segment under `/users/{user_id}`
    const PATH: &'static str;
    /// Name used in error messages, e.g. "Income"
    const LABEL: &'static str;

    fn order() -> Option<(&'static str, Direction)> {
        None
    }

    fn is_empty(fields: &Self::Fields) -> bool;

    /// Fill in values the database should not be left to default
    fn prepare_new(_fields: &mut Self::Fields) {}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeDetail {
    pub income_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub income_source: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub monthly_income: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct IncomeFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income_source: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub monthly_income: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FinancialRecord for IncomeDetail {
    type Fields = IncomeFields;

    const TABLE: &'static str = "income";
    const ID_COLUMN: &'static str = "income_id";
    const PATH: &'static str = "income";
    const LABEL: &'static str = "Income";

    fn is_empty(fields: &IncomeFields) -> bool {
        fields.income_source.is_none()
            && fields.monthly_income.is_none()
            && fields.description.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtDetail {
    pub debt_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub current_balance: Option<Decimal>,
    /// Annual rate as a fraction, 0.18 for 18%
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub interest_rate: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub min_monthly_payment: Option<Decimal>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct DebtFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_balance: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub interest_rate: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_monthly_payment: Option<Decimal>,
}

impl FinancialRecord for DebtDetail {
    type Fields = DebtFields;

    const TABLE: &'static str = "debts";
    const ID_COLUMN: &'static str = "debt_id";
    const PATH: &'static str = "debts";
    const LABEL: &'static str = "Debt";

    fn is_empty(fields: &DebtFields) -> bool {
        fields.account_name.is_none()
            && fields.current_balance.is_none()
            && fields.interest_rate.is_none()
            && fields.min_monthly_payment.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDetail {
    pub expense_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub expense_category: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub monthly_amount: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ExpenseFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_category: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub monthly_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

impl FinancialRecord for ExpenseDetail {
    type Fields = ExpenseFields;

    const TABLE: &'static str = "expenses";
    const ID_COLUMN: &'static str = "expense_id";
    const PATH: &'static str = "expenses";
    const LABEL: &'static str = "Expense";

    fn order() -> Option<(&'static str, Direction)> {
        Some(("timestamp", Direction::Desc))
    }

    fn is_empty(fields: &ExpenseFields) -> bool {
        fields.expense_category.is_none()
            && fields.monthly_amount.is_none()
            && fields.description.is_none()
            && fields.timestamp.is_none()
    }

    fn prepare_new(fields: &mut ExpenseFields) {
        fields.timestamp.get_or_insert_with(Utc::now);
    }
}

/// Everything stored about one user
#[derive(Debug, Default, Serialize)]
pub struct ComprehensiveUserDetails {
    pub profile: Option<UserProfile>,
    pub financial_knowledge: Vec<UserFinancialKnowledgeDetail>,
    pub income: Vec<IncomeDetail>,
    pub debts: Vec<DebtDetail>,
    pub expenses: Vec<ExpenseDetail>,
}
