use serde::Serialize;

use crate::client::{SupabaseClient, SupabaseResult};
use crate::model::FinancialRecord;

/// Insert body: the record's fields plus the owning user
#[derive(Debug, Serialize)]
struct Owned<'a, F> {
    user_id: i64,
    #[serde(flatten)]
    fields: &'a F,
}

/// Repository for the per-user `income`, `debts` and `expenses` tables.
/// Every query is scoped to the owning user.
pub struct FinancesRepo;

impl FinancesRepo {
    #[tracing::instrument(name = "Fetch user records", skip(db), fields(table = R::TABLE))]
    pub async fn fetch_all<R: FinancialRecord>(db: &SupabaseClient, user_id: i64) -> SupabaseResult<Vec<R>> {
        let mut query = db.table(R::TABLE).eq("user_id", user_id);
        if let Some((column, direction)) = R::order() {
            query = query.order(column, direction);
        }
        query.fetch().await
    }

    #[tracing::instrument(name = "Fetch user record", skip(db), fields(table = R::TABLE))]
    pub async fn fetch<R: FinancialRecord>(
        db: &SupabaseClient,
        user_id: i64,
        record_id: i64,
    ) -> SupabaseResult<Option<R>> {
        db.table(R::TABLE)
            .eq("user_id", user_id)
            .eq(R::ID_COLUMN, record_id)
            .fetch_optional()
            .await
    }

    #[tracing::instrument(name = "Insert user record", skip(db), fields(table = R::TABLE))]
    pub async fn insert<R: FinancialRecord>(
        db: &SupabaseClient,
        user_id: i64,
        fields: &R::Fields,
    ) -> SupabaseResult<Option<R>> {
        let body = Owned { user_id, fields };
        let rows: Vec<R> = db.table(R::TABLE).insert(&body).await?;
        Ok(rows.into_iter().next())
    }

    #[tracing::instrument(name = "Update user record", skip(db), fields(table = R::TABLE))]
    pub async fn update<R: FinancialRecord>(
        db: &SupabaseClient,
        user_id: i64,
        record_id: i64,
        changes: &R::Fields,
    ) -> SupabaseResult<Option<R>> {
        let rows: Vec<R> = db
            .table(R::TABLE)
            .eq("user_id", user_id)
            .eq(R::ID_COLUMN, record_id)
            .update(changes)
            .await?;
        Ok(rows.into_iter().next())
    }

    #[tracing::instrument(name = "Delete user record", skip(db), fields(table = R::TABLE))]
    pub async fn delete<R: FinancialRecord>(
        db: &SupabaseClient,
        user_id: i64,
        record_id: i64,
    ) -> SupabaseResult<()> {
        let _: Vec<R> = db
            .table(R::TABLE)
            .eq("user_id", user_id)
            .eq(R::ID_COLUMN, record_id)
            .delete()
            .await?;
        Ok(())
    }
}
