use serde_json::Value;

use crate::client::{SupabaseClient, SupabaseResult};
use crate::model::{ProfileFields, UserProfile};

const TABLE: &str = "users";

/// Repository for the `users` table
pub struct UsersRepo;

impl UsersRepo {
    #[tracing::instrument(name = "Check user exists", skip(db))]
    pub async fn exists(db: &SupabaseClient, user_id: i64) -> SupabaseResult<bool> {
        let row: Option<Value> = db
            .table(TABLE)
            .select("user_id")
            .eq("user_id", user_id)
            .fetch_optional()
            .await?;
        Ok(row.is_some())
    }

    #[tracing::instrument(name = "Fetch user profile", skip(db))]
    pub async fn fetch(db: &SupabaseClient, user_id: i64) -> SupabaseResult<Option<UserProfile>> {
        db.table(TABLE)
            .eq("user_id", user_id)
            .fetch_optional()
            .await
    }

    #[tracing::instrument(name = "Insert user profile", skip(db))]
    pub async fn insert(
        db: &SupabaseClient,
        profile: &ProfileFields,
    ) -> SupabaseResult<Option<UserProfile>> {
        let rows: Vec<UserProfile> = db.table(TABLE).insert(profile).await?;
        Ok(rows.into_iter().next())
    }

    /// Returns `None` when the write returned no representation
    #[tracing::instrument(name = "Update user profile", skip(db))]
    pub async fn update(
        db: &SupabaseClient,
        user_id: i64,
        changes: &ProfileFields,
    ) -> SupabaseResult<Option<UserProfile>> {
        let rows: Vec<UserProfile> = db
            .table(TABLE)
            .eq("user_id", user_id)
            .update(changes)
            .await?;
        Ok(rows.into_iter().next())
    }

    #[tracing::instrument(name = "Delete user profile", skip(db))]
    pub async fn delete(db: &SupabaseClient, user_id: i64) -> SupabaseResult<()> {
        let _: Vec<UserProfile> = db.table(TABLE).eq("user_id", user_id).delete().await?;
        Ok(())
    }
}
