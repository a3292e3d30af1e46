use crate::client::{Direction, SupabaseClient, SupabaseResult};
use crate::model::{NewUserInsight, UserInsight};

const TABLE: &str = "users_insights";

/// Repository for `users_insights`. Every report adds a row.
pub struct InsightsRepo;

impl InsightsRepo {
    #[tracing::instrument(name = "Insert user insights", skip(db, insight), fields(user_id = insight.user_id))]
    pub async fn insert(db: &SupabaseClient, insight: &NewUserInsight<'_>) -> SupabaseResult<Option<UserInsight>> {
        let rows: Vec<UserInsight> = db.table(TABLE).insert(insight).await?;
        Ok(rows.into_iter().next())
    }

    #[tracing::instrument(name = "Fetch latest user insight", skip(db))]
    pub async fn fetch_latest(db: &SupabaseClient, user_id: i64) -> SupabaseResult<Option<UserInsight>> {
        db.table(TABLE)
            .eq("user_id", user_id)
            .order("updated_at", Direction::Desc)
            .fetch_optional()
            .await
    }
}
