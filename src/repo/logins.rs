use chrono::Utc;

use crate::client::{SupabaseClient, SupabaseResult};
use crate::domain::EmailAddress;
use crate::model::{LastLoginUpdate, LoginRecord, StoredCredentials, UserLogin};

const TABLE: &str = "user_logins";
const PUBLIC_COLUMNS: &str = "login_id,user_id,email,last_login,created_at,updated_at";

/// Repository for `user_logins`
pub struct LoginsRepo;

impl LoginsRepo {
    #[tracing::instrument(name = "Insert login credentials", skip(db, record), fields(user_id = record.user_id))]
    pub async fn insert(db: &SupabaseClient, record: &LoginRecord<'_>) -> SupabaseResult<Option<UserLogin>> {
        let rows: Vec<UserLogin> = db.table(TABLE).select(PUBLIC_COLUMNS).insert(record).await?;
        Ok(rows.into_iter().next())
    }

    #[tracing::instrument(name = "Fetch login", skip(db))]
    pub async fn fetch(db: &SupabaseClient, user_id: i64, email: &EmailAddress) -> SupabaseResult<Option<UserLogin>> {
        db.table(TABLE)
            .select(PUBLIC_COLUMNS)
            .eq("user_id", user_id)
            .eq("email", email)
            .fetch_optional()
            .await
    }

    #[tracing::instrument(name = "Fetch credentials by email", skip(db))]
    pub async fn fetch_credentials(
        db: &SupabaseClient,
        email: &EmailAddress,
    ) -> SupabaseResult<Option<StoredCredentials>> {
        db.table(TABLE)
            .select("user_id,email,password_hash")
            .eq("email", email)
            .fetch_optional()
            .await
    }

    #[tracing::instrument(name = "Record successful login", skip(db))]
    pub async fn touch_last_login(db: &SupabaseClient, email: &EmailAddress) -> SupabaseResult<bool> {
        let rows: Vec<UserLogin> = db
            .table(TABLE)
            .select(PUBLIC_COLUMNS)
            .eq("email", email)
            .update(&LastLoginUpdate {
                last_login: Utc::now(),
            })
            .await?;
        Ok(!rows.is_empty())
    }
}
