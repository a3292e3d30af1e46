use std::sync::Arc;

use crate::client::SupabaseClient;
use crate::domain::{CatalogCache, KnowledgeCatalog};
use crate::error::{RestError, RestResult};
use crate::repo::{DefinitionsRepo, UsersRepo};

pub mod auth;
pub mod definitions;
pub mod finances;
pub mod insights;
pub mod knowledge;
pub mod users;

/// 404 unless the user row exists
async fn ensure_user_exists(db: &SupabaseClient, user_id: i64) -> RestResult<()> {
    if UsersRepo::exists(db, user_id).await? {
        Ok(())
    } else {
        Err(user_not_found(user_id))
    }
}

fn user_not_found(user_id: i64) -> RestError {
    RestError::NotFound(format!("User with ID {} not found.", user_id))
}

/// The shared definitions catalog, loaded on first use
async fn load_catalog(db: &SupabaseClient, cache: &CatalogCache) -> RestResult<Arc<KnowledgeCatalog>> {
    cache
        .get_or_load(|| async {
            let rows = DefinitionsRepo::fetch_rows(db).await?;
            Ok::<_, RestError>(KnowledgeCatalog::from_rows(rows))
        })
        .await
}
