use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::client::{SupabaseClient, SupabaseResult};
use crate::database::Database;
use crate::domain::{CatalogCache, KnowledgeCatalog, RecordId};
use crate::error::{RestError, RestResult};
use crate::model::{
    KnowledgeRow, NewUserKnowledge, UserFinancialKnowledgeDetail, UserKnowledgeLevel,
    UserKnowledgeRecord,
};
use crate::repo::UserKnowledgeRepo;

use super::{ensure_user_exists, load_catalog};

/// A user's knowledge rows with catalog descriptions; incomplete rows are skipped
pub(super) async fn fetch_details(
    db: &SupabaseClient,
    catalog: &KnowledgeCatalog,
    user_id: i64,
) -> SupabaseResult<Vec<UserFinancialKnowledgeDetail>> {
    let rows = UserKnowledgeRepo::fetch_for_user(db, user_id).await?;

    Ok(rows
        .into_iter()
        .filter_map(|row| match into_detail(row, catalog) {
            Ok(detail) => Some(detail),
            Err(row) => {
                tracing::warn!(?row, "Skipping financial knowledge row without category or level");
                None
            }
        })
        .collect())
}

fn into_detail(row: KnowledgeRow, catalog: &KnowledgeCatalog) -> Result<UserFinancialKnowledgeDetail, KnowledgeRow> {
    match (row.category, row.level) {
        (Some(category), Some(level)) => Ok(UserFinancialKnowledgeDetail {
            user_id: row.user_id,
            description: catalog.describe(&category, level).map(Into::into),
            category,
            level,
        }),
        (category, level) => Err(KnowledgeRow {
            user_id: row.user_id,
            category,
            level,
        }),
    }
}

fn validate(catalog: &KnowledgeCatalog, category: &str, level: i32) -> RestResult<()> {
    if catalog.contains(category, level) {
        Ok(())
    } else {
        Err(RestError::BadRequest(format!(
            "Invalid category '{}' or level '{}'. Not found in definitions.",
            category, level
        )))
    }
}

#[tracing::instrument(name = "List user financial knowledge", skip(database, cache))]
#[get("/{user_id}/financial_knowledge")]
async fn list(
    database: web::Data<Database>,
    cache: web::Data<CatalogCache>,
    path: web::Path<RecordId>,
) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let user_id = path.into_inner().get();

    ensure_user_exists(db, user_id).await?;
    let catalog = load_catalog(db, &cache).await?;
    let details = fetch_details(db, &catalog, user_id).await?;

    Ok(HttpResponse::Ok().json(details))
}

#[tracing::instrument(name = "Add user financial knowledge", skip(database, cache))]
#[post("/{user_id}/financial_knowledge")]
async fn add(
    database: web::Data<Database>,
    cache: web::Data<CatalogCache>,
    path: web::Path<RecordId>,
    body: web::Json<NewUserKnowledge>,
) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let user_id = path.into_inner().get();

    ensure_user_exists(db, user_id).await?;
    let catalog = load_catalog(db, &cache).await?;
    validate(&catalog, &body.category, body.level)?;

    let record = UserKnowledgeRecord {
        user_id,
        category: &body.category,
        level: body.level,
    };
    let row = UserKnowledgeRepo::upsert(db, &record).await.map_err(|e| {
        if e.is_unique_violation() || e.is_foreign_key_violation() {
            RestError::Conflict(format!(
                "Conflict: User financial knowledge for category '{}' may already exist or another constraint violated.",
                body.category
            ))
        } else {
            e.into()
        }
    })?;
    let row = row.ok_or_else(|| {
        RestError::InternalError("Failed to add/update user financial knowledge.".into())
    })?;

    let mut detail = into_detail(row, &catalog).map_err(|_| {
        RestError::InternalError("Failed to add/update user financial knowledge.".into())
    })?;
    detail.user_id = Some(user_id);

    Ok(HttpResponse::Created().json(detail))
}

#[tracing::instrument(name = "Update user financial knowledge", skip(database, cache))]
#[put("/{user_id}/financial_knowledge/{category}")]
async fn update_level(
    database: web::Data<Database>,
    cache: web::Data<CatalogCache>,
    path: web::Path<(RecordId, String)>,
    body: web::Json<UserKnowledgeLevel>,
) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let (user_id, category) = path.into_inner();
    let user_id = user_id.get();

    ensure_user_exists(db, user_id).await?;
    let catalog = load_catalog(db, &cache).await?;
    validate(&catalog, &category, body.level)?;

    let not_found = || {
        RestError::NotFound(format!(
            "Financial knowledge for category '{}' not found for user ID {}.",
            category, user_id
        ))
    };
    let row = match UserKnowledgeRepo::update_level(db, user_id, &category, body.level).await? {
        Some(row) => row,
        None => UserKnowledgeRepo::fetch(db, user_id, &category)
            .await?
            .ok_or_else(not_found)?,
    };

    let mut detail = into_detail(row, &catalog).map_err(|_| not_found())?;
    detail.user_id = Some(user_id);

    Ok(HttpResponse::Ok().json(detail))
}

#[tracing::instrument(name = "Remove user financial knowledge", skip(database))]
#[delete("/{user_id}/financial_knowledge/{category}")]
async fn remove(
    database: web::Data<Database>,
    path: web::Path<(RecordId, String)>,
) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let (user_id, category) = path.into_inner();
    let user_id = user_id.get();

    ensure_user_exists(db, user_id).await?;
    if UserKnowledgeRepo::fetch(db, user_id, &category).await?.is_none() {
        return Err(RestError::NotFound(format!(
            "Financial knowledge category '{}' not found for user ID {}.",
            category, user_id
        )));
    }
    UserKnowledgeRepo::delete(db, user_id, &category).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Routes under `/users/{user_id}/financial_knowledge`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list)
        .service(add)
        .service(update_level)
        .service(remove);
}
