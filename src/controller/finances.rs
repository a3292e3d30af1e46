use actix_web::{web, HttpResponse};

use crate::database::Database;
use crate::domain::RecordId;
use crate::error::{method_not_allowed, RestError, RestResult};
use crate::model::FinancialRecord;
use crate::repo::FinancesRepo;

use super::ensure_user_exists;

fn record_not_found<R: FinancialRecord>(record_id: i64, user_id: i64, suffix: &str) -> RestError {
    RestError::NotFound(format!(
        "{} record with ID {} not found for user {}{}.",
        R::LABEL,
        record_id,
        user_id,
        suffix
    ))
}

#[tracing::instrument(name = "List financial records", skip(database), fields(table = R::TABLE))]
async fn list<R: FinancialRecord>(
    database: web::Data<Database>,
    path: web::Path<RecordId>,
) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let user_id = path.into_inner().get();

    ensure_user_exists(db, user_id).await?;
    let records = FinancesRepo::fetch_all::<R>(db, user_id).await?;

    Ok(HttpResponse::Ok().json(records))
}

#[tracing::instrument(name = "Create financial record", skip(database), fields(table = R::TABLE))]
async fn create<R: FinancialRecord>(
    database: web::Data<Database>,
    path: web::Path<RecordId>,
    body: web::Json<R::Fields>,
) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let user_id = path.into_inner().get();

    ensure_user_exists(db, user_id).await?;

    let mut fields = body.into_inner();
    R::prepare_new(&mut fields);

    let record = FinancesRepo::insert::<R>(db, user_id, &fields)
        .await?
        .ok_or_else(|| {
            RestError::InternalError(format!(
                "Failed to create {} detail.",
                R::LABEL.to_lowercase()
            ))
        })?;

    Ok(HttpResponse::Created().json(record))
}

#[tracing::instrument(name = "Get financial record", skip(database), fields(table = R::TABLE))]
async fn get<R: FinancialRecord>(
    database: web::Data<Database>,
    path: web::Path<(RecordId, RecordId)>,
) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let (user_id, record_id) = path.into_inner();
    let (user_id, record_id) = (user_id.get(), record_id.get());

    ensure_user_exists(db, user_id).await?;
    let record = FinancesRepo::fetch::<R>(db, user_id, record_id)
        .await?
        .ok_or_else(|| record_not_found::<R>(record_id, user_id, ""))?;

    Ok(HttpResponse::Ok().json(record))
}

#[tracing::instrument(name = "Update financial record", skip(database), fields(table = R::TABLE))]
async fn update<R: FinancialRecord>(
    database: web::Data<Database>,
    path: web::Path<(RecordId, RecordId)>,
    body: web::Json<R::Fields>,
) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let (user_id, record_id) = path.into_inner();
    let (user_id, record_id) = (user_id.get(), record_id.get());

    ensure_user_exists(db, user_id).await?;
    if FinancesRepo::fetch::<R>(db, user_id, record_id).await?.is_none() {
        return Err(record_not_found::<R>(record_id, user_id, ""));
    }
    if R::is_empty(&body) {
        return Err(RestError::empty_update());
    }

    let record = match FinancesRepo::update::<R>(db, user_id, record_id, &body).await? {
        Some(record) => record,
        None => FinancesRepo::fetch::<R>(db, user_id, record_id)
            .await?
            .ok_or_else(|| {
                RestError::InternalError(format!(
                    "{} record {} for user {} updated, but failed to retrieve confirmation.",
                    R::LABEL,
                    record_id,
                    user_id
                ))
            })?,
    };

    Ok(HttpResponse::Ok().json(record))
}

#[tracing::instrument(name = "Delete financial record", skip(database), fields(table = R::TABLE))]
async fn delete<R: FinancialRecord>(
    database: web::Data<Database>,
    path: web::Path<(RecordId, RecordId)>,
) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let (user_id, record_id) = path.into_inner();
    let (user_id, record_id) = (user_id.get(), record_id.get());

    ensure_user_exists(db, user_id).await?;
    if FinancesRepo::fetch::<R>(db, user_id, record_id).await?.is_none() {
        return Err(record_not_found::<R>(record_id, user_id, " to delete"));
    }
    FinancesRepo::delete::<R>(db, user_id, record_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Collection and item routes for one kind of record under `/users/{user_id}`
pub fn configure<R: FinancialRecord>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(format!("/{{user_id}}/{}", R::PATH))
            .route(web::get().to(list::<R>))
            .route(web::post().to(create::<R>))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource(format!("/{{user_id}}/{}/{{record_id}}", R::PATH))
            .route(web::get().to(get::<R>))
            .route(web::put().to(update::<R>))
            .route(web::delete().to(delete::<R>))
            .default_service(web::to(method_not_allowed)),
    );
}
