use actix_web::dev::HttpServiceFactory;
use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::database::Database;
use crate::domain::{CatalogCache, RecordId};
use crate::error::{RestError, RestResult};
use crate::model::{DefinitionFields, NewDefinition};
use crate::repo::DefinitionsRepo;

fn definition_not_found(id: i64) -> RestError {
    RestError::NotFound(format!(
        "Financial knowledge definition with ID {} not found.",
        id
    ))
}

#[tracing::instrument(name = "List knowledge definitions", skip(database))]
#[get("")]
async fn list(database: web::Data<Database>) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let definitions = DefinitionsRepo::fetch_all(db).await?;

    Ok(HttpResponse::Ok().json(definitions))
}

#[tracing::instrument(name = "Create knowledge definition", skip(database, cache))]
#[post("")]
async fn create(
    database: web::Data<Database>,
    cache: web::Data<CatalogCache>,
    body: web::Json<NewDefinition>,
) -> RestResult<HttpResponse> {
    let db = database.client()?;

    let definition = DefinitionsRepo::insert(db, &body).await.map_err(|e| {
        if e.is_unique_violation() {
            RestError::Conflict(
                "Financial knowledge definition creation failed. Possible duplicate (category, level)."
                    .into(),
            )
        } else {
            e.into()
        }
    })?;
    let definition = definition.ok_or_else(|| {
        RestError::InternalError("Failed to create financial knowledge definition.".into())
    })?;
    cache.invalidate().await;

    Ok(HttpResponse::Created().json(definition))
}

#[tracing::instrument(name = "Get knowledge definition", skip(database))]
#[get("/{definition_id}")]
async fn get_definition(
    database: web::Data<Database>,
    path: web::Path<RecordId>,
) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let id = path.into_inner().get();

    let definition = DefinitionsRepo::fetch(db, id)
        .await?
        .ok_or_else(|| definition_not_found(id))?;

    Ok(HttpResponse::Ok().json(definition))
}

#[tracing::instrument(name = "Update knowledge definition", skip(database, cache))]
#[put("/{definition_id}")]
async fn update_definition(
    database: web::Data<Database>,
    cache: web::Data<CatalogCache>,
    path: web::Path<RecordId>,
    body: web::Json<DefinitionFields>,
) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let id = path.into_inner().get();

    if DefinitionsRepo::fetch(db, id).await?.is_none() {
        return Err(definition_not_found(id));
    }
    if body.is_empty() {
        return Err(RestError::empty_update());
    }

    let updated = DefinitionsRepo::update(db, id, &body).await.map_err(|e| {
        if e.is_unique_violation() {
            RestError::Conflict(
                "Financial knowledge definition update failed. Possible duplicate (category, level)."
                    .into(),
            )
        } else {
            e.into()
        }
    })?;
    cache.invalidate().await;

    let definition = match updated {
        Some(definition) => definition,
        None => DefinitionsRepo::fetch(db, id).await?.ok_or_else(|| {
            RestError::InternalError(format!(
                "Financial knowledge definition {} updated, but failed to retrieve confirmation.",
                id
            ))
        })?,
    };

    Ok(HttpResponse::Ok().json(definition))
}

#[tracing::instrument(name = "Delete knowledge definition", skip(database, cache))]
#[delete("/{definition_id}")]
async fn delete_definition(
    database: web::Data<Database>,
    cache: web::Data<CatalogCache>,
    path: web::Path<RecordId>,
) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let id = path.into_inner().get();

    if DefinitionsRepo::fetch(db, id).await?.is_none() {
        return Err(definition_not_found(id));
    }
    DefinitionsRepo::delete(db, id).await?;
    cache.invalidate().await;

    Ok(HttpResponse::NoContent().finish())
}

/// Everything under `/financial_knowledge_definitions`
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/financial_knowledge_definitions")
        .service(list)
        .service(create)
        .service(get_definition)
        .service(update_definition)
        .service(delete_definition)
}
