use actix_web::dev::HttpServiceFactory;
use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::database::Database;
use crate::domain::{CatalogCache, RecordId};
use crate::error::{RestError, RestResult};
use crate::model::{
    ComprehensiveUserDetails, DebtDetail, ExpenseDetail, IncomeDetail, ProfileFields,
};
use crate::repo::{FinancesRepo, UsersRepo};

use super::{ensure_user_exists, finances, insights, knowledge, load_catalog};

#[tracing::instrument(name = "Create user profile", skip(database))]
#[post("")]
async fn create(
    database: web::Data<Database>,
    body: web::Json<ProfileFields>,
) -> RestResult<HttpResponse> {
    let db = database.client()?;

    let profile = UsersRepo::insert(db, &body).await.map_err(|e| {
        if e.is_unique_violation() {
            RestError::Conflict(
                "User profile creation failed. User ID or other unique field might already exist."
                    .into(),
            )
        } else {
            e.into()
        }
    })?;
    let profile = profile.ok_or_else(|| {
        RestError::InternalError("Failed to create user profile or return data.".into())
    })?;

    Ok(HttpResponse::Created().json(profile))
}

#[tracing::instrument(name = "Get user profile", skip(database))]
#[get("/{user_id}/profile")]
async fn get_profile(database: web::Data<Database>, path: web::Path<RecordId>) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let user_id = path.into_inner().get();

    let profile = UsersRepo::fetch(db, user_id).await?.ok_or_else(|| {
        RestError::NotFound(format!("User profile with ID {} not found.", user_id))
    })?;

    Ok(HttpResponse::Ok().json(profile))
}

#[tracing::instrument(name = "Update user profile", skip(database))]
#[put("/{user_id}/profile")]
async fn update_profile(
    database: web::Data<Database>,
    path: web::Path<RecordId>,
    body: web::Json<ProfileFields>,
) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let user_id = path.into_inner().get();

    ensure_user_exists(db, user_id).await?;
    if body.is_empty() {
        return Err(RestError::empty_update());
    }

    let updated = match UsersRepo::update(db, user_id, &body).await? {
        Some(profile) => profile,
        None => {
            tracing::warn!("Profile update returned no rows, fetching it again");
            UsersRepo::fetch(db, user_id).await?.ok_or_else(|| {
                RestError::InternalError(format!(
                    "User profile for {} updated, but failed to retrieve confirmation.",
                    user_id
                ))
            })?
        }
    };

    Ok(HttpResponse::Ok().json(updated))
}

#[tracing::instrument(name = "Delete user profile", skip(database))]
#[delete("/{user_id}/profile")]
async fn delete_profile(database: web::Data<Database>, path: web::Path<RecordId>) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let user_id = path.into_inner().get();

    ensure_user_exists(db, user_id).await?;
    UsersRepo::delete(db, user_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Everything stored about a user, fetched concurrently
#[tracing::instrument(name = "Get comprehensive user details", skip(database, cache))]
#[get("/{user_id}/comprehensive_details")]
async fn comprehensive_details(
    database: web::Data<Database>,
    cache: web::Data<CatalogCache>,
    path: web::Path<RecordId>,
) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let user_id = path.into_inner().get();

    ensure_user_exists(db, user_id).await?;
    let catalog = load_catalog(db, &cache).await?;

    let (profile, financial_knowledge, income, debts, expenses) = tokio::try_join!(
        UsersRepo::fetch(db, user_id),
        knowledge::fetch_details(db, &catalog, user_id),
        FinancesRepo::fetch_all::<IncomeDetail>(db, user_id),
        FinancesRepo::fetch_all::<DebtDetail>(db, user_id),
        FinancesRepo::fetch_all::<ExpenseDetail>(db, user_id),
    )?;

    Ok(HttpResponse::Ok().json(ComprehensiveUserDetails {
        profile,
        financial_knowledge,
        income,
        debts,
        expenses,
    }))
}

/// Everything under `/users`
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/users")
        .service(create)
        .service(get_profile)
        .service(update_profile)
        .service(delete_profile)
        .service(comprehensive_details)
        .configure(knowledge::configure)
        .configure(finances::configure::<IncomeDetail>)
        .configure(finances::configure::<DebtDetail>)
        .configure(finances::configure::<ExpenseDetail>)
        .configure(insights::configure)
}
