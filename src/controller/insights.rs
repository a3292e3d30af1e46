use actix_web::{get, post, web, HttpResponse};

use chrono::Utc;

use crate::database::Database;
use crate::domain::{CatalogCache, RecordId};
use crate::error::{RestError, RestResult};
use crate::insights::{Advisor, FinancialSnapshot};
use crate::model::{
    DebtDetail, ExpenseDetail, IncomeDetail, NewUserInsight, ReportCreated, StoredInsights,
};
use crate::repo::{FinancesRepo, InsightsRepo, UsersRepo};

use super::{ensure_user_exists, knowledge, load_catalog, user_not_found};

/// Run the advisory agents over everything known about the user and store the result
#[tracing::instrument(name = "Generate financial report", skip(database, cache, advisor))]
#[post("/{user_id}/insights/financial_report")]
async fn financial_report(
    database: web::Data<Database>,
    cache: web::Data<CatalogCache>,
    advisor: web::Data<Advisor>,
    path: web::Path<RecordId>,
) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let user_id = path.into_inner().get();

    let user = UsersRepo::fetch(db, user_id)
        .await?
        .ok_or_else(|| user_not_found(user_id))?;
    let catalog = load_catalog(db, &cache).await?;

    let (financial_knowledge, income, debts, expenses) = tokio::try_join!(
        knowledge::fetch_details(db, &catalog, user_id),
        FinancesRepo::fetch_all::<IncomeDetail>(db, user_id),
        FinancesRepo::fetch_all::<DebtDetail>(db, user_id),
        FinancesRepo::fetch_all::<ExpenseDetail>(db, user_id),
    )?;

    let snapshot = FinancialSnapshot::new(&user, &financial_knowledge, &income, &debts, &expenses);
    let advice = advisor.advise(user_id, &snapshot).await?;

    let report_time = Utc::now();
    let insights = StoredInsights {
        debt_insights: advice.debt,
        savings_insights: advice.savings,
        financial_report_markdown_summary: advice.report_markdown,
        priority_assessment: advice.priority,
        report_generated_at: report_time,
    };
    let row = NewUserInsight {
        user_id,
        insights: &insights,
        updated_at: report_time,
    };
    if InsightsRepo::insert(db, &row).await?.is_none() {
        tracing::warn!("Insights insert returned no row, the report may not have been stored");
    }

    tracing::info!("Stored financial report");
    Ok(HttpResponse::Created().json(ReportCreated::new(user_id, &insights)))
}

#[tracing::instrument(name = "Get latest insights", skip(database))]
#[get("/{user_id}/insights/latest")]
async fn latest(database: web::Data<Database>, path: web::Path<RecordId>) -> RestResult<HttpResponse> {
    let db = database.client()?;
    let user_id = path.into_inner().get();

    ensure_user_exists(db, user_id).await?;
    let insight = InsightsRepo::fetch_latest(db, user_id).await?.ok_or_else(|| {
        RestError::NotFound(format!("No insights found for user ID {}.", user_id))
    })?;

    Ok(HttpResponse::Ok().json(insight))
}

/// Routes under `/users/{user_id}/insights`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(financial_report).service(latest);
}
