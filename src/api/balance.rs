use crate::auth::auth::AuthUser;
use crate::workflow::ledger::{self, BalanceSummary, UserBalance};
use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct YearQuery {
    /// Calendar year; defaults to the current year
    #[schema(example = 2025)]
    pub year: Option<u16>,
}

fn resolve_year(year: Option<u16>) -> u16 {
    year.unwrap_or_else(|| Utc::now().year() as u16)
}

/// Own balances for a year
#[utoipa::path(
    get,
    path = "/api/v1/balances/my",
    params(YearQuery),
    responses(
        (status = 200, description = "Caller's balances for the year", body = [UserBalance]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Balance"
)]
pub async fn my_balances(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<YearQuery>,
) -> actix_web::Result<impl Responder> {
    let year = resolve_year(query.year);
    let balances = ledger::balances_for_user(pool.get_ref(), auth.user_id, year).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "year": year,
        "balances": balances
    })))
}

/// Company-wide per-leave-type aggregate (HR/Admin)
#[utoipa::path(
    get,
    path = "/api/v1/balances/summary",
    params(YearQuery),
    responses(
        (status = 200, description = "Allocated/used/remaining per leave type", body = [BalanceSummary]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "HR/Admin only")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Balance"
)]
pub async fn balance_summary(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<YearQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let year = resolve_year(query.year);
    let summary = ledger::summarize(pool.get_ref(), year).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "year": year,
        "summary": summary
    })))
}
