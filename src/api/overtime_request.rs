use crate::auth::auth::AuthUser;
use crate::model::overtime_request::OvertimeRequest;
use crate::model::status::RequestAction;
use crate::workflow::engine::{self, NewOvertimeRequest};
use crate::workflow::queries::{self, HistoryFilter, Page, PageParams};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OvertimeActionPayload {
    #[schema(example = "Confirmed with the team lead")]
    pub comments: Option<String>,
}

#[derive(serde::Serialize, ToSchema)]
pub struct OvertimeListResponse {
    pub data: Vec<OvertimeRequest>,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 10)]
    pub per_page: u64,
    #[schema(example = 1)]
    pub total: i64,
}

/* =========================
Create overtime request
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/overtime",
    request_body(
        content = NewOvertimeRequest,
        description = "Overtime request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Overtime request submitted successfully",
         body = Object,
         example = json!({
            "message": "Overtime request submitted",
            "id": 1,
            "status": "pending_manager"
         })
        ),
        (status = 400, description = "End time not after start time"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn create_overtime(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<NewOvertimeRequest>,
) -> actix_web::Result<impl Responder> {
    let id = engine::create_overtime_request(pool.get_ref(), &auth.actor(), &payload).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Overtime request submitted",
        "id": id,
        "status": "pending_manager"
    })))
}

async fn act(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: Option<web::Json<OvertimeActionPayload>>,
    action: RequestAction,
) -> actix_web::Result<HttpResponse> {
    let request_id = path.into_inner();
    let payload = payload.map(|p| p.into_inner()).unwrap_or_default();

    let status = engine::act_on_overtime(
        pool.get_ref(),
        &auth.actor(),
        request_id,
        action,
        payload.comments.as_deref(),
    )
    .await?;

    let message = match action {
        RequestAction::Approve => "Overtime request approved",
        RequestAction::Reject => "Overtime request rejected",
        RequestAction::Cancel => "Overtime request cancelled",
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": message,
        "status": status
    })))
}

/* =========================
Approve / reject / cancel
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/overtime/{overtime_id}/approve",
    params(
        ("overtime_id" = u64, Path, description = "ID of the overtime request to approve")
    ),
    request_body(content = OvertimeActionPayload, content_type = "application/json"),
    responses(
        (status = 200, description = "Overtime request advanced"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Actor is not allowed to act at this stage"),
        (status = 404, description = "Overtime request not found"),
        (status = 409, description = "Already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn approve_overtime(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: Option<web::Json<OvertimeActionPayload>>,
) -> actix_web::Result<impl Responder> {
    act(auth, pool, path, payload, RequestAction::Approve).await
}

#[utoipa::path(
    put,
    path = "/api/v1/overtime/{overtime_id}/reject",
    params(
        ("overtime_id" = u64, Path, description = "ID of the overtime request to reject")
    ),
    request_body(content = OvertimeActionPayload, content_type = "application/json"),
    responses(
        (status = 200, description = "Overtime request rejected"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Actor is not allowed to act at this stage"),
        (status = 404, description = "Overtime request not found"),
        (status = 409, description = "Already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn reject_overtime(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: Option<web::Json<OvertimeActionPayload>>,
) -> actix_web::Result<impl Responder> {
    act(auth, pool, path, payload, RequestAction::Reject).await
}

#[utoipa::path(
    put,
    path = "/api/v1/overtime/{overtime_id}/cancel",
    params(
        ("overtime_id" = u64, Path, description = "ID of the overtime request to cancel")
    ),
    request_body(content = OvertimeActionPayload, content_type = "application/json"),
    responses(
        (status = 200, description = "Overtime request cancelled"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Actor is not allowed to cancel this request"),
        (status = 404, description = "Overtime request not found"),
        (status = 409, description = "Request already in a terminal state")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn cancel_overtime(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: Option<web::Json<OvertimeActionPayload>>,
) -> actix_web::Result<impl Responder> {
    act(auth, pool, path, payload, RequestAction::Cancel).await
}

/* =========================
Listings
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/overtime/pending",
    params(PageParams),
    responses(
        (status = 200, description = "Requests the caller may act on", body = OvertimeListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn pending_overtime(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<PageParams>,
) -> actix_web::Result<impl Responder> {
    let page = Page::clamped(query.page, query.per_page);
    let (data, total) =
        queries::list_pending_overtime(pool.get_ref(), &auth.actor(), &page).await?;

    Ok(HttpResponse::Ok().json(OvertimeListResponse {
        data,
        page: page.page,
        per_page: page.per_page,
        total,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/overtime",
    params(HistoryFilter),
    responses(
        (status = 200, description = "Paginated overtime history", body = OvertimeListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn overtime_history(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<HistoryFilter>,
) -> actix_web::Result<impl Responder> {
    let page = Page::clamped(query.page, query.per_page);
    let (data, total) =
        queries::list_overtime_history(pool.get_ref(), &auth.actor(), &query, &page).await?;

    Ok(HttpResponse::Ok().json(OvertimeListResponse {
        data,
        page: page.page,
        per_page: page.per_page,
        total,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/overtime/{overtime_id}",
    params(
        ("overtime_id" = u64, Path, description = "ID of the overtime request to fetch")
    ),
    responses(
        (status = 200, description = "Overtime request found", body = OvertimeRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not visible to this actor"),
        (status = 404, description = "Overtime request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn get_overtime(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let overtime = queries::get_overtime(pool.get_ref(), &auth.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(overtime))
}
