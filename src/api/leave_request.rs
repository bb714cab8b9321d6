use crate::auth::auth::AuthUser;
use crate::model::leave_request::LeaveRequest;
use crate::model::status::RequestAction;
use crate::workflow::engine::{self, NewLeaveRequest};
use crate::workflow::queries::{self, HistoryFilter, Page, PageParams};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ActionPayload {
    #[schema(example = "Looks fine")]
    pub comments: Option<String>,
    /// HR-only: approve even if the allocation would be exceeded.
    #[schema(example = false)]
    pub override_balance: Option<bool>,
}

#[derive(serde::Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 10)]
    pub per_page: u64,
    #[schema(example = 1)]
    pub total: i64,
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = NewLeaveRequest,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request submitted successfully",
         body = Object,
         example = json!({
            "message": "Leave request submitted",
            "id": 1,
            "status": "pending_manager"
         })
        ),
        (status = 400, description = "Invalid date range"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown leave type")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<NewLeaveRequest>,
) -> actix_web::Result<impl Responder> {
    let id = engine::create_leave_request(pool.get_ref(), &auth.actor(), &payload).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request submitted",
        "id": id,
        "status": "pending_manager"
    })))
}

async fn act(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: Option<web::Json<ActionPayload>>,
    action: RequestAction,
) -> actix_web::Result<HttpResponse> {
    let request_id = path.into_inner();
    let payload = payload.map(|p| p.into_inner()).unwrap_or_default();

    let override_balance = auth.role.is_hr_or_admin() && payload.override_balance.unwrap_or(false);

    let status = engine::act_on_leave(
        pool.get_ref(),
        &auth.actor(),
        request_id,
        action,
        payload.comments.as_deref(),
        override_balance,
    )
    .await?;

    let message = match action {
        RequestAction::Approve => "Leave request approved",
        RequestAction::Reject => "Leave request rejected",
        RequestAction::Cancel => "Leave request cancelled",
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": message,
        "status": status
    })))
}

/* =========================
Approve leave (assigned manager, then HR/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    request_body(content = ActionPayload, content_type = "application/json"),
    responses(
        (status = 200, description = "Leave request advanced", body = Object, example = json!({
            "message": "Leave request approved",
            "status": "pending_hr"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Actor is not allowed to act at this stage"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already processed or insufficient balance")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: Option<web::Json<ActionPayload>>,
) -> actix_web::Result<impl Responder> {
    act(auth, pool, path, payload, RequestAction::Approve).await
}

/* =========================
Reject leave
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    request_body(content = ActionPayload, content_type = "application/json"),
    responses(
        (status = 200, description = "Leave request rejected"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Actor is not allowed to act at this stage"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: Option<web::Json<ActionPayload>>,
) -> actix_web::Result<impl Responder> {
    act(auth, pool, path, payload, RequestAction::Reject).await
}

/* =========================
Cancel leave (requester while pending; HR/Admin after approval)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/cancel",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to cancel")
    ),
    request_body(content = ActionPayload, content_type = "application/json"),
    responses(
        (status = 200, description = "Leave request cancelled; any reserved balance released"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Actor is not allowed to cancel this request"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Request already in a terminal state")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: Option<web::Json<ActionPayload>>,
) -> actix_web::Result<impl Responder> {
    act(auth, pool, path, payload, RequestAction::Cancel).await
}

/* =========================
Pending queue (role-scoped)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave/pending",
    params(PageParams),
    responses(
        (status = 200, description = "Requests the caller may act on", body = LeaveListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn pending_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<PageParams>,
) -> actix_web::Result<impl Responder> {
    let page = Page::clamped(query.page, query.per_page);
    let (data, total) = queries::list_pending_leave(pool.get_ref(), &auth.actor(), &page).await?;

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data,
        page: page.page,
        per_page: page.per_page,
        total,
    }))
}

/* =========================
History listing (role-scoped)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(HistoryFilter),
    responses(
        (status = 200, description = "Paginated leave history", body = LeaveListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_history(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<HistoryFilter>,
) -> actix_web::Result<impl Responder> {
    let page = Page::clamped(query.page, query.per_page);
    let (data, total) =
        queries::list_leave_history(pool.get_ref(), &auth.actor(), &query, &page).await?;

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data,
        page: page.page,
        per_page: page.per_page,
        total,
    }))
}

/* =========================
Detail
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not visible to this actor"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave = queries::get_leave(pool.get_ref(), &auth.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(leave))
}
