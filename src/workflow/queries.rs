//! Role-scoped listings. Every listing builds one WHERE clause and runs it
//! twice, once for the total count and once for the page slice, so the
//! count is always computed from the same filtered set.

use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::model::leave_request::LeaveRequest;
use crate::model::overtime_request::OvertimeRequest;
use crate::model::role::Role;
use crate::model::status::RequestStatus;

use super::Actor;
use super::error::{WorkflowError, WorkflowResult};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct HistoryFilter {
    /// Filter by requester (honored for HR/Admin and managers only)
    #[schema(example = 42)]
    pub user_id: Option<u64>,
    /// Filter by request status
    #[schema(example = "approved")]
    pub status: Option<String>,
    /// Pagination page number (1-based)
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Items per page
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct PageParams {
    #[schema(example = 1)]
    pub page: Option<u64>,
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

pub struct Page {
    pub page: u64,
    pub per_page: u64,
}

impl Page {
    pub fn clamped(page: Option<u64>, per_page: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(10).clamp(1, 100),
        }
    }

    fn offset(&self) -> u64 {
        (self.page - 1) * self.per_page
    }
}

// Typed values for dynamic WHERE-clause binding.
enum FilterValue {
    U64(u64),
    Str(String),
}

/// WHERE fragment limiting pending listings to requests the actor may act
/// on. `pending_manager` requests are scoped by the requester's assigned
/// approver, never by department.
fn pending_scope(actor: &Actor) -> (String, Vec<FilterValue>) {
    match actor.role {
        Role::Manager => (
            " WHERE r.status = ? AND u.approver_id = ?".to_string(),
            vec![
                FilterValue::Str(RequestStatus::PendingManager.to_string()),
                FilterValue::U64(actor.user_id),
            ],
        ),
        Role::Hr | Role::Admin => (
            " WHERE r.status = ?".to_string(),
            vec![FilterValue::Str(RequestStatus::PendingHr.to_string())],
        ),
        // Regular users see their own still-open requests (e.g. to cancel).
        Role::User => (
            " WHERE r.user_id = ? AND r.status IN (?, ?)".to_string(),
            vec![
                FilterValue::U64(actor.user_id),
                FilterValue::Str(RequestStatus::PendingManager.to_string()),
                FilterValue::Str(RequestStatus::PendingHr.to_string()),
            ],
        ),
    }
}

/// WHERE fragment for history listings: users see their own requests,
/// managers their own plus their direct reports', HR/Admin everything.
fn history_scope(actor: &Actor, filter: &HistoryFilter) -> (String, Vec<FilterValue>) {
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args = Vec::new();

    match actor.role {
        Role::User => {
            where_sql.push_str(" AND r.user_id = ?");
            args.push(FilterValue::U64(actor.user_id));
        }
        Role::Manager => {
            where_sql.push_str(" AND (r.user_id = ? OR u.approver_id = ?)");
            args.push(FilterValue::U64(actor.user_id));
            args.push(FilterValue::U64(actor.user_id));
        }
        Role::Hr | Role::Admin => {}
    }

    if !matches!(actor.role, Role::User) {
        if let Some(user_id) = filter.user_id {
            where_sql.push_str(" AND r.user_id = ?");
            args.push(FilterValue::U64(user_id));
        }
    }

    if let Some(status) = filter.status.as_deref() {
        where_sql.push_str(" AND r.status = ?");
        args.push(FilterValue::Str(status.to_string()));
    }

    (where_sql, args)
}

async fn count_requests(
    pool: &MySqlPool,
    table: &str,
    where_sql: &str,
    args: &[FilterValue],
) -> WorkflowResult<i64> {
    let count_sql =
        format!("SELECT COUNT(*) FROM {table} r JOIN users u ON u.id = r.user_id{where_sql}");

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(s.as_str()),
        };
    }

    Ok(count_q.fetch_one(pool).await?)
}

macro_rules! fetch_page {
    ($pool:expr, $row_ty:ty, $table:expr, $where_sql:expr, $args:expr, $page:expr) => {{
        let data_sql = format!(
            "SELECT r.* FROM {} r JOIN users u ON u.id = r.user_id{} ORDER BY r.created_at DESC, r.id DESC LIMIT ? OFFSET ?",
            $table, $where_sql
        );

        let mut data_q = sqlx::query_as::<_, $row_ty>(&data_sql);
        for arg in &$args {
            data_q = match arg {
                FilterValue::U64(v) => data_q.bind(*v),
                FilterValue::Str(s) => data_q.bind(s.as_str()),
            };
        }

        data_q
            .bind($page.per_page)
            .bind($page.offset())
            .fetch_all($pool)
            .await?
    }};
}

pub async fn list_pending_leave(
    pool: &MySqlPool,
    actor: &Actor,
    page: &Page,
) -> WorkflowResult<(Vec<LeaveRequest>, i64)> {
    let (where_sql, args) = pending_scope(actor);
    let total = count_requests(pool, "leave_requests", &where_sql, &args).await?;
    let rows = fetch_page!(pool, LeaveRequest, "leave_requests", where_sql, args, page);
    Ok((rows, total))
}

pub async fn list_pending_overtime(
    pool: &MySqlPool,
    actor: &Actor,
    page: &Page,
) -> WorkflowResult<(Vec<OvertimeRequest>, i64)> {
    let (where_sql, args) = pending_scope(actor);
    let total = count_requests(pool, "overtime_requests", &where_sql, &args).await?;
    let rows = fetch_page!(pool, OvertimeRequest, "overtime_requests", where_sql, args, page);
    Ok((rows, total))
}

pub async fn list_leave_history(
    pool: &MySqlPool,
    actor: &Actor,
    filter: &HistoryFilter,
    page: &Page,
) -> WorkflowResult<(Vec<LeaveRequest>, i64)> {
    let (where_sql, args) = history_scope(actor, filter);
    let total = count_requests(pool, "leave_requests", &where_sql, &args).await?;
    let rows = fetch_page!(pool, LeaveRequest, "leave_requests", where_sql, args, page);
    Ok((rows, total))
}

pub async fn list_overtime_history(
    pool: &MySqlPool,
    actor: &Actor,
    filter: &HistoryFilter,
    page: &Page,
) -> WorkflowResult<(Vec<OvertimeRequest>, i64)> {
    let (where_sql, args) = history_scope(actor, filter);
    let total = count_requests(pool, "overtime_requests", &where_sql, &args).await?;
    let rows = fetch_page!(pool, OvertimeRequest, "overtime_requests", where_sql, args, page);
    Ok((rows, total))
}

/// Detail fetch, visible to the requester, their assigned approver, and
/// HR/Admin.
pub async fn get_leave(
    pool: &MySqlPool,
    actor: &Actor,
    request_id: u64,
) -> WorkflowResult<LeaveRequest> {
    let row = sqlx::query_as::<_, LeaveRequest>("SELECT * FROM leave_requests WHERE id = ?")
        .bind(request_id)
        .fetch_optional(pool)
        .await?
        .ok_or(WorkflowError::NotFound("leave request"))?;

    ensure_detail_visible(pool, actor, row.user_id).await?;
    Ok(row)
}

pub async fn get_overtime(
    pool: &MySqlPool,
    actor: &Actor,
    request_id: u64,
) -> WorkflowResult<OvertimeRequest> {
    let row = sqlx::query_as::<_, OvertimeRequest>("SELECT * FROM overtime_requests WHERE id = ?")
        .bind(request_id)
        .fetch_optional(pool)
        .await?
        .ok_or(WorkflowError::NotFound("overtime request"))?;

    ensure_detail_visible(pool, actor, row.user_id).await?;
    Ok(row)
}

async fn ensure_detail_visible(
    pool: &MySqlPool,
    actor: &Actor,
    requester_id: u64,
) -> WorkflowResult<()> {
    if actor.role.is_hr_or_admin() || actor.user_id == requester_id {
        return Ok(());
    }

    if actor.role == Role::Manager {
        let approver_id = sqlx::query_scalar::<_, Option<u64>>(
            "SELECT approver_id FROM users WHERE id = ?",
        )
        .bind(requester_id)
        .fetch_optional(pool)
        .await?
        .flatten();

        if approver_id == Some(actor.user_id) {
            return Ok(());
        }
    }

    Err(WorkflowError::Forbidden)
}
