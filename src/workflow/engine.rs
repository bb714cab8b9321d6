//! Drives a request from creation to a terminal status. Every transition is
//! applied as one transaction with a `WHERE status = <from>` predicate on
//! the request row, so concurrent attempts serialize: the loser sees zero
//! affected rows and gets `InvalidTransition` instead of double-applying a
//! ledger mutation.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::MySqlPool;
use std::str::FromStr;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::model::status::{RequestAction, RequestStatus, Session};
use crate::utils::leave_type_cache;

use super::error::{WorkflowError, WorkflowResult};
use super::transition::{self, AuditStage};
use super::{Actor, day_count, ledger};

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewLeaveRequest {
    #[schema(example = 1)]
    pub leave_type_id: u64,
    #[schema(example = "2025-06-02", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2025-06-04", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "full_day")]
    pub session: Session,
    #[schema(example = "Family trip")]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewOvertimeRequest {
    #[schema(example = "2025-06-02T18:00:00Z", format = "date-time", value_type = String)]
    pub start_time: DateTime<Utc>,
    #[schema(example = "2025-06-02T21:00:00Z", format = "date-time", value_type = String)]
    pub end_time: DateTime<Utc>,
    #[schema(example = "Release deployment")]
    pub reason: Option<String>,
}

/// Stored strings are written exclusively by this module, so a parse
/// failure means a corrupted row and surfaces as a store error.
fn parse_stored<T: FromStr>(value: &str, what: &'static str) -> WorkflowResult<T> {
    value.parse().map_err(|_| {
        WorkflowError::Store(sqlx::Error::Decode(
            format!("unrecognized {what} value: {value}").into(),
        ))
    })
}

pub async fn create_leave_request(
    pool: &MySqlPool,
    actor: &Actor,
    req: &NewLeaveRequest,
) -> WorkflowResult<u64> {
    // Rejects reversed ranges before anything touches the store.
    day_count::leave_days(req.start_date, req.end_date, req.session)?;

    leave_type_cache::get(pool, req.leave_type_id)
        .await?
        .ok_or(WorkflowError::NotFound("leave type"))?;

    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests
            (user_id, leave_type_id, start_date, end_date, session, reason, status)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(actor.user_id)
    .bind(req.leave_type_id)
    .bind(req.start_date)
    .bind(req.end_date)
    .bind(req.session.to_string())
    .bind(req.reason.as_deref())
    .bind(RequestStatus::PendingManager.to_string())
    .execute(pool)
    .await?;

    let id = result.last_insert_id();
    info!(request_id = id, user_id = actor.user_id, "leave request created");
    Ok(id)
}

pub async fn create_overtime_request(
    pool: &MySqlPool,
    actor: &Actor,
    req: &NewOvertimeRequest,
) -> WorkflowResult<u64> {
    if req.end_time <= req.start_time {
        return Err(WorkflowError::InvalidRange);
    }

    let result = sqlx::query(
        r#"
        INSERT INTO overtime_requests (user_id, start_time, end_time, reason, status)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(actor.user_id)
    .bind(req.start_time)
    .bind(req.end_time)
    .bind(req.reason.as_deref())
    .bind(RequestStatus::PendingManager.to_string())
    .execute(pool)
    .await?;

    let id = result.last_insert_id();
    info!(request_id = id, user_id = actor.user_id, "overtime request created");
    Ok(id)
}

#[derive(sqlx::FromRow)]
struct LeaveActionRow {
    status: String,
    user_id: u64,
    leave_type_id: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    session: String,
    approver_id: Option<u64>,
}

/// Applies `action` to a leave request, recording the acting stage's audit
/// fields and, when the transition touches the ledger, reserving or
/// releasing the request's day count in the same transaction.
#[instrument(skip(pool, comments), fields(actor_id = actor.user_id))]
pub async fn act_on_leave(
    pool: &MySqlPool,
    actor: &Actor,
    request_id: u64,
    action: RequestAction,
    comments: Option<&str>,
    override_balance: bool,
) -> WorkflowResult<RequestStatus> {
    let row = sqlx::query_as::<_, LeaveActionRow>(
        r#"
        SELECT r.status, r.user_id, r.leave_type_id, r.start_date, r.end_date,
               r.session, u.approver_id
        FROM leave_requests r
        JOIN users u ON u.id = r.user_id
        WHERE r.id = ?
        "#,
    )
    .bind(request_id)
    .fetch_optional(pool)
    .await?
    .ok_or(WorkflowError::NotFound("leave request"))?;

    let from: RequestStatus = parse_stored(&row.status, "status")?;
    let session: Session = parse_stored(&row.session, "session")?;

    let to = transition::next_status(from, action).ok_or(WorkflowError::InvalidTransition)?;
    transition::authorize(actor, row.user_id, row.approver_id, from, action)?;

    // Resolved before the transaction: only needed to seed a missing
    // balance row with the leave type's default allocation.
    let leave_type = leave_type_cache::get(pool, row.leave_type_id)
        .await?
        .ok_or(WorkflowError::NotFound("leave type"))?;

    let mut tx = pool.begin().await?;

    let (by_col, at_col, comments_col) = match transition::audit_stage(from) {
        AuditStage::Manager => ("manager_action_by", "manager_action_at", "manager_comments"),
        AuditStage::Hr => ("hr_action_by", "hr_action_at", "hr_comments"),
    };

    // Optimistic concurrency: the status predicate makes the first writer
    // win and the second fail cleanly.
    let sql = format!(
        "UPDATE leave_requests SET status = ?, {by_col} = ?, {at_col} = UTC_TIMESTAMP(), {comments_col} = ? WHERE id = ? AND status = ?"
    );
    let updated = sqlx::query(&sql)
        .bind(to.to_string())
        .bind(actor.user_id)
        .bind(comments)
        .bind(request_id)
        .bind(from.to_string())
        .execute(&mut *tx)
        .await?;

    if updated.rows_affected() == 0 {
        return Err(WorkflowError::InvalidTransition);
    }

    if to == RequestStatus::Approved {
        let days = day_count::leave_days(row.start_date, row.end_date, session)?;
        let year = row.start_date.year() as u16;
        let balance = ledger::get_or_create(
            &mut tx,
            row.user_id,
            row.leave_type_id,
            year,
            leave_type.default_allocated_days,
        )
        .await?;
        ledger::reserve_usage(&mut tx, balance.id, days, override_balance).await?;
    }

    if from == RequestStatus::Approved && action == RequestAction::Cancel {
        let days = day_count::leave_days(row.start_date, row.end_date, session)?;
        let year = row.start_date.year() as u16;
        let balance = ledger::get_or_create(
            &mut tx,
            row.user_id,
            row.leave_type_id,
            year,
            leave_type.default_allocated_days,
        )
        .await?;
        ledger::release_usage(&mut tx, balance.id, days).await?;
    }

    tx.commit().await?;

    info!(request_id, from = %from, to = %to, "leave request transitioned");
    Ok(to)
}

#[derive(sqlx::FromRow)]
struct OvertimeActionRow {
    status: String,
    user_id: u64,
    approver_id: Option<u64>,
}

/// Applies `action` to an overtime request. Same state machine as leave,
/// no ledger side effects.
#[instrument(skip(pool, comments), fields(actor_id = actor.user_id))]
pub async fn act_on_overtime(
    pool: &MySqlPool,
    actor: &Actor,
    request_id: u64,
    action: RequestAction,
    comments: Option<&str>,
) -> WorkflowResult<RequestStatus> {
    let row = sqlx::query_as::<_, OvertimeActionRow>(
        r#"
        SELECT r.status, r.user_id, u.approver_id
        FROM overtime_requests r
        JOIN users u ON u.id = r.user_id
        WHERE r.id = ?
        "#,
    )
    .bind(request_id)
    .fetch_optional(pool)
    .await?
    .ok_or(WorkflowError::NotFound("overtime request"))?;

    let from: RequestStatus = parse_stored(&row.status, "status")?;

    let to = transition::next_status(from, action).ok_or(WorkflowError::InvalidTransition)?;
    transition::authorize(actor, row.user_id, row.approver_id, from, action)?;

    let (by_col, at_col, comments_col) = match transition::audit_stage(from) {
        AuditStage::Manager => ("manager_action_by", "manager_action_at", "manager_comments"),
        AuditStage::Hr => ("hr_action_by", "hr_action_at", "hr_comments"),
    };

    let sql = format!(
        "UPDATE overtime_requests SET status = ?, {by_col} = ?, {at_col} = UTC_TIMESTAMP(), {comments_col} = ? WHERE id = ? AND status = ?"
    );
    let updated = sqlx::query(&sql)
        .bind(to.to_string())
        .bind(actor.user_id)
        .bind(comments)
        .bind(request_id)
        .bind(from.to_string())
        .execute(pool)
        .await?;

    if updated.rows_affected() == 0 {
        return Err(WorkflowError::InvalidTransition);
    }

    info!(request_id, from = %from, to = %to, "overtime request transitioned");
    Ok(to)
}
