//! Balance ledger: per (user, leave type, year) allocation/usage rows.
//! Reserve/release run inside the engine's transaction so a transition and
//! its ledger effect commit or roll back together. The allocation guard is
//! a predicate on the UPDATE itself, so two racing reservations cannot both
//! slip under the cap.

use serde::Serialize;
use sqlx::{MySql, MySqlPool, Transaction};
use utoipa::ToSchema;

use crate::model::leave_balance::LeaveBalance;

use super::error::{WorkflowError, WorkflowResult};

/// Per-leave-type aggregate across all employees for one year.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct BalanceSummary {
    pub leave_type_id: u64,
    #[schema(example = "Vacation")]
    pub leave_type: String,
    pub allocated_days: f64,
    pub used_days: f64,
    pub remaining_days: f64,
}

/// One employee's balance row joined with its leave type name.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct UserBalance {
    pub leave_type_id: u64,
    #[schema(example = "Vacation")]
    pub leave_type: String,
    pub year: u16,
    pub allocated_days: f64,
    pub used_days: f64,
}

/// Returns the balance row for (user, type, year), creating it seeded with
/// `default_allocated_days` if missing. Idempotent: the unique key absorbs
/// concurrent inserts and the follow-up select returns the surviving row.
pub async fn get_or_create(
    tx: &mut Transaction<'_, MySql>,
    user_id: u64,
    leave_type_id: u64,
    year: u16,
    default_allocated_days: f64,
) -> WorkflowResult<LeaveBalance> {
    sqlx::query(
        r#"
        INSERT IGNORE INTO leave_balances (user_id, leave_type_id, year, allocated_days, used_days)
        VALUES (?, ?, ?, ?, 0)
        "#,
    )
    .bind(user_id)
    .bind(leave_type_id)
    .bind(year)
    .bind(default_allocated_days)
    .execute(&mut **tx)
    .await?;

    let balance = sqlx::query_as::<_, LeaveBalance>(
        r#"
        SELECT id, user_id, leave_type_id, year, allocated_days, used_days
        FROM leave_balances
        WHERE user_id = ? AND leave_type_id = ? AND year = ?
        "#,
    )
    .bind(user_id)
    .bind(leave_type_id)
    .bind(year)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(WorkflowError::NotFound("leave balance"))?;

    Ok(balance)
}

/// Adds `days` to `used_days`. Refuses to overdraw the allocation unless
/// `override_allocation` is set (HR-only path; callers gate it by role).
pub async fn reserve_usage(
    tx: &mut Transaction<'_, MySql>,
    balance_id: u64,
    days: f64,
    override_allocation: bool,
) -> WorkflowResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE leave_balances
        SET used_days = used_days + ?
        WHERE id = ?
        AND (? OR used_days + ? <= allocated_days)
        "#,
    )
    .bind(days)
    .bind(balance_id)
    .bind(override_allocation)
    .bind(days)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(WorkflowError::InsufficientBalance);
    }

    if override_allocation {
        tracing::warn!(balance_id, days, "balance reserved with HR override");
    }

    Ok(())
}

/// Subtracts `days` from `used_days`, floored at zero. Used when a
/// previously approved request is cancelled.
pub async fn release_usage(
    tx: &mut Transaction<'_, MySql>,
    balance_id: u64,
    days: f64,
) -> WorkflowResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE leave_balances
        SET used_days = GREATEST(used_days - ?, 0)
        WHERE id = ?
        "#,
    )
    .bind(days)
    .bind(balance_id)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(WorkflowError::NotFound("leave balance"));
    }

    Ok(())
}

/// Aggregates allocated/used/remaining per leave type across all employees.
/// Read-only.
pub async fn summarize(pool: &MySqlPool, year: u16) -> WorkflowResult<Vec<BalanceSummary>> {
    let rows = sqlx::query_as::<_, BalanceSummary>(
        r#"
        SELECT
            lt.id AS leave_type_id,
            lt.name AS leave_type,
            COALESCE(SUM(b.allocated_days), 0) AS allocated_days,
            COALESCE(SUM(b.used_days), 0) AS used_days,
            COALESCE(SUM(b.allocated_days - b.used_days), 0) AS remaining_days
        FROM leave_types lt
        LEFT JOIN leave_balances b
            ON b.leave_type_id = lt.id AND b.year = ?
        GROUP BY lt.id, lt.name
        ORDER BY lt.name
        "#,
    )
    .bind(year)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// One employee's balances for a year, joined with leave type names.
pub async fn balances_for_user(
    pool: &MySqlPool,
    user_id: u64,
    year: u16,
) -> WorkflowResult<Vec<UserBalance>> {
    let rows = sqlx::query_as::<_, UserBalance>(
        r#"
        SELECT
            b.leave_type_id,
            lt.name AS leave_type,
            b.year,
            b.allocated_days,
            b.used_days
        FROM leave_balances b
        JOIN leave_types lt ON lt.id = b.leave_type_id
        WHERE b.user_id = ? AND b.year = ?
        ORDER BY lt.name
        "#,
    )
    .bind(user_id)
    .bind(year)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
