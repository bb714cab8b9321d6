use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Full leave request row, including the append-only two-stage audit trail.
/// Requests are never deleted; cancellation is a status transition.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    pub id: u64,
    pub user_id: u64,
    pub leave_type_id: u64,
    #[schema(example = "2025-06-02", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2025-06-04", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "full_day", value_type = String)]
    pub session: String,
    pub reason: Option<String>,
    #[schema(example = "pending_manager", value_type = String)]
    pub status: String,
    pub manager_action_by: Option<u64>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub manager_action_at: Option<DateTime<Utc>>,
    pub manager_comments: Option<String>,
    pub hr_action_by: Option<u64>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub hr_action_at: Option<DateTime<Utc>>,
    pub hr_comments: Option<String>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub created_at: Option<DateTime<Utc>>,
}
