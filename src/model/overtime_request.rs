use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Overtime request row. Same two-stage audit trail as leave requests,
/// no balance interaction.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct OvertimeRequest {
    pub id: u64,
    pub user_id: u64,
    #[schema(format = "date-time", value_type = String)]
    pub start_time: DateTime<Utc>,
    #[schema(format = "date-time", value_type = String)]
    pub end_time: DateTime<Utc>,
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
