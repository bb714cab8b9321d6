use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Allocated-vs-used accounting for one user, one leave type, one year.
/// Mutated only by the workflow engine.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveBalance {
    pub id: u64,
    pub user_id: u64,
    pub leave_type_id: u64,
    #[schema(example = 2025)]
    pub year: u16,
    #[schema(example = 20.0)]
    pub allocated_days: f64,
    #[schema(example = 3.5)]
    pub used_days: f64,
}
