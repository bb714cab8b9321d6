use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Reference data: a named leave category with its default annual allocation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "name": "Vacation",
    "default_allocated_days": 20.0
}))]
pub struct LeaveType {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Vacation")]
    pub name: String,
    #[schema(example = 20.0)]
    pub default_allocated_days: f64,
}
