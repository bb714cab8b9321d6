//! Approval workflow core: request lifecycle state machine, balance ledger
//! and role-scoped queries. Handlers in `crate::api` call in here and map
//! the typed errors to HTTP responses; nothing in this module knows about
//! actix.

pub mod day_count;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod queries;
pub mod transition;

use crate::model::role::Role;

pub use error::{WorkflowError, WorkflowResult};

/// The acting identity for every workflow operation, supplied by the
/// session layer. The core never authenticates credentials itself.
#[derive(Debug, Copy, Clone)]
pub struct Actor {
    pub user_id: u64,
    pub role: Role,
}
