//! The transition table for the two-stage approval chain, encoded as pure
//! functions so it stays the single source of truth. `next_status` answers
//! whether a state permits an action at all; `authorize` answers whether a
//! given actor may take it. The engine checks them in that order, so a
//! terminal request always reports `InvalidTransition` regardless of actor.

use crate::model::role::Role;
use crate::model::status::{RequestAction, RequestStatus};

use super::Actor;
use super::error::{WorkflowError, WorkflowResult};

/// Which audit columns a transition writes into.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AuditStage {
    Manager,
    Hr,
}

/// The target status if `from` permits `action`, `None` otherwise.
pub fn next_status(from: RequestStatus, action: RequestAction) -> Option<RequestStatus> {
    use RequestAction::*;
    use RequestStatus::*;

    match (from, action) {
        (PendingManager, Approve) => Some(PendingHr),
        (PendingManager, Reject) => Some(Rejected),
        (PendingManager, Cancel) => Some(Cancelled),
        (PendingHr, Approve) => Some(Approved),
        (PendingHr, Reject) => Some(Rejected),
        (PendingHr, Cancel) => Some(Cancelled),
        (Approved, Cancel) => Some(Cancelled),
        _ => None,
    }
}

/// Whether `actor` may apply `action` to a request currently in `from`,
/// raised by `requester_id` whose assigned approver is `approver_id`.
///
/// Manager-stage approve/reject is restricted to the exact assigned
/// approver, not any manager and not department peers.
pub fn authorize(
    actor: &Actor,
    requester_id: u64,
    approver_id: Option<u64>,
    from: RequestStatus,
    action: RequestAction,
) -> WorkflowResult<()> {
    use RequestAction::*;
    use RequestStatus::*;

    let is_requester = actor.user_id == requester_id;
    let is_assigned_approver =
        actor.role == Role::Manager && approver_id == Some(actor.user_id);

    let allowed = match (from, action) {
        (PendingManager, Approve | Reject) => is_assigned_approver,
        (PendingManager, Cancel) => is_requester || is_assigned_approver,
        (PendingHr, Approve | Reject) => actor.role.is_hr_or_admin(),
        (PendingHr, Cancel) => is_requester || actor.role.is_hr_or_admin(),
        // Undoing an approval reverses a ledger mutation, so only HR/Admin.
        (Approved, Cancel) => actor.role.is_hr_or_admin(),
        _ => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(WorkflowError::Forbidden)
    }
}

/// The audit columns written when leaving `from`.
pub fn audit_stage(from: RequestStatus) -> AuditStage {
    match from {
        RequestStatus::PendingManager => AuditStage::Manager,
        _ => AuditStage::Hr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(user_id: u64, role: Role) -> Actor {
        Actor { user_id, role }
    }

    #[test]
    fn progression_is_linear_and_forward_only() {
        use RequestAction::*;
        use RequestStatus::*;

        assert_eq!(next_status(PendingManager, Approve), Some(PendingHr));
        assert_eq!(next_status(PendingHr, Approve), Some(Approved));
        // No stage skipping: manager approval never lands on Approved.
        assert_ne!(next_status(PendingManager, Approve), Some(Approved));
    }

    #[test]
    fn terminal_states_permit_nothing_but_approved_cancel() {
        use RequestAction::*;
        use RequestStatus::*;

        for action in [Approve, Reject, Cancel] {
            assert_eq!(next_status(Rejected, action), None);
            assert_eq!(next_status(Cancelled, action), None);
        }
        assert_eq!(next_status(Approved, Approve), None);
        assert_eq!(next_status(Approved, Reject), None);
        assert_eq!(next_status(Approved, Cancel), Some(RequestStatus::Cancelled));
    }

    #[test]
    fn any_non_terminal_state_can_cancel() {
        assert!(next_status(RequestStatus::PendingManager, RequestAction::Cancel).is_some());
        assert!(next_status(RequestStatus::PendingHr, RequestAction::Cancel).is_some());
    }

    #[test]
    fn assigned_approver_may_act_at_manager_stage() {
        let manager = actor(7, Role::Manager);
        let result = authorize(
            &manager,
            42,
            Some(7),
            RequestStatus::PendingManager,
            RequestAction::Approve,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn non_assigned_manager_is_forbidden() {
        let other_manager = actor(8, Role::Manager);
        let result = authorize(
            &other_manager,
            42,
            Some(7),
            RequestStatus::PendingManager,
            RequestAction::Approve,
        );
        assert!(matches!(result, Err(WorkflowError::Forbidden)));
    }

    #[test]
    fn hr_cannot_act_at_manager_stage() {
        let hr = actor(3, Role::Hr);
        let result = authorize(
            &hr,
            42,
            Some(7),
            RequestStatus::PendingManager,
            RequestAction::Approve,
        );
        assert!(matches!(result, Err(WorkflowError::Forbidden)));
    }

    #[test]
    fn requester_may_cancel_own_pending_request() {
        let requester = actor(42, Role::User);
        for from in [RequestStatus::PendingManager, RequestStatus::PendingHr] {
            let result = authorize(&requester, 42, Some(7), from, RequestAction::Cancel);
            assert!(result.is_ok());
        }
    }

    #[test]
    fn requester_cannot_approve_own_request() {
        let requester = actor(42, Role::User);
        let result = authorize(
            &requester,
            42,
            Some(7),
            RequestStatus::PendingManager,
            RequestAction::Approve,
        );
        assert!(matches!(result, Err(WorkflowError::Forbidden)));
    }

    #[test]
    fn hr_and_admin_act_at_hr_stage() {
        for role in [Role::Hr, Role::Admin] {
            let reviewer = actor(3, role);
            let result = authorize(
                &reviewer,
                42,
                Some(7),
                RequestStatus::PendingHr,
                RequestAction::Approve,
            );
            assert!(result.is_ok());
        }
    }

    #[test]
    fn only_hr_or_admin_may_cancel_an_approved_request() {
        let requester = actor(42, Role::User);
        let result = authorize(
            &requester,
            42,
            Some(7),
            RequestStatus::Approved,
            RequestAction::Cancel,
        );
        assert!(matches!(result, Err(WorkflowError::Forbidden)));

        let hr = actor(3, Role::Hr);
        let result = authorize(&hr, 42, Some(7), RequestStatus::Approved, RequestAction::Cancel);
        assert!(result.is_ok());
    }

    #[test]
    fn audit_columns_follow_the_stage_being_left() {
        assert_eq!(audit_stage(RequestStatus::PendingManager), AuditStage::Manager);
        assert_eq!(audit_stage(RequestStatus::PendingHr), AuditStage::Hr);
        assert_eq!(audit_stage(RequestStatus::Approved), AuditStage::Hr);
    }
}
