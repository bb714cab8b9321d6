use crate::api::balance::YearQuery;
use crate::api::leave_request::{ActionPayload, LeaveListResponse};
use crate::api::leave_type::CreateLeaveType;
use crate::api::overtime_request::{OvertimeActionPayload, OvertimeListResponse};
use crate::api::user::{UserListResponse, UserResponse};
use crate::model::department::Department;
use crate::model::leave_balance::LeaveBalance;
use crate::model::leave_request::LeaveRequest;
use crate::model::leave_type::LeaveType;
use crate::model::overtime_request::OvertimeRequest;
use crate::model::status::{RequestAction, RequestStatus, Session};
use crate::workflow::engine::{NewLeaveRequest, NewOvertimeRequest};
use crate::workflow::ledger::{BalanceSummary, UserBalance};
use crate::workflow::queries::{HistoryFilter, PageParams};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LeaveDesk API",
        version = "1.0.0",
        description = r#"
## Leave & Overtime Request Management

This API powers a leave/overtime request service with a **two-stage approval
workflow** (assigned manager, then HR) and per-year leave-balance accounting.

### 🔹 Key Features
- **Leave Requests**
  - Apply for leave (full-day or half-day sessions), track status, cancel
- **Overtime Requests**
  - Same approval chain, no balance interaction
- **Approval Workflow**
  - pending_manager → pending_hr → approved/rejected; cancel from any
    non-terminal state; complete audit trail per stage
- **Balance Ledger**
  - Per (user, leave type, year) allocation/usage; approval reserves the
    day count, post-approval cancellation releases it

### 🔐 Security
Endpoints are protected with **JWT Bearer authentication**. Manager-stage
actions are restricted to the requester's assigned approver; HR-stage
actions to HR/Admin roles.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::cancel_leave,
        crate::api::leave_request::pending_leave,
        crate::api::leave_request::leave_history,
        crate::api::leave_request::get_leave,

        crate::api::overtime_request::create_overtime,
        crate::api::overtime_request::approve_overtime,
        crate::api::overtime_request::reject_overtime,
        crate::api::overtime_request::cancel_overtime,
        crate::api::overtime_request::pending_overtime,
        crate::api::overtime_request::overtime_history,
        crate::api::overtime_request::get_overtime,

        crate::api::balance::my_balances,
        crate::api::balance::balance_summary,

        crate::api::leave_type::list_leave_types,
        crate::api::leave_type::create_leave_type,
        crate::api::leave_type::update_leave_type,

        crate::api::user::list_users,
        crate::api::user::update_user,

        crate::api::department::list_departments
    ),
    components(
        schemas(
            RequestStatus,
            Session,
            RequestAction,
            NewLeaveRequest,
            NewOvertimeRequest,
            ActionPayload,
            OvertimeActionPayload,
            LeaveRequest,
            OvertimeRequest,
            LeaveListResponse,
            OvertimeListResponse,
            LeaveType,
            CreateLeaveType,
            LeaveBalance,
            UserBalance,
            BalanceSummary,
            YearQuery,
            HistoryFilter,
            PageParams,
            UserResponse,
            UserListResponse,
            Department
        )
    ),
    tags(
        (name = "Leave", description = "Leave request workflow APIs"),
        (name = "Overtime", description = "Overtime request workflow APIs"),
        (name = "Balance", description = "Leave balance ledger APIs"),
        (name = "LeaveType", description = "Leave type reference data APIs"),
        (name = "User", description = "User administration APIs"),
        (name = "Department", description = "Department reference APIs"),
    )
)]
pub struct ApiDoc;
