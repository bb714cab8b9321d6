pub mod department;
pub mod leave_balance;
pub mod leave_request;
pub mod leave_type;
pub mod overtime_request;
pub mod role;
pub mod status;
