pub mod balance;
pub mod department;
pub mod leave_request;
pub mod leave_type;
pub mod overtime_request;
pub mod user;

use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;

use crate::workflow::WorkflowError;

/// Maps each workflow outcome to a status code and user-facing message.
/// Store failures are logged here and surface as a generic 500.
impl actix_web::ResponseError for WorkflowError {
    fn status_code(&self) -> StatusCode {
        match self {
            WorkflowError::InvalidRange => StatusCode::BAD_REQUEST,
            WorkflowError::InsufficientBalance => StatusCode::CONFLICT,
            WorkflowError::Forbidden => StatusCode::FORBIDDEN,
            WorkflowError::InvalidTransition => StatusCode::CONFLICT,
            WorkflowError::NotFound(_) => StatusCode::NOT_FOUND,
            WorkflowError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let WorkflowError::Store(e) = self {
            tracing::error!(error = %e, "Workflow store failure");
            return HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }));
        }

        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}
