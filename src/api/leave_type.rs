use crate::auth::auth::AuthUser;
use crate::model::leave_type::LeaveType;
use crate::utils::db_utils::{build_update_sql, execute_update};
use crate::utils::leave_type_cache;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

const LEAVE_TYPE_COLUMNS: &[&str] = &["name", "default_allocated_days"];

#[derive(Deserialize, ToSchema)]
pub struct CreateLeaveType {
    #[schema(example = "Vacation")]
    pub name: String,
    #[schema(example = 20.0)]
    pub default_allocated_days: f64,
}

/// List leave types (any authenticated user)
#[utoipa::path(
    get,
    path = "/api/v1/leave-types",
    responses(
        (status = 200, description = "All leave types", body = [LeaveType]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "LeaveType"
)]
pub async fn list_leave_types(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let types = sqlx::query_as::<_, LeaveType>(
        "SELECT id, name, default_allocated_days FROM leave_types ORDER BY name",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch leave types");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(types))
}

/// Create leave type (Admin)
#[utoipa::path(
    post,
    path = "/api/v1/leave-types",
    request_body = CreateLeaveType,
    responses(
        (status = 201, description = "Leave type created", body = Object, example = json!({
            "message": "Leave type created",
            "id": 1
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Name already exists")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "LeaveType"
)]
pub async fn create_leave_type(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeaveType>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    if payload.name.trim().is_empty() || payload.default_allocated_days < 0.0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Name must be non-empty and allocation non-negative"
        })));
    }

    let result = sqlx::query("INSERT INTO leave_types (name, default_allocated_days) VALUES (?, ?)")
        .bind(payload.name.trim())
        .bind(payload.default_allocated_days)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => Ok(HttpResponse::Created().json(json!({
            "message": "Leave type created",
            "id": res.last_insert_id()
        }))),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code() == Some("23000".into()) {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "message": "Leave type name already exists"
                    })));
                }
            }

            error!(error = %e, "Failed to create leave type");
            Err(actix_web::error::ErrorInternalServerError("Internal Server Error"))
        }
    }
}

/// Update leave type (Admin); drops the cached entry
#[utoipa::path(
    put,
    path = "/api/v1/leave-types/{leave_type_id}",
    params(
        ("leave_type_id" = u64, Path, description = "Leave type ID")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Leave type updated"),
        (status = 400, description = "Unknown field in payload"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Leave type not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "LeaveType"
)]
pub async fn update_leave_type(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let leave_type_id = path.into_inner();

    let update = build_update_sql("leave_types", &body, LEAVE_TYPE_COLUMNS, "id", leave_type_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Leave type not found"
        })));
    }

    leave_type_cache::invalidate(leave_type_id).await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave type updated"
    })))
}
