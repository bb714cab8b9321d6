use crate::auth::auth::AuthUser;
use crate::model::role::Role;
use crate::utils::db_utils::{build_update_sql, execute_update};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::{IntoParams, ToSchema};

const USER_COLUMNS: &[&str] = &["role_id", "approver_id", "department_id", "is_active"];

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UserQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Filter by role id (1=Admin, 2=HR, 3=Manager, 4=User)
    pub role_id: Option<u8>,
    pub department_id: Option<u64>,
    /// Search by username or employee code
    pub search: Option<String>,
}

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct UserResponse {
    pub id: u64,
    #[schema(example = "EMP-001")]
    pub employee_code: String,
    pub username: String,
    #[schema(example = 4)]
    pub role_id: u8,
    pub department_id: Option<u64>,
    pub approver_id: Option<u64>,
    pub is_active: bool,
}

#[derive(Serialize, ToSchema)]
pub struct UserListResponse {
    pub data: Vec<UserResponse>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 10)]
    pub total: i64,
}

/// List users (HR/Admin)
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(UserQuery),
    responses(
        (status = 200, description = "Paginated user list", body = UserListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "HR/Admin only")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "User"
)]
pub async fn list_users(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<UserQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // Helper enum for typed SQLx binding
    enum FilterValue {
        U64(u64),
        Str(String),
    }

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = Vec::new();
    let mut bindings: Vec<FilterValue> = Vec::new();

    if let Some(role_id) = query.role_id {
        conditions.push("role_id = ?");
        bindings.push(FilterValue::U64(role_id as u64));
    }

    if let Some(department_id) = query.department_id {
        conditions.push("department_id = ?");
        bindings.push(FilterValue::U64(department_id));
    }

    if let Some(search) = &query.search {
        conditions.push("(username LIKE ? OR employee_code LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(FilterValue::Str(like.clone()));
        bindings.push(FilterValue::Str(like));
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) FROM users {}", where_clause);
    debug!(sql = %count_sql, "Counting users");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = match b {
            FilterValue::U64(v) => count_query.bind(*v),
            FilterValue::Str(s) => count_query.bind(s.as_str()),
        };
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count users");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT id, employee_code, username, role_id, department_id, approver_id, is_active
         FROM users {} ORDER BY id DESC LIMIT ? OFFSET ?",
        where_clause
    );

    let mut data_query = sqlx::query_as::<_, UserResponse>(&data_sql);
    for b in &bindings {
        data_query = match b {
            FilterValue::U64(v) => data_query.bind(*v),
            FilterValue::Str(s) => data_query.bind(s.as_str()),
        };
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let users = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch users");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(UserListResponse {
        data: users,
        page,
        per_page,
        total,
    }))
}

/// Checks a prospective approver: must exist, be active, hold the MANAGER
/// role, and not be the user themself. Deeper cycle prevention belongs to
/// the tooling that plans org structure, not this endpoint.
async fn validate_approver(
    pool: &MySqlPool,
    user_id: u64,
    approver_id: u64,
) -> actix_web::Result<Option<HttpResponse>> {
    if approver_id == user_id {
        return Ok(Some(HttpResponse::BadRequest().json(json!({
            "message": "A user cannot be their own approver"
        }))));
    }

    let approver = sqlx::query_as::<_, (u8, bool)>(
        "SELECT role_id, is_active FROM users WHERE id = ?",
    )
    .bind(approver_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        error!(error = %e, approver_id, "Failed to fetch approver");
        ErrorInternalServerError("Database error")
    })?;

    match approver {
        None => Ok(Some(HttpResponse::BadRequest().json(json!({
            "message": "Approver does not exist"
        })))),
        Some((role_id, is_active)) => {
            if Role::from_id(role_id) != Some(Role::Manager) || !is_active {
                return Ok(Some(HttpResponse::BadRequest().json(json!({
                    "message": "Approver must be an active manager"
                }))));
            }
            Ok(None)
        }
    }
}

/// Update role/approver/department (HR/Admin)
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    params(
        ("user_id" = u64, Path, description = "User ID")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "User updated"),
        (status = 400, description = "Unknown field or invalid role/approver"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "HR/Admin only"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "User"
)]
pub async fn update_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let user_id = path.into_inner();

    if let Some(role_value) = body.get("role_id") {
        let valid = role_value
            .as_u64()
            .and_then(|id| u8::try_from(id).ok())
            .and_then(Role::from_id)
            .is_some();
        if !valid {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Unknown role id"
            })));
        }
    }

    if let Some(approver_value) = body.get("approver_id") {
        if let Some(approver_id) = approver_value.as_u64() {
            if let Some(resp) = validate_approver(pool.get_ref(), user_id, approver_id).await? {
                return Ok(resp);
            }
        } else if !approver_value.is_null() {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "approver_id must be a user id or null"
            })));
        }
    }

    let update = build_update_sql("users", &body, USER_COLUMNS, "id", user_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "User not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "User updated"
    })))
}
