/// User management endpoints
///
/// # Endpoints
///
/// - `POST /users` - Create user (admin)
/// - `GET /users` - List users (admin)
/// - `GET /users/:id` - Show profile (self or admin)
/// - `PUT /users/:id` - Update profile (self or admin; role changes admin-only)
/// - `DELETE /users/:id` - Delete user (admin)
///
/// Every response that carries a user goes through [`UserResponse`], which
/// has no password field, so a hash can never leak.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use crewtask_shared::{
    auth::{authorization, context::AuthContext, password},
    models::user::{CreateUser, UpdateUser, User, UserRole},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Display name
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Plaintext password, hashed before storage
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Update user request
///
/// Absent fields keep their prior value. Supplying `role` requires the
/// admin role, even on the caller's own record.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New display name
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,

    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New role (admin-only)
    pub role: Option<UserRole>,
}

/// User payload with the password hash stripped
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Organization-wide role
    pub role: UserRole,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Create a new user account
///
/// Admin-only (coarse gate at the route). New accounts start as members;
/// promoting to admin is a separate `PUT /users/:id` by an admin.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already exists
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    req.validate()?;

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict(
            "User with same email already exists".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
            role: UserRole::Member,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// List all users
///
/// Admin-only (coarse gate at the route).
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = User::list(&state.db).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Show a user's profile
///
/// Self or admin. The ownership check runs before the lookup, so a member
/// probing other IDs always gets 403, never a 404 that would confirm an
/// account exists.
pub async fn show_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<UserResponse>> {
    authorization::check_user_access(&auth, id)?;

    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

/// Update a user's profile
///
/// Self or admin for name and email; role changes are admin-only even on
/// the caller's own record.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `403 Forbidden`: Not self/admin, or a member supplied `role`
/// - `404 Not Found`: User doesn't exist
/// - `409 Conflict`: New email already belongs to another user
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate()?;

    authorization::check_user_access(&auth, id)?;
    authorization::check_role_change(&auth, req.role.is_some())?;

    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    // Uniqueness pre-check, excluding the record's own current email
    if let Some(ref email) = req.email {
        if *email != user.email && User::find_by_email(&state.db, email).await?.is_some() {
            return Err(ApiError::Conflict(
                "User with same email already exists".to_string(),
            ));
        }
    }

    let updated = User::update(
        &state.db,
        id,
        UpdateUser {
            name: req.name,
            email: req.email,
            role: req.role,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(updated)))
}

/// Delete a user account
///
/// Admin-only (coarse gate at the route).
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = User::delete(&state.db, id).await?;

    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
