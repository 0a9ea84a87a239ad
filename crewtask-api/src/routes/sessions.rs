/// Session endpoint
///
/// # Endpoints
///
/// - `POST /sessions` - Login with email and password, returns a session
///   token and the password-stripped user
///
/// The issued token carries the user's id and role; every later request
/// authenticates with `Authorization: Bearer <token>`.

use axum::{extract::State, Json};
use crewtask_shared::{
    auth::{jwt, password},
    models::user::User,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::users::UserResponse,
};

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Session token (24h)
    pub token: String,

    /// The authenticated user, password stripped
    pub user: UserResponse,
}

/// Login handler
///
/// Verifies the password against the stored Argon2id hash and issues an
/// HS256 session token. Unknown email and wrong password produce the same
/// response so the endpoint can't be used to enumerate accounts.
///
/// # Endpoint
///
/// ```text
/// POST /sessions
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "secret123"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Invalid email or password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let claims = jwt::Claims::new(user.id, user.role);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(user),
    }))
}
