/// Coarse role gate middleware
///
/// Admin-only routes wrap their handler in [`require_admin`]. The gate
/// runs after the JWT layer has populated the [`AuthContext`] extension
/// and before the handler, so a member is rejected with 403 without any
/// resource lookup and can't distinguish existing from missing resources
/// by probing admin routes.

use axum::{extract::Request, middleware::Next, response::Response};
use crewtask_shared::auth::context::AuthContext;

use crate::error::ApiError;

/// Rejects callers that are not admins
///
/// # Errors
///
/// - 401 if no `AuthContext` is present (the JWT layer didn't run)
/// - 403 if the caller's role is not admin
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let auth = req
        .extensions()
        .get::<AuthContext>()
        .copied()
        .ok_or_else(|| ApiError::Unauthorized("Missing authentication context".to_string()))?;

    if !auth.is_admin() {
        return Err(ApiError::Forbidden("Insufficient permissions".to_string()));
    }

    Ok(next.run(req).await)
}
