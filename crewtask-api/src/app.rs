/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use crewtask_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database_url).await?;
/// let state = AppState::new(pool, config);
/// let app = crewtask_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use axum::{
    extract::Request,
    handler::Handler,
    middleware::{from_fn, from_fn_with_state, Next},
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use crewtask_shared::auth::{context::AuthContext, jwt};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Config;
use crate::middleware::require_admin;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; the pool
/// and config are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt_secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET    /health                        # public
/// ├── POST   /sessions                      # public (login)
/// ├── /users                                # authenticated
/// │   ├── POST   /            (admin)
/// │   ├── GET    /            (admin)
/// │   ├── GET    /:id         (self-or-admin policy)
/// │   ├── PUT    /:id         (self-or-admin policy)
/// │   └── DELETE /:id         (admin)
/// ├── /teams                                # authenticated
/// │   ├── GET    /
/// │   ├── POST   /            (admin)
/// │   ├── PUT    /:id         (admin)
/// │   ├── DELETE /:id         (admin)
/// │   ├── POST   /:id/members (admin)
/// │   └── DELETE /:id/members/:user_id (admin)
/// └── /tasks                                # authenticated
///     ├── POST   /            (creation policy)
///     ├── GET    /            (role-scoped listing)
///     ├── GET    /:id         (membership policy)
///     ├── PUT    /:id         (assignee policy)
///     ├── DELETE /:id         (admin)
///     └── GET    /:id/history (membership policy)
/// ```
///
/// # Middleware Stack
///
/// Outermost first: request tracing, CORS, then per-group JWT
/// authentication, then the per-route admin gate. Fine-grained policy
/// checks run inside the handlers after existence checks.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes: no auth
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/sessions", post(routes::sessions::login));

    // Everything else requires a valid session token; admin-only
    // operations additionally wrap their handler in the role gate.
    let protected_routes = Router::new()
        .route(
            "/users",
            post(routes::users::create_user.layer(from_fn(require_admin)))
                .get(routes::users::list_users.layer(from_fn(require_admin))),
        )
        .route(
            "/users/:id",
            get(routes::users::show_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user.layer(from_fn(require_admin))),
        )
        .route(
            "/teams",
            post(routes::teams::create_team.layer(from_fn(require_admin)))
                .get(routes::teams::list_teams),
        )
        .route(
            "/teams/:id",
            put(routes::teams::update_team.layer(from_fn(require_admin)))
                .delete(routes::teams::delete_team.layer(from_fn(require_admin))),
        )
        .route(
            "/teams/:id/members",
            post(routes::teams::add_member.layer(from_fn(require_admin))),
        )
        .route(
            "/teams/:id/members/:user_id",
            delete(routes::teams::remove_member.layer(from_fn(require_admin))),
        )
        .route(
            "/tasks",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::show_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task.layer(from_fn(require_admin))),
        )
        .route("/tasks/:id/history", get(routes::tasks::show_history))
        .layer(from_fn_with_state(state.clone(), jwt_auth_layer));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Browser clients are same-team internal tools; tighten per
        // deployment if the API is ever exposed cross-origin.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the token from the Authorization header, then
/// injects the caller's [`AuthContext`] into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        crate::error::ApiError::BadRequest("Expected Bearer token".to_string())
    })?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    req.extensions_mut().insert(AuthContext::from_claims(&claims));

    Ok(next.run(req).await)
}
