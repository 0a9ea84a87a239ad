/// Middleware for the API server
///
/// The JWT authentication layer lives in `app.rs` next to the router; this
/// module holds the coarse role gate applied to admin-only routes.

pub mod role_gate;

pub use role_gate::require_admin;
