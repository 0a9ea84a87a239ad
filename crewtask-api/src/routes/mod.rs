/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `sessions`: Login endpoint issuing session tokens
/// - `users`: Account management
/// - `teams`: Team and membership management
/// - `tasks`: Task CRUD, role-scoped listing, and status history

pub mod health;
pub mod sessions;
pub mod tasks;
pub mod teams;
pub mod users;
