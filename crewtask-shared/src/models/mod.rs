/// Database models for Crewtask
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: Accounts with an organization-wide role (admin or member)
/// - `team`: Named groups that scope task visibility
/// - `team_member`: Join entity binding users to teams
/// - `task`: Work items with status, priority, assignee and team
/// - `task_history`: Append-only audit log of task status transitions
///
/// # Example
///
/// ```no_run
/// use crewtask_shared::models::user::{User, CreateUser, UserRole};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     name: "Jane Doe".to_string(),
///     email: "jane@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::Member,
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod task_history;
pub mod team;
pub mod team_member;
pub mod user;
