/// Task model and database operations
///
/// Tasks are the central work item: assigned to a user, scoped to a team,
/// carrying a three-valued status and priority. Status changes are audited
/// through the TaskHistory model; the comparison and history write live in
/// the lifecycle module, not here.
///
/// Status and priority move freely between any enum values. There is no
/// ordering constraint beyond enum membership.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'completed');
/// CREATE TYPE task_priority AS ENUM ('high', 'medium', 'low');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'pending',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     assigned_to UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     team_id UUID REFERENCES teams(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `team_id` is required at creation but nullable in storage: deleting a
/// team orphans its tasks, which then become visible to admins only.
///
/// # Example
///
/// ```no_run
/// use crewtask_shared::models::task::{Task, CreateTask, TaskStatus, TaskPriority};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid, team_id: Uuid) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     title: "Rotate credentials".to_string(),
///     description: None,
///     status: None,     // defaults to pending
///     priority: None,   // defaults to medium
///     assigned_to: user_id,
///     team_id,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet (default)
    Pending,

    /// Being worked on
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Urgent
    High,

    /// Normal (default)
    Medium,

    /// Whenever
    Low,
}

impl TaskPriority {
    /// Converts priority to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::High => "high",
            TaskPriority::Medium => "medium",
            TaskPriority::Low => "low",
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Short title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// Current priority
    pub priority: TaskPriority,

    /// User the task is assigned to
    pub assigned_to: Uuid,

    /// Team the task belongs to (None once the team is deleted)
    pub team_id: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Short title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status (defaults to pending)
    pub status: Option<TaskStatus>,

    /// Initial priority (defaults to medium)
    pub priority: Option<TaskPriority>,

    /// User the task is assigned to
    pub assigned_to: Uuid,

    /// Team the task belongs to
    pub team_id: Uuid,
}

/// Patch for updating a task
///
/// All fields are optional; absent fields keep their prior value. There is
/// no way to clear a field through a patch. The merge itself happens in
/// the lifecycle module so history recording cannot be bypassed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New assignee (admin-only, enforced by the policy layer)
    pub assigned_to: Option<Uuid>,
}

impl Task {
    /// Creates a new task
    ///
    /// Status and priority fall back to their column defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the assignee or team doesn't exist (foreign key
    /// violation) or the database operation fails.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, priority, assigned_to, team_id)
            VALUES ($1, $2, COALESCE($3, 'pending'::task_status), COALESCE($4, 'medium'::task_priority), $5, $6)
            RETURNING id, title, description, status, priority, assigned_to, team_id,
                      created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.assigned_to)
        .bind(data.team_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, priority, assigned_to, team_id,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Persists the mutable fields of an already-merged task
    ///
    /// Called by the lifecycle manager after applying a patch; writes every
    /// mutable column and refreshes `updated_at`.
    pub async fn update(pool: &PgPool, task: &Task) -> Result<Self, sqlx::Error> {
        let updated = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $2,
                description = $3,
                status = $4,
                priority = $5,
                assigned_to = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, status, priority, assigned_to, team_id,
                      created_at, updated_at
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.assigned_to)
        .fetch_one(pool)
        .await?;

        Ok(updated)
    }

    /// Deletes a task by ID
    ///
    /// History records cascade with the task.
    ///
    /// # Returns
    ///
    /// True if the task was deleted, false if the task didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all tasks, newest first (admin view)
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, priority, assigned_to, team_id,
                   created_at, updated_at
            FROM tasks
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks belonging to any of the given teams, newest first
    ///
    /// The member-scoped listing: an empty slice yields no rows, so a
    /// member of no teams sees nothing.
    pub async fn list_by_teams(pool: &PgPool, team_ids: &[Uuid]) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, priority, assigned_to, team_id,
                   created_at, updated_at
            FROM tasks
            WHERE team_id = ANY($1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(team_ids)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Pending.as_str(), "pending");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn test_task_priority_as_str() {
        assert_eq!(TaskPriority::High.as_str(), "high");
        assert_eq!(TaskPriority::Medium.as_str(), "medium");
        assert_eq!(TaskPriority::Low.as_str(), "low");
    }

    #[test]
    fn test_task_status_serde_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");

        let status: TaskStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, TaskStatus::Completed);
    }

    #[test]
    fn test_update_task_default_is_noop() {
        let patch = UpdateTask::default();
        assert!(patch.title.is_none());
        assert!(patch.description.is_none());
        assert!(patch.status.is_none());
        assert!(patch.priority.is_none());
        assert!(patch.assigned_to.is_none());
    }
}
