/// TaskHistory model and database operations
///
/// TaskHistory is the append-only audit log of task status transitions.
/// A record is written exactly when an update actually changes the status
/// value; reaffirming the current status writes nothing. Records are never
/// mutated or deleted directly, only cascaded away with their task.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_history (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     old_status task_status NOT NULL,
///     new_status task_status NOT NULL,
///     changed_by UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     changed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::task::TaskStatus;

/// A recorded status transition of a task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskHistory {
    /// Unique record ID
    pub id: Uuid,

    /// Task whose status changed
    pub task_id: Uuid,

    /// Status before the change
    pub old_status: TaskStatus,

    /// Status after the change
    pub new_status: TaskStatus,

    /// User who made the change
    pub changed_by: Uuid,

    /// When the change happened
    pub changed_at: DateTime<Utc>,
}

/// Input for recording a status transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskHistory {
    /// Task whose status changed
    pub task_id: Uuid,

    /// Status before the change
    pub old_status: TaskStatus,

    /// Status after the change
    pub new_status: TaskStatus,

    /// User who made the change
    pub changed_by: Uuid,
}

impl TaskHistory {
    /// Appends one history record
    ///
    /// Called by the lifecycle manager after a persisted status change.
    pub async fn create(pool: &PgPool, data: CreateTaskHistory) -> Result<Self, sqlx::Error> {
        let record = sqlx::query_as::<_, TaskHistory>(
            r#"
            INSERT INTO task_history (task_id, old_status, new_status, changed_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, task_id, old_status, new_status, changed_by, changed_at
            "#,
        )
        .bind(data.task_id)
        .bind(data.old_status)
        .bind(data.new_status)
        .bind(data.changed_by)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Lists the history of a task, most recent change first
    pub async fn list_by_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let records = sqlx::query_as::<_, TaskHistory>(
            r#"
            SELECT id, task_id, old_status, new_status, changed_by, changed_at
            FROM task_history
            WHERE task_id = $1
            ORDER BY changed_at DESC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_history_carries_both_endpoints() {
        let data = CreateTaskHistory {
            task_id: Uuid::new_v4(),
            old_status: TaskStatus::Pending,
            new_status: TaskStatus::InProgress,
            changed_by: Uuid::new_v4(),
        };

        assert_eq!(data.old_status, TaskStatus::Pending);
        assert_eq!(data.new_status, TaskStatus::InProgress);
    }
}
