/// Task lifecycle manager
///
/// Applies a patch to a task and records the status transition, if any,
/// in the append-only history. This is the only write path for task
/// updates, so history recording cannot be bypassed.
///
/// # Merge semantics
///
/// A patch field that is absent keeps the prior value; there is no way to
/// null a field through a patch. Reaffirming the current status is
/// indistinguishable from omitting it: neither writes history.
///
/// # Example
///
/// ```no_run
/// use crewtask_shared::lifecycle::apply_update;
/// use crewtask_shared::models::task::{Task, TaskStatus, UpdateTask};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, task: Task, actor: Uuid) -> Result<(), sqlx::Error> {
/// let patch = UpdateTask {
///     status: Some(TaskStatus::InProgress),
///     ..Default::default()
/// };
///
/// // Persists the merge and appends one history record if the status
/// // actually changed value.
/// let updated = apply_update(&pool, task, patch, actor).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::task::{Task, TaskStatus, UpdateTask};
use crate::models::task_history::{CreateTaskHistory, TaskHistory};

/// Merges a patch into a task, returning the task as it should be persisted
///
/// Pure: no clock, no database. Fields absent from the patch retain their
/// prior values.
pub fn merge(task: &Task, patch: &UpdateTask) -> Task {
    Task {
        id: task.id,
        title: patch.title.clone().unwrap_or_else(|| task.title.clone()),
        description: patch
            .description
            .clone()
            .or_else(|| task.description.clone()),
        status: patch.status.unwrap_or(task.status),
        priority: patch.priority.unwrap_or(task.priority),
        assigned_to: patch.assigned_to.unwrap_or(task.assigned_to),
        team_id: task.team_id,
        created_at: task.created_at,
        updated_at: task.updated_at,
    }
}

/// Detects whether a patch changes the task's status value
///
/// Returns `Some((old, new))` only when the patch carries a status that
/// differs from the current one. A patch without a status and a patch
/// reaffirming the current status both return None; the two paths differ
/// superficially but are intentionally equivalent.
pub fn status_transition(
    current: TaskStatus,
    patch: &UpdateTask,
) -> Option<(TaskStatus, TaskStatus)> {
    match patch.status {
        Some(new) if new != current => Some((current, new)),
        _ => None,
    }
}

/// Applies a patch to a task: merge, persist, record the transition
///
/// After persisting the merged task, appends exactly one history record
/// when the status changed value, attributed to `changed_by`.
///
/// # Errors
///
/// Returns an error if the update or the history insert fails. The two
/// writes are not wrapped in a transaction; the storage constraints keep
/// history rows consistent with their task.
pub async fn apply_update(
    pool: &PgPool,
    task: Task,
    patch: UpdateTask,
    changed_by: Uuid,
) -> Result<Task, sqlx::Error> {
    let transition = status_transition(task.status, &patch);
    let merged = merge(&task, &patch);

    let updated = Task::update(pool, &merged).await?;

    if let Some((old_status, new_status)) = transition {
        TaskHistory::create(
            pool,
            CreateTaskHistory {
                task_id: updated.id,
                old_status,
                new_status,
                changed_by,
            },
        )
        .await?;

        tracing::debug!(
            task_id = %updated.id,
            old_status = old_status.as_str(),
            new_status = new_status.as_str(),
            "recorded task status transition"
        );
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::TaskPriority;
    use chrono::Utc;

    fn sample_task() -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "Write launch notes".to_string(),
            description: Some("Draft for review".to_string()),
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            assigned_to: Uuid::new_v4(),
            team_id: Some(Uuid::new_v4()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let task = sample_task();
        let patch = UpdateTask {
            title: Some("Publish launch notes".to_string()),
            ..Default::default()
        };

        let merged = merge(&task, &patch);

        assert_eq!(merged.title, "Publish launch notes");
        assert_eq!(merged.description, task.description);
        assert_eq!(merged.status, task.status);
        assert_eq!(merged.priority, task.priority);
        assert_eq!(merged.assigned_to, task.assigned_to);
        assert_eq!(merged.team_id, task.team_id);
    }

    #[test]
    fn test_merge_empty_patch_is_identity() {
        let task = sample_task();
        let merged = merge(&task, &UpdateTask::default());

        assert_eq!(merged.title, task.title);
        assert_eq!(merged.description, task.description);
        assert_eq!(merged.status, task.status);
        assert_eq!(merged.priority, task.priority);
        assert_eq!(merged.assigned_to, task.assigned_to);
    }

    #[test]
    fn test_merge_cannot_clear_description() {
        // None means "keep", not "clear".
        let task = sample_task();
        let patch = UpdateTask {
            description: None,
            ..Default::default()
        };

        let merged = merge(&task, &patch);
        assert_eq!(merged.description, Some("Draft for review".to_string()));
    }

    #[test]
    fn test_transition_detected_on_value_change() {
        let patch = UpdateTask {
            status: Some(TaskStatus::InProgress),
            ..Default::default()
        };

        let transition = status_transition(TaskStatus::Pending, &patch);
        assert_eq!(
            transition,
            Some((TaskStatus::Pending, TaskStatus::InProgress))
        );
    }

    #[test]
    fn test_no_transition_when_status_absent() {
        // A title-only patch must not produce a history record.
        let patch = UpdateTask {
            title: Some("New title".to_string()),
            ..Default::default()
        };

        assert_eq!(status_transition(TaskStatus::Pending, &patch), None);
    }

    #[test]
    fn test_no_transition_when_status_reaffirmed() {
        // Submitting the current status again is a no-op for history,
        // exactly like omitting it.
        let patch = UpdateTask {
            status: Some(TaskStatus::Pending),
            ..Default::default()
        };

        assert_eq!(status_transition(TaskStatus::Pending, &patch), None);
    }

    #[test]
    fn test_any_status_may_reach_any_other() {
        // No ordering constraint: completed may go back to pending.
        let patch = UpdateTask {
            status: Some(TaskStatus::Pending),
            ..Default::default()
        };

        let transition = status_transition(TaskStatus::Completed, &patch);
        assert_eq!(
            transition,
            Some((TaskStatus::Completed, TaskStatus::Pending))
        );
    }

    #[test]
    fn test_transition_independent_of_other_fields() {
        let patch = UpdateTask {
            title: Some("Also rename".to_string()),
            priority: Some(TaskPriority::High),
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };

        let transition = status_transition(TaskStatus::InProgress, &patch);
        assert_eq!(
            transition,
            Some((TaskStatus::InProgress, TaskStatus::Completed))
        );
    }
}
