/// Task endpoints
///
/// # Endpoints
///
/// - `POST /tasks` - Create task (creation policy)
/// - `GET /tasks` - List tasks (admin: all; member: own teams)
/// - `GET /tasks/:id` - Show task (membership policy)
/// - `PUT /tasks/:id` - Update task (assignee policy, history recording)
/// - `DELETE /tasks/:id` - Delete task (admin)
/// - `GET /tasks/:id/history` - Status history (membership policy)
///
/// Handlers orchestrate in a fixed order: shape validation, policy arms
/// that don't need lookups, existence checks, the remaining policy arms,
/// then persistence. Updates go through the lifecycle manager so a status
/// change always lands one history record.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use crewtask_shared::{
    auth::{authorization, context::AuthContext},
    lifecycle,
    models::{
        task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask},
        task_history::TaskHistory,
        team::Team,
        team_member::TeamMember,
        user::{User, UserRole},
    },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Short title
    #[validate(length(min = 2, message = "Title must be at least 2 characters"))]
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

/// Update task request
///
/// Absent fields keep their prior value. Supplying `assigned_to` requires
/// the admin role.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 2, message = "Title must be at least 2 characters"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New assignee (admin-only)
    pub assigned_to: Option<Uuid>,
}

/// Create a new task
///
/// A member must assign the task to themselves and place it in a team
/// they belong to; the policy arms run before the existence checks so a
/// member never learns whether a foreign user or team exists. Admins are
/// unrestricted and get 404s for dangling references.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `403 Forbidden`: Creation policy denied
/// - `404 Not Found`: Assignee or team doesn't exist
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    authorization::authorize_task_create(&state.db, &auth, req.assigned_to, req.team_id).await?;

    if User::find_by_id(&state.db, req.assigned_to).await?.is_none() {
        return Err(ApiError::NotFound("Assigned user not found".to_string()));
    }

    if Team::find_by_id(&state.db, req.team_id).await?.is_none() {
        return Err(ApiError::NotFound("Team not found".to_string()));
    }

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            assigned_to: req.assigned_to,
            team_id: req.team_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// List tasks visible to the caller
///
/// Admins see every task; a member sees exactly the tasks whose team they
/// belong to, which excludes tasks without a team.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = match auth.role {
        UserRole::Admin => Task::list(&state.db).await?,
        UserRole::Member => {
            let team_ids = TeamMember::team_ids_for_user(&state.db, auth.user_id).await?;
            Task::list_by_teams(&state.db, &team_ids).await?
        }
    };

    Ok(Json(tasks))
}

/// Show a single task
///
/// Existence first: a missing task is 404 for everyone, so an admin never
/// sees a policy error for a dangling ID. The membership policy then
/// decides for members.
pub async fn show_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    authorization::authorize_task_access(&state.db, &auth, task.team_id).await?;

    Ok(Json(task))
}

/// Update a task
///
/// A member must be the current assignee and may not reassign; an admin
/// reassignment requires the new assignee to exist. The patch goes
/// through the lifecycle manager, which records a history entry exactly
/// when the status changes value.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `403 Forbidden`: Update policy denied
/// - `404 Not Found`: Task or new assignee doesn't exist
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    authorization::check_task_update(&auth, &task, req.assigned_to.is_some())?;

    if let Some(assignee) = req.assigned_to {
        if User::find_by_id(&state.db, assignee).await?.is_none() {
            return Err(ApiError::NotFound("Assigned user not found".to_string()));
        }
    }

    let patch = UpdateTask {
        title: req.title,
        description: req.description,
        status: req.status,
        priority: req.priority,
        assigned_to: req.assigned_to,
    };

    let updated = lifecycle::apply_update(&state.db, task, patch, auth.user_id).await?;

    Ok(Json(updated))
}

/// Delete a task
///
/// Admin-only (coarse gate at the route). History records cascade with
/// the task.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Task::delete(&state.db, id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Show a task's status history
///
/// Same visibility rule as reading the task itself; records come back
/// most recent first.
pub async fn show_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<TaskHistory>>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    authorization::authorize_task_access(&state.db, &auth, task.team_id).await?;

    let history = TaskHistory::list_by_task(&state.db, id).await?;

    Ok(Json(history))
}
