/// Team and membership management endpoints
///
/// # Endpoints
///
/// - `POST /teams` - Create team (admin)
/// - `GET /teams` - List teams with members (any authenticated caller)
/// - `PUT /teams/:id` - Update team (admin)
/// - `DELETE /teams/:id` - Delete team (admin)
/// - `POST /teams/:id/members` - Add member (admin)
/// - `DELETE /teams/:id/members/:user_id` - Remove member (admin)
///
/// Team names are unique; the handlers pre-check before writing so a
/// duplicate gets a friendly 409, while the schema's UNIQUE constraint
/// settles concurrent creations.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use crewtask_shared::models::{
    team::{CreateTeam, Team, UpdateTeam},
    team_member::{CreateTeamMember, TeamMember},
    user::{User, UserRole},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Create team request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    /// Team name
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

/// Update team request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTeamRequest {
    /// New team name
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,
}

/// Add member request
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// User to add to the team
    pub user_id: Uuid,
}

/// A member embedded in a team listing
#[derive(Debug, Serialize)]
pub struct TeamMemberEntry {
    /// User ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Organization-wide role
    pub role: UserRole,
}

/// Team with its members embedded
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    /// Team ID
    pub id: Uuid,

    /// Team name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// When the team was created
    pub created_at: DateTime<Utc>,

    /// When the team was last updated
    pub updated_at: DateTime<Utc>,

    /// Users belonging to the team
    pub members: Vec<TeamMemberEntry>,
}

/// Create a new team
///
/// Admin-only (coarse gate at the route).
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: A team with the same name already exists
pub async fn create_team(
    State(state): State<AppState>,
    Json(req): Json<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    req.validate()?;

    if Team::find_by_name(&state.db, &req.name).await?.is_some() {
        return Err(ApiError::Conflict(
            "Team with same name already exists".to_string(),
        ));
    }

    let team = Team::create(
        &state.db,
        CreateTeam {
            name: req.name,
            description: req.description,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(team)))
}

/// List all teams with their members
///
/// Available to every authenticated caller; members see all teams,
/// unfiltered. Only task visibility is team-scoped.
pub async fn list_teams(State(state): State<AppState>) -> ApiResult<Json<Vec<TeamResponse>>> {
    let teams = Team::list(&state.db).await?;
    let members = TeamMember::list_users_for_teams(&state.db).await?;

    let mut by_team: HashMap<Uuid, Vec<TeamMemberEntry>> = HashMap::new();
    for member in members {
        by_team.entry(member.team_id).or_default().push(TeamMemberEntry {
            id: member.id,
            name: member.name,
            email: member.email,
            role: member.role,
        });
    }

    let response = teams
        .into_iter()
        .map(|team| TeamResponse {
            members: by_team.remove(&team.id).unwrap_or_default(),
            id: team.id,
            name: team.name,
            description: team.description,
            created_at: team.created_at,
            updated_at: team.updated_at,
        })
        .collect();

    Ok(Json(response))
}

/// Update a team
///
/// Admin-only (coarse gate at the route). Renaming re-checks name
/// uniqueness, excluding the team's own current name.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `404 Not Found`: Team doesn't exist
/// - `409 Conflict`: New name already taken
pub async fn update_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTeamRequest>,
) -> ApiResult<Json<Team>> {
    req.validate()?;

    let team = Team::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    if let Some(ref name) = req.name {
        if *name != team.name && Team::find_by_name(&state.db, name).await?.is_some() {
            return Err(ApiError::Conflict(
                "Team with same name already exists".to_string(),
            ));
        }
    }

    let updated = Team::update(
        &state.db,
        id,
        UpdateTeam {
            name: req.name,
            description: req.description,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    Ok(Json(updated))
}

/// Delete a team
///
/// Admin-only (coarse gate at the route). Tasks of the team survive with
/// their team reference cleared; memberships cascade.
pub async fn delete_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Team::delete(&state.db, id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Team not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Add a user to a team
///
/// Admin-only (coarse gate at the route). Both sides of the pair must
/// exist, reported as 404 before the duplicate check so a bad reference
/// never reads as a conflict.
///
/// # Errors
///
/// - `404 Not Found`: Team or user doesn't exist
/// - `409 Conflict`: The user is already a member of the team
pub async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<TeamMember>)> {
    if Team::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Team not found".to_string()));
    }

    if User::find_by_id(&state.db, req.user_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    if TeamMember::exists(&state.db, req.user_id, id).await? {
        return Err(ApiError::Conflict(
            "User is already a member of this team".to_string(),
        ));
    }

    let member = TeamMember::create(
        &state.db,
        CreateTeamMember {
            user_id: req.user_id,
            team_id: id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(member)))
}

/// Remove a user from a team
///
/// Admin-only (coarse gate at the route).
///
/// # Errors
///
/// - `404 Not Found`: The membership pair doesn't exist
pub async fn remove_member(
    State(state): State<AppState>,
    Path((team_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let removed = TeamMember::delete(&state.db, user_id, team_id).await?;

    if !removed {
        return Err(ApiError::NotFound(
            "Member not found in this team".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
