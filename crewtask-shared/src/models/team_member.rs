/// TeamMember model and database operations
///
/// TeamMember is the join entity binding a user to a team. The composite
/// primary key (user_id, team_id) guarantees a user belongs to a team at
/// most once; the membership lookup is the heart of every team-scoped
/// authorization decision.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE team_members (
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (user_id, team_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use crewtask_shared::models::team_member::{TeamMember, CreateTeamMember};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid, team_id: Uuid) -> Result<(), sqlx::Error> {
/// TeamMember::create(&pool, CreateTeamMember { user_id, team_id }).await?;
///
/// if TeamMember::exists(&pool, user_id, team_id).await? {
///     println!("user belongs to team");
/// }
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::user::UserRole;

/// Membership of a user in a team
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamMember {
    /// User ID
    pub user_id: Uuid,

    /// Team ID
    pub team_id: Uuid,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

/// Input for adding a user to a team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeamMember {
    /// User ID
    pub user_id: Uuid,

    /// Team ID
    pub team_id: Uuid,
}

/// A team member joined with the user's public profile fields
///
/// Used to embed member lists in team responses without exposing the
/// password hash.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TeamMemberUser {
    /// Team the user belongs to
    pub team_id: Uuid,

    /// User ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Organization-wide role
    pub role: UserRole,
}

impl TeamMember {
    /// Adds a user to a team
    ///
    /// # Errors
    ///
    /// Returns an error if the pair already exists (primary key violation),
    /// the user or team doesn't exist (foreign key violation), or the
    /// database operation fails.
    pub async fn create(pool: &PgPool, data: CreateTeamMember) -> Result<Self, sqlx::Error> {
        let member = sqlx::query_as::<_, TeamMember>(
            r#"
            INSERT INTO team_members (user_id, team_id)
            VALUES ($1, $2)
            RETURNING user_id, team_id, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.team_id)
        .fetch_one(pool)
        .await?;

        Ok(member)
    }

    /// Finds a specific membership by user and team
    pub async fn find(
        pool: &PgPool,
        user_id: Uuid,
        team_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let member = sqlx::query_as::<_, TeamMember>(
            r#"
            SELECT user_id, team_id, created_at
            FROM team_members
            WHERE user_id = $1 AND team_id = $2
            "#,
        )
        .bind(user_id)
        .bind(team_id)
        .fetch_optional(pool)
        .await?;

        Ok(member)
    }

    /// Checks if a user belongs to a team
    pub async fn exists(pool: &PgPool, user_id: Uuid, team_id: Uuid) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM team_members
                WHERE user_id = $1 AND team_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(team_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Removes a user from a team
    ///
    /// # Returns
    ///
    /// True if the membership was removed, false if it didn't exist
    pub async fn delete(pool: &PgPool, user_id: Uuid, team_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM team_members WHERE user_id = $1 AND team_id = $2")
            .bind(user_id)
            .bind(team_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the IDs of all teams a user belongs to
    ///
    /// This drives the member-scoped task listing.
    pub async fn team_ids_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT team_id FROM team_members
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(ids)
    }

    /// Lists every membership joined with the user's public profile
    ///
    /// One query for all teams; callers group the rows by `team_id`.
    pub async fn list_users_for_teams(pool: &PgPool) -> Result<Vec<TeamMemberUser>, sqlx::Error> {
        let members = sqlx::query_as::<_, TeamMemberUser>(
            r#"
            SELECT tm.team_id, u.id, u.name, u.email, u.role
            FROM team_members tm
            JOIN users u ON u.id = tm.user_id
            ORDER BY tm.created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_team_member_pair() {
        let user_id = Uuid::new_v4();
        let team_id = Uuid::new_v4();
        let data = CreateTeamMember { user_id, team_id };

        assert_eq!(data.user_id, user_id);
        assert_eq!(data.team_id, team_id);
    }

    #[test]
    fn test_team_member_user_strips_password() {
        // TeamMemberUser has no password field at all, so serializing a
        // member list can never leak a hash.
        let member = TeamMemberUser {
            team_id: Uuid::new_v4(),
            id: Uuid::new_v4(),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            role: UserRole::Member,
        };

        let json = serde_json::to_value(&member).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "member");
    }
}
