/// Request-scoped caller identity
///
/// After the JWT middleware validates a token, it inserts an [`AuthContext`]
/// into the request extensions. Handlers extract it and thread it through
/// every policy call explicitly; the caller's identity is never ambient
/// state.
///
/// # Example
///
/// ```
/// use crewtask_shared::auth::context::AuthContext;
/// use crewtask_shared::auth::jwt::Claims;
/// use crewtask_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// let claims = Claims::new(Uuid::new_v4(), UserRole::Member);
/// let auth = AuthContext::from_claims(&claims);
/// assert!(!auth.is_admin());
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::Claims;
use crate::models::user::UserRole;

/// The authenticated caller: id plus organization-wide role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Role carried in the validated token
    pub role: UserRole,
}

impl AuthContext {
    /// Creates an auth context from validated JWT claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
        }
    }

    /// Whether the caller has unrestricted access
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_claims_carries_identity() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, UserRole::Member);
        let auth = AuthContext::from_claims(&claims);

        assert_eq!(auth.user_id, user_id);
        assert_eq!(auth.role, UserRole::Member);
        assert!(!auth.is_admin());
    }

    #[test]
    fn test_admin_context() {
        let claims = Claims::new(Uuid::new_v4(), UserRole::Admin);
        let auth = AuthContext::from_claims(&claims);

        assert!(auth.is_admin());
    }
}
