/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 session token generation and validation
/// - [`context`]: The request-scoped caller identity (id + role)
/// - [`authorization`]: Role-based access policy evaluated per operation
///
/// # Example
///
/// ```
/// use crewtask_shared::auth::password::{hash_password, verify_password};
/// use crewtask_shared::auth::jwt::{create_token, Claims};
/// use crewtask_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// // Session token
/// let claims = Claims::new(Uuid::new_v4(), UserRole::Member);
/// let token = create_token(&claims, "test-secret-key-at-least-32-bytes!")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod context;
pub mod jwt;
pub mod password;
