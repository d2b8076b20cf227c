/// Authentication and authorization utilities
///
/// This module provides the security primitives for Taskhub:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength validation
/// - [`jwt`]: Access/refresh token issuance and validation (dual secrets)
/// - [`validation`]: Profile field validation shared by sign-up and updates
/// - [`middleware`]: Request authentication (signature check + session
///   store lookup) producing a typed [`middleware::Principal`]
/// - [`authorization`]: Resource ownership checks
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Tokens**: HS256 signing; access and refresh tokens use distinct
///   secrets and distinct configurable lifetimes, so one family can never
///   verify against the other's key
/// - **Server-side revocation**: a signature-valid token is still rejected
///   once its session row has been deleted
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::auth::password::{hash_password, verify_password};
/// use taskhub_shared::auth::jwt::{issue_token_pair, JwtKeys};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let keys = JwtKeys::new("access-secret", "refresh-secret", 7200, 14400)?;
/// let pair = issue_token_pair(42, &keys)?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod validation;
