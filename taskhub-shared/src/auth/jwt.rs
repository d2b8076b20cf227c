/// Token issuance and validation
///
/// Sessions are represented by a pair of JWTs signed with HS256: a
/// short-lived access token presented on every request, and a longer-lived
/// refresh token exchanged for a fresh pair. The two families are signed
/// with **distinct** secrets, so an access token can never validate against
/// the refresh key or vice versa.
///
/// # Claims
///
/// - `sub`: owning user id
/// - `iat`: issued-at (Unix timestamp)
/// - `exp`: expiration (Unix timestamp)
/// - `jti`: random token id, so two pairs minted for the same user within
///   the same second still produce distinct token strings
///
/// # Example
///
/// ```
/// use taskhub_shared::auth::jwt::{issue_token_pair, validate_token, JwtKeys};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let keys = JwtKeys::new("access-secret", "refresh-secret", 7200, 14400)?;
///
/// let pair = issue_token_pair(42, &keys)?;
/// let claims = validate_token(&pair.access_token, keys.access_secret())?;
/// assert_eq!(claims.sub, 42);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// A signing secret was empty or unset
    #[error("Signing secret is not set")]
    MissingSecret,

    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// Signing material for both token families
///
/// Built once at startup from configuration. Construction fails if either
/// secret is empty, which is what makes a missing `JWT_SEC`/`JWT_REF_SEC`
/// a fatal boot error rather than a per-request failure.
#[derive(Debug, Clone)]
pub struct JwtKeys {
    access_secret: String,
    refresh_secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtKeys {
    /// Creates the key set
    ///
    /// # Arguments
    ///
    /// * `access_secret` - HMAC secret for access tokens
    /// * `refresh_secret` - HMAC secret for refresh tokens
    /// * `access_ttl_seconds` - access token lifetime (default config: 2h)
    /// * `refresh_ttl_seconds` - refresh token lifetime (default config: 4h)
    ///
    /// # Errors
    ///
    /// Returns `JwtError::MissingSecret` if either secret is empty.
    pub fn new(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
        access_ttl_seconds: i64,
        refresh_ttl_seconds: i64,
    ) -> Result<Self, JwtError> {
        let access_secret = access_secret.into();
        let refresh_secret = refresh_secret.into();

        if access_secret.is_empty() || refresh_secret.is_empty() {
            return Err(JwtError::MissingSecret);
        }

        Ok(Self {
            access_secret,
            refresh_secret,
            access_ttl: Duration::seconds(access_ttl_seconds),
            refresh_ttl: Duration::seconds(refresh_ttl_seconds),
        })
    }

    /// Secret used to sign and validate access tokens
    pub fn access_secret(&self) -> &str {
        &self.access_secret
    }

    /// Secret used to sign and validate refresh tokens
    pub fn refresh_secret(&self) -> &str {
        &self.refresh_secret
    }

    /// Access token lifetime
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Refresh token lifetime
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}

/// JWT claims carried by both token families
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - owning user id
    pub sub: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Token id (random, keeps simultaneously minted tokens distinct)
    pub jti: String,
}

impl Claims {
    /// Creates claims for a user expiring `ttl` from now
    pub fn new(user_id: i64, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: format!("{:016x}", rand::random::<u64>()),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// An issued access/refresh token pair
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    /// Access token (presented on every authenticated request)
    pub access_token: String,

    /// Refresh token (single-use, exchanged for a new pair)
    pub refresh_token: String,
}

/// Creates a signed token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token's signature and expiry in one step
///
/// # Errors
///
/// Returns `JwtError::Expired` for an out-of-date token and
/// `JwtError::ValidationError` for a bad signature, a token signed with a
/// different secret, or a payload without a well-formed user id.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Issues a fresh access/refresh pair for a user
///
/// Each token is signed with its own secret and carries its own lifetime.
pub fn issue_token_pair(user_id: i64, keys: &JwtKeys) -> Result<TokenPair, JwtError> {
    let access_claims = Claims::new(user_id, keys.access_ttl());
    let refresh_claims = Claims::new(user_id, keys.refresh_ttl());

    Ok(TokenPair {
        access_token: create_token(&access_claims, keys.access_secret())?,
        refresh_token: create_token(&refresh_claims, keys.refresh_secret())?,
    })
}

/// Validates an access token and returns the owning user id
pub fn verify_access_token(token: &str, keys: &JwtKeys) -> Result<i64, JwtError> {
    Ok(validate_token(token, keys.access_secret())?.sub)
}

/// Validates a refresh token and returns the owning user id
pub fn verify_refresh_token(token: &str, keys: &JwtKeys) -> Result<i64, JwtError> {
    Ok(validate_token(token, keys.refresh_secret())?.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_keys() -> JwtKeys {
        JwtKeys::new("access-secret-for-tests", "refresh-secret-for-tests", 7200, 14400)
            .expect("test keys")
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        assert!(matches!(
            JwtKeys::new("", "refresh", 7200, 14400),
            Err(JwtError::MissingSecret)
        ));
        assert!(matches!(
            JwtKeys::new("access", "", 7200, 14400),
            Err(JwtError::MissingSecret)
        ));
    }

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new(7, Duration::hours(2));

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.exp - claims.iat, 7200);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_token() {
        let keys = test_keys();

        let claims = Claims::new(42, keys.access_ttl());
        let token = create_token(&claims, keys.access_secret()).expect("Should create token");

        let validated = validate_token(&token, keys.access_secret()).expect("Should validate");
        assert_eq!(validated.sub, 42);
        assert_eq!(validated.jti, claims.jti);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(1, Duration::hours(1));
        let token = create_token(&claims, "secret1").expect("Should create token");

        assert!(validate_token(&token, "wrong-secret").is_err());
    }

    #[test]
    fn test_access_and_refresh_secrets_are_not_interchangeable() {
        let keys = test_keys();
        let pair = issue_token_pair(9, &keys).expect("Should issue pair");

        // Each token validates only against its own family's secret
        assert!(validate_token(&pair.access_token, keys.access_secret()).is_ok());
        assert!(validate_token(&pair.refresh_token, keys.refresh_secret()).is_ok());

        assert!(validate_token(&pair.access_token, keys.refresh_secret()).is_err());
        assert!(validate_token(&pair.refresh_token, keys.access_secret()).is_err());
    }

    #[test]
    fn test_verify_round_trip() {
        let keys = test_keys();
        let pair = issue_token_pair(1234, &keys).expect("Should issue pair");

        assert_eq!(verify_access_token(&pair.access_token, &keys).unwrap(), 1234);
        assert_eq!(verify_refresh_token(&pair.refresh_token, &keys).unwrap(), 1234);
    }

    #[test]
    fn test_pairs_for_same_user_are_distinct() {
        let keys = test_keys();

        let first = issue_token_pair(5, &keys).expect("Should issue pair");
        let second = issue_token_pair(5, &keys).expect("Should issue pair");

        assert_ne!(first.access_token, first.refresh_token);
        assert_ne!(first.access_token, second.access_token);
        assert_ne!(first.refresh_token, second.refresh_token);
    }

    #[test]
    fn test_validate_expired_token() {
        let keys = test_keys();

        let claims = Claims::new(3, Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = create_token(&claims, keys.access_secret()).expect("Should create token");
        let result = validate_token(&token, keys.access_secret());

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let keys = test_keys();

        assert!(validate_token("", keys.access_secret()).is_err());
        assert!(validate_token("not.a.token", keys.access_secret()).is_err());
        assert!(validate_token("garbage", keys.access_secret()).is_err());
    }
}
