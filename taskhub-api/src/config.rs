/// Configuration management for the API server
///
/// Loads configuration from environment variables into a type-safe struct.
/// The two signing secrets are required: a missing `JWT_SEC` or
/// `JWT_REF_SEC` refuses to boot instead of failing per-request.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `API_CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `API_PRODUCTION`: Enables HSTS when true (default: false)
/// - `JWT_SEC`: Access-token signing secret (required)
/// - `JWT_REF_SEC`: Refresh-token signing secret (required)
/// - `JWT_EXP_SECONDS`: Access-token lifetime (default: 7200 = 2h)
/// - `JWT_REF_EXP_SECONDS`: Refresh-token lifetime (default: 14400 = 4h)
/// - `RUST_LOG`: Log level (default: info)
///
/// # Example
///
/// ```no_run
/// use taskhub_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::env;

use taskhub_shared::auth::jwt::{JwtError, JwtKeys};

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Token signing configuration
    pub jwt: JwtConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins ("*" = permissive, for development)
    pub cors_origins: Vec<String>,

    /// Whether the server runs behind HTTPS (enables HSTS)
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Token signing configuration
///
/// Access and refresh tokens are signed with distinct secrets and carry
/// distinct lifetimes. Generate secrets with: `openssl rand -hex 32`
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Access-token signing secret
    pub access_secret: String,

    /// Refresh-token signing secret
    pub refresh_secret: String,

    /// Access-token lifetime in seconds
    pub access_ttl_seconds: i64,

    /// Refresh-token lifetime in seconds
    pub refresh_ttl_seconds: i64,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing, a numeric
    /// variable fails to parse, or a signing secret is shorter than 32
    /// characters.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let cors_origins = env::var("API_CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let production = env::var("API_PRODUCTION")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let access_secret = env::var("JWT_SEC")
            .map_err(|_| anyhow::anyhow!("JWT_SEC environment variable is required"))?;

        let refresh_secret = env::var("JWT_REF_SEC")
            .map_err(|_| anyhow::anyhow!("JWT_REF_SEC environment variable is required"))?;

        if access_secret.len() < 32 {
            anyhow::bail!("JWT_SEC must be at least 32 characters long");
        }
        if refresh_secret.len() < 32 {
            anyhow::bail!("JWT_REF_SEC must be at least 32 characters long");
        }

        let access_ttl_seconds = env::var("JWT_EXP_SECONDS")
            .unwrap_or_else(|_| "7200".to_string())
            .parse::<i64>()?;

        let refresh_ttl_seconds = env::var("JWT_REF_EXP_SECONDS")
            .unwrap_or_else(|_| "14400".to_string())
            .parse::<i64>()?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                access_secret,
                refresh_secret,
                access_ttl_seconds,
                refresh_ttl_seconds,
            },
        })
    }

    /// Builds the signing key set from this configuration
    ///
    /// # Errors
    ///
    /// Returns `JwtError::MissingSecret` if either secret is empty.
    pub fn jwt_keys(&self) -> Result<JwtKeys, JwtError> {
        JwtKeys::new(
            self.jwt.access_secret.clone(),
            self.jwt.refresh_secret.clone(),
            self.jwt.access_ttl_seconds,
            self.jwt.refresh_ttl_seconds,
        )
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 10,
            },
            jwt: JwtConfig {
                access_secret: "access-secret-at-least-32-bytes-long".to_string(),
                refresh_secret: "refresh-secret-at-least-32-bytes-long".to_string(),
                access_ttl_seconds: 7200,
                refresh_ttl_seconds: 14400,
            },
        }
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(test_config().bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_jwt_keys_from_config() {
        let keys = test_config().jwt_keys().expect("keys should build");
        assert_eq!(keys.access_ttl().num_seconds(), 7200);
        assert_eq!(keys.refresh_ttl().num_seconds(), 14400);
    }
}
