/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskhub_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let jwt = config.jwt_keys()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config, jwt);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use taskhub_shared::auth::{
    jwt::JwtKeys,
    middleware::{session_auth_middleware, AuthError},
};

use crate::{config::Config, middleware::security::SecurityHeadersLayer};

/// Shared application state
///
/// Cloned into each request handler via Axum's `State` extractor; Arc keeps
/// the clones cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Token signing key set (both families)
    pub jwt: Arc<JwtKeys>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, jwt: JwtKeys) -> Self {
        Self {
            db,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                     # Health check (public)
/// ├── /user/
/// │   ├── POST /signup            # Register (public)
/// │   ├── POST /signin            # Login (public)
/// │   ├── POST /refresh           # Exchange refresh token (public)
/// │   ├── GET  /avatar/:id        # Fetch avatar bytes (public)
/// │   ├── GET  /                  # Profile (authenticated)
/// │   ├── PUT  /                  # Update profile (authenticated)
/// │   ├── PUT  /password          # Change password (authenticated)
/// │   ├── POST /signout?all=      # Sign out one/all devices (authenticated)
/// │   ├── POST /avatar            # Upload/replace avatar (authenticated)
/// │   └── DELETE /avatar          # Delete avatar (authenticated)
/// └── /tasks/                     # Task CRUD + listing (authenticated)
/// ```
///
/// Authenticated groups sit behind [`auth_layer`], which checks both the
/// token signature and the session row.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public: registration, login, refresh, avatar fetch by user id
    let public_user_routes = Router::new()
        .route("/signup", post(routes::auth::sign_up))
        .route("/signin", post(routes::auth::sign_in))
        .route("/refresh", post(routes::auth::refresh))
        .route("/avatar/:id", get(routes::avatars::get_avatar));

    // Authenticated: profile, password, sign-out, avatar management
    let protected_user_routes = Router::new()
        .route(
            "/",
            get(routes::users::get_profile).put(routes::users::update_profile),
        )
        .route("/password", put(routes::auth::change_password))
        .route("/signout", post(routes::auth::sign_out))
        .route(
            "/avatar",
            post(routes::avatars::upload_avatar).delete(routes::avatars::delete_avatar),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_layer,
        ));

    let task_routes = Router::new()
        .route(
            "/",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_layer,
        ));

    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/user", public_user_routes.merge(protected_user_routes))
        .nest("/tasks", task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Session authentication middleware layer
///
/// Delegates to the shared middleware: signature check against the access
/// secret, then session-store lookup, then a typed `Principal` in request
/// extensions.
async fn auth_layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    session_auth_middleware(state.db.clone(), state.jwt.clone(), req, next).await
}
