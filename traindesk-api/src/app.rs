/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use traindesk_api::{app::AppState, config::Config};
/// use traindesk_shared::mail::LogMailer;
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config, Arc::new(LogMailer));
/// let app = traindesk_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::deadline::request_deadline};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use traindesk_shared::{auth::middleware::authenticate, mail::VerificationMailer};

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor. Everything inside
/// is either a pool handle or behind an `Arc`, and nothing is mutated after
/// startup.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Verification email delivery
    pub mailer: Arc<dyn VerificationMailer>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, mailer: Arc<dyn VerificationMailer>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            mailer,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health               # Health check (public)
/// ├── /auth/                     # Public
/// │   ├── POST /register
/// │   ├── POST /login
/// │   └── POST /verify-email
/// ├── /clients                   # Bearer token required
/// │   ├── GET  /
/// │   └── POST /
/// └── /workouts                  # Bearer token required
///     ├── GET    /
///     ├── POST   /
///     ├── GET    /:id
///     ├── PUT    /:id
///     └── DELETE /:id
/// ```
///
/// # Middleware Stack
///
/// Outermost first:
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Request deadline
/// 4. Authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/verify-email", post(routes::auth::verify_email));

    let protected_routes = Router::new()
        .route(
            "/clients",
            get(routes::clients::list_clients).post(routes::clients::create_client),
        )
        .route(
            "/workouts",
            get(routes::workouts::list_workouts).post(routes::workouts::create_workout),
        )
        .route(
            "/workouts/:id",
            get(routes::workouts::get_workout)
                .put(routes::workouts::update_workout)
                .delete(routes::workouts::delete_workout),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_layer));

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
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
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(state.clone(), request_deadline))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Validates the bearer token and injects the trainer's `AuthContext` into
/// request extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = authenticate(req.headers(), state.jwt_secret())?;
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
