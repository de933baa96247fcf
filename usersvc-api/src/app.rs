/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use usersvc_api::{app::{build_router, AppState}, config::Config};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use usersvc_shared::db::connection::Database;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Holds no
/// connections, only what is needed to open one.
#[derive(Clone)]
pub struct AppState {
    /// Opens per-request database connections
    pub db: Database,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(config: Config) -> Self {
        Self {
            db: Database::new(&config.database),
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router
///
/// ```text
/// /
/// ├── GET    /health
/// ├── POST   /submit_data
/// ├── GET    /show_data
/// ├── PUT    /update/:user_id
/// └── DELETE /delete/:user_id
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/submit_data", post(routes::users::create_user))
        .route("/show_data", get(routes::users::list_users))
        .route("/update/:user_id", put(routes::users::update_address))
        .route("/delete/:user_id", delete(routes::users::delete_user))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
