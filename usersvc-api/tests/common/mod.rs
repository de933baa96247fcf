//! Common test utilities for integration tests
//!
//! - Test database setup (creates the `users` table if absent)
//! - An app wired to an unreachable database, for paths that must never
//!   touch storage
//! - Request helpers returning status and parsed JSON body

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::Service as _;
use usersvc_api::app::{build_router, AppState};
use usersvc_api::config::Config;
use usersvc_shared::db::connection::{Database, DatabaseConfig};

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: Database,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a context against the database named by the `DB_*` variables
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;
        let state = AppState::new(config.clone());
        let db = state.db.clone();

        db.run(|conn| {
            Box::pin(async move {
                sqlx::query(
                    "CREATE TABLE IF NOT EXISTS users (id SERIAL PRIMARY KEY, name TEXT, address TEXT)",
                )
                .execute(&mut *conn)
                .await
                .map(|_| ())
            })
        })
        .await?;

        Ok(TestContext {
            db,
            app: build_router(state),
            config,
        })
    }

    /// Creates a context whose database port has nothing listening
    pub fn unreachable() -> Self {
        let config = Config::from_lookup(|_| None)
            .map(|mut config| {
                config.database = DatabaseConfig {
                    host: "127.0.0.1".to_string(),
                    port: 1,
                    ..Default::default()
                };
                config
            })
            .expect("default config is valid");

        let state = AppState::new(config.clone());

        TestContext {
            db: state.db.clone(),
            app: build_router(state),
            config,
        }
    }

    /// Sends a request and returns the status with the parsed JSON body
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send_request(builder.body(body).unwrap()).await
    }

    /// Sends a prebuilt request
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Returns the user list as seen through the API
    pub async fn list_users(&self) -> Vec<Value> {
        let (status, body) = self.send("GET", "/show_data", None).await;
        assert_eq!(status, StatusCode::OK, "list failed: {}", body);
        body.as_array().cloned().unwrap_or_default()
    }
}
