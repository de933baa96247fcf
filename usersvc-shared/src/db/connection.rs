/// Per-request PostgreSQL connections
///
/// The service deliberately keeps no pool: every operation opens its own
/// connection, runs a single statement and closes the connection again.
/// [`Database::run`] is the scoped-acquisition entry point that guarantees
/// the close happens whatever the statement returns.
///
/// # Example
///
/// ```no_run
/// use usersvc_shared::db::connection::{Database, DatabaseConfig};
/// use usersvc_shared::models::user::User;
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let db = Database::new(&DatabaseConfig::default());
///
/// let users = db.run(|conn| Box::pin(User::list(conn))).await?;
/// println!("{} users", users.len());
/// # Ok(())
/// # }
/// ```

use futures::future::BoxFuture;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use std::fmt;
use tracing::{debug, warn};

/// Connection settings for the users database
///
/// Mirrors the `DB_*` environment variables read at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Database server host name
    pub host: String,

    /// Database server port
    pub port: u16,

    /// Database name
    pub name: String,

    /// Login role
    pub user: String,

    /// Login password
    pub password: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            name: "postgres".to_string(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl DatabaseConfig {
    /// Builds sqlx connect options from these settings
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .password(&self.password)
    }
}

/// Handle used to open short-lived connections
///
/// Holds only immutable connect options, so it is cheap to clone into
/// every request handler.
#[derive(Clone)]
pub struct Database {
    options: PgConnectOptions,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("host", &self.options.get_host())
            .field("port", &self.options.get_port())
            .field("database", &self.options.get_database())
            .finish()
    }
}

impl Database {
    /// Creates a handle for the given settings. No connection is opened.
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            options: config.connect_options(),
        }
    }

    /// Opens a fresh connection
    ///
    /// Callers own the returned connection and must hand it to [`release`]
    /// (or drop it) when done. Prefer [`Database::run`].
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or rejects the login.
    pub async fn connect(&self) -> Result<PgConnection, sqlx::Error> {
        debug!(
            host = self.options.get_host(),
            port = self.options.get_port(),
            "Opening database connection"
        );

        PgConnection::connect_with(&self.options).await
    }

    /// Runs `op` on a freshly opened connection and closes it afterwards
    ///
    /// The connection is released on both the success and the error path
    /// before the result is returned. If the surrounding future is dropped
    /// mid-statement, dropping the connection closes the socket.
    ///
    /// # Errors
    ///
    /// Returns the connect error, or whatever `op` returned.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use usersvc_shared::db::connection::Database;
    /// # use usersvc_shared::models::user::User;
    /// # async fn example(db: Database) -> Result<(), sqlx::Error> {
    /// let removed = db.run(move |conn| Box::pin(User::delete(conn, 7))).await?;
    /// assert!(removed <= 1);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run<T, F>(&self, op: F) -> Result<T, sqlx::Error>
    where
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, sqlx::Error>>,
    {
        let mut conn = self.connect().await?;
        let result = op(&mut conn).await;
        release(conn).await;
        result
    }
}

/// Closes a connection, logging instead of failing if the goodbye is lost
pub async fn release(conn: PgConnection) {
    match conn.close().await {
        Ok(()) => debug!("Database connection closed"),
        Err(err) => warn!(error = %err, "Database connection did not close cleanly"),
    }
}

/// Performs a health check on an open connection
///
/// # Errors
///
/// Returns an error if the `SELECT 1` round trip fails or returns
/// something unexpected.
pub async fn health_check(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    debug!("Performing database health check");

    let result: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&mut *conn).await?;

    if result.0 == 1 {
        debug!("Database health check passed");
        Ok(())
    } else {
        warn!("Database health check returned unexpected value: {}", result.0);
        Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ))
    }
}
