/// Configuration management for the API server
///
/// This module loads configuration from environment variables once at startup.
/// The resulting [`Config`] is read-only for the lifetime of the process.
///
/// # Environment Variables
///
/// - `HOST`: Interface to bind to (default: 0.0.0.0)
/// - `PORT`: Port to listen on (default: 5000)
/// - `DB_HOST`: Database host (default: localhost)
/// - `DB_PORT`: Database port (default: 5432)
/// - `DB_NAME`: Database name (default: postgres)
/// - `DB_USER`: Database user (default: postgres)
/// - `DB_PASS`: Database password (default: postgres)
/// - `RUST_LOG`: Log filter (default: debug for this service)
///
/// # Example
///
/// ```no_run
/// use usersvc_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use std::env;
use usersvc_shared::db::connection::DatabaseConfig;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listener configuration
    pub server: ServerConfig,

    /// Database connection settings
    pub database: DatabaseConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` or `DB_PORT` is not a valid port number.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    ///
    /// Unset variables fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_defaults = ServerConfig::default();
        let db_defaults = DatabaseConfig::default();

        let port = match lookup("PORT") {
            Some(raw) => parse_port("PORT", &raw)?,
            None => server_defaults.port,
        };

        let db_port = match lookup("DB_PORT") {
            Some(raw) => parse_port("DB_PORT", &raw)?,
            None => db_defaults.port,
        };

        Ok(Self {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or(server_defaults.host),
                port,
            },
            database: DatabaseConfig {
                host: lookup("DB_HOST").unwrap_or(db_defaults.host),
                port: db_port,
                name: lookup("DB_NAME").unwrap_or(db_defaults.name),
                user: lookup("DB_USER").unwrap_or(db_defaults.user),
                password: lookup("DB_PASS").unwrap_or(db_defaults.password),
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_port(key: &str, raw: &str) -> anyhow::Result<u16> {
    raw.trim()
        .parse::<u16>()
        .with_context(|| format!("{} must be a port number, got {:?}", key, raw))
}
