/// Database access for the user service
///
/// # Modules
///
/// - `connection`: connection settings and scoped per-request connections
///
/// There is no pool and no migration runner; the `users` table is expected
/// to exist already.

pub mod connection;

pub use connection::{Database, DatabaseConfig};
