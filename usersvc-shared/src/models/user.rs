/// User model and database operations
///
/// Every operation is exactly one SQL statement, run on a connection the
/// caller owns (see [`crate::db::connection::Database::run`]).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     name TEXT,
///     address TEXT
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use usersvc_shared::db::connection::{Database, DatabaseConfig};
/// use usersvc_shared::models::user::{CreateUser, User};
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let db = Database::new(&DatabaseConfig::default());
///
/// let new_user = CreateUser {
///     name: "Alice".to_string(),
///     address: "1 Main St".to_string(),
/// };
///
/// let user = db.run(move |conn| Box::pin(User::create(conn, new_user))).await?;
/// println!("Created user: {}", user.id);
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

/// A row of the `users` table
///
/// `name` and `address` are nullable in the schema; a `NULL` column is
/// listed as `null` rather than failing the whole query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Database-generated id, never changes
    pub id: i32,

    /// Display name, fixed at creation
    pub name: Option<String>,

    /// Postal address, the only mutable column
    pub address: Option<String>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub address: String,
}

impl User {
    /// Inserts a new user and returns it with its generated id
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails (lost connection, missing
    /// table, permission denied, ...).
    pub async fn create(conn: &mut PgConnection, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, address)
            VALUES ($1, $2)
            RETURNING id, name, address
            "#,
        )
        .bind(data.name)
        .bind(data.address)
        .fetch_one(conn)
        .await?;

        Ok(user)
    }

    /// Lists every user in the database's default order
    ///
    /// No pagination: the whole table is returned.
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>("SELECT id, name, address FROM users")
            .fetch_all(conn)
            .await?;

        Ok(users)
    }

    /// Replaces the address of user `id`
    ///
    /// `None` stores `NULL`.
    ///
    /// # Returns
    ///
    /// The number of rows updated: 0 when no such user exists, 1 otherwise.
    pub async fn update_address(
        conn: &mut PgConnection,
        id: i32,
        address: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET address = $1 WHERE id = $2")
            .bind(address)
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes user `id`
    ///
    /// # Returns
    ///
    /// The number of rows deleted: 0 when no such user exists.
    pub async fn delete(conn: &mut PgConnection, id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}
