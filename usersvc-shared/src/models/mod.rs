/// Database models for the user service
///
/// # Models
///
/// - `user`: the `users` table and its four single-statement operations

pub mod user;
