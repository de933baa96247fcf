/// API route handlers
///
/// - `health`: Health check endpoint
/// - `users`: User create/list/update/delete endpoints

pub mod health;
pub mod users;
