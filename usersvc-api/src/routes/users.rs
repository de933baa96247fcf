/// User CRUD endpoints
///
/// Each handler validates its input first, then opens one database
/// connection, runs one statement and closes the connection before building
/// the response. Nothing is cached between requests.
///
/// # Endpoints
///
/// - `POST /submit_data` - Create user
/// - `GET /show_data` - List users
/// - `PUT /update/:user_id` - Update a user's address
/// - `DELETE /delete/:user_id` - Delete user

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use usersvc_shared::models::user::{CreateUser, User};
use validator::Validate;

/// Create user request
///
/// Fields are optional at the type level so that a missing field is
/// reported as a validation error rather than a JSON parse error.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name must not be empty")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "address is required"),
        length(min = 1, message = "address must not be empty")
    )]
    pub address: Option<String>,
}

impl TryFrom<CreateUserRequest> for CreateUser {
    type Error = ApiError;

    fn try_from(req: CreateUserRequest) -> ApiResult<Self> {
        req.validate()?;

        let (Some(name), Some(address)) = (req.name, req.address) else {
            return Err(ApiError::BadRequest("name and address are required".to_string()));
        };

        Ok(CreateUser { name, address })
    }
}

/// Update address request
///
/// The outer `Option` records whether the key was sent at all; an explicit
/// `"address": null` arrives as `Some(None)` and stores `NULL`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAddressRequest {
    #[serde(default, deserialize_with = "present")]
    #[validate(required(message = "address is required"))]
    pub address: Option<Option<String>>,
}

impl UpdateAddressRequest {
    /// Validates the request and returns the address to store
    pub fn into_address(self) -> ApiResult<Option<String>> {
        self.validate()?;

        let Some(address) = self.address else {
            return Err(ApiError::BadRequest("address is required".to_string()));
        };

        Ok(address)
    }
}

/// Marks a key as present even when its value is `null`
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Acknowledgement body for write operations
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Create user response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub message: String,

    /// Id assigned by the database
    pub id: i32,
}

/// Create user
///
/// # Endpoint
///
/// ```text
/// POST /submit_data
/// Content-Type: application/json
///
/// { "name": "Alice", "address": "1 Main St" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "message": "User created successfully", "id": 1 }
/// ```
///
/// # Errors
///
/// - 400 if the body is not JSON or `name`/`address` is missing or empty
/// - 500 if the insert fails
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreateUserResponse>)> {
    let Json(req) = payload?;
    let data = CreateUser::try_from(req)?;

    let user = state
        .db
        .run(move |conn| Box::pin(User::create(conn, data)))
        .await?;

    tracing::info!(user_id = user.id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "User created successfully".to_string(),
            id: user.id,
        }),
    ))
}

/// List users
///
/// # Endpoint
///
/// ```text
/// GET /show_data
/// ```
///
/// # Response
///
/// ```json
/// [ { "id": 1, "name": "Alice", "address": "1 Main St" } ]
/// ```
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = state.db.run(|conn| Box::pin(User::list(conn))).await?;

    tracing::debug!(count = users.len(), "Listed users");

    Ok(Json(users))
}

/// Update a user's address
///
/// # Endpoint
///
/// ```text
/// PUT /update/1
/// Content-Type: application/json
///
/// { "address": "2 Oak St" }
/// ```
///
/// # Errors
///
/// - 400 if the body is not JSON or the `address` key is missing
/// - 404 if no user has this id
/// - 500 if the update fails
pub async fn update_address(
    State(state): State<AppState>,
    user_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateAddressRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(user_id) = user_id?;
    let Json(req) = payload?;
    let address = req.into_address()?;

    let updated = state
        .db
        .run(move |conn| {
            Box::pin(async move { User::update_address(conn, user_id, address.as_deref()).await })
        })
        .await?;

    if updated == 0 {
        tracing::debug!(user_id, "Address update matched no user");
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id, "User address updated");

    Ok(Json(MessageResponse {
        message: "User address updated successfully".to_string(),
    }))
}

/// Delete user
///
/// # Endpoint
///
/// ```text
/// DELETE /delete/1
/// ```
///
/// # Errors
///
/// - 404 if no user has this id
/// - 500 if the delete fails
pub async fn delete_user(
    State(state): State<AppState>,
    user_id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(user_id) = user_id?;

    let deleted = state
        .db
        .run(move |conn| Box::pin(User::delete(conn, user_id)))
        .await?;

    if deleted == 0 {
        tracing::debug!(user_id, "Delete matched no user");
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id, "User deleted");

    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}
