// handlers/auth/signup.rs - POST /signup handler
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::require_field;
use crate::database::{DatabaseError, NewUser};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub username: Option<String>,
    pub email: String,
    pub password: String,
}

/// POST /signup - Register a new account
///
/// Expected Input:
/// ```json
/// { "username": "alice", "email": "a@x.com", "password": "pw1" }
/// ```
///
/// The password is salted and hashed before it reaches the store.
/// Responds 201 on success, 409 when the email is already registered.
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    require_field("email", &payload.email)?;
    require_field("password", &payload.password)?;

    // Cheap early exit before paying for a hash; the unique index is what actually guarantees it
    match state.users.find_by_email(&payload.email).await {
        Ok(_) => return Err(ApiError::conflict("user with that email already exists")),
        Err(DatabaseError::NotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let hasher = state.hasher.clone();
    let password = payload.password;
    let credentials = tokio::task::spawn_blocking(move || hasher.hash_and_salt(&password)).await??;

    let user = state
        .users
        .create(NewUser {
            username: payload.username.filter(|u| !u.trim().is_empty()),
            email: payload.email,
            password: credentials.hash,
            salt: credentials.salt,
        })
        .await?;

    info!(user_id = user.id, "Signed up new user");

    Ok((StatusCode::CREATED, Json(json!({ "status": "Signed up" }))))
}
