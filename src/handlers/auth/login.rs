// handlers/auth/login.rs - POST /login handler
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header::SET_COOKIE, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::require_field;
use crate::auth::Session;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /login - Verify credentials and start a session
///
/// Expected Input:
/// ```json
/// { "email": "a@x.com", "password": "pw1" }
/// ```
///
/// Expected Output (202, plus a signed `Set-Cookie`):
/// ```json
/// { "status": "Logged in", "user": { "username": "alice" } }
/// ```
pub async fn login(
    State(state): State<AppState>,
    mut session: Session,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    require_field("email", &payload.email)?;
    require_field("password", &payload.password)?;

    let user = match state.users.find_by_email(&payload.email).await {
        Ok(user) => user,
        Err(DatabaseError::NotFound(_)) => return Err(ApiError::not_found("User not found")),
        Err(e) => return Err(e.into()),
    };

    if user.email != payload.email {
        warn!(user_id = user.id, "Rejected login: email mismatch");
        return Err(ApiError::unauthorized("incorrect email"));
    }

    let hasher = state.hasher.clone();
    let (hash, salt) = (user.password.clone(), user.salt.clone());
    let candidate = payload.password;
    let verified =
        tokio::task::spawn_blocking(move || hasher.verify(&hash, &salt, &candidate)).await??;

    if !verified {
        warn!(user_id = user.id, "Rejected login: incorrect password");
        return Err(ApiError::unauthorized("incorrect password"));
    }

    // Identity is resolved by username, so an account without one stays anonymous
    match &user.username {
        Some(username) => session.set_user(username.clone()),
        None => session.clear_user(),
    }
    let cookie = state.sessions.save(&session)?;

    info!(user_id = user.id, "User logged in");

    Ok((
        StatusCode::ACCEPTED,
        [(SET_COOKIE, cookie)],
        Json(json!({
            "status": "Logged in",
            "user": { "username": user.username }
        })),
    ))
}
