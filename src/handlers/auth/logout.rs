// handlers/auth/logout.rs - POST /logout handler
use axum::extract::State;
use axum::http::{header::SET_COOKIE, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::auth::Session;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /logout - Clear the session user and re-issue the cookie
pub async fn logout(
    State(state): State<AppState>,
    mut session: Session,
) -> Result<impl IntoResponse, ApiError> {
    session.clear_user();
    let cookie = state.sessions.save(&session)?;

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(json!({ "status": "Logged out" })),
    ))
}
