// handlers/users/show.rs - GET /users/:id handler
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use super::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /users/:id - Fetch one user; 400 for a non-numeric id, 404 when absent
pub async fn user_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let user = state.users.find_by_id(id).await?;

    Ok(Json(json!({ "user": user })))
}
