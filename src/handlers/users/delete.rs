// handlers/users/delete.rs - DELETE /users/:id handler
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use super::parse_id;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::state::AppState;

/// DELETE /users/:id - Remove a user; deleting a missing id is a 404
pub async fn user_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;

    match state.users.delete(id).await {
        Ok(()) => {}
        Err(DatabaseError::NotFound(_)) => {
            return Err(ApiError::not_found(format!("Couldn't delete user with id {}", id)))
        }
        Err(e) => return Err(e.into()),
    }

    info!(user_id = id, "Deleted user");

    Ok(Json(json!({ "status": "user deleted" })))
}
