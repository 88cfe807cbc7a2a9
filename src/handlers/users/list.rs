// handlers/users/list.rs - GET /users handler
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::auth::Session;
use crate::error::ApiError;
use crate::handlers::auth::current_identity;
use crate::state::AppState;

/// GET /users - Every user plus whoever the session says is asking
///
/// Expected Output:
/// ```json
/// {
///   "users": [{ "id": 1, "username": "alice", "email": "a@x.com", ... }],
///   "current_user": { "status": "authenticated", "user": { ... } }
/// }
/// ```
pub async fn users_list(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Value>, ApiError> {
    let current_user = current_identity(&state.users, &session).await;
    let users = state.users.list_all().await?;

    Ok(Json(json!({
        "users": users,
        "current_user": current_user,
    })))
}
