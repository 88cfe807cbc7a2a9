// handlers/users/mod.rs - User listing, lookup and deletion
use crate::error::ApiError;

pub mod delete; // DELETE /users/:id
pub mod list; // GET /users
pub mod show; // GET /users/:id

pub use delete::user_delete;
pub use list::users_list;
pub use show::user_get;

/// Path ids must be integers
pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::bad_request("Invalid id type"))
}
