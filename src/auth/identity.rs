use serde::Serialize;

use crate::database::models::user::User;

/// Who is making the request, as far as the session cookie can tell
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "user", rename_all = "snake_case")]
pub enum Identity {
    Anonymous,
    Authenticated(User),
}

impl Identity {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Identity::Authenticated(user) => Some(user),
            Identity::Anonymous => None,
        }
    }
}
