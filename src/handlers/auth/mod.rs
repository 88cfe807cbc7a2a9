// handlers/auth/mod.rs - Registration and session handlers
use tracing::{debug, error};

use crate::auth::{Identity, Session};
use crate::database::{DatabaseError, UserRepository};
use crate::error::ApiError;

pub mod login; // POST /login
pub mod logout; // POST /logout
pub mod signup; // POST /signup

pub use login::login;
pub use logout::logout;
pub use signup::signup;

/// Resolve the session into an identity. Best-effort: a missing session,
/// a stale username or a storage fault all degrade to `Anonymous`.
pub async fn current_identity(users: &UserRepository, session: &Session) -> Identity {
    let Some(username) = session.user() else {
        return Identity::Anonymous;
    };

    match users.find_by_username(username).await {
        Ok(user) => Identity::Authenticated(user),
        Err(DatabaseError::NotFound(_)) => {
            debug!("Session user {} no longer exists", username);
            Identity::Anonymous
        }
        Err(e) => {
            error!("Failed to resolve session user {}: {}", username, e);
            Identity::Anonymous
        }
    }
}

/// Email and password are required and must be non-empty
pub(crate) fn require_field(name: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation_error(format!("{} is required", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::database::{DatabaseManager, NewUser};

    async fn repository() -> UserRepository {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        };
        let pool = DatabaseManager::connect(&config).await.unwrap();
        DatabaseManager::migrate(&pool).await.unwrap();
        UserRepository::new(pool)
    }

    #[tokio::test]
    async fn empty_session_is_anonymous() {
        let users = repository().await;
        let identity = current_identity(&users, &Session::default()).await;
        assert!(!identity.is_authenticated());
    }

    #[tokio::test]
    async fn session_user_resolves_until_deleted() {
        let users = repository().await;
        let user = users
            .create(NewUser {
                username: Some("alice".to_string()),
                email: "a@x.com".to_string(),
                password: "hash".to_string(),
                salt: "salt".to_string(),
            })
            .await
            .unwrap();

        let mut session = Session::default();
        session.set_user("alice");
        let identity = current_identity(&users, &session).await;
        assert_eq!(identity.user().map(|u| u.id), Some(user.id));

        users.delete(user.id).await.unwrap();
        assert!(!current_identity(&users, &session).await.is_authenticated());
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert!(require_field("email", "a@x.com").is_ok());
        assert!(matches!(require_field("email", ""), Err(ApiError::ValidationError(_))));
        assert!(matches!(require_field("password", "   "), Err(ApiError::ValidationError(_))));
    }
}
