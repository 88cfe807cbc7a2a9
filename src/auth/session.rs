use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::{HeaderMap, HeaderValue, COOKIE};
use axum::http::request::Parts;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use cookie::{time::Duration, Cookie, CookieJar, Key, SameSite};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use thiserror::Error;

use crate::config::SessionConfig;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Signed session cookie was not produced")]
    Sign,

    #[error("Session cookie is not a valid header value")]
    Header(#[from] axum::http::header::InvalidHeaderValue),
}

/// Everything a session can remember. Kept deliberately small: it travels
/// in the cookie on every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// In-memory view of one request's session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    values: SessionValues,
}

impl Session {
    pub fn user(&self) -> Option<&str> {
        self.values.user.as_deref()
    }

    pub fn set_user(&mut self, username: impl Into<String>) {
        self.values.user = Some(username.into());
    }

    pub fn clear_user(&mut self) {
        self.values.user = None;
    }

    pub fn is_empty(&self) -> bool {
        self.values == SessionValues::default()
    }
}

/// Loads and signs session cookies. The signing key is derived from the
/// configured secret; changing the secret invalidates every outstanding cookie.
pub struct SessionStore {
    key: Key,
    cookie_name: String,
    max_age: Duration,
    secure: bool,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("cookie_name", &self.cookie_name)
            .field("max_age", &self.max_age)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        // cookie::Key needs 64 bytes of key material
        let digest = Sha512::digest(config.secret.as_bytes());
        Self {
            key: Key::from(digest.as_slice()),
            cookie_name: config.cookie_name.clone(),
            max_age: Duration::seconds(config.max_age_secs),
            secure: config.secure,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Resolve the request's cookie into a session. A missing, forged or
    /// undecodable cookie yields an empty session rather than an error.
    pub fn load(&self, headers: &HeaderMap) -> Session {
        let mut jar = CookieJar::new();
        for header in headers.get_all(COOKIE) {
            let Ok(raw) = header.to_str() else {
                continue;
            };
            for cookie in Cookie::split_parse(raw.to_owned()).flatten() {
                jar.add_original(cookie);
            }
        }

        let Some(cookie) = jar.signed(&self.key).get(&self.cookie_name) else {
            if jar.get(&self.cookie_name).is_some() {
                tracing::debug!("Discarding session cookie with invalid signature");
            }
            return Session::default();
        };

        match Self::decode(cookie.value()) {
            Some(values) => Session { values },
            None => {
                tracing::debug!("Discarding undecodable session cookie");
                Session::default()
            }
        }
    }

    /// Serialize and sign the session into a `Set-Cookie` header value
    pub fn save(&self, session: &Session) -> Result<HeaderValue, SessionError> {
        let payload = serde_json::to_vec(&session.values)?;
        let value = URL_SAFE_NO_PAD.encode(payload);

        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key).add(
            Cookie::build((self.cookie_name.clone(), value))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(self.secure)
                .max_age(self.max_age),
        );

        let cookie = jar.get(&self.cookie_name).ok_or(SessionError::Sign)?;
        Ok(HeaderValue::from_str(&cookie.to_string())?)
    }

    fn decode(value: &str) -> Option<SessionValues> {
        let payload = URL_SAFE_NO_PAD.decode(value).ok()?;
        serde_json::from_slice(&payload).ok()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    Arc<SessionStore>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = Arc::<SessionStore>::from_ref(state);
        Ok(store.load(&parts.headers))
    }
}
