pub mod identity;
pub mod password;
pub mod session;

pub use identity::Identity;
pub use password::{CredentialHasher, Credentials, HashError};
pub use session::{Session, SessionError, SessionStore};
