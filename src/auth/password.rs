use argon2::password_hash::{self, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

use crate::config::HasherConfig;

/// Bytes of random salt drawn per credential
pub const SALT_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("Invalid hasher parameters: {0}")]
    InvalidParams(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Stored password hash is corrupt: {0}")]
    CorruptHash(String),

    #[error("Stored salt is corrupt: {0}")]
    CorruptSalt(String),
}

/// Salted hash ready for storage. `salt` is base64 of the raw salt bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub hash: String,
    pub salt: String,
}

/// Argon2id over `password || salt`, where the per-user salt is also the
/// Argon2 salt. The output is a PHC string that embeds its own parameters,
/// so changing the work factor never invalidates stored hashes.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    pub fn new(config: &HasherConfig) -> Result<Self, HashError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| HashError::InvalidParams(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash_and_salt(&self, password: &str) -> Result<Credentials, HashError> {
        let salt = random_salt();
        let salt_string =
            SaltString::encode_b64(&salt).map_err(|e| HashError::Hash(e.to_string()))?;

        let hash = self
            .argon2()
            .hash_password(&salted(password, &salt), &salt_string)
            .map_err(|e| HashError::Hash(e.to_string()))?;

        Ok(Credentials {
            hash: hash.to_string(),
            salt: STANDARD.encode(salt),
        })
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored values cannot be decoded.
    pub fn verify(&self, stored_hash: &str, salt: &str, candidate: &str) -> Result<bool, HashError> {
        let salt = STANDARD
            .decode(salt)
            .map_err(|e| HashError::CorruptSalt(e.to_string()))?;
        let parsed =
            PasswordHash::new(stored_hash).map_err(|e| HashError::CorruptHash(e.to_string()))?;

        match self.argon2().verify_password(&salted(candidate, &salt), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashError::CorruptHash(e.to_string())),
        }
    }
}

fn salted(password: &str, salt: &[u8]) -> Vec<u8> {
    let mut input = Vec::with_capacity(password.len() + salt.len());
    input.extend_from_slice(password.as_bytes());
    input.extend_from_slice(salt);
    input
}

fn random_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    // No usable entropy source means the host is broken; there is nothing to recover.
    if let Err(e) = OsRng.try_fill_bytes(&mut salt) {
        panic!("couldn't create salt: OS random source unavailable: {}", e);
    }
    salt
}
