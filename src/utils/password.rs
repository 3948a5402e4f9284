//! PBKDF2-SHA256 password hashing.
//!
//! Hashes are stored as PHC strings (`$pbkdf2-sha256$i=<rounds>,l=32$<salt>$<hash>`),
//! so the round count travels with each hash and can be raised without invalidating
//! old ones. Hashing is CPU-bound and runs on the blocking pool.

use password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use pbkdf2::{Params, Pbkdf2};
use thiserror::Error;
use tokio::task::{self, JoinError};

const OUTPUT_LEN: usize = 32;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const DEFAULT_ITERATIONS: u32 = Params::RECOMMENDED_ROUNDS as u32;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("malformed password hash")]
    MalformedHash,

    #[error("password hashing failed: {0}")]
    Hashing(password_hash::Error),

    #[error("password worker failed: {0}")]
    Worker(#[from] JoinError),
}

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    pub async fn hash(self, password: String) -> Result<String, PasswordError> {
        task::spawn_blocking(move || self.hash_now(&password)).await?
    }

    /// `Ok(false)` on a wrong password; `Err` only when `stored` is unusable.
    pub async fn verify(self, password: String, stored: String) -> Result<bool, PasswordError> {
        task::spawn_blocking(move || verify_now(&password, &stored)).await?
    }

    fn hash_now(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let params = Params {
            rounds: self.iterations,
            output_length: OUTPUT_LEN,
        };

        Pbkdf2
            .hash_password_customized(password.as_bytes(), None, None, params, &salt)
            .map(|hash| hash.to_string())
            .map_err(PasswordError::Hashing)
    }
}

fn verify_now(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(|_| PasswordError::MalformedHash)?;

    match Pbkdf2.verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Hashing(e)),
    }
}
