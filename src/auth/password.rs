// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing and verification (bcrypt).
//!
//! Hashes are self-describing `$2b$<cost>$<salt><hash>` strings with a fresh
//! salt per call. Verification reads the cost and salt back from the stored
//! artifact, so changing the configured cost never invalidates old hashes.
//!
//! bcrypt only reads the first 72 bytes of its input.
//! Longer passwords are rejected when hashing and never verify, so two
//! passwords sharing a prefix cannot stand in for each other.
//!
//! bcrypt is deliberately slow. Async callers should use
//! [`PasswordHasher::hash_blocking`] and [`PasswordHasher::verify_blocking`],
//! which run on tokio's blocking pool.

use thiserror::Error;

use super::policy::{PasswordPolicy, PolicyViolation};

/// Default bcrypt cost factor.
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Lowest cost bcrypt accepts.
pub const MIN_BCRYPT_COST: u32 = 4;

/// Highest cost bcrypt accepts.
pub const MAX_BCRYPT_COST: u32 = 31;

/// Longest password bcrypt hashes without truncation, in bytes. bcrypt reads
/// 72 bytes including the NUL terminator.
pub const MAX_PASSWORD_BYTES: usize = 71;

/// Password hashing/verification errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    /// Password does not meet the strength policy (never hashed)
    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    /// Password is longer than bcrypt can hash (never hashed)
    #[error("password must be at most {} bytes long", MAX_PASSWORD_BYTES)]
    TooLong,

    /// The hash function itself failed
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Wrong password or unusable stored hash
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Policy-enforcing bcrypt hasher.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    policy: PasswordPolicy,
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt cost.
    ///
    /// The cost is clamped into `MIN_BCRYPT_COST..=MAX_BCRYPT_COST`; range
    /// errors are reported at configuration load time.
    pub fn new(cost: u32) -> Self {
        Self {
            policy: PasswordPolicy,
            cost: cost.clamp(MIN_BCRYPT_COST, MAX_BCRYPT_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Check that a password would be accepted by [`hash`](Self::hash).
    pub fn check(&self, password: &str) -> Result<(), PasswordError> {
        self.policy.validate(password)?;

        if password.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong);
        }

        Ok(())
    }

    /// Validate the password, then hash it.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        self.check(password)?;

        bcrypt::non_truncating_hash(password, self.cost).map_err(|e| match e {
            bcrypt::BcryptError::Truncation(_) => PasswordError::TooLong,
            e => PasswordError::Hashing(e.to_string()),
        })
    }

    /// Check a password against a stored hash.
    ///
    /// A wrong password, an over-long password and a malformed hash all
    /// yield `InvalidCredentials`.
    pub fn verify(&self, password: &str, hash: &str) -> Result<(), PasswordError> {
        match bcrypt::non_truncating_verify(password, hash) {
            Ok(true) => Ok(()),
            Ok(false) => Err(PasswordError::InvalidCredentials),
            Err(e) => {
                tracing::debug!(error = %e, "Password could not be checked against stored hash");
                Err(PasswordError::InvalidCredentials)
            }
        }
    }

    /// [`hash`](Self::hash) on the blocking thread pool.
    pub async fn hash_blocking(&self, password: String) -> Result<String, PasswordError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordError::Hashing(e.to_string()))?
    }

    /// [`verify`](Self::verify) on the blocking thread pool.
    pub async fn verify_blocking(&self, password: String, hash: String) -> Result<(), PasswordError> {
        let hasher = self.clone();
        match tokio::task::spawn_blocking(move || hasher.verify(&password, &hash)).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Password verification task failed");
                Err(PasswordError::InvalidCredentials)
            }
        }
    }
}
