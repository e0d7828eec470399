// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access and refresh token issuance and verification.
//!
//! ## Format
//!
//! Tokens are HS256-signed JWTs. Each [`TokenClass`] has its own secret and
//! lifetime; the class of a token is determined solely by which key
//! verifies it.
//!
//! ## Verification Order
//!
//! 1. Header parse (`MalformedToken`)
//! 2. Algorithm must be HS256, checked before any key is used (`SignatureInvalid`)
//! 3. Signature and claim shape against the class key
//! 4. Time window `[nbf, exp)` against the manager's clock, no leeway

use std::sync::Arc;

use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey,
    Header, Validation,
};
use thiserror::Error;

use super::claims::{IdentityClaims, TokenClass};

/// The only signing algorithm accepted.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Source of the current time in Unix seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Token issuance and verification errors.
///
/// The variants are visible to internal callers (e.g. a refresh flow that
/// wants to prompt re-login on `Expired`). The HTTP boundary collapses all
/// of them into a single unauthorized response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    MalformedToken,

    #[error("token signature is invalid")]
    SignatureInvalid,

    #[error("token has expired")]
    Expired,

    #[error("token is not yet valid")]
    NotYetValid,

    #[error("token signing failed: {0}")]
    Signing(String),
}

struct ClassKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl ClassKeys {
    fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Issues and verifies access and refresh tokens.
///
/// Keys are fixed at construction and never change afterwards, so a single
/// instance can be shared freely across request tasks.
pub struct TokenManager {
    access: ClassKeys,
    refresh: ClassKeys,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenManager {
    /// Create a manager from the access and refresh secrets.
    pub fn new(access_secret: impl AsRef<[u8]>, refresh_secret: impl AsRef<[u8]>) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        // Time window is checked against our own clock after the signature.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "nbf"]);

        Self {
            access: ClassKeys::from_secret(access_secret.as_ref()),
            refresh: ClassKeys::from_secret(refresh_secret.as_ref()),
            validation,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn issue_access_token(&self, user_id: &str, email: &str) -> Result<String, TokenError> {
        self.issue(TokenClass::Access, user_id, email)
    }

    pub fn issue_refresh_token(&self, user_id: &str, email: &str) -> Result<String, TokenError> {
        self.issue(TokenClass::Refresh, user_id, email)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<IdentityClaims, TokenError> {
        self.verify(TokenClass::Access, token)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<IdentityClaims, TokenError> {
        self.verify(TokenClass::Refresh, token)
    }

    fn keys(&self, class: TokenClass) -> &ClassKeys {
        match class {
            TokenClass::Access => &self.access,
            TokenClass::Refresh => &self.refresh,
        }
    }

    fn issue(&self, class: TokenClass, user_id: &str, email: &str) -> Result<String, TokenError> {
        let claims = IdentityClaims::new(user_id, email, self.clock.now(), class.lifetime());

        let token = encode(&Header::new(ALGORITHM), &claims, &self.keys(class).encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        tracing::debug!(token_class = %class, user_id, exp = claims.exp, "Issued token");
        Ok(token)
    }

    fn verify(&self, class: TokenClass, token: &str) -> Result<IdentityClaims, TokenError> {
        let header = decode_header(token).map_err(|_| TokenError::MalformedToken)?;

        if header.alg != ALGORITHM {
            return Err(TokenError::SignatureInvalid);
        }

        let token_data = decode::<IdentityClaims>(token, &self.keys(class).decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::SignatureInvalid
                }
                _ => TokenError::MalformedToken,
            })?;

        let claims = token_data.claims;
        let now = self.clock.now();

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }
        if claims.is_immature_at(now) {
            return Err(TokenError::NotYetValid);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("access", &"[KEY]")
            .field("refresh", &"[KEY]")
            .finish()
    }
}
