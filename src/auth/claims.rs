// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and token classes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Access token lifetime (15 minutes).
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Refresh token lifetime (7 days).
pub const REFRESH_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// The two disjoint token classes.
///
/// Each class is signed with its own secret, so a token of one class never
/// verifies against the other class's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// Short-lived, presented on every request
    Access,
    /// Long-lived, used to obtain new access tokens
    Refresh,
}

impl TokenClass {
    /// Fixed validity window for this class.
    pub fn lifetime(self) -> Duration {
        match self {
            TokenClass::Access => ACCESS_TOKEN_TTL,
            TokenClass::Refresh => REFRESH_TOKEN_TTL,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenClass::Access => "access",
            TokenClass::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity carried by a verified token.
///
/// Only [`TokenManager`](super::TokenManager) builds these during
/// verification. Handlers read them from the request via
/// [`Identity`](super::Identity) for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Opaque subject identifier
    pub user_id: String,

    /// User email
    pub email: String,

    /// Issued at (Unix seconds)
    pub iat: i64,

    /// Expiration (Unix seconds). The token is invalid from this instant on.
    pub exp: i64,

    /// Not before (Unix seconds)
    pub nbf: i64,
}

impl IdentityClaims {
    pub(crate) fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        now: i64,
        lifetime: Duration,
    ) -> Self {
        let lifetime = i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX);
        Self {
            user_id: user_id.into(),
            email: email.into(),
            iat: now,
            exp: now.saturating_add(lifetime),
            nbf: now,
        }
    }

    /// Whether the claims are expired at `now`. `exp` itself counts as expired.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }

    /// Whether `now` is before the not-before instant.
    pub fn is_immature_at(&self, now: i64) -> bool {
        now < self.nbf
    }

    /// Remaining validity in seconds at `now` (0 if expired).
    pub fn remaining_secs_at(&self, now: i64) -> u64 {
        u64::try_from(self.exp.saturating_sub(now)).unwrap_or(0)
    }
}
