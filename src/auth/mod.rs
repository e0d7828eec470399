// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless authentication core for the Taskboard API.
//!
//! ## Auth Flow
//!
//! 1. Registration hashes the password with [`PasswordHasher`] (policy first)
//! 2. Login verifies it and issues an access + refresh token pair via [`TokenManager`]
//! 3. Clients send `Authorization: Bearer <access token>`
//! 4. [`authenticate`] verifies the token and attaches [`IdentityClaims`]
//! 5. Handlers read them with [`Identity`] / [`MaybeIdentity`]
//!
//! ## Security
//!
//! - Access and refresh tokens use separate keys (15 min / 7 day lifetimes)
//! - Only HS256 is accepted; the algorithm is checked before any key is used
//! - No clock skew tolerance
//! - Every credential failure produces the same 401 response

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod tokens;

pub use claims::{IdentityClaims, TokenClass, ACCESS_TOKEN_TTL, REFRESH_TOKEN_TTL};
pub use error::AuthError;
pub use extractor::{current_identity, require_identity, Identity, MaybeIdentity};
pub use middleware::authenticate;
pub use password::{PasswordError, PasswordHasher, DEFAULT_BCRYPT_COST, MAX_PASSWORD_BYTES};
pub use policy::{PasswordPolicy, PolicyViolation, MIN_PASSWORD_LENGTH};
pub use tokens::{Clock, SystemClock, TokenError, TokenManager};
