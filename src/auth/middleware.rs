// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Authentication is optional at this layer:
//!
//! - No `Authorization` header: the request continues anonymously.
//! - Header not exactly `Bearer <token>`: 401, the handler never runs.
//! - Token fails access-token verification for any reason: the same 401.
//! - Token verifies: [`IdentityClaims`] are attached to the request
//!   extensions for [`Identity`](super::Identity) to pick up.
//!
//! Handlers decide for themselves whether an anonymous caller is acceptable.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/v1/users/me", get(me))
//!     .layer(axum::middleware::from_fn_with_state(tokens, authenticate));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, TokenManager};

/// The only accepted authorization scheme (case-sensitive).
const BEARER_SCHEME: &str = "Bearer";

/// Outcome of reading the `Authorization` header.
#[derive(Debug, PartialEq, Eq)]
enum Credential<'a> {
    Absent,
    Malformed,
    Bearer(&'a str),
}

fn read_credential(headers: &HeaderMap) -> Credential<'_> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Credential::Absent;
    };
    if value.is_empty() {
        return Credential::Absent;
    }
    let Ok(value) = value.to_str() else {
        return Credential::Malformed;
    };

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) => Credential::Bearer(token),
        _ => Credential::Malformed,
    }
}

/// Authentication middleware function.
pub async fn authenticate(
    State(tokens): State<Arc<TokenManager>>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims = match read_credential(request.headers()) {
        Credential::Absent => return next.run(request).await,
        Credential::Malformed => {
            tracing::debug!("Rejected malformed authorization header");
            return AuthError::Unauthorized.into_response();
        }
        Credential::Bearer(token) => match tokens.verify_access_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected access token");
                return AuthError::Unauthorized.into_response();
            }
        },
    };

    tracing::trace!(user_id = %claims.user_id, "Authenticated request");
    request.extensions_mut().insert(claims);
    next.run(request).await
}
