// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{Clock, Identity, IdentityClaims, SystemClock};

/// Response for GET /v1/users/me
#[derive(Debug, Serialize, ToSchema)]
pub struct UserMeResponse {
    /// User's unique ID
    pub user_id: String,
    /// User's email address
    pub email: String,
    /// Access token expiry (Unix seconds)
    pub expires_at: i64,
    /// Seconds until the access token expires
    pub expires_in: u64,
}

impl UserMeResponse {
    fn from_claims(claims: IdentityClaims, now: i64) -> Self {
        Self {
            expires_in: claims.remaining_secs_at(now),
            user_id: claims.user_id,
            email: claims.email,
            expires_at: claims.exp,
        }
    }
}

/// Get the current authenticated user's information.
///
/// Anonymous callers get 401 `unauthenticated`; callers presenting a bad
/// token are turned away earlier by the middleware with `unauthorized`.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_user(Identity(claims): Identity) -> Json<UserMeResponse> {
    Json(UserMeResponse::from_claims(claims, SystemClock.now()))
}
