// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password strength endpoint.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{error::ApiError, state::AppState};

/// Request body for POST /v1/passwords/check
#[derive(Deserialize, ToSchema)]
pub struct PasswordCheckRequest {
    pub password: String,
}

/// Check a candidate password against the strength policy.
///
/// Applies the same rules as hashing at registration, without hashing.
#[utoipa::path(
    post,
    path = "/v1/passwords/check",
    tag = "Passwords",
    request_body = PasswordCheckRequest,
    responses(
        (status = 204, description = "Password is acceptable"),
        (status = 422, description = "Password violates the policy"),
    )
)]
pub async fn check_password(
    State(state): State<AppState>,
    Json(request): Json<PasswordCheckRequest>,
) -> Result<StatusCode, ApiError> {
    state.passwords.check(&request.password)?;
    Ok(StatusCode::NO_CONTENT)
}
