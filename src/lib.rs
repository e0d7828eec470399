// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Taskboard Auth - Stateless Authentication Core
//!
//! Issues and verifies access/refresh tokens, enforces the password policy,
//! hashes passwords with bcrypt and authenticates HTTP requests.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Tokens, passwords and the request authentication middleware
//! - `config` - Environment configuration
//! - `error` - HTTP error responses

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
