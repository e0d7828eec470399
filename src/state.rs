// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use axum::http::HeaderValue;

use crate::auth::{PasswordHasher, TokenManager};
use crate::config::Config;

/// Shared, read-only application state.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenManager>,
    pub passwords: PasswordHasher,
    pub allowed_origins: Vec<HeaderValue>,
}

impl AppState {
    pub fn new(tokens: TokenManager, passwords: PasswordHasher) -> Self {
        Self {
            tokens: Arc::new(tokens),
            passwords,
            allowed_origins: Vec::new(),
        }
    }

    /// Browser origins allowed by CORS. Empty means no cross-origin access.
    pub fn with_allowed_origins(mut self, origins: Vec<HeaderValue>) -> Self {
        self.allowed_origins = origins;
        self
    }

    pub fn from_config(config: &Config) -> Self {
        // Origins are validated when the config is loaded.
        let origins = config
            .cors_allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        Self::new(
            TokenManager::new(&config.jwt_secret, &config.jwt_refresh_secret),
            PasswordHasher::new(config.bcrypt_cost),
        )
        .with_allowed_origins(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_carries_origins_and_cost() {
        let config = Config::from_lookup(|key| match key {
            "CORS_ALLOWED_ORIGINS" => Some("https://app.example.com".to_string()),
            "BCRYPT_COST" => Some("5".to_string()),
            _ => None,
        })
        .unwrap();

        let state = AppState::from_config(&config);
        assert_eq!(state.passwords.cost(), 5);
        assert_eq!(state.allowed_origins, vec![HeaderValue::from_static("https://app.example.com")]);
    }
}
