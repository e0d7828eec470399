// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup and is immutable afterwards.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | Access token signing key | Development value (warns) |
//! | `JWT_REFRESH_SECRET` | Refresh token signing key | Development value (warns) |
//! | `BCRYPT_COST` | bcrypt cost factor (4-31) | `12` |
//! | `CORS_ALLOWED_ORIGINS` | Comma-separated browser origins | `http://localhost:5173,http://localhost:3000` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! Empty values are treated as unset.

use std::str::FromStr;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::auth::password::{DEFAULT_BCRYPT_COST, MAX_BCRYPT_COST, MIN_BCRYPT_COST};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_REFRESH_SECRET_ENV: &str = "JWT_REFRESH_SECRET";
pub const BCRYPT_COST_ENV: &str = "BCRYPT_COST";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const CORS_ALLOWED_ORIGINS_ENV: &str = "CORS_ALLOWED_ORIGINS";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CORS_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Minimum secret length before a startup warning is logged.
pub const MIN_SECRET_LENGTH: usize = 32;

const DEV_JWT_SECRET: &str = "local-development-access-secret-change-this";
const DEV_JWT_REFRESH_SECRET: &str = "local-development-refresh-secret-change-this";

/// Configuration errors (fatal at startup).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("PORT must be a port number (got {0:?})")]
    InvalidPort(String),

    #[error("BCRYPT_COST must be between 4 and 31 (got {0:?})")]
    InvalidBcryptCost(String),

    #[error("JWT_SECRET and JWT_REFRESH_SECRET must be different")]
    SharedSecret,

    #[error("LOG_FORMAT must be `json` or `pretty` (got {0:?})")]
    InvalidLogFormat(String),

    #[error("CORS_ALLOWED_ORIGINS contains an invalid origin (got {0:?})")]
    InvalidCorsOrigin(String),
}

/// Split a comma-separated origin list, dropping blank entries.
fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            // A wildcard would match nothing in an explicit allow-list.
            if origin == "*" || HeaderValue::from_str(origin).is_err() {
                return Err(ConfigError::InvalidCorsOrigin(origin.to_string()));
            }
            Ok(origin.to_string())
        })
        .collect()
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::InvalidLogFormat(s.to_string())),
        }
    }
}

/// Process-wide configuration.
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_refresh_secret: String,
    pub bcrypt_cost: u32,
    pub cors_allowed_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let port = match get(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let bcrypt_cost = match get(BCRYPT_COST_ENV) {
            Some(raw) => match raw.parse::<u32>() {
                Ok(cost) if (MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) => cost,
                _ => return Err(ConfigError::InvalidBcryptCost(raw)),
            },
            None => DEFAULT_BCRYPT_COST,
        };

        let log_format = match get(LOG_FORMAT_ENV) {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        let cors_allowed_origins = parse_origins(
            get(CORS_ALLOWED_ORIGINS_ENV)
                .as_deref()
                .unwrap_or(DEFAULT_CORS_ALLOWED_ORIGINS),
        )?;

        let jwt_secret = get(JWT_SECRET_ENV).unwrap_or_else(|| DEV_JWT_SECRET.to_string());
        let jwt_refresh_secret =
            get(JWT_REFRESH_SECRET_ENV).unwrap_or_else(|| DEV_JWT_REFRESH_SECRET.to_string());

        // Identical keys would let a refresh token pass as an access token.
        if jwt_secret == jwt_refresh_secret {
            return Err(ConfigError::SharedSecret);
        }

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            jwt_secret,
            jwt_refresh_secret,
            bcrypt_cost,
            cors_allowed_origins,
            log_format,
        })
    }

    /// `host:port` string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Insecure settings an operator should know about.
    pub fn security_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for (var, secret, default) in [
            (JWT_SECRET_ENV, &self.jwt_secret, DEV_JWT_SECRET),
            (JWT_REFRESH_SECRET_ENV, &self.jwt_refresh_secret, DEV_JWT_REFRESH_SECRET),
        ] {
            if secret == default {
                warnings.push(format!("{var} not set, using insecure development default"));
            } else if secret.len() < MIN_SECRET_LENGTH {
                warnings.push(format!(
                    "{var} is {} bytes, at least {MIN_SECRET_LENGTH} recommended",
                    secret.len()
                ));
            }
        }

        warnings
    }

    /// Log all security warnings. Call once tracing is initialised.
    pub fn log_security_warnings(&self) {
        for warning in self.security_warnings() {
            tracing::warn!("[SECURITY] {warning}");
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_refresh_secret", &"[REDACTED]")
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("log_format", &self.log_format)
            .finish()
    }
}
