// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access to the identity attached by [`authenticate`](super::authenticate).
//!
//! Use the `Identity` extractor in handlers that require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Identity(claims): Identity) -> impl IntoResponse {
//!     // claims is IdentityClaims
//! }
//! ```
//!
//! and `MaybeIdentity` where anonymous callers are acceptable.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, Extensions},
};

use super::{AuthError, IdentityClaims};

/// The identity of the current request, if it was authenticated.
pub fn current_identity(extensions: &Extensions) -> Option<&IdentityClaims> {
    extensions.get::<IdentityClaims>()
}

/// The identity of the current request, or `Unauthenticated`.
pub fn require_identity(extensions: &Extensions) -> Result<&IdentityClaims, AuthError> {
    current_identity(extensions).ok_or(AuthError::Unauthenticated)
}

/// Extractor for an authenticated caller.
///
/// Rejects with [`AuthError::Unauthenticated`] when the middleware attached
/// no identity.
#[derive(Debug, Clone)]
pub struct Identity(pub IdentityClaims);

impl std::ops::Deref for Identity {
    type Target = IdentityClaims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require_identity(&parts.extensions).cloned().map(Identity)
    }
}

/// Optional identity extractor.
///
/// Returns `None` for anonymous requests instead of rejecting.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<IdentityClaims>);

impl std::ops::Deref for MaybeIdentity {
    type Target = Option<IdentityClaims>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeIdentity(current_identity(&parts.extensions).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn sample_claims() -> IdentityClaims {
        IdentityClaims {
            user_id: "user_123".to_string(),
            email: "user@example.com".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_000_900,
            nbf: 1_700_000_000,
        }
    }

    fn empty_parts() -> Parts {
        Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[test]
    fn accessors_without_identity() {
        let parts = empty_parts();
        assert!(current_identity(&parts.extensions).is_none());
        assert_eq!(
            require_identity(&parts.extensions),
            Err(AuthError::Unauthenticated)
        );
    }

    #[test]
    fn accessors_with_identity() {
        let mut parts = empty_parts();
        parts.extensions.insert(sample_claims());

        assert_eq!(current_identity(&parts.extensions), Some(&sample_claims()));
        assert_eq!(require_identity(&parts.extensions).unwrap().user_id, "user_123");
    }

    #[tokio::test]
    async fn identity_extractor_rejects_anonymous() {
        let mut parts = empty_parts();
        let result = Identity::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[tokio::test]
    async fn identity_extractor_reads_extensions() {
        let mut parts = empty_parts();
        parts.extensions.insert(sample_claims());

        let Identity(claims) = Identity::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(claims.email, "user@example.com");
    }

    #[tokio::test]
    async fn maybe_identity_never_rejects() {
        let mut parts = empty_parts();
        let anonymous = MaybeIdentity::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(anonymous.is_none());

        parts.extensions.insert(sample_claims());
        let known = MaybeIdentity::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(known.as_ref().map(|c| c.user_id.as_str()), Some("user_123"));
    }
}
