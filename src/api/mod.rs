// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{auth::authenticate, state::AppState};

pub mod health;
pub mod passwords;
pub mod users;

use health::{HealthResponse, LivenessResponse};
use passwords::PasswordCheckRequest;
use users::UserMeResponse;

/// CORS for the configured browser origins. Credentials are allowed, so the
/// origin list is never a wildcard.
fn cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

pub fn router(state: AppState) -> Router {
    let tokens = state.tokens.clone();
    let cors = cors_layer(state.allowed_origins.clone());

    let v1_routes = Router::new()
        .route("/users/me", get(users::get_current_user))
        .route("/passwords/check", post(passwords::check_password))
        .with_state(state);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(from_fn_with_state(tokens, authenticate))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        users::get_current_user,
        passwords::check_password
    ),
    components(schemas(HealthResponse, LivenessResponse, UserMeResponse, PasswordCheckRequest)),
    modifiers(&BearerSecurity),
    tags(
        (name = "Health", description = "Liveness and health probes"),
        (name = "Users", description = "Authenticated caller information"),
        (name = "Passwords", description = "Password strength checks")
    )
)]
struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{PasswordHasher, TokenManager, MAX_PASSWORD_BYTES};
    use axum::{
        body::{to_bytes, Body},
        http::{header::AUTHORIZATION, Request, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;

    const ALLOWED_ORIGIN: &str = "http://localhost:5173";

    fn state() -> AppState {
        AppState::new(
            TokenManager::new(b"router-access-secret", b"router-refresh-secret"),
            PasswordHasher::new(4),
        )
        .with_allowed_origins(vec![HeaderValue::from_static(ALLOWED_ORIGIN)])
    }

    async fn check_password(password: &str) -> Response {
        let body = serde_json::json!({ "password": password }).to_string();
        router(state())
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/v1/passwords/check")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn with_origin(origin: &str) -> Response {
        router(state())
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn send(app: Router, uri: &str, authorization: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
    }

    async fn json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = send(router(state()), "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn me_requires_identity() {
        let response = send(router(state()), "/v1/users/me", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json(response).await["error_code"], "unauthenticated");
    }

    #[tokio::test]
    async fn me_returns_caller() {
        let state = state();
        let token = state
            .tokens
            .issue_access_token("user_42", "u@example.com")
            .unwrap();

        let response = send(router(state), "/v1/users/me", Some(&format!("Bearer {token}"))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json(response).await;
        assert_eq!(body["user_id"], "user_42");
        assert_eq!(body["email"], "u@example.com");
        assert!(body["expires_at"].as_i64().is_some());
        assert!(body["expires_in"].as_u64().is_some_and(|secs| secs <= 900));
    }

    #[tokio::test]
    async fn bad_credentials_rejected_even_on_public_routes() {
        let response = send(router(state()), "/health", Some("Bearer garbage")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json(response).await["error_code"], "unauthorized");
    }

    #[tokio::test]
    async fn openapi_document_lists_routes() {
        let response = send(router(state()), "/api-doc/openapi.json", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let doc = json(response).await;
        assert!(doc["paths"]["/v1/users/me"].is_object());
        assert!(doc["paths"]["/v1/passwords/check"].is_object());
        assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
    }

    #[tokio::test]
    async fn allowed_origin_gets_cors_headers() {
        let response = with_origin(ALLOWED_ORIGIN).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static(ALLOWED_ORIGIN))
        );
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
            Some(&HeaderValue::from_static("true"))
        );
    }

    #[tokio::test]
    async fn disallowed_origin_gets_no_cors_headers() {
        let response = with_origin("https://attacker.example.com").await;
        assert!(!response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn password_check_accepts_strong_password() {
        let response = check_password("SecurePass123!").await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn password_check_reports_violation() {
        let response = check_password("SecurePass123").await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = json(response).await;
        assert_eq!(body["error_code"], "password_no_special");
        assert_eq!(body["error"], "password must contain at least one special character");
    }

    #[tokio::test]
    async fn password_check_rejects_over_long_password() {
        let password = format!("Aa1!{}", "x".repeat(MAX_PASSWORD_BYTES));
        let response = check_password(&password).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json(response).await["error_code"], "password_too_long");
    }
}
