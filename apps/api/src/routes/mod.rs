pub mod health;

use axum::{
    http::{HeaderName, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::books::handlers;
use crate::state::AppState;

/// Request headers browsers may send cross-origin.
const ALLOWED_HEADERS: [&str; 10] = [
    "x-csrf-token",
    "x-requested-with",
    "accept",
    "accept-version",
    "content-length",
    "content-md5",
    "content-type",
    "date",
    "x-api-version",
    "authorization",
];

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/analyze-book",
            post(handlers::handle_analyze_book).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/generate-plan",
            post(handlers::handle_generate_plan).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/recommend-books",
            post(handlers::handle_recommend_books).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/generate-pdf",
            post(handlers::handle_generate_pdf).fallback(handlers::method_not_allowed),
        )
        .with_state(state)
}

/// Any origin, a fixed method list and a fixed header list.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::OPTIONS,
            Method::PATCH,
            Method::DELETE,
            Method::POST,
            Method::PUT,
        ])
        .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::books::models::fallback_recommendations;
    use crate::books::service::tests::StubCompletion;
    use crate::config::Config;
    use crate::layout::{LayoutConfig, StyleRules};

    fn test_state(llm: StubCompletion) -> AppState {
        AppState {
            llm: Arc::new(llm),
            config: Config {
                groq_api_key: "test-key".to_string(),
                groq_api_url: "http://localhost:0".to_string(),
                llm_model: "test-model".to_string(),
                port: 0,
                rust_log: "debug".to_string(),
            },
            style_rules: Arc::new(StyleRules::default()),
            layout_config: LayoutConfig::default(),
        }
    }

    fn app(llm: StubCompletion) -> Router {
        build_router(test_state(llm)).layer(cors_layer())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(StubCompletion::replying(""))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_get_on_api_route_is_405() {
        let response = app(StubCompletion::replying(""))
            .oneshot(
                Request::get("/api/generate-plan")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_json(response).await["error"], "Method not allowed");
    }

    #[tokio::test]
    async fn test_missing_field_is_400() {
        let response = app(StubCompletion::replying(""))
            .oneshot(post_json(
                "/api/generate-plan",
                json!({ "bookTitle": "Deep Work" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "userContext is required");
    }

    #[tokio::test]
    async fn test_non_string_field_is_400() {
        let response = app(StubCompletion::replying(""))
            .oneshot(post_json("/api/analyze-book", json!({ "bookTitle": 42 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_plan_returns_plan() {
        let response = app(StubCompletion::replying("Deep Work - Cal Newport\n\nMAIN IDEAS:"))
            .oneshot(post_json(
                "/api/generate-plan",
                json!({ "bookTitle": "Deep Work", "userContext": "I get distracted" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["plan"],
            "Deep Work - Cal Newport\n\nMAIN IDEAS:"
        );
    }

    #[tokio::test]
    async fn test_upstream_error_status_is_forwarded() {
        let response = app(StubCompletion::failing(401, "Invalid API Key"))
            .oneshot(post_json(
                "/api/analyze-book",
                json!({ "bookTitle": "Deep Work" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "Invalid API Key");
    }

    #[tokio::test]
    async fn test_analyze_book_fallback_on_bad_json() {
        let response = app(StubCompletion::replying("not json"))
            .oneshot(post_json(
                "/api/analyze-book",
                json!({ "bookTitle": "Deep Work" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["popularQueries"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_recommend_books_fallback_on_upstream_error() {
        let response = app(StubCompletion::failing(500, "down"))
            .oneshot(post_json(
                "/api/recommend-books",
                json!({ "query": "sleep better" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body, serde_json::to_value(fallback_recommendations()).unwrap());
    }

    #[tokio::test]
    async fn test_generate_pdf_returns_attachment() {
        let response = app(StubCompletion::replying(""))
            .oneshot(post_json(
                "/api/generate-pdf",
                json!({
                    "content": "Deep Work - Cal Newport\n\nMAIN IDEAS:\n\n1. Focus is rare.\n\nAction 1:\nBlock two hours.\nWhy: depth needs time.",
                    "bookTitle": "Deep Work"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Deep%20Work - Action Plan.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_generate_pdf_requires_content() {
        let response = app(StubCompletion::replying(""))
            .oneshot(post_json(
                "/api/generate-pdf",
                json!({ "content": "", "bookTitle": "Deep Work" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "content is required");
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_any_origin() {
        let response = app(StubCompletion::replying(""))
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/generate-pdf")
                    .header(header::ORIGIN, "https://example.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
