use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::chat::service::INVALID_BODY;
use crate::site;

use super::errors::ApiError;
use super::models::*;
use super::state::SharedState;

// =========================================================================
// Health
// =========================================================================

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime = state.start_time.elapsed().as_secs();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        uptime,
    })
}

// =========================================================================
// Chat
// =========================================================================

/// POST /api/chat
///
/// The body is taken as raw bytes so every rejection, including an
/// oversized body, is rendered as `{"error": ...}` rather than the
/// framework's plain-text rejection.
pub async fn chat(
    State(state): State<SharedState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            tracing::debug!(error = %rejection, "failed to read chat body");
            ApiError::InvalidRequest(INVALID_BODY.to_string())
        }
    })?;
    let reply = state.relay.handle_chat_request(&body).await?;
    tracing::debug!(kind = ?reply.kind, degraded = reply.kind.is_degraded(), "chat reply");
    Ok(Json(ChatResponse {
        message: reply.message,
    }))
}

/// GET /api/chat/status
pub async fn chat_status(State(state): State<SharedState>) -> Json<ChatStatusResponse> {
    let active = state.relay.active_provider();
    Json(ChatStatusResponse {
        available: active.is_some(),
        provider: active.map(|p| p.name().to_string()),
        model: active.map(|p| p.model().to_string()),
    })
}

// =========================================================================
// Crawler files
// =========================================================================

/// GET /sitemap.xml
pub async fn sitemap(State(state): State<SharedState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "application/xml; charset=utf-8")],
        site::sitemap_xml(&state.config.site_url, state.started_at),
    )
}

/// GET /robots.txt
pub async fn robots(State(state): State<SharedState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        site::robots_txt(&state.config.site_url),
    )
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::errors::PAYLOAD_TOO_LARGE_MESSAGE;
    use crate::api::router::{CHAT_BODY_LIMIT, create_router};
    use crate::api::state::AppState;
    use crate::chat::mock::{MockProvider, Script};
    use crate::chat::service::{
        EMPTY_REPLY_MESSAGE, OFFLINE_MESSAGE, UPSTREAM_FAILURE_MESSAGE,
    };
    use crate::chat::{ChatRelay, LlmProvider, StaticPrompt};
    use crate::config::AppConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_state() -> SharedState {
        AppState::new(AppConfig::default()).unwrap()
    }

    fn state_with(providers: Vec<Arc<dyn LlmProvider>>) -> SharedState {
        let relay = ChatRelay::new(providers, Arc::new(StaticPrompt("persona".to_string())));
        AppState::with_relay(AppConfig::default(), relay)
    }

    async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_string(response: axum::http::Response<Body>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn post_chat(state: SharedState, body: &'static str) -> axum::http::Response<Body> {
        create_router(state)
            .oneshot(
                Request::post("/api/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    // --- Health ---

    #[tokio::test]
    async fn health_returns_200() {
        let app = create_router(test_state());
        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "portfolio-relay");
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let app = create_router(test_state());
        let resp = app
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cors_preflight() {
        let app = create_router(test_state());
        let resp = app
            .oneshot(
                Request::options("/api/chat")
                    .header("origin", "https://example.dev")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("access-control-allow-origin"));
    }

    // --- Chat ---

    #[tokio::test]
    async fn chat_relays_provider_answer() {
        let primary = MockProvider::new("groq", Script::Reply("I work with React and Node."));
        let state = state_with(vec![primary.clone()]);

        let resp = post_chat(state, r#"{"message":"What are your skills?"}"#).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json, serde_json::json!({"message": "I work with React and Node."}));
        assert_eq!(primary.calls(), 1);
    }

    #[tokio::test]
    async fn chat_without_message_returns_400() {
        let primary = MockProvider::new("groq", Script::Reply("unused"));
        let state = state_with(vec![primary.clone()]);

        let resp = post_chat(state, "{}").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json, serde_json::json!({"error": "Message is required"}));
        assert_eq!(primary.calls(), 0);
    }

    #[tokio::test]
    async fn chat_with_empty_message_returns_400() {
        let primary = MockProvider::new("groq", Script::Reply("unused"));
        let state = state_with(vec![primary.clone()]);

        let resp = post_chat(state, r#"{"message":""}"#).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Message is required");
        assert_eq!(primary.calls(), 0);
    }

    #[tokio::test]
    async fn chat_with_malformed_json_returns_400() {
        let primary = MockProvider::new("groq", Script::Reply("unused"));
        let state = state_with(vec![primary.clone()]);

        let resp = post_chat(state, "{not json").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await["error"].is_string());
        assert_eq!(primary.calls(), 0);
    }

    #[tokio::test]
    async fn chat_oversized_body_returns_json_413() {
        let primary = MockProvider::new("groq", Script::Reply("unused"));
        let state = state_with(vec![primary.clone()]);
        let huge = format!(r#"{{"message":"{}"}}"#, "a".repeat(CHAT_BODY_LIMIT + 1));

        let resp = create_router(state)
            .oneshot(
                Request::post("/api/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(huge))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(
            resp.headers()["content-type"]
                .to_str()
                .unwrap()
                .starts_with("application/json")
        );
        let json = body_json(resp).await;
        assert_eq!(json["error"], PAYLOAD_TOO_LARGE_MESSAGE);
        assert_eq!(primary.calls(), 0);
    }

    #[tokio::test]
    async fn chat_accepts_missing_content_type() {
        let primary = MockProvider::new("groq", Script::Reply("hello"));
        let state = state_with(vec![primary]);
        let resp = create_router(state)
            .oneshot(
                Request::post("/api/chat")
                    .body(Body::from(r#"{"message":"hi"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["message"], "hello");
    }

    #[tokio::test]
    async fn chat_offline_without_keys() {
        let resp = post_chat(test_state(), r#"{"message":"anyone there?"}"#).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["message"], OFFLINE_MESSAGE);
    }

    #[tokio::test]
    async fn chat_upstream_failure_is_masked() {
        let primary = MockProvider::new("groq", Script::Fail);
        let fallback = MockProvider::new("openai", Script::Reply("unused"));
        let state = state_with(vec![primary.clone(), fallback.clone()]);

        let resp = post_chat(state, r#"{"message":"hello"}"#).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["message"], UPSTREAM_FAILURE_MESSAGE);
        assert!(json.get("error").is_none());
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn chat_empty_answer_is_replaced() {
        let state = state_with(vec![MockProvider::new("groq", Script::Reply(""))]);
        let resp = post_chat(state, r#"{"message":"hello"}"#).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["message"], EMPTY_REPLY_MESSAGE);
    }

    #[tokio::test]
    async fn chat_get_not_allowed() {
        let app = create_router(test_state());
        let resp = app
            .oneshot(Request::get("/api/chat").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    // --- Chat Status ---

    #[tokio::test]
    async fn chat_status_unavailable_by_default() {
        let app = create_router(test_state());
        let resp = app
            .oneshot(
                Request::get("/api/chat/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["available"], false);
        assert!(json["provider"].is_null());
        assert!(json["model"].is_null());
    }

    #[tokio::test]
    async fn chat_status_reports_primary_when_keyed() {
        let mut config = AppConfig::default();
        config.llm.primary.api_key = Some("gsk-test".to_string());
        config.llm.fallback.api_key = Some("sk-test".to_string());
        let app = create_router(AppState::new(config).unwrap());
        let resp = app
            .oneshot(
                Request::get("/api/chat/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["available"], true);
        assert_eq!(json["provider"], "groq");
        assert_eq!(json["model"], "llama3-8b-8192");
    }

    #[tokio::test]
    async fn chat_status_reports_fallback_alone() {
        let mut config = AppConfig::default();
        config.llm.fallback.api_key = Some("sk-test".to_string());
        let app = create_router(AppState::new(config).unwrap());
        let resp = app
            .oneshot(
                Request::get("/api/chat/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["provider"], "openai");
    }

    // --- Crawler files ---

    #[tokio::test]
    async fn sitemap_is_xml() {
        let mut config = AppConfig::default();
        config.site_url = "https://me.dev".to_string();
        let app = create_router(AppState::new(config).unwrap());
        let resp = app
            .oneshot(Request::get("/sitemap.xml").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(
            resp.headers()["content-type"]
                .to_str()
                .unwrap()
                .starts_with("application/xml")
        );
        let xml = body_string(resp).await;
        assert!(xml.contains("<loc>https://me.dev/work</loc>"));
    }

    #[tokio::test]
    async fn robots_is_text() {
        let app = create_router(test_state());
        let resp = app
            .oneshot(Request::get("/robots.txt").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let text = body_string(resp).await;
        assert!(text.contains("Sitemap: https://example.dev/sitemap.xml"));
    }
}
