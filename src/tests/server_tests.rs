use super::*;

use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Method, Request},
};
use serde_json::{json, Value};
use tower::ServiceExt;

struct StubService {
    fail: bool,
}

#[async_trait]
impl GenerationService for StubService {
    async fn generate_prompt(
        &self,
        request: &GeneratePromptRequest,
    ) -> Result<String, StudioError> {
        if self.fail {
            return Err(StudioError::Transport("boom".into()));
        }
        Ok(format!("prompt for [{}]", request.custom_details))
    }

    async fn generate_image(&self, request: &GenerateImageRequest) -> Result<String, StudioError> {
        if self.fail {
            return Err(StudioError::EmptyResponse("nothing".into()));
        }
        Ok(format!("image-from-{}", request.base_images.len()))
    }
}

fn app(fail: bool) -> Router {
    build_router(Arc::new(StubService { fail }))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, serde_json::from_slice(&bytes).expect("json"))
}

#[tokio::test]
async fn healthz_reports_ok() {
    let request = Request::get("/healthz").body(Body::empty()).expect("request");
    let response = app(false).oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn prompt_route_returns_prompt() {
    let (status, body) = post_json(
        app(false),
        "/api/generate-prompt",
        json!({ "base64Image": "bWFpbg==", "customDetails": "Gender: Android Robot", "extraDetails": "" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "prompt": "prompt for [Gender: Android Robot]" }));
}

#[tokio::test]
async fn prompt_route_requires_base_image() {
    let (status, body) = post_json(
        app(false),
        "/api/generate-prompt",
        json!({ "customDetails": "", "extraDetails": "" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing base image" }));
}

#[tokio::test]
async fn prompt_route_hides_upstream_failure_details() {
    let (status, body) = post_json(
        app(true),
        "/api/generate-prompt",
        json!({ "base64Image": "bWFpbg==" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "error": "Failed to communicate with the Gemini API." })
    );
}

#[tokio::test]
async fn image_route_returns_image_data() {
    let (status, body) = post_json(
        app(false),
        "/api/generate-image",
        json!({ "prompt": "A knight.", "baseImages": ["b25l", "dHdv"] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "imageData": "image-from-2" }));
}

#[tokio::test]
async fn image_route_requires_prompt() {
    let (status, body) = post_json(
        app(false),
        "/api/generate-image",
        json!({ "prompt": "", "baseImages": ["b25l"] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Prompt is required." }));
}

#[tokio::test]
async fn image_route_passes_whitespace_prompt_through() {
    let (status, body) = post_json(
        app(false),
        "/api/generate-image",
        json!({ "prompt": "  ", "baseImages": ["b25l"] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "imageData": "image-from-1" }));
}

#[tokio::test]
async fn image_route_reports_upstream_failure() {
    let (status, body) = post_json(
        app(true),
        "/api/generate-image",
        json!({ "prompt": "A knight.", "baseImages": ["b25l"] }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "error": "Failed to generate image with Gemini API." })
    );
}

#[tokio::test]
async fn non_post_methods_are_rejected() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/generate-prompt")
        .body(Body::empty())
        .expect("request");
    let response = app(false).oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
