//! HTTP proxy that keeps the provider credential server-side and exposes
//! the two generation endpoints the studio's proxy backend speaks to.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, warn};

use crate::constants::{GENERATE_IMAGE_ROUTE, GENERATE_PROMPT_ROUTE, MAX_REQUEST_BODY_BYTES};
use crate::error::StudioError;
use crate::models::{
    ErrorResponse, GenerateImageRequest, GenerateImageResponse, GeneratePromptRequest,
    GeneratePromptResponse,
};
use crate::service::GenerationService;

type SharedService = Arc<dyn GenerationService>;

pub fn build_router(service: SharedService) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(GENERATE_PROMPT_ROUTE, post(generate_prompt))
        .route(GENERATE_IMAGE_ROUTE, post(generate_image))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .with_state(service)
}

pub async fn serve(addr: SocketAddr, service: SharedService) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "generation proxy listening");

    axum::serve(listener, build_router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("generation proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }
}

async fn healthz() -> &'static str {
    "ok"
}

fn error_response(status: StatusCode, message: &str) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

async fn generate_prompt(
    State(service): State<SharedService>,
    Json(request): Json<GeneratePromptRequest>,
) -> axum::response::Response {
    if request.base64_image.is_empty() {
        warn!("prompt request without base image");
        return error_response(StatusCode::BAD_REQUEST, "Missing base image");
    }

    match service.generate_prompt(&request).await {
        Ok(prompt) => Json(GeneratePromptResponse {
            prompt: Some(prompt),
            error: None,
        })
        .into_response(),
        Err(err) => {
            log_failure("prompt", &err);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to communicate with the Gemini API.",
            )
        }
    }
}

async fn generate_image(
    State(service): State<SharedService>,
    Json(request): Json<GenerateImageRequest>,
) -> axum::response::Response {
    if request.prompt.is_empty() {
        warn!("image request without prompt");
        return error_response(StatusCode::BAD_REQUEST, "Prompt is required.");
    }

    match service.generate_image(&request).await {
        Ok(image_data) => Json(GenerateImageResponse {
            image_data: Some(image_data),
            error: None,
        })
        .into_response(),
        Err(err) => {
            log_failure("image", &err);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate image with Gemini API.",
            )
        }
    }
}

fn log_failure(action: &'static str, err: &StudioError) {
    error!(action, kind = ?err.kind(), error = %err, "upstream generation failed");
}

#[cfg(test)]
#[path = "tests/server_tests.rs"]
mod tests;
