use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use super::GenerationService;
use crate::constants::{GENERATE_IMAGE_ROUTE, GENERATE_PROMPT_ROUTE};
use crate::error::StudioError;
use crate::models::{
    GenerateImageRequest, GenerateImageResponse, GeneratePromptRequest, GeneratePromptResponse,
};

const CONTACT_FAILED: &str =
    "An error occurred while contacting the AI service. Please try again.";

/// Talks to a `prompt-studio serve` instance (or anything speaking the same
/// JSON), which holds the provider credential.
#[derive(Clone, Debug)]
pub struct ProxyService {
    base_url: String,
    http: Client,
}

impl ProxyService {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, R>(&self, route: &str, body: &B) -> Result<R, StudioError>
    where
        B: serde::Serialize + Sync,
        R: DeserializeOwned + HasError,
    {
        let url = format!("{}{}", self.base_url, route);
        debug!(%url, "posting to generation proxy");

        let response = self.http.post(&url).json(body).send().await.map_err(|err| {
            error!(%url, error = %err, "generation proxy unreachable");
            StudioError::Transport(CONTACT_FAILED.into())
        })?;

        decode_response(response).await
    }
}

trait HasError {
    fn error(&self) -> Option<&str>;
}

impl HasError for GeneratePromptResponse {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl HasError for GenerateImageResponse {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

async fn decode_response<R>(response: Response) -> Result<R, StudioError>
where
    R: DeserializeOwned + HasError,
{
    let status = response.status();
    let text = response.text().await.map_err(|err| {
        error!(error = %err, "failed to read proxy response body");
        StudioError::Transport(CONTACT_FAILED.into())
    })?;

    let parsed = serde_json::from_str::<R>(&text);

    if !status.is_success() {
        let message = parsed
            .ok()
            .and_then(|body| body.error().map(str::to_string))
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
        warn!(status = status.as_u16(), %message, "generation proxy returned an error");
        return Err(StudioError::Transport(message));
    }

    parsed.map_err(|err| {
        error!(error = %err, "generation proxy returned malformed JSON");
        StudioError::Transport(CONTACT_FAILED.into())
    })
}

#[async_trait]
impl GenerationService for ProxyService {
    async fn generate_prompt(
        &self,
        request: &GeneratePromptRequest,
    ) -> Result<String, StudioError> {
        let body: GeneratePromptResponse = self.post(GENERATE_PROMPT_ROUTE, request).await?;
        body.prompt
            .filter(|prompt| !prompt.trim().is_empty())
            .ok_or_else(|| {
                StudioError::EmptyResponse("Failed to generate prompt. Invalid API response.".into())
            })
    }

    async fn generate_image(&self, request: &GenerateImageRequest) -> Result<String, StudioError> {
        let body: GenerateImageResponse = self.post(GENERATE_IMAGE_ROUTE, request).await?;
        body.image_data
            .filter(|data| !data.trim().is_empty())
            .ok_or_else(|| {
                StudioError::EmptyResponse("Failed to generate image. Invalid API response.".into())
            })
    }
}
