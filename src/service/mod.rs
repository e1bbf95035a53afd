//! Outbound request wrappers. The studio only talks to the trait; which
//! implementation sits behind it is a configuration decision.

mod gemini;
mod proxy;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Backend, Settings};
use crate::error::StudioError;
use crate::models::{GenerateImageRequest, GeneratePromptRequest};

pub use gemini::GeminiService;
pub use proxy::ProxyService;

#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Returns the synthesized prompt text.
    async fn generate_prompt(&self, request: &GeneratePromptRequest)
        -> Result<String, StudioError>;

    /// Returns the generated image as base64.
    async fn generate_image(&self, request: &GenerateImageRequest) -> Result<String, StudioError>;
}

pub fn build_service(settings: &Settings) -> Result<Arc<dyn GenerationService>, StudioError> {
    match settings.backend {
        Backend::Direct => Ok(Arc::new(GeminiService::from_settings(settings)?)),
        Backend::Proxy => Ok(Arc::new(ProxyService::new(&settings.proxy_url))),
    }
}

#[cfg(test)]
#[path = "../tests/service_tests.rs"]
mod tests;
