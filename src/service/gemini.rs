use async_trait::async_trait;
use llmapi::gemini::{first_inline_image, response_to_text_data, send_generate_request};
use llmapi::{GenerateOptions, LLMClient, LLMMessage, LLMMessageType, ResponseModality};
use tracing::{debug, error};

use super::GenerationService;
use crate::config::Settings;
use crate::constants::UPLOAD_IMAGE_MIME;
use crate::error::StudioError;
use crate::models::{GenerateImageRequest, GeneratePromptRequest};

/// Calls Gemini directly with a locally held API key.
#[derive(Clone, Debug)]
pub struct GeminiService {
    text_client: LLMClient,
    image_client: LLMClient,
}

impl GeminiService {
    pub fn new(
        api_key: &str,
        endpoint: &str,
        text_model: &str,
        image_model: &str,
    ) -> Result<Self, StudioError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(StudioError::Config(
                "A Gemini API key is required (set GEMINI_API_KEY).".into(),
            ));
        }

        Ok(Self {
            text_client: LLMClient::new(api_key, endpoint, strip_model_prefix(text_model)),
            image_client: LLMClient::new(api_key, endpoint, strip_model_prefix(image_model)),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, StudioError> {
        Self::new(
            settings.api_key.as_deref().unwrap_or_default(),
            &settings.gemini_endpoint,
            &settings.text_model,
            &settings.image_model,
        )
    }
}

fn strip_model_prefix(model: &str) -> String {
    let model = model.trim();
    model.strip_prefix("models/").unwrap_or(model).to_string()
}

pub(crate) fn build_prompt_instruction(custom_details: &str, extra_details: &str) -> String {
    let mut sections = vec![
        "Analyze this character image and write a highly detailed, descriptive prompt for an AI image generator.".to_string(),
        "The goal is to recreate a similar character while leaving room for artistic freedom.".to_string(),
        "Write a single continuous paragraph with no markdown, line breaks or lists.".to_string(),
        "Describe the character's appearance, clothing, expression and overall mood.".to_string(),
    ];

    let custom_details = custom_details.trim();
    if !custom_details.is_empty() {
        sections.push(format!(
            "Incorporate these specific stylistic details: {custom_details}."
        ));
    }

    let extra_details = extra_details.trim();
    if !extra_details.is_empty() {
        sections.push(format!("Also add these extra details from the user: {extra_details}"));
    }

    sections.push(
        "Finally, combine everything into one cohesive, imaginative and rich prompt.".to_string(),
    );
    sections.join(" ")
}

#[async_trait]
impl GenerationService for GeminiService {
    async fn generate_prompt(
        &self,
        request: &GeneratePromptRequest,
    ) -> Result<String, StudioError> {
        let message = LLMMessage::human(vec![
            LLMMessageType::image_b64(request.base64_image.trim(), UPLOAD_IMAGE_MIME),
            LLMMessageType::text(build_prompt_instruction(
                &request.custom_details,
                &request.extra_details,
            )),
        ]);

        debug!(
            model = self.text_client.default_model(),
            image_len = request.base64_image.len(),
            "requesting prompt synthesis"
        );

        let response =
            send_generate_request(&self.text_client, vec![message], &GenerateOptions::default())
                .await
                .map_err(|err| {
                    error!(error = %format!("{err:#}"), "Gemini prompt generation failed");
                    StudioError::Transport("Failed to generate prompt with Gemini API.".into())
                })?;

        let text = response_to_text_data(&response).map_err(|err| {
            error!(error = %err, "Gemini returned no prompt candidates");
            StudioError::EmptyResponse(
                "API returned an empty response for prompt generation.".into(),
            )
        })?;

        if text.trim().is_empty() {
            return Err(StudioError::EmptyResponse(
                "API returned an empty response for prompt generation.".into(),
            ));
        }

        Ok(text)
    }

    async fn generate_image(&self, request: &GenerateImageRequest) -> Result<String, StudioError> {
        if request.base_images.is_empty() {
            return Err(StudioError::NoBaseImages);
        }

        let mut content: Vec<LLMMessageType> = request
            .base_images
            .iter()
            .map(|data| LLMMessageType::image_b64(data.trim(), UPLOAD_IMAGE_MIME))
            .collect();
        content.push(LLMMessageType::text(request.prompt.as_str()));

        debug!(
            model = self.image_client.default_model(),
            base_images = request.base_images.len(),
            prompt_len = request.prompt.len(),
            "requesting image synthesis"
        );

        let options = GenerateOptions::default().with_modalities(&[ResponseModality::Image]);
        let response =
            send_generate_request(&self.image_client, vec![LLMMessage::human(content)], &options)
                .await
                .map_err(|err| {
                    error!(error = %format!("{err:#}"), "Gemini image generation failed");
                    StudioError::Transport("Failed to generate image with Gemini API.".into())
                })?;

        first_inline_image(&response)
            .map(|inline| inline.data.trim().to_string())
            .ok_or_else(|| {
                StudioError::EmptyResponse(
                    "No image data found in the Gemini API response.".into(),
                )
            })
    }
}
