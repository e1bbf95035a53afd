//! The studio's form state and the upload → prompt → edit → image → download
//! sequence.
//!
//! Each request is split into `begin_*` (validate, flip the loading flag,
//! hand back the request body) and `finish_*` (record the outcome), so an
//! event loop can await the service however it likes. `generate_prompt` and
//! `generate_image` chain the two for callers that simply await inline.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::constants::{COPY_FEEDBACK_MILLIS, MAX_REFERENCE_IMAGES};
use crate::error::StudioError;
use crate::fs_utils::write_generated_image;
use crate::models::{GenerateImageRequest, GeneratePromptRequest, ImageFile, ReferenceImage};
use crate::options::SelectedOptions;
use crate::service::GenerationService;

/// Destination for the copy action.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> std::io::Result<()>;
}

#[derive(Debug, Default)]
pub struct Studio {
    main_image: Option<String>,
    additional_description: String,
    selections: SelectedOptions,

    prompt_result: String,
    prompt_loading: bool,
    prompt_error: Option<String>,
    copied_at: Option<Instant>,

    image_prompt: String,
    reference_images: Vec<ReferenceImage>,
    generated_image: Option<String>,
    image_loading: bool,
    image_error: Option<String>,
}

impl Studio {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- form state ----

    /// Returns whether the file was accepted as the main image.
    pub fn upload_main_image(&mut self, file: ImageFile) -> bool {
        if !file.is_image() {
            warn!(name = %file.name, mime = %file.mime_type, "rejected non-image upload");
            self.main_image = None;
            self.prompt_error = Some(StudioError::InvalidImageFile.to_string());
            return false;
        }

        debug!(name = %file.name, bytes = file.bytes.len(), "main image uploaded");
        self.main_image = Some(file.to_base64());
        self.prompt_result.clear();
        self.prompt_error = None;
        self.clear_image_generation_state();
        true
    }

    pub fn delete_main_image(&mut self) {
        self.main_image = None;
        self.prompt_result.clear();
        self.prompt_error = None;
        self.clear_image_generation_state();
    }

    pub fn select_option(&mut self, category: &str, value: &str) -> Result<(), StudioError> {
        self.selections.select(category, value)
    }

    pub fn reset_option(&mut self, category: &str) -> Result<(), StudioError> {
        self.selections.reset(category)
    }

    pub fn set_additional_description(&mut self, text: impl Into<String>) {
        self.additional_description = text.into();
    }

    /// The editor only unlocks once a prompt has been generated.
    pub fn set_image_prompt(&mut self, text: impl Into<String>) -> bool {
        if self.prompt_result.is_empty() {
            return false;
        }
        self.image_prompt = text.into();
        true
    }

    /// Appends a reference image and returns its id, or `None` when the
    /// list is already full.
    pub fn upload_reference_image(&mut self, file: ImageFile) -> Option<String> {
        if self.reference_images.len() >= MAX_REFERENCE_IMAGES {
            debug!(name = %file.name, "reference image list full, ignoring upload");
            return None;
        }

        let id = Uuid::new_v4().to_string();
        self.reference_images.push(ReferenceImage {
            id: id.clone(),
            data: file.to_base64(),
        });
        Some(id)
    }

    pub fn delete_reference_image(&mut self, id: &str) -> bool {
        let before = self.reference_images.len();
        self.reference_images.retain(|image| image.id != id);
        self.reference_images.len() != before
    }

    fn clear_image_generation_state(&mut self) {
        self.generated_image = None;
        self.image_error = None;
        self.reference_images.clear();
        self.image_prompt.clear();
    }

    // ---- derived values ----

    pub fn custom_details(&self) -> String {
        self.selections.custom_details()
    }

    pub fn extra_details(&self) -> String {
        if self.additional_description.is_empty() {
            String::new()
        } else {
            format!(
                " [ADDITIONAL TEXT DESCRIPTION]: {}.",
                self.additional_description
            )
        }
    }

    /// Reference images in upload order, falling back to the main image.
    pub fn base_images(&self) -> Vec<String> {
        if !self.reference_images.is_empty() {
            return self
                .reference_images
                .iter()
                .map(|image| image.data.clone())
                .collect();
        }
        self.main_image.iter().cloned().collect()
    }

    pub fn has_base_image(&self) -> bool {
        self.main_image.is_some() || !self.reference_images.is_empty()
    }

    pub fn can_generate_prompt(&self) -> bool {
        !self.prompt_loading && self.main_image.is_some()
    }

    pub fn can_copy(&self) -> bool {
        !self.prompt_result.is_empty()
    }

    pub fn can_edit_image_prompt(&self) -> bool {
        !self.prompt_result.is_empty()
    }

    pub fn can_generate_image(&self) -> bool {
        !self.image_prompt.is_empty()
            && !self.image_loading
            && !self.prompt_loading
            && self.has_base_image()
    }

    pub fn can_download(&self) -> bool {
        self.generated_image.is_some()
    }

    // ---- prompt generation ----

    pub fn begin_prompt_generation(&mut self) -> Option<GeneratePromptRequest> {
        if self.prompt_loading {
            return None;
        }

        let Some(main_image) = self.main_image.clone() else {
            self.prompt_error = Some(StudioError::MissingMainImage.to_string());
            return None;
        };

        self.prompt_loading = true;
        self.prompt_result.clear();
        self.prompt_error = None;
        self.clear_image_generation_state();

        Some(GeneratePromptRequest {
            base64_image: main_image,
            custom_details: self.custom_details(),
            extra_details: self.extra_details(),
        })
    }

    pub fn finish_prompt_generation(&mut self, outcome: Result<String, StudioError>) {
        self.prompt_loading = false;

        match outcome {
            Ok(text) if !text.trim().is_empty() => {
                let text = text.trim().to_string();
                info!(prompt_len = text.len(), "prompt generated");
                self.image_prompt = text.clone();
                self.prompt_result = text;
            }
            Ok(_) => {
                self.prompt_error = Some("Failed to generate prompt. Invalid API response.".into());
            }
            Err(err) => {
                warn!(error = %err, kind = ?err.kind(), "prompt generation failed");
                self.prompt_error = Some(err.to_string());
            }
        }
    }

    pub async fn generate_prompt(&mut self, service: &dyn GenerationService) {
        let Some(request) = self.begin_prompt_generation() else {
            return;
        };
        let outcome = service.generate_prompt(&request).await;
        self.finish_prompt_generation(outcome);
    }

    // ---- image generation ----

    pub fn begin_image_generation(&mut self) -> Option<GenerateImageRequest> {
        if self.image_loading || self.prompt_loading {
            return None;
        }

        let base_images = self.base_images();

        if self.image_prompt.is_empty() {
            self.image_error = Some(StudioError::MissingPrompt.to_string());
            return None;
        }
        if base_images.is_empty() {
            self.image_error = Some(StudioError::MissingBaseImage.to_string());
            return None;
        }

        self.image_loading = true;
        self.image_error = None;
        self.generated_image = None;

        Some(GenerateImageRequest {
            prompt: self.image_prompt.clone(),
            base_images,
        })
    }

    pub fn finish_image_generation(&mut self, outcome: Result<String, StudioError>) {
        self.image_loading = false;

        match outcome {
            Ok(data) if !data.trim().is_empty() => {
                info!(image_len = data.len(), "image generated");
                self.generated_image = Some(data);
            }
            Ok(_) => {
                self.image_error = Some("Failed to generate image. Invalid API response.".into());
            }
            Err(err) => {
                warn!(error = %err, kind = ?err.kind(), "image generation failed");
                self.image_error = Some(err.to_string());
            }
        }
    }

    pub async fn generate_image(&mut self, service: &dyn GenerationService) {
        let Some(request) = self.begin_image_generation() else {
            return;
        };
        let outcome = service.generate_image(&request).await;
        self.finish_image_generation(outcome);
    }

    // ---- copy / download ----

    /// Copies the generated prompt. Failures are logged and leave visible
    /// state untouched.
    pub fn copy_prompt(&mut self, clipboard: &mut dyn Clipboard) -> bool {
        self.copy_prompt_at(clipboard, Instant::now())
    }

    pub fn copy_prompt_at(&mut self, clipboard: &mut dyn Clipboard, now: Instant) -> bool {
        if !self.can_copy() {
            return false;
        }

        match clipboard.write_text(&self.prompt_result) {
            Ok(()) => {
                self.copied_at = Some(now);
                true
            }
            Err(err) => {
                warn!(error = %err, "failed to copy prompt");
                false
            }
        }
    }

    pub fn is_copied(&self) -> bool {
        self.is_copied_at(Instant::now())
    }

    pub fn is_copied_at(&self, now: Instant) -> bool {
        self.copied_at.is_some_and(|copied_at| {
            now.saturating_duration_since(copied_at) < Duration::from_millis(COPY_FEEDBACK_MILLIS)
        })
    }

    /// Writes the generated image into `dir`; `Ok(None)` when there is none.
    pub async fn download_image(&self, dir: &Path) -> Result<Option<PathBuf>, StudioError> {
        let Some(data) = self.generated_image.as_deref() else {
            return Ok(None);
        };
        let path = write_generated_image(dir, data).await?;
        info!(path = %path.display(), "generated image saved");
        Ok(Some(path))
    }

    // ---- accessors ----

    pub fn main_image(&self) -> Option<&str> {
        self.main_image.as_deref()
    }

    pub fn additional_description(&self) -> &str {
        &self.additional_description
    }

    pub fn selections(&self) -> &SelectedOptions {
        &self.selections
    }

    pub fn prompt_result(&self) -> &str {
        &self.prompt_result
    }

    pub fn is_generating_prompt(&self) -> bool {
        self.prompt_loading
    }

    pub fn prompt_error(&self) -> Option<&str> {
        self.prompt_error.as_deref()
    }

    pub fn image_prompt(&self) -> &str {
        &self.image_prompt
    }

    pub fn reference_images(&self) -> &[ReferenceImage] {
        &self.reference_images
    }

    pub fn generated_image(&self) -> Option<&str> {
        self.generated_image.as_deref()
    }

    pub fn is_generating_image(&self) -> bool {
        self.image_loading
    }

    pub fn image_error(&self) -> Option<&str> {
        self.image_error.as_deref()
    }
}

#[cfg(test)]
#[path = "tests/studio_tests.rs"]
mod tests;
