use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    EmptyResponse,
    Io,
    Config,
}

/// Every variant's `Display` is the message shown to the user.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Please upload the Main Model Image.")]
    MissingMainImage,
    #[error("Cannot generate image without a prompt.")]
    MissingPrompt,
    #[error("A base image is required. Please upload a Character Model Image or a Reference Image.")]
    MissingBaseImage,
    #[error("At least one base image is required for image generation.")]
    NoBaseImages,
    #[error("Please upload a valid image file (JPEG, PNG).")]
    InvalidImageFile,
    #[error("Unknown option category '{0}'.")]
    UnknownCategory(String),
    #[error("'{value}' is not a choice for '{category}'.")]
    UnknownOptionValue { category: String, value: String },
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    EmptyResponse(String),
    #[error("Unable to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode generated image: {0}")]
    Decode(String),
    #[error("{0}")]
    Config(String),
}

impl StudioError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StudioError::MissingMainImage
            | StudioError::MissingPrompt
            | StudioError::MissingBaseImage
            | StudioError::NoBaseImages
            | StudioError::InvalidImageFile
            | StudioError::UnknownCategory(_)
            | StudioError::UnknownOptionValue { .. } => ErrorKind::Validation,
            StudioError::Transport(_) => ErrorKind::Transport,
            StudioError::EmptyResponse(_) | StudioError::Decode(_) => ErrorKind::EmptyResponse,
            StudioError::Io { .. } => ErrorKind::Io,
            StudioError::Config(_) => ErrorKind::Config,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StudioError::Io {
            path: path.into(),
            source,
        }
    }
}
