use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_BIND_ADDR, DEFAULT_GEMINI_ENDPOINT, DEFAULT_IMAGE_MODEL,
    DEFAULT_OUTPUT_DIR, DEFAULT_PROXY_URL, DEFAULT_TEXT_MODEL,
};
use crate::error::StudioError;

/// Where generation requests go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Call Gemini from this process with a local API key.
    Direct,
    /// Call a proxy that holds the key.
    Proxy,
}

impl FromStr for Backend {
    type Err = StudioError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Backend::Direct),
            "proxy" => Ok(Backend::Proxy),
            other => Err(StudioError::Config(format!(
                "Unknown backend '{other}'; expected 'direct' or 'proxy'."
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub backend: Backend,
    pub api_key: Option<String>,
    pub gemini_endpoint: String,
    pub text_model: String,
    pub image_model: String,
    pub proxy_url: String,
    pub bind_addr: String,
    pub output_dir: PathBuf,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: Backend::Proxy,
            api_key: None,
            gemini_endpoint: DEFAULT_GEMINI_ENDPOINT.into(),
            text_model: DEFAULT_TEXT_MODEL.into(),
            image_model: DEFAULT_IMAGE_MODEL.into(),
            proxy_url: DEFAULT_PROXY_URL.into(),
            bind_addr: DEFAULT_BIND_ADDR.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            log_level: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    backend: Option<Backend>,
    api_key: Option<String>,
    gemini_endpoint: Option<String>,
    text_model: Option<String>,
    image_model: Option<String>,
    proxy_url: Option<String>,
    bind_addr: Option<String>,
    output_dir: Option<PathBuf>,
    log_level: Option<String>,
}

/// Defaults, then the TOML file, then environment variables.
///
/// An explicitly given `config_path` must exist; the default
/// `prompt-studio.toml` in the working directory is optional.
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings, StudioError> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(CONFIG_FILE_NAME), false),
    };

    match fs::read_to_string(&path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .map_err(|err| StudioError::Config(format!("{}: {err}", path.display())))?,
        Err(err) if required || err.kind() != std::io::ErrorKind::NotFound => {
            return Err(StudioError::io(path, err));
        }
        Err(_) => {}
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> Result<(), String> {
    let file: FileSettings = toml::from_str(raw).map_err(|err| err.to_string())?;

    if let Some(v) = file.backend {
        settings.backend = v;
    }
    if let Some(v) = file.api_key {
        settings.api_key = Some(v);
    }
    if let Some(v) = file.gemini_endpoint {
        settings.gemini_endpoint = v;
    }
    if let Some(v) = file.text_model {
        settings.text_model = v;
    }
    if let Some(v) = file.image_model {
        settings.image_model = v;
    }
    if let Some(v) = file.proxy_url {
        settings.proxy_url = v;
    }
    if let Some(v) = file.bind_addr {
        settings.bind_addr = v;
    }
    if let Some(v) = file.output_dir {
        settings.output_dir = v;
    }
    if let Some(v) = file.log_level {
        settings.log_level = v;
    }

    Ok(())
}

fn apply_env(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), StudioError> {
    let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(v) = var("STUDIO_BACKEND") {
        settings.backend = v.parse()?;
    }
    if let Some(v) = var("API_KEY") {
        settings.api_key = Some(v);
    }
    if let Some(v) = var("GEMINI_API_KEY") {
        settings.api_key = Some(v);
    }
    if let Some(v) = var("GEMINI_ENDPOINT") {
        settings.gemini_endpoint = v;
    }
    if let Some(v) = var("STUDIO_TEXT_MODEL") {
        settings.text_model = v;
    }
    if let Some(v) = var("STUDIO_IMAGE_MODEL") {
        settings.image_model = v;
    }
    if let Some(v) = var("STUDIO_PROXY_URL") {
        settings.proxy_url = v;
    }
    if let Some(v) = var("STUDIO_BIND") {
        settings.bind_addr = v;
    }
    if let Some(v) = var("STUDIO_OUTPUT_DIR") {
        settings.output_dir = PathBuf::from(v);
    }
    if let Some(v) = var("STUDIO_LOG_LEVEL") {
        settings.log_level = v;
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
