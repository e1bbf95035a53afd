use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LLMMessageType {
    TEXT(String),
    IMAGE { data_b64: String, mime_type: String },
}

impl LLMMessageType {
    pub fn text(text: impl Into<String>) -> Self {
        LLMMessageType::TEXT(text.into())
    }

    pub fn image_b64(data_b64: impl Into<String>, mime_type: impl Into<String>) -> Self {
        LLMMessageType::IMAGE {
            data_b64: data_b64.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// One `user` turn of a generateContent request.
#[derive(Clone, Debug)]
pub struct LLMMessage {
    pub content: Vec<LLMMessageType>,
}

impl LLMMessage {
    pub fn human(content: Vec<LLMMessageType>) -> Self {
        Self { content }
    }
}

/// Output kinds a model may be asked to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseModality {
    Text,
    Image,
}

/// Per-request knobs that sit next to `contents` in a generateContent body.
#[derive(Clone, Debug, Default)]
pub struct GenerateOptions {
    pub response_modalities: Vec<ResponseModality>,
}

impl GenerateOptions {
    pub fn with_modalities(mut self, modalities: &[ResponseModality]) -> Self {
        self.response_modalities = modalities.to_vec();
        self
    }
}

#[derive(Clone, Debug)]
pub struct LLMClient {
    pub(crate) api_key: String,
    pub(crate) endpoint: String,
    pub(crate) default_model: String,
    pub(crate) http: reqwest::Client,
}

impl LLMClient {
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            default_model: default_model.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }
}
