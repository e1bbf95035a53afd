pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:8787";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const CONFIG_FILE_NAME: &str = "prompt-studio.toml";

// Uploads are always forwarded as JPEG, whatever the file was.
pub const UPLOAD_IMAGE_MIME: &str = "image/jpeg";
pub const DOWNLOAD_IMAGE_EXTENSION: &str = "png";

pub const MAX_REFERENCE_IMAGES: usize = 2;
pub const COPY_FEEDBACK_MILLIS: u64 = 2000;
pub const MAX_REQUEST_BODY_BYTES: usize = 32 * 1024 * 1024;

pub const GENERATE_PROMPT_ROUTE: &str = "/api/generate-prompt";
pub const GENERATE_IMAGE_ROUTE: &str = "/api/generate-image";
