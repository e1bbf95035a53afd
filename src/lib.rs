mod commands;
mod config;
mod constants;
mod error;
mod fs_utils;
mod logging;
mod models;
mod options;
mod server;
mod service;
mod studio;

use clap::Parser;
use tracing::debug;

use commands::{Cli, Command};

pub use config::{load_settings, Backend, Settings};
pub use constants::{
    DEFAULT_GEMINI_ENDPOINT, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL, GENERATE_IMAGE_ROUTE,
    GENERATE_PROMPT_ROUTE, MAX_REFERENCE_IMAGES,
};
pub use error::{ErrorKind, StudioError};
pub use fs_utils::{read_image_file, write_generated_image, FileClipboard};
pub use models::{
    GenerateImageRequest, GenerateImageResponse, GeneratePromptRequest, GeneratePromptResponse,
    ImageFile, ReferenceImage,
};
pub use options::{find_category, DropdownGroup, OptionCategory, SelectedOptions, CATALOG};
pub use server::build_router;
pub use service::{build_service, GeminiService, GenerationService, ProxyService};
pub use studio::{Clipboard, Studio};

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;
    logging::init_logging(&settings.log_level);
    debug!(backend = ?settings.backend, "settings loaded");

    match cli.command {
        Command::Options => commands::options::run(),
        Command::Generate(args) => {
            let service = build_service(&settings)?;
            let outcome = commands::generate::run(&args, &settings, service.as_ref()).await?;
            println!("{}", outcome.prompt);
            if let Some(path) = outcome.image_path {
                println!("Image saved to {}", path.display());
            }
        }
        Command::Serve { bind } => commands::serve::run(&settings, bind.as_deref()).await?,
    }

    Ok(())
}
