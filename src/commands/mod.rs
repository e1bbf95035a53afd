use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod generate;
pub mod options;
pub mod serve;

#[derive(Parser, Debug)]
#[command(name = "prompt-studio", version, about = "Character image to Gemini prompt to generated image")]
pub struct Cli {
    /// TOML settings file (defaults to ./prompt-studio.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List style categories and their choices.
    Options,
    /// Generate a prompt from a character image, then optionally an image.
    Generate(generate::GenerateArgs),
    /// Run the proxy that holds the Gemini API key.
    Serve {
        /// Address to bind, overriding configuration.
        #[arg(long)]
        bind: Option<String>,
    },
}
