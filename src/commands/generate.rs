use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;
use tracing::{info, warn};

use crate::config::Settings;
use crate::constants::MAX_REFERENCE_IMAGES;
use crate::fs_utils::{read_image_file, FileClipboard};
use crate::service::GenerationService;
use crate::studio::Studio;

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Character image the prompt is derived from.
    #[arg(long)]
    pub image: PathBuf,
    /// Style choice as CATEGORY=VALUE; repeatable. See `prompt-studio options`.
    #[arg(long = "option", value_name = "CATEGORY=VALUE", value_parser = parse_option)]
    pub options: Vec<(String, String)>,
    /// Free-text additions to the description.
    #[arg(long)]
    pub notes: Option<String>,
    /// Base image for generation, replacing the character image; up to two.
    #[arg(long = "reference", value_name = "PATH")]
    pub references: Vec<PathBuf>,
    /// Replace the generated prompt before generating the image.
    #[arg(long)]
    pub edit_prompt: Option<String>,
    /// Stop after the prompt.
    #[arg(long)]
    pub prompt_only: bool,
    /// Directory for the downloaded image (defaults to configuration).
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Also copy the prompt into this file.
    #[arg(long)]
    pub copy_to: Option<PathBuf>,
}

fn parse_option(raw: &str) -> Result<(String, String), String> {
    let (category, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=VALUE, got '{raw}'"))?;
    let (category, value) = (category.trim(), value.trim());
    if category.is_empty() || value.is_empty() {
        return Err(format!("expected CATEGORY=VALUE, got '{raw}'"));
    }
    Ok((category.to_string(), value.to_string()))
}

/// What a session produced, for the caller to report.
#[derive(Debug, Default)]
pub struct SessionOutcome {
    pub prompt: String,
    pub image_path: Option<PathBuf>,
}

pub async fn run(
    args: &GenerateArgs,
    settings: &Settings,
    service: &dyn GenerationService,
) -> anyhow::Result<SessionOutcome> {
    let mut studio = Studio::new();

    let main = read_image_file(&args.image).await?;
    if !studio.upload_main_image(main) {
        bail!(
            "{}",
            studio
                .prompt_error()
                .unwrap_or("The main image was rejected.")
        );
    }

    for (category, value) in &args.options {
        studio.select_option(category, value)?;
    }
    if let Some(notes) = &args.notes {
        studio.set_additional_description(notes.as_str());
    }

    info!(
        details = %studio.custom_details(),
        "generating prompt"
    );
    studio.generate_prompt(service).await;
    if let Some(message) = studio.prompt_error() {
        bail!("{message}");
    }

    let mut outcome = SessionOutcome {
        prompt: studio.prompt_result().to_string(),
        image_path: None,
    };

    if let Some(path) = &args.copy_to {
        let mut clipboard = FileClipboard::new(path);
        if studio.copy_prompt(&mut clipboard) {
            info!(path = %path.display(), "prompt copied");
        }
    }

    if args.prompt_only {
        return Ok(outcome);
    }

    if let Some(edited) = &args.edit_prompt {
        studio.set_image_prompt(edited.as_str());
    }

    for path in &args.references {
        let file = read_image_file(path).await?;
        if studio.upload_reference_image(file).is_none() {
            warn!(
                path = %path.display(),
                max = MAX_REFERENCE_IMAGES,
                "reference image ignored, list is full"
            );
        }
    }

    studio.generate_image(service).await;
    if let Some(message) = studio.image_error() {
        bail!("{message}");
    }

    let out_dir = args.out.as_ref().unwrap_or(&settings.output_dir);
    outcome.image_path = studio
        .download_image(out_dir)
        .await
        .with_context(|| format!("saving image into {}", out_dir.display()))?;

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use std::{
        env, fs,
        sync::Mutex,
        time::{SystemTime, UNIX_EPOCH},
    };

    use async_trait::async_trait;

    use super::*;
    use crate::error::StudioError;
    use crate::models::{GenerateImageRequest, GeneratePromptRequest};

    #[derive(Default)]
    struct ScriptedService {
        image_requests: Mutex<Vec<GenerateImageRequest>>,
    }

    #[async_trait]
    impl GenerationService for ScriptedService {
        async fn generate_prompt(
            &self,
            request: &GeneratePromptRequest,
        ) -> Result<String, StudioError> {
            Ok(format!("A character. {}", request.custom_details))
        }

        async fn generate_image(
            &self,
            request: &GenerateImageRequest,
        ) -> Result<String, StudioError> {
            self.image_requests
                .lock()
                .expect("lock")
                .push(request.clone());
            Ok("aGVsbG8=".to_string())
        }
    }

    fn workspace(label: &str) -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let root = env::temp_dir().join(format!("prompt_studio_cli_{label}_{suffix}"));
        fs::create_dir_all(&root).expect("root");
        root
    }

    #[test]
    fn option_flags_split_on_first_equals() {
        assert_eq!(
            parse_option("Art Style = Anime/Manga").expect("parse"),
            ("Art Style".to_string(), "Anime/Manga".to_string())
        );
        assert!(parse_option("Art Style").is_err());
        assert!(parse_option("=Anime").is_err());
    }

    #[tokio::test]
    async fn full_session_writes_image_using_references() {
        let root = workspace("full");
        fs::write(root.join("hero.png"), b"main").expect("main");
        for name in ["a.png", "b.png", "c.png"] {
            fs::write(root.join(name), name.as_bytes()).expect("ref");
        }
        let copy_path = root.join("prompt.txt");

        let args = GenerateArgs {
            image: root.join("hero.png"),
            options: vec![("gender".into(), "android robot".into())],
            references: vec![root.join("a.png"), root.join("b.png"), root.join("c.png")],
            out: Some(root.join("out")),
            copy_to: Some(copy_path.clone()),
            ..GenerateArgs::default()
        };
        let service = ScriptedService::default();

        let outcome = run(&args, &Settings::default(), &service)
            .await
            .expect("session");

        assert_eq!(outcome.prompt, "A character. Gender: Android Robot");
        assert_eq!(fs::read_to_string(&copy_path).expect("copy"), outcome.prompt);
        let image_path = outcome.image_path.expect("image");
        assert_eq!(fs::read(image_path).expect("read"), b"hello");

        let requests = service.image_requests.lock().expect("lock");
        assert_eq!(requests[0].base_images.len(), 2);
        assert_eq!(requests[0].prompt, "A character. Gender: Android Robot");

        fs::remove_dir_all(root).expect("cleanup");
    }

    #[tokio::test]
    async fn prompt_only_skips_image_generation() {
        let root = workspace("prompt_only");
        fs::write(root.join("hero.jpg"), b"main").expect("main");

        let args = GenerateArgs {
            image: root.join("hero.jpg"),
            notes: Some("silver hair".into()),
            edit_prompt: Some("ignored".into()),
            prompt_only: true,
            ..GenerateArgs::default()
        };
        let service = ScriptedService::default();

        let outcome = run(&args, &Settings::default(), &service)
            .await
            .expect("session");

        assert_eq!(outcome.prompt, "A character.");
        assert!(outcome.image_path.is_none());
        assert!(service.image_requests.lock().expect("lock").is_empty());

        fs::remove_dir_all(root).expect("cleanup");
    }

    #[tokio::test]
    async fn edited_prompt_is_used_for_the_image() {
        let root = workspace("edit");
        fs::write(root.join("hero.png"), b"main").expect("main");

        let args = GenerateArgs {
            image: root.join("hero.png"),
            edit_prompt: Some("A character, in ink.".into()),
            out: Some(root.join("out")),
            ..GenerateArgs::default()
        };
        let service = ScriptedService::default();

        run(&args, &Settings::default(), &service)
            .await
            .expect("session");

        let requests = service.image_requests.lock().expect("lock");
        assert_eq!(requests[0].prompt, "A character, in ink.");
        assert_eq!(requests[0].base_images, vec!["bWFpbg==".to_string()]);

        fs::remove_dir_all(root).expect("cleanup");
    }

    #[tokio::test]
    async fn non_image_main_file_is_rejected() {
        let root = workspace("reject");
        fs::write(root.join("notes.txt"), b"text").expect("file");

        let args = GenerateArgs {
            image: root.join("notes.txt"),
            ..GenerateArgs::default()
        };

        let err = run(&args, &Settings::default(), &ScriptedService::default())
            .await
            .expect_err("rejected");
        assert_eq!(err.to_string(), "Please upload a valid image file (JPEG, PNG).");

        fs::remove_dir_all(root).expect("cleanup");
    }

    #[tokio::test]
    async fn unknown_option_aborts_before_any_request() {
        let root = workspace("bad_option");
        fs::write(root.join("hero.png"), b"main").expect("main");

        let args = GenerateArgs {
            image: root.join("hero.png"),
            options: vec![("Mood".into(), "Calm".into())],
            ..GenerateArgs::default()
        };
        let service = ScriptedService::default();

        let err = run(&args, &Settings::default(), &service)
            .await
            .expect_err("unknown category");
        assert_eq!(err.to_string(), "Unknown option category 'Mood'.");

        fs::remove_dir_all(root).expect("cleanup");
    }
}
