use std::path::{Path, PathBuf};

use llmapi::utils::{current_timestamp_millis, decode_base64_to_bytes};
use tokio::fs;
use tokio::fs::try_exists;

use crate::constants::DOWNLOAD_IMAGE_EXTENSION;
use crate::error::StudioError;
use crate::models::ImageFile;
use crate::studio::Clipboard;

pub async fn read_image_file(path: &Path) -> Result<ImageFile, StudioError> {
    let bytes = fs::read(path)
        .await
        .map_err(|err| StudioError::io(path, err))?;

    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_string();

    Ok(ImageFile::new(name, resolve_mime_type(path), bytes))
}

/// Guesses from the extension; anything unrecognised is reported as
/// `application/octet-stream` so it fails the image check.
pub fn resolve_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}

pub async fn ensure_output_dir(dir: &Path) -> Result<PathBuf, StudioError> {
    if !try_exists(dir)
        .await
        .map_err(|err| StudioError::io(dir, err))?
    {
        fs::create_dir_all(dir)
            .await
            .map_err(|err| StudioError::io(dir, err))?;
    }
    Ok(dir.to_path_buf())
}

pub async fn ensure_unique_file_name(dir: &Path, original: &str) -> Result<String, StudioError> {
    if !try_exists(dir.join(original))
        .await
        .map_err(|err| StudioError::io(dir.join(original), err))?
    {
        return Ok(original.to_string());
    }

    let original_path = Path::new(original);
    let stem = original_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("image");
    let extension = original_path.extension().and_then(|ext| ext.to_str());

    let mut counter = 1;
    loop {
        let candidate = match extension {
            Some(ext) => format!("{stem}-{counter}.{ext}"),
            None => format!("{stem}-{counter}"),
        };

        if !try_exists(dir.join(&candidate))
            .await
            .map_err(|err| StudioError::io(dir.join(&candidate), err))?
        {
            return Ok(candidate);
        }

        counter += 1;
    }
}

/// Decodes a generated image and writes it as `generated-image-{millis}.png`.
pub async fn write_generated_image(dir: &Path, data_b64: &str) -> Result<PathBuf, StudioError> {
    let bytes =
        decode_base64_to_bytes(data_b64).map_err(|err| StudioError::Decode(format!("{err:#}")))?;

    let output_dir = ensure_output_dir(dir).await?;
    let base_name = format!(
        "generated-image-{}.{}",
        current_timestamp_millis(),
        DOWNLOAD_IMAGE_EXTENSION
    );
    let unique_name = ensure_unique_file_name(&output_dir, &base_name).await?;
    let target_path = output_dir.join(unique_name);

    fs::write(&target_path, &bytes)
        .await
        .map_err(|err| StudioError::io(&target_path, err))?;

    Ok(target_path)
}

/// Clipboard stand-in for headless use: the copied text lands in a file.
#[derive(Debug, Clone)]
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Clipboard for FileClipboard {
    fn write_text(&mut self, text: &str) -> std::io::Result<()> {
        std::fs::write(&self.path, text)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn temp_root(label: &str) -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        env::temp_dir().join(format!("prompt_studio_{label}_{suffix}"))
    }

    #[test]
    fn mime_requires_a_known_image_extension() {
        assert_eq!(resolve_mime_type(Path::new("hero.png")), "image/png");
        assert_eq!(resolve_mime_type(Path::new("hero.JPG")), "image/jpeg");
        assert!(!resolve_mime_type(Path::new("notes.txt")).starts_with("image/"));
        assert!(!resolve_mime_type(Path::new("hero")).starts_with("image/"));
    }

    #[tokio::test]
    async fn unique_names_get_numeric_suffixes() {
        let root = temp_root("unique");
        std::fs::create_dir_all(&root).expect("root");
        std::fs::write(root.join("out.png"), b"x").expect("seed");
        std::fs::write(root.join("out-1.png"), b"x").expect("seed");

        let name = ensure_unique_file_name(&root, "out.png").await.expect("name");
        assert_eq!(name, "out-2.png");

        std::fs::remove_dir_all(root).expect("cleanup");
    }

    #[tokio::test]
    async fn generated_image_is_decoded_into_a_new_directory() {
        let root = temp_root("download").join("nested");

        let path = write_generated_image(&root, "aGVsbG8=").await.expect("write");

        assert!(path.starts_with(&root));
        let name = path.file_name().and_then(|n| n.to_str()).expect("name");
        assert!(name.starts_with("generated-image-"));
        assert!(name.ends_with(".png"));
        assert_eq!(std::fs::read(&path).expect("read"), b"hello");

        std::fs::remove_dir_all(root.parent().expect("parent")).expect("cleanup");
    }

    #[tokio::test]
    async fn undecodable_image_is_not_written() {
        let root = temp_root("bad_download");

        let err = write_generated_image(&root, "%%%").await.expect_err("decode");
        assert!(matches!(err, StudioError::Decode(_)));
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn reading_a_file_guesses_its_mime_type() {
        let root = temp_root("read");
        std::fs::create_dir_all(&root).expect("root");
        let path = root.join("portrait.webp");
        std::fs::write(&path, [1u8, 2, 3]).expect("seed");

        let file = read_image_file(&path).await.expect("read");
        assert_eq!(file.name, "portrait.webp");
        assert_eq!(file.mime_type, "image/webp");
        assert_eq!(file.bytes, vec![1, 2, 3]);
        assert!(file.is_image());

        std::fs::remove_dir_all(root).expect("cleanup");
    }
}
