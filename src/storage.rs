use std::path::PathBuf;
use uuid::Uuid;

use crate::validation::UploadedFile;

/// URL prefix under which the storage directory is served.
pub const PUBLIC_PREFIX: &str = "/storage";

/// Writes uploaded images below the configured storage root.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Save `file` under `<root>/<dir>/` with a generated name and return its
    /// servable path, e.g. `/storage/profiles/<uuid>.png`.
    pub async fn store(&self, dir: &str, file: &UploadedFile) -> std::io::Result<String> {
        let target_dir = self.root.join(dir);
        tokio::fs::create_dir_all(&target_dir).await?;

        let file_name = format!("{}.{}", Uuid::new_v4(), extension_for(file));
        tokio::fs::write(target_dir.join(&file_name), &file.bytes).await?;

        tracing::info!(dir, file = %file_name, bytes = file.bytes.len(), "stored upload");
        Ok(format!("{PUBLIC_PREFIX}/{dir}/{file_name}"))
    }
}

fn extension_for(file: &UploadedFile) -> String {
    let from_name = file
        .file_name
        .as_deref()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    from_name.unwrap_or_else(|| {
        match file.content_type.as_deref() {
            Some("image/png") => "png",
            Some("image/gif") => "gif",
            Some("image/webp") => "webp",
            Some("image/svg+xml") => "svg",
            Some("image/bmp") => "bmp",
            _ => "jpg",
        }
        .to_string()
    })
}
