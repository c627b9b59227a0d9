use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::model::ImageFolder;

/// URL prefix under which the image root is served.
pub const IMAGE_URL_PREFIX: &str = "/StoredImages";

/// Writes uploaded images below a root directory, one folder per entity type.
///
/// Files are never removed: replacing an entity's image or deleting the
/// entity leaves the previous file on disk.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stores `bytes` as `<root>/<folder>/<uuid>_<name>` and returns the
    /// servable path `/StoredImages/<folder>/<uuid>_<name>`.
    pub async fn save(&self, folder: ImageFolder, original_name: &str, bytes: &[u8]) -> Result<String> {
        let dir = self.root.join(folder.as_str());
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create image folder {}", dir.display()))?;

        let file_name = unique_file_name(original_name);
        let path = dir.join(&file_name);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write image {}", path.display()))?;

        log::info!("Stored {} byte image at {}", bytes.len(), path.display());
        Ok(format!("{IMAGE_URL_PREFIX}/{folder}/{file_name}"))
    }
}

/// Prefixes a random v4 UUID to the last path component of the client's file name.
fn unique_file_name(original_name: &str) -> String {
    let base = original_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or("image");
    format!("{}_{}", uuid::Uuid::new_v4(), base)
}
