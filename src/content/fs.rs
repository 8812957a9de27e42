//! Filesystem-backed content
//!
//! Layout under the content root:
//!
//! ```text
//! <root>/galleries.json          catalog (optional, see below)
//! <root>/<folder>/manifest.json  ordered image list
//! <root>/<folder>/*.jpg          images
//! ```
//!
//! Without a catalog file every subdirectory of the root is a gallery.
//! Without a manifest every image file in the folder is listed in natural
//! order.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::{parse_catalog, parse_manifest, validate_folder, ContentResolver, ImageRef};
use crate::error::ContentError;
use crate::menu::natural_cmp;

const MANIFEST_FILE: &str = "manifest.json";
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Resolver reading catalogs and manifests from disk
#[derive(Debug, Clone)]
pub struct FsContentResolver {
    root: PathBuf,
    catalog: Option<PathBuf>,
}

impl FsContentResolver {
    pub fn new(root: impl Into<PathBuf>, catalog: Option<PathBuf>) -> Self {
        Self {
            root: root.into(),
            catalog,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn list_dir(&self, dir: &Path) -> Result<Vec<(String, bool)>, ContentError> {
        let io_err = |source| ContentError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut entries = fs::read_dir(dir).await.map_err(io_err)?;
        let mut out = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let is_dir = entry.file_type().await.map_err(io_err)?.is_dir();
            out.push((entry.file_name().to_string_lossy().into_owned(), is_dir));
        }
        Ok(out)
    }
}

fn is_image(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

#[async_trait]
impl ContentResolver for FsContentResolver {
    async fn catalog(&self) -> Result<Vec<String>, ContentError> {
        if let Some(path) = &self.catalog {
            let text = fs::read_to_string(path).await.map_err(|source| ContentError::Io {
                path: path.clone(),
                source,
            })?;
            return parse_catalog(&text, path);
        }

        let galleries: Vec<String> = self
            .list_dir(&self.root)
            .await?
            .into_iter()
            .filter(|(name, is_dir)| *is_dir && !name.starts_with('.'))
            .map(|(name, _)| name)
            .collect();
        debug!("Found {} gallery folders in {}", galleries.len(), self.root.display());
        Ok(galleries)
    }

    async fn resolve(&self, folder: &str) -> Result<Vec<ImageRef>, ContentError> {
        let folder = validate_folder(folder)?;
        let dir = self.root.join(folder);
        if !fs::try_exists(&dir).await.unwrap_or(false) {
            return Err(ContentError::NotFound(folder.to_string()));
        }

        let manifest = dir.join(MANIFEST_FILE);
        match fs::read_to_string(&manifest).await {
            Ok(text) => parse_manifest(&text, &manifest, &dir),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No manifest in {}, listing images", dir.display());
                let mut files: Vec<String> = self
                    .list_dir(&dir)
                    .await?
                    .into_iter()
                    .filter(|(name, is_dir)| !*is_dir && is_image(name))
                    .map(|(name, _)| name)
                    .collect();
                files.sort_by(|a, b| natural_cmp(a, b));
                Ok(files
                    .into_iter()
                    .map(|file| {
                        let path = dir.join(&file);
                        ImageRef::new(file, path)
                    })
                    .collect())
            }
            Err(source) => Err(ContentError::Io {
                path: manifest,
                source,
            }),
        }
    }
}
