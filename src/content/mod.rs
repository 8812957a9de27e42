//! Gallery content resolution
//!
//! A [`ContentResolver`] turns a gallery folder identifier into an ordered
//! list of images and lists the available galleries. Resolution is async and
//! never runs inside a frame; callers convert failures into an empty gallery
//! with [`resolve_or_empty`].

pub mod fs;
pub mod memory;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ContentError;

pub use fs::FsContentResolver;
pub use memory::MemoryResolver;

/// One image of a gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// File name as listed in the manifest
    pub file: String,
    /// Resolved location
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ImageRef {
    pub fn new(file: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            path: path.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Title for the info overlay: explicit title, else the file stem
    pub fn display_title(&self) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }
        Path::new(&self.file)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file.clone())
    }
}

/// Source of gallery catalogs and gallery contents
#[async_trait]
pub trait ContentResolver: Send + Sync {
    /// Gallery identifiers; order is not significant
    async fn catalog(&self) -> Result<Vec<String>, ContentError>;

    /// Ordered images of one gallery
    async fn resolve(&self, folder: &str) -> Result<Vec<ImageRef>, ContentError>;
}

/// Resolve a gallery, logging any failure and returning an empty list instead
pub async fn resolve_or_empty(resolver: &dyn ContentResolver, folder: &str) -> Vec<ImageRef> {
    match resolver.resolve(folder).await {
        Ok(images) => images,
        Err(e) => {
            warn!("Failed to load gallery '{}': {}", folder, e);
            Vec::new()
        }
    }
}

/// Load the catalog, logging any failure and returning an empty list instead
pub async fn catalog_or_empty(resolver: &dyn ContentResolver) -> Vec<String> {
    match resolver.catalog().await {
        Ok(galleries) => galleries,
        Err(e) => {
            warn!("Failed to load gallery catalog: {}", e);
            Vec::new()
        }
    }
}

/// Reject identifiers that could escape the content root
pub fn validate_folder(folder: &str) -> Result<&str, ContentError> {
    let trimmed = folder.trim();
    let escapes = trimmed.is_empty()
        || trimmed.contains(['/', '\\'])
        || trimmed == "."
        || trimmed == ".."
        || Path::new(trimmed).is_absolute();
    if escapes {
        return Err(ContentError::InvalidFolder(folder.to_string()));
    }
    Ok(trimmed)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<String>),
    Wrapped { galleries: Vec<String> },
}

/// Parse a catalog: a bare array of names or `{ "galleries": [...] }`
pub fn parse_catalog(text: &str, path: &Path) -> Result<Vec<String>, ContentError> {
    let parsed: CatalogFile = serde_json::from_str(text).map_err(|source| ContentError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match parsed {
        CatalogFile::List(galleries) | CatalogFile::Wrapped { galleries } => galleries,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ManifestEntry {
    Name(String),
    Detailed {
        file: String,
        #[serde(default)]
        title: Option<String>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ManifestFile {
    List(Vec<ManifestEntry>),
    Wrapped { images: Vec<ManifestEntry> },
}

/// Parse a gallery manifest into image refs rooted at `folder_dir`
///
/// Accepts an array of file names or `{ "images": [...] }` whose entries are
/// names or `{ "file", "title" }` objects. Entries that are empty or point
/// outside the folder are skipped.
pub fn parse_manifest(text: &str, manifest_path: &Path, folder_dir: &Path) -> Result<Vec<ImageRef>, ContentError> {
    let parsed: ManifestFile = serde_json::from_str(text).map_err(|source| ContentError::Parse {
        path: manifest_path.to_path_buf(),
        source,
    })?;
    let entries = match parsed {
        ManifestFile::List(entries) | ManifestFile::Wrapped { images: entries } => entries,
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| {
            let (file, title) = match entry {
                ManifestEntry::Name(file) => (file, None),
                ManifestEntry::Detailed { file, title } => (file, title),
            };
            if validate_folder(&file).is_err() {
                warn!("Skipping manifest entry '{}' in {}", file, manifest_path.display());
                return None;
            }
            let file = file.trim().to_string();
            let image = ImageRef::new(file.clone(), folder_dir.join(&file));
            Some(match title {
                Some(title) => image.with_title(title),
                None => image,
            })
        })
        .collect())
}
