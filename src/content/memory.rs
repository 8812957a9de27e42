//! In-memory content, for demos and tests

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;

use super::{validate_folder, ContentResolver, ImageRef};
use crate::error::ContentError;

/// Resolver serving galleries from a map
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    galleries: BTreeMap<String, Vec<ImageRef>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a gallery whose images are `<folder>/<file>`
    pub fn with_gallery<I, S>(mut self, folder: &str, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let images = files
            .into_iter()
            .map(|file| {
                let file = file.into();
                let path = PathBuf::from(folder).join(&file);
                ImageRef::new(file, path)
            })
            .collect();
        self.galleries.insert(folder.to_string(), images);
        self
    }
}

#[async_trait]
impl ContentResolver for MemoryResolver {
    async fn catalog(&self) -> Result<Vec<String>, ContentError> {
        Ok(self.galleries.keys().cloned().collect())
    }

    async fn resolve(&self, folder: &str) -> Result<Vec<ImageRef>, ContentError> {
        let folder = validate_folder(folder)?;
        self.galleries
            .get(folder)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(folder.to_string()))
    }
}
