//! The active gallery: paintings on a circle around the origin

use std::f32::consts::TAU;

use glam::Vec3;
use tracing::info;

use crate::content::ImageRef;
use crate::spatial::YawPose;

/// Where one painting hangs
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub index: usize,
    pub pose: YawPose,
}

/// Loaded gallery with the currently focused painting
#[derive(Debug, Clone, Default)]
pub struct GalleryView {
    folder: Option<String>,
    images: Vec<ImageRef>,
    current: usize,
    info_visible: bool,
}

impl GalleryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents; focus returns to the first painting
    pub fn load(&mut self, folder: impl Into<String>, images: Vec<ImageRef>) {
        let folder = folder.into();
        if images.is_empty() {
            info!("🖼️ Gallery '{}' is empty", folder);
        } else {
            info!("🖼️ Gallery '{}' loaded ({} images)", folder, images.len());
        }
        self.folder = Some(folder);
        self.images = images;
        self.current = 0;
    }

    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        (!self.images.is_empty()).then_some(self.current)
    }

    pub fn current(&self) -> Option<&ImageRef> {
        self.images.get(self.current)
    }

    /// Focus the next painting, wrapping to the first
    pub fn next(&mut self) -> Option<&ImageRef> {
        if self.images.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.images.len();
        self.current()
    }

    /// Focus the previous painting, wrapping to the last
    pub fn prev(&mut self) -> Option<&ImageRef> {
        if self.images.is_empty() {
            return None;
        }
        self.current = if self.current == 0 {
            self.images.len() - 1
        } else {
            self.current - 1
        };
        self.current()
    }

    pub fn info_visible(&self) -> bool {
        self.info_visible
    }

    pub fn toggle_info(&mut self) -> bool {
        self.info_visible = !self.info_visible;
        self.info_visible
    }

    /// Info overlay text for the focused painting
    pub fn info_text(&self) -> Option<String> {
        let image = self.current()?;
        Some(format!(
            "{} ({}/{})",
            image.display_title(),
            self.current + 1,
            self.images.len()
        ))
    }

    /// Circle layout: painting `i` of `n` at angle `2πi/n`, facing the centre
    pub fn placements(&self, radius: f32, height: f32) -> Vec<Placement> {
        let n = self.images.len();
        (0..n)
            .map(|index| {
                let theta = TAU * index as f32 / n as f32;
                let position = Vec3::new(radius * theta.sin(), height, -radius * theta.cos());
                Placement {
                    index,
                    pose: YawPose::new(position, -theta),
                }
            })
            .collect()
    }
}
