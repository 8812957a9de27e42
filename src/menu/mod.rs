//! Two-level gallery menu
//!
//! Letters first, then the galleries under one letter. The same state
//! machine backs the flat (pointer hover) and spatial (raycast) panels: both
//! resolve to a [`SelectedItem`] consumed by
//! [`MenuStateMachine::select_current_item`].

pub mod catalog;
pub mod scroll;

use glam::{Mat4, Vec3};
use tracing::{debug, info};

use crate::spatial::{ray_hits_box, Ray, YawPose};

pub use catalog::{group_galleries, natural_cmp, LetterGroups};
pub use scroll::ScrollState;

/// Which level the menu shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    LevelLetters,
    LevelGalleries(char),
}

/// One entry of the active level
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuNode {
    Letter { letter: char, galleries: Vec<String> },
    GalleryLeaf(String),
    BackLink,
}

impl MenuNode {
    pub fn label(&self) -> String {
        match self {
            MenuNode::Letter { letter, galleries } => format!("{} ({})", letter, galleries.len()),
            MenuNode::GalleryLeaf(name) => name.clone(),
            MenuNode::BackLink => "< Back".to_string(),
        }
    }
}

/// A rendered menu entry
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub node: MenuNode,
    /// Vertical centre on the panel before scrolling
    pub center_y: f32,
    pub highlighted: bool,
}

/// Selection shared by the hover and raycast paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedItem {
    pub index: usize,
    pub node: MenuNode,
}

/// Result of a menu operation the caller may need to act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    None,
    Opened,
    Closed,
    EnteredLetter(char),
    Back,
    /// A gallery leaf was chosen; the menu has closed
    LoadGallery(String),
}

/// Panel geometry and scroll tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuSettings {
    pub item_height: f32,
    pub item_width: f32,
    pub viewport_height: f32,
    /// Distance in front of the player when the panel opens
    pub panel_distance: f32,
    /// Panel centre height above the rig origin
    pub panel_height: f32,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            item_height: 0.12,
            item_width: 0.8,
            viewport_height: 0.96,
            panel_distance: 1.5,
            panel_height: 1.4,
        }
    }
}

/// Depth of an item's hit box
const ITEM_DEPTH: f32 = 0.02;
/// Fraction of the row height covered by an item's hit box
const ITEM_FILL: f32 = 0.9;

/// The menu state machine
#[derive(Debug, Clone)]
pub struct MenuStateMachine {
    settings: MenuSettings,
    groups: LetterGroups,
    state: MenuState,
    items: Vec<MenuItem>,
    selected: Option<SelectedItem>,
    scroll: ScrollState,
    panel: YawPose,
}

impl MenuStateMachine {
    pub fn new(settings: MenuSettings) -> Self {
        Self {
            settings,
            groups: LetterGroups::new(),
            state: MenuState::Closed,
            items: Vec::new(),
            selected: None,
            scroll: ScrollState::new(),
            panel: YawPose::default(),
        }
    }

    pub fn settings(&self) -> &MenuSettings {
        &self.settings
    }

    /// Change geometry; an open level is rebuilt
    pub fn set_settings(&mut self, settings: MenuSettings) {
        self.settings = settings;
        if self.is_open() {
            self.rebuild();
        }
    }

    /// Replace the gallery catalog; an open menu returns to the letters level
    pub fn set_catalog<I, S>(&mut self, galleries: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.groups = group_galleries(galleries);
        info!(
            "📚 Catalog: {} galleries under {} letters",
            self.groups.values().map(Vec::len).sum::<usize>(),
            self.groups.len()
        );
        if self.is_open() {
            self.enter(MenuState::LevelLetters);
        }
    }

    pub fn groups(&self) -> &LetterGroups {
        &self.groups
    }

    pub fn letters(&self) -> Vec<char> {
        self.groups.keys().copied().collect()
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != MenuState::Closed
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn selected(&self) -> Option<&SelectedItem> {
        self.selected.as_ref()
    }

    pub fn scroll_state(&self) -> &ScrollState {
        &self.scroll
    }

    /// World pose of the 3D panel (meaningful while open)
    pub fn panel(&self) -> YawPose {
        self.panel
    }

    /// Open at the letters level in front of `player`, or close if open
    pub fn toggle(&mut self, player: YawPose) -> MenuOutcome {
        if self.is_open() {
            self.close();
            MenuOutcome::Closed
        } else {
            self.open(player);
            MenuOutcome::Opened
        }
    }

    pub fn open(&mut self, player: YawPose) {
        self.panel = YawPose::new(
            player.position + player.forward() * self.settings.panel_distance + Vec3::Y * self.settings.panel_height,
            player.yaw,
        );
        self.enter(MenuState::LevelLetters);
        info!("📖 Menu opened ({} letters)", self.groups.len());
    }

    pub fn close(&mut self) {
        if self.is_open() {
            info!("📕 Menu closed");
        }
        self.state = MenuState::Closed;
        self.items.clear();
        self.selected = None;
        self.scroll = ScrollState::new();
    }

    /// Panel-space height of item `index` after scrolling
    pub fn item_y(&self, index: usize) -> Option<f32> {
        self.items.get(index).map(|item| item.center_y + self.scroll.offset())
    }

    /// Whether item `index` lies inside the viewport
    pub fn is_visible(&self, index: usize) -> bool {
        self.item_y(index)
            .is_some_and(|y| y.abs() <= self.settings.viewport_height / 2.0 + f32::EPSILON)
    }

    /// Indices of items inside the viewport
    pub fn visible_indices(&self) -> Vec<usize> {
        (0..self.items.len()).filter(|i| self.is_visible(*i)).collect()
    }

    /// World transform of a visible item's hit box
    pub fn item_transform(&self, index: usize) -> Option<Mat4> {
        if !self.is_visible(index) {
            return None;
        }
        let y = self.item_y(index)?;
        Some(self.panel.matrix() * Mat4::from_translation(Vec3::new(0.0, y, 0.0)))
    }

    /// Flat-panel pointer hover; `None` or a hidden item clears the selection
    pub fn hover(&mut self, index: Option<usize>) {
        self.clear_highlights();
        match index.filter(|i| self.is_visible(*i)) {
            Some(i) => self.select_index(i),
            None => self.selected = None,
        }
    }

    /// Spatial selection: nearest item hit by `ray` (world space) wins
    ///
    /// Runs every frame; a miss clears the selection.
    pub fn raycast(&mut self, ray: &Ray) -> Option<usize> {
        self.clear_highlights();
        let size = Vec3::new(
            self.settings.item_width,
            self.settings.item_height * ITEM_FILL,
            ITEM_DEPTH,
        );

        let nearest = self
            .visible_indices()
            .into_iter()
            .filter_map(|i| {
                let transform = self.item_transform(i)?;
                ray_hits_box(ray, transform, size).map(|t| (i, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i);

        match nearest {
            Some(i) => self.select_index(i),
            None => self.selected = None,
        }
        nearest
    }

    /// Act on the current selection
    pub fn select_current_item(&mut self) -> MenuOutcome {
        if !self.is_open() {
            return MenuOutcome::None;
        }
        let Some(selected) = self.selected.take() else {
            return MenuOutcome::None;
        };

        match selected.node {
            MenuNode::Letter { letter, .. } => {
                debug!("Entering letter {}", letter);
                self.enter(MenuState::LevelGalleries(letter));
                MenuOutcome::EnteredLetter(letter)
            }
            MenuNode::BackLink => {
                self.enter(MenuState::LevelLetters);
                MenuOutcome::Back
            }
            MenuNode::GalleryLeaf(name) => {
                info!("🖼️ Gallery selected: {}", name);
                self.close();
                MenuOutcome::LoadGallery(name)
            }
        }
    }

    /// Scroll the active level; a selection scrolled out of view is dropped
    pub fn scroll(&mut self, delta: f32) -> f32 {
        if !self.is_open() {
            return 0.0;
        }
        let moved = self.scroll.scroll(delta);
        let hidden = self
            .selected
            .as_ref()
            .map(|selected| selected.index)
            .filter(|index| !self.is_visible(*index));
        if let Some(index) = hidden {
            self.selected = None;
            if let Some(item) = self.items.get_mut(index) {
                item.highlighted = false;
            }
        }
        moved
    }

    fn select_index(&mut self, index: usize) {
        if let Some(item) = self.items.get_mut(index) {
            item.highlighted = true;
            self.selected = Some(SelectedItem {
                index,
                node: item.node.clone(),
            });
        }
    }

    fn clear_highlights(&mut self) {
        for item in &mut self.items {
            item.highlighted = false;
        }
    }

    fn enter(&mut self, state: MenuState) {
        self.state = state;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let nodes: Vec<MenuNode> = match self.state {
            MenuState::Closed => Vec::new(),
            MenuState::LevelLetters => self
                .groups
                .iter()
                .map(|(letter, galleries)| MenuNode::Letter {
                    letter: *letter,
                    galleries: galleries.clone(),
                })
                .collect(),
            MenuState::LevelGalleries(letter) => std::iter::once(MenuNode::BackLink)
                .chain(
                    self.groups
                        .get(&letter)
                        .into_iter()
                        .flatten()
                        .map(|name| MenuNode::GalleryLeaf(name.clone())),
                )
                .collect(),
        };

        let item_height = self.settings.item_height;
        let top = nodes.len() as f32 * item_height / 2.0;
        self.items = nodes
            .into_iter()
            .enumerate()
            .map(|(i, node)| MenuItem {
                node,
                center_y: top - item_height * (i as f32 + 0.5),
                highlighted: false,
            })
            .collect();
        self.selected = None;
        self.scroll
            .rebuild(self.items.len(), item_height, self.settings.viewport_height);
    }
}

impl Default for MenuStateMachine {
    fn default() -> Self {
        Self::new(MenuSettings::default())
    }
}
