//! Frame orchestrator
//!
//! [`GallerySession::tick`] runs once per rendered frame:
//!
//! 1. apply content loads that completed since the last frame
//! 2. sample input into a snapshot plus edge-triggered events
//! 3. update the menu selection (hover or raycast) while the menu is open
//! 4. dispatch the events
//! 5. move the rig, unless the menu is open
//!
//! Content resolution runs on the tokio runtime; results come back over a
//! channel that is drained without blocking at the start of each tick.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::console::SharedConsole;
use crate::content::{catalog_or_empty, resolve_or_empty, ContentResolver, ImageRef};
use crate::events::{dispatch, InputCallbacks};
use crate::gallery::GalleryView;
use crate::input::{InputEvent, InputSampler, RawInput, SampleContext};
use crate::menu::{MenuOutcome, MenuState, MenuStateMachine};
use crate::navigation::{Motion, NavigationEngine, NavigationMode};
use crate::spatial::{Ray, YawPose};

enum LoadResult {
    Catalog(Vec<String>),
    Gallery {
        generation: u64,
        folder: String,
        images: Vec<ImageRef>,
    },
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub pose: YawPose,
    pub pitch: f32,
    pub motion: Motion,
    pub clutching: bool,
    pub events: Vec<InputEvent>,
    pub menu_state: MenuState,
    pub menu_outcomes: Vec<MenuOutcome>,
    pub selected: Option<usize>,
    pub gallery: Option<String>,
    pub current_image: Option<usize>,
    pub loading: Option<String>,
}

/// Owns every core component and wires them per frame
pub struct GallerySession {
    mode: NavigationMode,
    sampler: InputSampler,
    navigation: NavigationEngine,
    menu: MenuStateMachine,
    gallery: GalleryView,
    console: SharedConsole,
    controller_info_visible: bool,
    resolver: Arc<dyn ContentResolver>,
    loads_tx: mpsc::UnboundedSender<LoadResult>,
    loads_rx: mpsc::UnboundedReceiver<LoadResult>,
    generation: u64,
    loading: Option<String>,
    outcomes: Vec<MenuOutcome>,
    frame: u64,
}

impl GallerySession {
    pub fn new(config: &AppConfig, resolver: Arc<dyn ContentResolver>, console: SharedConsole) -> Self {
        let (loads_tx, loads_rx) = mpsc::unbounded_channel();
        Self {
            mode: config.navigation.mode,
            sampler: InputSampler::new(config.sampler_settings()),
            navigation: NavigationEngine::new(config.navigation_settings(), config.start_pose()),
            menu: MenuStateMachine::new(config.menu_settings()),
            gallery: GalleryView::new(),
            console,
            controller_info_visible: false,
            resolver,
            loads_tx,
            loads_rx,
            generation: 0,
            loading: None,
            outcomes: Vec::new(),
            frame: 0,
        }
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    /// Switch input paths; an active clutch does not survive the switch
    pub fn set_mode(&mut self, mode: NavigationMode) {
        if mode != self.mode {
            info!("🕹️ Navigation mode: {}", mode);
            self.navigation.cancel_clutch();
            self.mode = mode;
        }
    }

    /// Apply reloaded tuning without resetting position, menu or gallery
    ///
    /// `navigation.mode` is a startup default only; the running mode belongs
    /// to the host and is left alone.
    pub fn apply_config(&mut self, config: &AppConfig) {
        self.sampler.set_settings(config.sampler_settings());
        self.navigation.set_settings(config.navigation_settings());
        self.menu.set_settings(config.menu_settings());
    }

    pub fn navigation(&self) -> &NavigationEngine {
        &self.navigation
    }

    pub fn menu(&self) -> &MenuStateMachine {
        &self.menu
    }

    pub fn gallery(&self) -> &GalleryView {
        &self.gallery
    }

    pub fn console(&self) -> &SharedConsole {
        &self.console
    }

    pub fn controller_info_visible(&self) -> bool {
        self.controller_info_visible
    }

    /// Folder currently being resolved, if any
    pub fn loading(&self) -> Option<&str> {
        self.loading.as_deref()
    }

    /// Fetch the catalog in the background; the menu is rebuilt when it lands
    pub fn request_catalog(&mut self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime, catalog not loaded");
            return;
        };
        let resolver = Arc::clone(&self.resolver);
        let tx = self.loads_tx.clone();
        handle.spawn(async move {
            let galleries = catalog_or_empty(resolver.as_ref()).await;
            if tx.send(LoadResult::Catalog(galleries)).is_err() {
                debug!("Session dropped before catalog arrived");
            }
        });
    }

    /// Resolve a gallery in the background; the newest request wins
    pub fn request_gallery(&mut self, folder: impl Into<String>) {
        let folder = folder.into();
        self.menu.close();
        self.generation += 1;
        let generation = self.generation;
        self.loading = Some(folder.clone());
        info!("⏳ Loading gallery '{}'", folder);

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime, showing '{}' as empty", folder);
            self.finish_gallery(generation, folder, Vec::new());
            return;
        };
        let resolver = Arc::clone(&self.resolver);
        let tx = self.loads_tx.clone();
        handle.spawn(async move {
            let images = resolve_or_empty(resolver.as_ref(), &folder).await;
            if tx
                .send(LoadResult::Gallery {
                    generation,
                    folder,
                    images,
                })
                .is_err()
            {
                debug!("Session dropped before gallery arrived");
            }
        });
    }

    fn finish_gallery(&mut self, generation: u64, folder: String, images: Vec<ImageRef>) {
        if generation != self.generation {
            debug!("Dropping stale load of '{}'", folder);
            return;
        }
        self.loading = None;
        self.gallery.load(folder, images);
    }

    fn drain_loads(&mut self) {
        while let Ok(result) = self.loads_rx.try_recv() {
            match result {
                LoadResult::Catalog(galleries) => self.menu.set_catalog(galleries),
                LoadResult::Gallery {
                    generation,
                    folder,
                    images,
                } => self.finish_gallery(generation, folder, images),
            }
        }
    }

    fn update_selection(&mut self, raw: &RawInput, pointer: Option<Ray>) {
        match self.mode {
            NavigationMode::Desktop => self.menu.hover(raw.mouse.hover),
            NavigationMode::Xr => match pointer {
                Some(local) => {
                    let ray = self.navigation.pose().ray_to_world(&local);
                    self.menu.raycast(&ray);
                }
                None => self.menu.hover(None),
            },
        }
    }

    /// Run one frame
    pub fn tick(&mut self, dt: f32, raw: &RawInput) -> FrameReport {
        self.frame += 1;
        self.drain_loads();

        let ctx = SampleContext {
            menu_visible: self.menu.is_open(),
            console_visible: self.console.lock().is_visible(),
        };
        let sampled = self.sampler.sample(dt, raw, ctx);

        if self.menu.is_open() {
            self.update_selection(raw, sampled.snapshot.pointer);
        }

        for event in &sampled.events {
            dispatch(event, self);
        }

        // The menu and the rig never share a frame's movement input
        let motion = if self.menu.is_open() {
            Motion::default()
        } else {
            self.navigation.advance(dt, &sampled.snapshot, self.mode)
        };

        let state = self.navigation.state();
        FrameReport {
            frame: self.frame,
            pose: state.pose(),
            pitch: state.pitch,
            motion,
            clutching: state.is_clutching(),
            events: sampled.events,
            menu_state: self.menu.state(),
            menu_outcomes: std::mem::take(&mut self.outcomes),
            selected: self.menu.selected().map(|selected| selected.index),
            gallery: self.gallery.folder().map(str::to_string),
            current_image: self.gallery.current_index(),
            loading: self.loading.clone(),
        }
    }
}

impl InputCallbacks for GallerySession {
    fn on_menu_toggle(&mut self) {
        let outcome = self.menu.toggle(self.navigation.pose());
        if self.menu.is_open() {
            self.navigation.cancel_clutch();
        }
        self.outcomes.push(outcome);
    }

    fn on_next_image(&mut self) {
        if let Some(image) = self.gallery.next() {
            debug!("Next image: {}", image.file);
        }
    }

    fn on_prev_image(&mut self) {
        if let Some(image) = self.gallery.prev() {
            debug!("Previous image: {}", image.file);
        }
    }

    fn on_info_toggle(&mut self) {
        let visible = self.gallery.toggle_info();
        if visible {
            if let Some(text) = self.gallery.info_text() {
                info!("ℹ️ {}", text);
            }
        }
    }

    fn on_console_toggle(&mut self) {
        let visible = self.console.lock().toggle();
        debug!("Console visible: {}", visible);
    }

    fn on_controller_info_toggle(&mut self) {
        self.controller_info_visible = !self.controller_info_visible;
        debug!("Controller info visible: {}", self.controller_info_visible);
    }

    fn on_menu_item_select(&mut self) {
        let outcome = self.menu.select_current_item();
        if let MenuOutcome::LoadGallery(name) = &outcome {
            self.request_gallery(name.clone());
        }
        if outcome != MenuOutcome::None {
            self.outcomes.push(outcome);
        }
    }

    fn on_vr_menu_scroll(&mut self, amount: f32) {
        self.menu.scroll(amount);
    }

    fn on_console_scroll(&mut self, dx: f32, dy: f32) {
        self.console.lock().scroll(dx, dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MemoryResolver;
    use crate::input::{Key, KeySet};

    fn session() -> GallerySession {
        let resolver = MemoryResolver::new()
            .with_gallery("Zeta", ["z1.jpg", "z2.jpg", "z3.jpg"])
            .with_gallery("Alpha2", ["a.jpg"])
            .with_gallery("Alpha10", Vec::<String>::new());
        GallerySession::new(&AppConfig::default(), Arc::new(resolver), SharedConsole::new(50, 5))
    }

    fn keys(held: &[Key]) -> RawInput {
        RawInput {
            keys: held.iter().copied().collect::<KeySet>(),
            ..Default::default()
        }
    }

    /// Tick until background loads have landed
    async fn settle(session: &mut GallerySession) {
        for _ in 0..50 {
            tokio::task::yield_now().await;
            session.tick(0.016, &RawInput::default());
            if session.loading().is_none() && !session.menu().groups().is_empty() {
                return;
            }
        }
    }

    #[tokio::test]
    async fn test_menu_blocks_navigation() {
        let mut session = session();
        session.request_catalog();
        settle(&mut session).await;

        let report = session.tick(0.1, &keys(&[Key::M]));
        assert_eq!(report.menu_state, MenuState::LevelLetters);
        assert_eq!(report.motion, Motion::default());

        let report = session.tick(0.1, &keys(&[Key::W]));
        assert_eq!(report.motion, Motion::default());

        session.tick(0.1, &keys(&[Key::M]));
        let report = session.tick(0.1, &keys(&[Key::W]));
        assert_eq!(report.menu_state, MenuState::Closed);
        assert!(report.motion.position_delta.length() > 0.0);
    }

    #[tokio::test]
    async fn test_select_gallery_loads_once() {
        let mut session = session();
        session.request_catalog();
        settle(&mut session).await;

        session.tick(0.016, &keys(&[Key::M]));
        let pick = |index: usize, session: &mut GallerySession| {
            let mut raw = RawInput::default();
            raw.mouse.hover = Some(index);
            session.tick(0.016, &raw);
            raw.mouse.primary_down = true;
            session.tick(0.016, &raw)
        };

        let report = pick(1, &mut session);
        assert_eq!(report.menu_outcomes, vec![MenuOutcome::EnteredLetter('Z')]);
        let report = pick(1, &mut session);
        assert_eq!(report.menu_outcomes, vec![MenuOutcome::LoadGallery("Zeta".to_string())]);
        assert_eq!(report.menu_state, MenuState::Closed);
        assert_eq!(report.loading.as_deref(), Some("Zeta"));

        settle(&mut session).await;
        assert_eq!(session.gallery().folder(), Some("Zeta"));
        assert_eq!(session.gallery().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_gallery_is_empty() {
        let mut session = session();
        session.request_catalog();
        session.request_gallery("Nope");
        settle(&mut session).await;
        assert_eq!(session.gallery().folder(), Some("Nope"));
        assert!(session.gallery().is_empty());
    }

    #[tokio::test]
    async fn test_newest_request_wins() {
        let mut session = session();
        session.request_catalog();
        session.request_gallery("Zeta");
        session.request_gallery("Alpha2");
        settle(&mut session).await;
        assert_eq!(session.gallery().folder(), Some("Alpha2"));
    }

    #[tokio::test]
    async fn test_next_prev_and_overlays() {
        let mut session = session();
        session.request_catalog();
        session.request_gallery("Zeta");
        settle(&mut session).await;

        session.tick(0.016, &keys(&[Key::N]));
        session.tick(0.016, &keys(&[Key::N]));
        assert_eq!(session.gallery().current_index(), Some(1));
        session.tick(0.016, &keys(&[]));
        session.tick(0.016, &keys(&[Key::P]));
        session.tick(0.016, &keys(&[]));
        session.tick(0.016, &keys(&[Key::P]));
        assert_eq!(session.gallery().current_index(), Some(2));

        session.tick(0.016, &keys(&[Key::C, Key::H, Key::I]));
        assert!(session.console().lock().is_visible());
        assert!(session.controller_info_visible());
        assert!(session.gallery().info_visible());
    }

    #[test]
    fn test_reload_keeps_running_mode_and_clutch() {
        use crate::input::xr::BUTTON_SQUEEZE;
        use crate::input::{ButtonSample, ControllerSample, Handedness, XrFrame};
        use glam::Vec3;

        let mut session = session();
        session.set_mode(NavigationMode::Xr);

        let mut buttons = vec![ButtonSample::default(); 6];
        buttons[BUTTON_SQUEEZE].pressed = true;
        let raw = RawInput {
            xr: Some(XrFrame::new(vec![ControllerSample {
                handedness: Some(Handedness::Right),
                axes: vec![0.0; 4],
                buttons,
                grip_position: Vec3::new(0.2, 1.0, -0.3),
                target_ray: None,
            }])),
            ..Default::default()
        };
        assert!(session.tick(0.016, &raw).clutching);

        let mut reloaded = AppConfig::default();
        reloaded.navigation.move_speed = 5.0;
        session.apply_config(&reloaded);

        assert_eq!(session.mode(), NavigationMode::Xr);
        assert!(session.navigation().state().is_clutching());
        assert_eq!(session.navigation().settings().move_speed, 5.0);
    }

    #[test]
    fn test_tick_without_runtime() {
        let mut session = session();
        session.request_gallery("Zeta");
        let report = session.tick(0.016, &RawInput::default());
        assert_eq!(report.gallery.as_deref(), Some("Zeta"));
        assert_eq!(report.loading, None);
        assert_eq!(report.current_image, None);
    }
}
