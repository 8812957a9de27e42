//! XR Gallery - navigation and menu core for a circular image gallery
//!
//! The crate is frame driven: a host samples raw desktop and XR controller
//! input every frame and hands it to [`session::GallerySession::tick`],
//! which turns it into rig motion, menu transitions and gallery changes.
//! Rendering is left to the host; everything here is plain state plus
//! [`glam`] transforms.

pub mod cli;
pub mod config;
pub mod console;
pub mod content;
pub mod error;
pub mod events;
pub mod gallery;
pub mod input;
pub mod menu;
pub mod navigation;
pub mod session;
pub mod spatial;

pub use config::AppConfig;
pub use console::{ConsoleLayer, SharedConsole};
pub use content::{ContentResolver, FsContentResolver, ImageRef, MemoryResolver};
pub use error::{ConfigError, ContentError};
pub use gallery::GalleryView;
pub use input::{InputEvent, RawInput};
pub use menu::{MenuOutcome, MenuState, MenuStateMachine};
pub use navigation::{NavigationEngine, NavigationMode};
pub use session::{FrameReport, GallerySession};
