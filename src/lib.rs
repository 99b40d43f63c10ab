#![forbid(unsafe_code)]

pub mod catalog;
pub mod choreography;
pub mod controller;
pub mod core;
pub mod dsl;
pub mod ease;
pub mod error;
pub mod exhibits;
pub mod panels;
pub mod playback;
pub mod scene;
pub mod storyboard;
pub mod timeline;
pub mod transition;

pub use catalog::{Catalog, ExhibitMeta};
pub use controller::{ExhibitController, SceneController, SceneHost};
pub use self::core::{AccentColors, Millis, Vec3};
pub use ease::Ease;
pub use error::{ExhibitError, ExhibitResult};
pub use exhibits::Registry;
pub use playback::{EngineRequest, InputFocus, Key, PlaybackEngine};
pub use scene::{SceneGraph, SceneSnapshot};
pub use storyboard::{ActionTag, Storyboard, StoryboardStep};
pub use timeline::Timeline;
