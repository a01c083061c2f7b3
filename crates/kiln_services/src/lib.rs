//! Kiln Services Layer
//!
//! Host-side concerns kept out of the core: settings files and their
//! validation.

pub mod settings;

pub use settings::{SceneSettings, SettingsError};
