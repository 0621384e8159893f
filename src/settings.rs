//! Game settings and preferences
//!
//! Persisted separately from high scores, as one JSON blob in the key-value
//! store. Nothing here affects the simulation.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore};

/// When to show the on-screen touch buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TouchControls {
    /// Only on touch devices
    #[default]
    Auto,
    Always,
    Never,
}

impl TouchControls {
    pub fn as_str(&self) -> &'static str {
        match self {
            TouchControls::Auto => "Auto",
            TouchControls::Always => "Always",
            TouchControls::Never => "Never",
        }
    }

    /// Next option, for a cycling toggle button
    pub fn next(&self) -> Self {
        match self {
            TouchControls::Auto => TouchControls::Always,
            TouchControls::Always => TouchControls::Never,
            TouchControls::Never => TouchControls::Auto,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    pub touch_controls: TouchControls,

    // === Accessibility ===
    /// Reduced motion (no idle bobbing)
    pub reduced_motion: bool,
    /// High contrast palette
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_fps: false,
            touch_controls: TouchControls::Auto,
            reduced_motion: false,
            high_contrast: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "pixel_arcade_settings";

    /// Whether touch buttons should be visible on this device
    pub fn touch_enabled(&self, is_touch_device: bool) -> bool {
        match self.touch_controls {
            TouchControls::Auto => is_touch_device,
            TouchControls::Always => true,
            TouchControls::Never => false,
        }
    }

    /// Cosmetic sprite animation (respects reduced_motion)
    pub fn animate_sprites(&self) -> bool {
        !self.reduced_motion
    }

    /// Load settings, falling back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        match persistence::load_json(store, Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        match persistence::save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}
