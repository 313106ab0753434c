//! Player preferences
//!
//! Persisted in LocalStorage. Only preferences live here; session state
//! (score, rotation, phase) is never stored anywhere.

use serde::{Deserialize, Serialize};

/// Player preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Background music pad
    pub music: bool,
    /// Landing and game-over sound effects
    pub sound_effects: bool,
    /// Show FPS counter in the HUD
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music: true,
            sound_effects: true,
            show_fps: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "helix_drop_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
