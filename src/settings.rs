//! Game settings and preferences
//!
//! Persisted separately from game saves in LocalStorage. These are the
//! user-facing knobs the shell UI exposes; the simulation itself only
//! reads [`Tuning`](crate::Tuning).

use serde::{Deserialize, Serialize};

/// Camera follow mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CameraMode {
    #[default]
    ThirdPerson,
    FirstPerson,
}

impl CameraMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraMode::ThirdPerson => "third-person",
            CameraMode::FirstPerson => "first-person",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "third-person" | "third" => Some(CameraMode::ThirdPerson),
            "first-person" | "first" => Some(CameraMode::FirstPerson),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            CameraMode::ThirdPerson => CameraMode::FirstPerson,
            CameraMode::FirstPerson => CameraMode::ThirdPerson,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Camera follow mode
    pub camera_mode: CameraMode,
    /// Virtual joystick on touch devices
    pub joystick_enabled: bool,

    // === HUD ===
    /// Number labels over the parade floats
    pub show_float_labels: bool,
    /// Show FPS counter
    pub show_fps: bool,

    // === Visual effects ===
    /// Win-screen confetti
    pub confetti: bool,
    /// Heavier post-processing chain
    pub advanced_post: bool,
    /// HDRI sky
    pub hdri: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (minimize shakes and flashes)
    pub reduced_motion: bool,
    /// High contrast mode
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            camera_mode: CameraMode::ThirdPerson,
            joystick_enabled: true,

            // HUD
            show_float_labels: true,
            show_fps: false,

            // Visual effects - the cheap ones on by default
            confetti: true,
            advanced_post: false,
            hdri: false,

            // Audio
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            mute_on_blur: true,

            // Accessibility
            reduced_motion: false,
            high_contrast: false,
        }
    }
}

impl Settings {
    /// Effective confetti toggle (respects reduced_motion)
    pub fn effective_confetti(&self) -> bool {
        self.confetti && !self.reduced_motion
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "parade_catch_settings";

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_mode_round_trip() {
        assert_eq!(CameraMode::from_str("third-person"), Some(CameraMode::ThirdPerson));
        assert_eq!(CameraMode::from_str("FIRST"), Some(CameraMode::FirstPerson));
        assert_eq!(CameraMode::from_str("drone"), None);
        assert_eq!(CameraMode::ThirdPerson.toggled(), CameraMode::FirstPerson);
        assert_eq!(CameraMode::ThirdPerson.toggled().toggled(), CameraMode::ThirdPerson);
    }

    #[test]
    fn test_reduced_motion_gates_confetti() {
        let mut s = Settings::default();
        assert!(s.effective_confetti());
        s.reduced_motion = true;
        assert!(!s.effective_confetti());
    }

    #[test]
    fn test_settings_serialize_round_trip() {
        let mut s = Settings::default();
        s.camera_mode = CameraMode::FirstPerson;
        s.master_volume = 0.25;
        let json = serde_json::to_string(&s).expect("serialize");
        let back: Settings = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.camera_mode, CameraMode::FirstPerson);
        assert_eq!(back.master_volume, 0.25);
    }
}
