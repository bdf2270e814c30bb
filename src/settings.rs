//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web and in a JSON file natively. Scores
//! are never stored here.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Start muted
    pub muted: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Skip the success flash
    pub reduced_motion: bool,

    // === Gameplay ===
    /// Fixed run seed (random when absent)
    pub seed: Option<u64>,
    /// Game balance overrides
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            mute_on_blur: true,

            reduced_motion: false,

            seed: None,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Parse settings JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let mut settings: Settings =
            serde_json::from_str(json).context("settings are not valid JSON")?;
        settings.tuning.validate().context("invalid tuning in settings")?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize settings")
    }

    /// Effective success flash (respects reduced_motion)
    pub fn effective_success_flash(&self) -> bool {
        !self.reduced_motion
    }

    /// Seed to start a run with: the configured one, or `fallback`
    pub fn run_seed(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "stick_bridge_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e:#}"),
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
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(e) => log::warn!("Settings not saved: {e:#}"),
            }
        }
    }

    /// Settings file location (`STICK_BRIDGE_SETTINGS` or the working directory)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn path() -> std::path::PathBuf {
        std::env::var_os("STICK_BRIDGE_SETTINGS")
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|| std::path::PathBuf::from("stick_bridge_settings.json"))
    }

    /// Read settings from a file; a missing file means defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let settings =
            Self::from_json(&json).with_context(|| format!("in {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from [`Settings::path`], falling back to defaults on any problem
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(&Self::path()).unwrap_or_else(|e| {
            log::warn!("Using default settings: {e:#}");
            Self::default()
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        let path = Self::path();
        match self.save_to(&path) {
            Ok(()) => log::info!("Settings saved to {}", path.display()),
            Err(e) => log::warn!("Settings not saved: {e:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn test_volumes_clamped() {
        let settings = Settings::from_json(r#"{ "master_volume": 3.0, "sfx_volume": -1 }"#).unwrap();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
    }

    #[test]
    fn test_bad_tuning_rejected() {
        let err = Settings::from_json(r#"{ "tuning": { "walk_speed": -1 } }"#).unwrap_err();
        assert!(format!("{err:#}").contains("walk_speed"));
    }

    #[test]
    fn test_seed_override() {
        let settings = Settings::from_json(r#"{ "seed": 42 }"#).unwrap();
        assert_eq!(settings.run_seed(7), 42);
        assert_eq!(Settings::default().run_seed(7), 7);
    }

    #[test]
    fn test_json_round_trip_keeps_tuning() {
        let mut settings = Settings::default();
        settings.tuning.grow_rate = 0.3;
        settings.muted = true;
        let back = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(back, settings);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_load_and_save() {
        let dir = std::env::temp_dir().join(format!("stick-bridge-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");

        // Missing file -> defaults
        let _ = std::fs::remove_file(&path);
        assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());

        let settings = Settings {
            seed: Some(5),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);

        std::fs::write(&path, "{ nope").unwrap();
        assert!(Settings::load_from(&path).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
