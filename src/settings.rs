//! Game settings and preferences
//!
//! Persisted as JSON next to the best score.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 200,
            QualityPreset::High => 200,
        }
    }

    /// Background star count
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => 0,
            QualityPreset::Medium => 80,
            QualityPreset::High => 120,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Jump bursts and explosions
    pub particles: bool,

    // === Audio ===
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,

    // === Accessibility ===
    /// Reduced motion (no tier flash)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            muted: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.4,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "neon_glider_settings";

    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    pub fn star_count(&self) -> usize {
        self.quality.star_count()
    }

    /// Effective tier flash (respects reduced_motion)
    pub fn effective_tier_flash(&self) -> bool {
        !self.reduced_motion
    }

    /// Gain applied to sound effects, 0 when muted
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Gain applied to the music bed, 0 when muted
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load(store: &impl KeyValueStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    return settings;
                }
                Err(err) => log::warn!("Discarding unreadable settings: {}", err),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                store.set(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(err) => log::warn!("Failed to serialize settings: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_preset_caps() {
        assert_eq!(Settings::default().max_particles(), 200);
        assert_eq!(Settings::default().star_count(), 80);
        assert_eq!(Settings::from_preset(QualityPreset::Low).max_particles(), 60);
        assert_eq!(Settings::from_preset(QualityPreset::Low).star_count(), 0);

        let settings = Settings {
            particles: false,
            ..Settings::from_preset(QualityPreset::High)
        };
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(QualityPreset::High.as_str(), "High");
    }

    #[test]
    fn test_volume_respects_mute() {
        let mut settings = Settings::default();
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);
        assert!((settings.effective_music_volume() - 0.32).abs() < 1e-6);
        settings.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
        assert_eq!(settings.effective_music_volume(), 0.0);

        settings.muted = false;
        settings.master_volume = 3.0;
        assert_eq!(settings.effective_volume(), 1.0);
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            muted: true,
            reduced_motion: true,
            ..Settings::from_preset(QualityPreset::Low)
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
        assert!(!Settings::load(&store).effective_tier_flash());
    }

    #[test]
    fn test_load_falls_back_to_defaults() {
        let mut store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());

        store.set(Settings::STORAGE_KEY, "{not json");
        assert_eq!(Settings::load(&store), Settings::default());

        // Missing fields take their defaults
        store.set(Settings::STORAGE_KEY, r#"{"muted":true}"#);
        let settings = Settings::load(&store);
        assert!(settings.muted);
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert_eq!(settings.music_volume, 0.4);
    }
}
