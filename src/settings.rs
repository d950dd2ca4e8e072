//! Player settings
//!
//! Persisted through the score store under a single key, read once when a
//! session starts and turned into the immutable effects config of each round.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::persistence::{Records, ScoreStore};
use crate::sim::EffectsConfig;

/// Rendering detail; decides how many particles a round may keep alive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub const ALL: [QualityPreset; 3] = [
        QualityPreset::Low,
        QualityPreset::Medium,
        QualityPreset::High,
    ];

    pub fn particle_cap(self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QualityPreset::Low => "low",
            QualityPreset::Medium => "medium",
            QualityPreset::High => "high",
        };
        f.write_str(name)
    }
}

impl FromStr for QualityPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|preset| {
                preset.to_string() == wanted
                    || (wanted == "med" && *preset == QualityPreset::Medium)
            })
            .ok_or_else(|| format!("unknown quality preset {:?}", s))
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Camera shake on crashes
    pub screen_shake: bool,
    /// Particle effects (flaps, score sparks, explosions)
    pub particles: bool,

    // === Audio ===
    /// 0..=1
    pub master_volume: f32,
    /// 0..=1, multiplied with master
    pub sfx_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,

    /// Name saved with high scores
    pub player_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            screen_shake: true,
            particles: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            reduced_motion: false,

            player_name: "Player".to_string(),
        }
    }
}

impl Settings {
    /// Store key
    pub const STORAGE_KEY: &'static str = "settings";

    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Shake is off whenever reduced motion is requested
    pub fn shake_enabled(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Zero when particles are switched off
    pub fn particle_cap(&self) -> usize {
        if self.particles { self.quality.particle_cap() } else { 0 }
    }

    /// Presentation switches for the next round
    pub fn effects(&self) -> EffectsConfig {
        EffectsConfig {
            screen_shake: self.shake_enabled(),
            max_particles: self.particle_cap(),
        }
    }

    /// Load settings, falling back to defaults
    pub fn load<S: ScoreStore>(records: &Records<S>) -> Self {
        let settings = records.load_setting(Self::STORAGE_KEY, Self::default());
        log::info!("Settings: quality={} player={}", settings.quality, settings.player_name);
        settings
    }

    pub fn save<S: ScoreStore>(&self, records: &mut Records<S>) {
        if records.save_setting(Self::STORAGE_KEY, self) {
            log::info!("Settings saved");
        }
    }
}
