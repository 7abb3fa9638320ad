//! Table tuning settings loaded from config

use bevy::log::{info, warn};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::constants::*;
use crate::error::PoolError;

// Serde default functions so partial config files stay valid
fn default_tick_rate_hz() -> f32 {
    TICK_RATE_HZ
}
fn default_rest_threshold() -> f32 {
    REST_THRESHOLD
}
fn default_settle_ticks() -> u32 {
    SETTLE_TICKS
}
fn default_max_force() -> f32 {
    MAX_FORCE
}
fn default_slider_spring_speed() -> f32 {
    SLIDER_SPRING_SPEED
}
fn default_stick_move_distance() -> f32 {
    STICK_MOVE_DISTANCE
}
fn default_pocket_score() -> u32 {
    POCKET_SCORE
}
fn default_respawn_delay_secs() -> f32 {
    RESPAWN_DELAY_SECS
}
fn default_cue_spawn_position() -> [f32; 3] {
    CUE_SPAWN_POSITION.to_array()
}
fn default_time_limit_secs() -> f32 {
    TIME_LIMIT_SECS
}
fn default_max_pocketed_count() -> u32 {
    MAX_POCKETED_COUNT
}
fn default_replay_speed() -> f32 {
    REPLAY_SPEED
}

/// Path to the table tuning config
pub const TABLE_TUNING_FILE: &str = "config/table_tuning.json";

/// Serializable tuning values for one table
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableTuning {
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: f32,
    #[serde(default = "default_rest_threshold")]
    pub rest_threshold: f32,
    #[serde(default = "default_settle_ticks")]
    pub settle_ticks: u32,
    #[serde(default = "default_max_force")]
    pub max_force: f32,
    #[serde(default = "default_slider_spring_speed")]
    pub slider_spring_speed: f32,
    #[serde(default = "default_stick_move_distance")]
    pub stick_move_distance: f32,
    #[serde(default = "default_pocket_score")]
    pub default_pocket_score: u32,
    /// Per-pocket score overrides keyed by pocket id
    #[serde(default)]
    pub pocket_scores: BTreeMap<u32, u32>,
    #[serde(default = "default_respawn_delay_secs")]
    pub respawn_delay_secs: f32,
    #[serde(default = "default_cue_spawn_position")]
    pub cue_spawn_position: [f32; 3],
    #[serde(default = "default_time_limit_secs")]
    pub time_limit_secs: f32,
    #[serde(default = "default_max_pocketed_count")]
    pub max_pocketed_count: u32,
    #[serde(default = "default_replay_speed")]
    pub replay_speed: f32,
}

impl Default for TableTuning {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate_hz(),
            rest_threshold: default_rest_threshold(),
            settle_ticks: default_settle_ticks(),
            max_force: default_max_force(),
            slider_spring_speed: default_slider_spring_speed(),
            stick_move_distance: default_stick_move_distance(),
            default_pocket_score: default_pocket_score(),
            pocket_scores: BTreeMap::new(),
            respawn_delay_secs: default_respawn_delay_secs(),
            cue_spawn_position: default_cue_spawn_position(),
            time_limit_secs: default_time_limit_secs(),
            max_pocketed_count: default_max_pocketed_count(),
            replay_speed: default_replay_speed(),
        }
    }
}

impl TableTuning {
    /// Load tuning from the default config path, falling back to defaults
    pub fn load() -> Self {
        Self::load_from_path(Path::new(TABLE_TUNING_FILE))
    }

    /// Load tuning from a path, falling back to defaults when missing or invalid
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            info!("No {} found, using default table tuning", path.display());
            return Self::default();
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {}: {}, using defaults", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json_str(&content) {
            Ok(tuning) => {
                info!("Loaded table tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                warn!("Rejected {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse and validate tuning from JSON text
    pub fn from_json_str(content: &str) -> Result<Self, PoolError> {
        let tuning: Self = serde_json::from_str(content)
            .map_err(|e| PoolError::InvalidConfig(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that every value is usable by the table systems
    pub fn validate(&self) -> Result<(), PoolError> {
        let positive = [
            ("tick_rate_hz", self.tick_rate_hz),
            ("rest_threshold", self.rest_threshold),
            ("replay_speed", self.replay_speed),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(PoolError::InvalidConfig(format!(
                    "{} must be finite and > 0, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("max_force", self.max_force),
            ("slider_spring_speed", self.slider_spring_speed),
            ("stick_move_distance", self.stick_move_distance),
            ("respawn_delay_secs", self.respawn_delay_secs),
            ("time_limit_secs", self.time_limit_secs),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(PoolError::InvalidConfig(format!(
                    "{} must be finite and >= 0, got {}",
                    name, value
                )));
            }
        }

        if self.cue_spawn_position.iter().any(|v| !v.is_finite()) {
            return Err(PoolError::InvalidConfig(
                "cue_spawn_position must be finite".to_string(),
            ));
        }

        Ok(())
    }

    /// Fixed step length in seconds
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_rate_hz
    }

    /// Respawn delay expressed in whole ticks (never shorter than the configured delay)
    pub fn respawn_delay_ticks(&self) -> u64 {
        (self.respawn_delay_secs * self.tick_rate_hz).ceil() as u64
    }

    pub fn cue_spawn(&self) -> Vec3 {
        Vec3::from_array(self.cue_spawn_position)
    }

    /// Score awarded by a pocket (override or table default)
    pub fn pocket_score(&self, pocket: u32) -> u32 {
        self.pocket_scores
            .get(&pocket)
            .copied()
            .unwrap_or(self.default_pocket_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = TableTuning::from_json_str(r#"{ "time_limit_secs": 90.0 }"#).unwrap();
        assert_eq!(tuning.time_limit_secs, 90.0);
        assert_eq!(tuning.max_pocketed_count, MAX_POCKETED_COUNT);
        assert_eq!(tuning.rest_threshold, REST_THRESHOLD);
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let result = TableTuning::from_json_str(r#"{ "rest_threshold": 0.0 }"#);
        assert!(matches!(result, Err(PoolError::InvalidConfig(_))));
    }

    #[test]
    fn test_respawn_delay_ticks() {
        let tuning = TableTuning::default();
        assert_eq!(tuning.respawn_delay_ticks(), 120);

        let odd = TableTuning {
            respawn_delay_secs: 0.51,
            tick_rate_hz: 10.0,
            ..Default::default()
        };
        assert_eq!(odd.respawn_delay_ticks(), 6);
    }

    #[test]
    fn test_pocket_score_override() {
        let mut tuning = TableTuning::default();
        tuning.pocket_scores.insert(3, 25);
        assert_eq!(tuning.pocket_score(3), 25);
        assert_eq!(tuning.pocket_score(0), POCKET_SCORE);
    }

    #[test]
    fn test_bundled_config_matches_defaults() {
        let bundled = TableTuning::from_json_str(include_str!("../config/table_tuning.json")).unwrap();
        assert_eq!(bundled, TableTuning::default());
    }
}
