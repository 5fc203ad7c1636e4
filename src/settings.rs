//! Gameplay settings
//!
//! Loaded from an optional JSON file at startup. Missing fields fall back to
//! the defaults in [`crate::consts`].

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable session parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name given to the player on start/restart
    pub player_name: String,
    /// RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,

    // === Timing ===
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Seconds allowed to answer a question
    pub question_time_secs: u32,

    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            seed: None,

            tick_rate: TICK_RATE,
            question_time_secs: QUESTION_TIME_SECS,

            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
        }
    }
}

impl Settings {
    /// Question countdown length in ticks
    pub fn question_time_ticks(&self) -> u32 {
        self.question_time_secs.saturating_mul(self.tick_rate.max(1))
    }

    /// Pull out-of-range values back to something playable
    pub fn sanitized(mut self) -> Self {
        self.tick_rate = self.tick_rate.max(1);
        self.arena_width = sanitize_extent(self.arena_width, ARENA_WIDTH);
        self.arena_height = sanitize_extent(self.arena_height, ARENA_HEIGHT);
        self
    }

    pub fn arena(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    /// X range for new monsters, a band near the right edge
    pub fn spawn_x_range(&self) -> (f32, f32) {
        let min = self.arena_width * 0.75;
        (min, (self.arena_width - 50.0).max(min))
    }

    /// Y range for new monsters, most of the arena height
    pub fn spawn_y_range(&self) -> (f32, f32) {
        (50.0, (self.arena_height - 50.0).max(50.0))
    }

    /// Parse settings; parsed values are sanitized
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings file {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {e}; using default settings", path.display());
                Self::default()
            }
        }
    }
}

/// Arena sides must leave room for the margin on both edges
fn sanitize_extent(value: f32, default: f32) -> f32 {
    if !value.is_finite() {
        log::warn!("Arena size {value} is not finite; using {default}");
        return default;
    }
    let min = 2.0 * ARENA_MARGIN;
    if value < min {
        log::warn!("Arena size {value} is below {min}; clamping");
        return min;
    }
    value
}
