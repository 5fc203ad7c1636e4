//! Math Adventure - an arena arcade game driven by arithmetic quizzes
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, encounters, game state)
//! - `settings`: Data-driven gameplay tuning
//! - `highscores`: Leaderboard of finished runs

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    /// Player keeps this distance from the arena edges
    pub const ARENA_MARGIN: f32 = 20.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 100.0;
    pub const PLAYER_START_Y: f32 = 400.0;
    pub const PLAYER_MAX_HEALTH: u32 = 100;
    pub const PLAYER_START_LIVES: u32 = 3;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const LEVEL_UP_HEALTH_BONUS: u32 = 20;
    /// Score needed per level (threshold is `level * POINTS_PER_LEVEL`)
    pub const POINTS_PER_LEVEL: u32 = 100;
    pub const MAX_LEVEL: u32 = 10;

    /// Encounter tuning
    pub const COLLISION_DISTANCE: f32 = 50.0;
    pub const COLLISION_COOLDOWN_TICKS: u32 = 60;
    pub const QUESTION_TIME_SECS: u32 = 30;

    /// Spawning
    pub const SPAWN_INTERVAL_TICKS: u32 = 180;
    pub const MAX_ACTIVE_MONSTERS: usize = 3;
    /// Regular monsters never exceed this difficulty
    pub const MAX_REGULAR_DIFFICULTY: u32 = 3;
    /// A boss shows up whenever the defeated count is a multiple of this
    pub const BOSS_EVERY: u32 = 5;
    /// Difficulty added to the base value when building a boss
    pub const BOSS_DIFFICULTY_BONUS: u32 = 2;

    /// Options shown for every question
    pub const OPTION_COUNT: usize = 4;
    /// Distractors are drawn from `answer ± DISTRACTOR_SPREAD`
    pub const DISTRACTOR_SPREAD: i32 = 10;
}

/// Clamp a point into an axis-aligned box inset by `margin`.
/// A box narrower than twice the margin collapses onto `margin`.
#[inline]
pub fn clamp_to_arena(pos: Vec2, width: f32, height: f32, margin: f32) -> Vec2 {
    Vec2::new(
        pos.x.clamp(margin, (width - margin).max(margin)),
        pos.y.clamp(margin, (height - margin).max(margin)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_inside_margin() {
        let p = clamp_to_arena(Vec2::new(-5.0, 900.0), 800.0, 600.0, 20.0);
        assert_eq!(p, Vec2::new(20.0, 580.0));
    }

    #[test]
    fn test_clamp_in_arena_smaller_than_margins() {
        let p = clamp_to_arena(Vec2::new(100.0, 400.0), 30.0, 10.0, 20.0);
        assert_eq!(p, Vec2::new(20.0, 20.0));
    }
}
