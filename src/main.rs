//! Math Adventure entry point
//!
//! Headless driver: plays a batch of seeded runs with a simple autopilot at
//! a fixed tick cadence and ranks them on a leaderboard. A rendering shell
//! drives `GameSession` the same way, one `tick` per frame.

use std::fs;
use std::path::Path;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Deserialize;

use math_adventure::highscores::{HighScoreEntry, HighScores};
use math_adventure::settings::Settings;
use math_adventure::sim::{Command, CommandResult, GamePhase, GameSession, Movement, TickInput};

/// Knobs for the headless driver. Read from the same JSON file as
/// [`Settings`]; each side ignores the other's keys.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct DriverConfig {
    /// Number of runs to play; run `i` uses seed `base + i`
    runs: u32,
    /// Chance the autopilot picks the correct option
    accuracy: f64,
    /// Tick budget per run
    max_ticks: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            runs: 5,
            accuracy: 0.85,
            max_ticks: 60 * 60 * 30,
        }
    }
}

impl DriverConfig {
    fn load(path: &Path) -> Self {
        match fs::read_to_string(path).map(|json| serde_json::from_str::<Self>(&json)) {
            Ok(Ok(config)) => config,
            Ok(Err(e)) => {
                log::warn!("Invalid driver config in {}: {e}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Math Adventure (headless) starting...");

    let (settings, config) = match std::env::args().nth(1) {
        Some(path) => {
            let path = Path::new(&path);
            (Settings::load(path), DriverConfig::load(path))
        }
        None => (Settings::default(), DriverConfig::default()),
    };

    let base_seed = settings.seed.unwrap_or_else(rand::random);
    let mut scores = HighScores::new();

    for run in 0..config.runs.max(1) {
        let seed = base_seed.wrapping_add(u64::from(run));
        let session = play_run(
            Settings {
                seed: Some(seed),
                ..settings.clone()
            },
            &config,
        );

        match HighScoreEntry::from_session(&session) {
            Some(entry) => {
                let outcome = if entry.won { "victory" } else { "game over" };
                match scores.add(entry) {
                    Some(rank) => log::info!("Run {run} (seed {seed}): {outcome}, rank {rank}"),
                    None => log::info!("Run {run} (seed {seed}): {outcome}, not ranked"),
                }
            }
            None => log::info!(
                "Run {run} (seed {seed}): tick budget exhausted during {:?}",
                session.phase()
            ),
        }

        match serde_json::to_string(&session.stats()) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Could not serialize stats: {e}"),
        }
    }

    if let Some(best) = scores.top_score() {
        log::info!("Best score: {best}");
    }
    match scores.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Could not serialize high scores: {e}"),
    }
}

/// Play one session to the end or until the tick budget runs out
fn play_run(settings: Settings, config: &DriverConfig) -> GameSession {
    let mut session = GameSession::new(settings);
    log::info!("Session created with seed: {}", session.seed());

    let mut autopilot = Autopilot::new(session.seed(), config.accuracy);
    for _ in 0..config.max_ticks {
        let input = autopilot.next_input(&session);
        let report = session.tick(&input);

        if let Some(CommandResult::Answered(outcome)) = report.command {
            log::debug!("Answer outcome: {outcome:?}");
        }
        if report.quit_requested() || report.phase.is_terminal() {
            break;
        }
    }
    session
}

/// Plays the game: chases the nearest monster and answers questions,
/// picking the right option with the configured accuracy.
struct Autopilot {
    rng: Pcg32,
    accuracy: f64,
}

impl Autopilot {
    fn new(seed: u64, accuracy: f64) -> Self {
        let accuracy = if accuracy.is_finite() { accuracy.clamp(0.0, 1.0) } else { 1.0 };
        Self {
            rng: Pcg32::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15),
            accuracy,
        }
    }

    fn next_input(&mut self, session: &GameSession) -> TickInput {
        match session.phase() {
            GamePhase::Menu => TickInput {
                command: Some(Command::Start),
                ..Default::default()
            },
            GamePhase::Question => TickInput {
                command: self.pick_option(session).map(Command::Answer),
                ..Default::default()
            },
            GamePhase::Playing => TickInput {
                movement: self.steer(session),
                ..Default::default()
            },
            GamePhase::GameOver | GamePhase::Win => TickInput {
                command: Some(Command::Quit),
                ..Default::default()
            },
        }
    }

    fn pick_option(&mut self, session: &GameSession) -> Option<usize> {
        let question = session.current_question()?;
        let options = question.options();
        let correct = options.iter().position(|&o| question.check_answer(o))?;

        if self.rng.random_bool(self.accuracy) {
            return Some(correct);
        }
        let wrong: Vec<usize> = (0..options.len()).filter(|&i| i != correct).collect();
        if wrong.is_empty() {
            return Some(correct);
        }
        Some(wrong[self.rng.random_range(0..wrong.len())])
    }

    /// Head for the closest monster that can start an encounter
    fn steer(&self, session: &GameSession) -> Movement {
        let player = session.player().pos();
        let target = session
            .monsters()
            .iter()
            .filter(|m| session.cooldown(m.id) == 0)
            .map(|m| m.pos())
            .min_by(|a, b| {
                a.distance(player)
                    .partial_cmp(&b.distance(player))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        let Some(target) = target else {
            return Movement::default();
        };
        let delta: Vec2 = target - player;
        let speed = session.player().speed;
        Movement {
            up: delta.y < -speed,
            down: delta.y > speed,
            left: delta.x < -speed,
            right: delta.x > speed,
        }
    }
}
