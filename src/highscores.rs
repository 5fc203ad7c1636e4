//! High score leaderboard
//!
//! Kept in memory for the lifetime of the process and exported as JSON for
//! the shell to display.

use serde::{Deserialize, Serialize};

use crate::sim::{GamePhase, GameSession};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u32,
    pub level: u32,
    pub monsters_defeated: u32,
    /// Whether the run ended by beating the final boss
    pub won: bool,
}

impl HighScoreEntry {
    /// Summarize a session that has reached a terminal phase
    pub fn from_session(session: &GameSession) -> Option<Self> {
        if !session.phase().is_terminal() {
            return None;
        }
        let stats = session.stats();
        Some(Self {
            name: session.player().character.name.clone(),
            score: stats.score,
            level: stats.level,
            monsters_defeated: stats.monsters_defeated,
            won: session.phase() == GamePhase::Win,
        })
    }
}

/// High score leaderboard, sorted by score descending
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Add an entry if it qualifies.
    /// Returns the rank achieved (1-indexed).
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        // Ties keep the earlier run ahead
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);

        log::info!("New high score at rank {rank}");
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
