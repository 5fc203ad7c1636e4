//! Game session state
//!
//! Everything a running game needs lives in one [`GameSession`] value owned
//! by the caller. Per-tick logic and encounter resolution are in `tick.rs`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Cooldowns;
use super::entity::{Monster, Player};
use super::question::Question;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a start command
    Menu,
    /// Free movement, monsters chase the player
    Playing,
    /// An encounter is waiting for an answer
    Question,
    /// Out of lives
    GameOver,
    /// Final boss defeated
    Win,
}

impl GamePhase {
    /// Sessions in these phases only accept a restart
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Win)
    }
}

/// The question being asked and the monster that asked it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub monster_id: u32,
    pub question: Question,
}

/// Read-only snapshot for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub score: u32,
    pub level: u32,
    pub lives: u32,
    pub health: u32,
    pub monsters_defeated: u32,
    pub wave: u32,
}

/// A complete game session
#[derive(Debug, Clone)]
pub struct GameSession {
    pub(crate) settings: Settings,
    /// Seed the RNG was created from
    seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) phase: GamePhase,
    pub(crate) player: Player,
    /// Monsters in spawn order
    pub(crate) monsters: Vec<Monster>,
    pub(crate) encounter: Option<Encounter>,
    pub(crate) monsters_defeated: u32,
    pub(crate) cooldowns: Cooldowns,
    pub(crate) spawn_timer: u32,
    /// Ticks left to answer the current question
    pub(crate) question_timer: u32,
    pub(crate) final_boss_spawned: bool,
    pub(crate) final_boss_battle: bool,
    next_id: u32,
}

impl GameSession {
    /// Create a session sitting at the menu
    pub fn new(settings: Settings) -> Self {
        let settings = settings.sanitized();
        let seed = settings.seed.unwrap_or_else(rand::random);
        let player = Player::new(settings.player_name.clone());
        Self {
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            player,
            monsters: Vec::new(),
            encounter: None,
            monsters_defeated: 0,
            cooldowns: Cooldowns::new(),
            spawn_timer: 0,
            question_timer: 0,
            final_boss_spawned: false,
            final_boss_battle: false,
            next_id: 1,
        }
    }

    /// Reset everything and begin playing with one monster on the field
    pub fn start_game(&mut self, name: &str) {
        self.player = Player::new(name);
        self.monsters.clear();
        self.encounter = None;
        self.monsters_defeated = 0;
        self.cooldowns.clear();
        self.spawn_timer = 0;
        self.question_timer = 0;
        self.final_boss_spawned = false;
        self.final_boss_battle = false;
        self.phase = GamePhase::Playing;
        self.spawn_monster();
        log::info!("Game started for {} (seed {})", name, self.seed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn the next monster near the right edge and return its ID
    pub fn spawn_monster(&mut self) -> u32 {
        let (x_min, x_max) = self.settings.spawn_x_range();
        let (y_min, y_max) = self.settings.spawn_y_range();
        let pos = Vec2::new(
            self.rng.random_range(x_min..=x_max),
            self.rng.random_range(y_min..=y_max),
        );
        let id = self.next_entity_id();
        let level = self.player.level;

        let monster = if level >= MAX_LEVEL && !self.final_boss_spawned {
            self.final_boss_spawned = true;
            self.final_boss_battle = true;
            log::info!("=== FINAL BOSS APPEARED! ===");
            Monster::final_boss(id, pos)
        } else if self.monsters_defeated > 0 && self.monsters_defeated % BOSS_EVERY == 0 {
            Monster::boss(id, format!("Boss {level}"), level, pos)
        } else {
            let difficulty = level.min(MAX_REGULAR_DIFFICULTY);
            Monster::new(id, format!("Monster {}", self.monsters.len()), difficulty, pos)
        };

        log::debug!(
            "Spawned {} (id {}, {:?}, difficulty {}) at ({:.0}, {:.0})",
            monster.character.name,
            id,
            monster.kind,
            monster.difficulty,
            pos.x,
            pos.y
        );
        self.monsters.push(monster);
        id
    }

    // === Accessors ===

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn monster(&self, id: u32) -> Option<&Monster> {
        self.monsters.iter().find(|m| m.id == id)
    }

    pub fn encounter(&self) -> Option<&Encounter> {
        self.encounter.as_ref()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.encounter.as_ref().map(|e| &e.question)
    }

    pub fn current_monster(&self) -> Option<&Monster> {
        self.encounter.as_ref().and_then(|e| self.monster(e.monster_id))
    }

    pub fn monsters_defeated(&self) -> u32 {
        self.monsters_defeated
    }

    pub fn final_boss_spawned(&self) -> bool {
        self.final_boss_spawned
    }

    pub fn is_final_boss_battle(&self) -> bool {
        self.final_boss_battle
    }

    /// Remaining cooldown ticks for a monster (0 when not cooling down)
    pub fn cooldown(&self, id: u32) -> u32 {
        self.cooldowns.get(&id).copied().unwrap_or(0)
    }

    /// Display-only wave number for the HUD, derived from the boss cadence
    /// (one wave per `BOSS_EVERY` defeats). Gameplay never reads it.
    pub fn wave(&self) -> u32 {
        1 + self.monsters_defeated / BOSS_EVERY
    }

    pub fn stats(&self) -> Stats {
        Stats {
            score: self.player.score,
            level: self.player.level,
            lives: self.player.lives,
            health: self.player.health(),
            monsters_defeated: self.monsters_defeated,
            wave: self.wave(),
        }
    }

    /// Whole seconds left on the question timer (0 outside an encounter)
    pub fn remaining_time(&self) -> u32 {
        if self.phase != GamePhase::Question {
            return 0;
        }
        self.question_timer / self.settings.tick_rate.max(1)
    }
}
