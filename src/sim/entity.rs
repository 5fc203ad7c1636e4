//! Player and monster entities
//!
//! Both embed a shared [`Character`] record. Monsters carry an explicit
//! [`MonsterKind`] tag that decides their attack and question style.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::question::Question;
use crate::clamp_to_arena;
use crate::consts::*;

/// Shared attributes of anything that can fight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub pos: Vec2,
    health: u32,
    alive: bool,
}

impl Character {
    pub fn new(name: impl Into<String>, health: u32, pos: Vec2) -> Self {
        Self {
            name: name.into(),
            pos,
            health,
            alive: health > 0,
        }
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Overwrite health; alive tracks whether it is above zero
    pub fn set_health(&mut self, health: u32) {
        self.health = health;
        self.alive = health > 0;
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.set_health(self.health.saturating_sub(amount));
    }

    /// Translate without any bounds checking
    pub fn move_by(&mut self, delta: Vec2) {
        self.pos += delta;
    }
}

/// Common capability of players and monsters
pub trait Combatant {
    fn character(&self) -> &Character;

    /// Damage dealt by one attack
    fn attack(&self) -> u32;

    fn is_alive(&self) -> bool {
        self.character().is_alive()
    }
}

/// Held direction keys for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Movement {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Movement {
    pub fn is_idle(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub character: Character,
    pub score: u32,
    pub level: u32,
    pub lives: u32,
    pub speed: f32,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            character: Character::new(
                name,
                PLAYER_MAX_HEALTH,
                Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            ),
            score: 0,
            level: 1,
            lives: PLAYER_START_LIVES,
            speed: PLAYER_SPEED,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.character.pos
    }

    pub fn health(&self) -> u32 {
        self.character.health()
    }

    /// Add points and level up once if the current threshold is reached.
    /// Returns true if a level-up happened.
    pub fn gain_score(&mut self, points: u32) -> bool {
        self.score = self.score.saturating_add(points);
        if self.score >= self.level * POINTS_PER_LEVEL {
            return self.level_up();
        }
        false
    }

    /// Returns false when already at the level cap
    pub fn level_up(&mut self) -> bool {
        if self.level >= MAX_LEVEL {
            return false;
        }
        self.level += 1;
        let health = self.character.health() + LEVEL_UP_HEALTH_BONUS;
        self.character.set_health(health);
        log::info!("Level up! {} is now level {}", self.character.name, self.level);
        true
    }

    /// Spend a life; health refills while lives remain
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        if self.lives > 0 {
            self.character.set_health(PLAYER_MAX_HEALTH);
        }
    }

    /// Move `speed` per held direction, then keep inside the arena margin
    pub fn apply_movement(&mut self, movement: Movement, arena: Vec2) {
        let mut delta = Vec2::ZERO;
        if movement.up {
            delta.y -= self.speed;
        }
        if movement.down {
            delta.y += self.speed;
        }
        if movement.left {
            delta.x -= self.speed;
        }
        if movement.right {
            delta.x += self.speed;
        }
        self.character.move_by(delta);
        self.character.pos = clamp_to_arena(self.character.pos, arena.x, arena.y, ARENA_MARGIN);
    }
}

impl Combatant for Player {
    fn character(&self) -> &Character {
        &self.character
    }

    fn attack(&self) -> u32 {
        15 * self.level
    }
}

/// Monster variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonsterKind {
    Regular,
    Boss,
    /// The single boss whose defeat wins the game
    FinalBoss,
}

impl MonsterKind {
    pub fn is_boss(&self) -> bool {
        matches!(self, MonsterKind::Boss | MonsterKind::FinalBoss)
    }
}

/// Ticks the boss special ability stays unavailable after use
pub const SPECIAL_COOLDOWN: u32 = 5;

/// A monster roaming the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub id: u32,
    pub kind: MonsterKind,
    pub character: Character,
    /// Effective difficulty (already inflated for bosses)
    pub difficulty: u32,
    /// Boss special ability cooldown; not consulted by combat
    #[serde(default)]
    pub special_cooldown: u32,
}

impl Monster {
    /// A regular monster
    pub fn new(id: u32, name: impl Into<String>, difficulty: u32, pos: Vec2) -> Self {
        Self::with_kind(id, MonsterKind::Regular, name, difficulty, pos)
    }

    /// A boss built from a base difficulty (inflated before stats derive)
    pub fn boss(id: u32, name: impl Into<String>, base_difficulty: u32, pos: Vec2) -> Self {
        Self::with_kind(
            id,
            MonsterKind::Boss,
            name,
            base_difficulty + BOSS_DIFFICULTY_BONUS,
            pos,
        )
    }

    /// The final boss, scaled from the level cap
    pub fn final_boss(id: u32, pos: Vec2) -> Self {
        Self::with_kind(
            id,
            MonsterKind::FinalBoss,
            "FINAL BOSS",
            MAX_LEVEL * 2 + BOSS_DIFFICULTY_BONUS,
            pos,
        )
    }

    fn with_kind(
        id: u32,
        kind: MonsterKind,
        name: impl Into<String>,
        difficulty: u32,
        pos: Vec2,
    ) -> Self {
        let health = 30 + difficulty * 20;
        Self {
            id,
            kind,
            character: Character::new(name, health, pos),
            difficulty,
            special_cooldown: 0,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.character.pos
    }

    pub fn is_boss(&self) -> bool {
        self.kind.is_boss()
    }

    pub fn reward_points(&self) -> u32 {
        10 * self.difficulty
    }

    pub fn speed(&self) -> f32 {
        (2 + self.difficulty) as f32
    }

    /// Greedy per-axis chase: one `speed` step on each axis with a gap
    pub fn move_toward(&mut self, target: Vec2) {
        let speed = self.speed();
        let pos = &mut self.character.pos;
        if pos.x < target.x {
            pos.x += speed;
        } else if pos.x > target.x {
            pos.x -= speed;
        }
        if pos.y < target.y {
            pos.y += speed;
        } else if pos.y > target.y {
            pos.y -= speed;
        }
    }

    pub fn generate_question(&self, rng: &mut impl Rng) -> Question {
        if self.is_boss() {
            return boss_question(rng);
        }
        match self.difficulty {
            1 => {
                let a = rng.random_range(1..=20);
                let b = rng.random_range(1..=20);
                Question::generate(format!("{a} + {b} = ?"), a + b, rng)
            }
            2 => {
                let a = rng.random_range(1..=12);
                let b = rng.random_range(1..=12);
                Question::generate(format!("{a} × {b} = ?"), a * b, rng)
            }
            _ => {
                let divisor = rng.random_range(2..=10);
                let answer = rng.random_range(2..=15);
                let dividend = answer * divisor;
                Question::generate(format!("{dividend} ÷ {divisor} = ?"), answer, rng)
            }
        }
    }

    /// Arm the special ability if it is ready
    pub fn special_attack(&mut self) -> bool {
        if !self.is_boss() || self.special_cooldown > 0 {
            return false;
        }
        self.special_cooldown = SPECIAL_COOLDOWN;
        true
    }

    pub fn tick_special_cooldown(&mut self) {
        self.special_cooldown = self.special_cooldown.saturating_sub(1);
    }
}

impl Combatant for Monster {
    fn character(&self) -> &Character {
        &self.character
    }

    fn attack(&self) -> u32 {
        let base = 10 + 5 * self.difficulty;
        if self.is_boss() { base * 2 } else { base }
    }
}

/// Compound two-step expression; operands are narrowed so the answer is positive
fn boss_question(rng: &mut impl Rng) -> Question {
    let a: i32 = rng.random_range(5..=20);
    match rng.random_range(0..3) {
        0 => {
            let b = rng.random_range(2..=10);
            let c = rng.random_range(1..=10);
            Question::generate(format!("({a} + {b}) × {c} = ?"), (a + b) * c, rng)
        }
        1 => {
            let b = rng.random_range(2..=10);
            let c = rng.random_range(1..=(a * b - 1).min(10));
            Question::generate(format!("{a} × {b} - {c} = ?"), a * b - c, rng)
        }
        _ => {
            let b = rng.random_range(2..=(a - 1).min(10));
            let c = rng.random_range(1..=10);
            Question::generate(format!("({a} - {b}) × {c} = ?"), (a - b) * c, rng)
        }
    }
}
