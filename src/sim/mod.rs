//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (advanced by `update`/`tick`, never a wall clock)
//! - Seeded RNG only
//! - Stable iteration order (roster in spawn order, cooldowns by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod question;
pub mod state;
pub mod tick;

pub use collision::{Cooldowns, decay_cooldowns, find_encounter, on_cooldown};
pub use entity::{Character, Combatant, Monster, MonsterKind, Movement, Player};
pub use question::Question;
pub use state::{Encounter, GamePhase, GameSession, Stats};
pub use tick::{AnswerOutcome, Command, CommandResult, TickInput, TickReport};
