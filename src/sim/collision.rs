//! Player/monster proximity checks
//!
//! Encounters start when the player comes within `COLLISION_DISTANCE` of a
//! monster that is not cooling down. Cooldowns are keyed by entity ID.

use std::collections::BTreeMap;

use glam::Vec2;

use super::entity::Monster;

/// Remaining cooldown ticks per monster ID
pub type Cooldowns = BTreeMap<u32, u32>;

/// Whether the monster is still blocked from starting an encounter
#[inline]
pub fn on_cooldown(cooldowns: &Cooldowns, id: u32) -> bool {
    cooldowns.get(&id).is_some_and(|&ticks| ticks > 0)
}

/// Count every cooldown down by one tick, dropping the ones that expire
pub fn decay_cooldowns(cooldowns: &mut Cooldowns) {
    cooldowns.retain(|_, ticks| {
        *ticks = ticks.saturating_sub(1);
        *ticks > 0
    });
}

/// First monster (in roster order) close enough to the player to collide.
/// Returns its ID.
pub fn find_encounter(
    player_pos: Vec2,
    monsters: &[Monster],
    cooldowns: &Cooldowns,
    threshold: f32,
) -> Option<u32> {
    monsters
        .iter()
        .filter(|m| !on_cooldown(cooldowns, m.id))
        .find(|m| player_pos.distance(m.pos()) < threshold)
        .map(|m| m.id)
}
