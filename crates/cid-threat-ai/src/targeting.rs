//! Defender selection for enemies.

use cid_core::enums::{DefenderId, EnemyArchetype};
use cid_core::types::Position;

use crate::profiles::get_profile;

/// What an enemy can see of a defender when choosing a target.
#[derive(Debug, Clone, Copy)]
pub struct DefenderTarget {
    pub id: DefenderId,
    pub position: Position,
    pub alive: bool,
}

/// Choose the defender an enemy should march on.
///
/// The assigned defender wins while it is alive. Otherwise the archetype's
/// affinity defender is preferred, then the nearest live defender (first wins ties).
/// Returns `None` when every defender is compromised.
pub fn select_target(
    archetype: EnemyArchetype,
    assigned: DefenderId,
    position: &Position,
    defenders: &[DefenderTarget],
) -> Option<DefenderId> {
    let live = || defenders.iter().filter(|d| d.alive);

    if live().any(|d| d.id == assigned) {
        return Some(assigned);
    }

    if let Some(affinity) = get_profile(archetype).affinity {
        if live().any(|d| d.id == affinity) {
            return Some(affinity);
        }
    }

    let mut best: Option<(DefenderId, f64)> = None;
    for d in live() {
        let dist = position.distance_to(&d.position);
        if best.map_or(true, |(_, b)| dist < b) {
            best = Some((d.id, dist));
        }
    }
    best.map(|(id, _)| id)
}
