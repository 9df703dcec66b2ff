//! Wave generation: roster size, archetype mix, defender assignment and spawn points.

use rand::seq::SliceRandom;
use rand::Rng;

use cid_core::constants::*;
use cid_core::enums::{DefenderId, EnemyArchetype};
use cid_core::types::Position;

use crate::profiles::{balanced_damage, get_profile, scale_stat, spawn_weight};
use crate::random::weighted_choice;

/// One enemy of a generated wave, ready to be spawned.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveEnemy {
    pub archetype: EnemyArchetype,
    pub health: f64,
    pub speed: f64,
    /// Archetype damage before wave scaling.
    pub base_damage: i32,
    /// Wave-scaled damage.
    pub damage: i32,
    pub score_value: i64,
    pub spawn: Position,
    pub assigned_defender: DefenderId,
}

/// Enemies in a wave: up to three per defender, growing by one per defender each wave.
pub fn enemy_count(wave_number: u32, defender_count: usize) -> usize {
    wave_number.min(MAX_ENEMIES_PER_DEFENDER) as usize * defender_count
}

/// Generate the roster for `wave_number`, spread evenly across `defenders`.
pub fn generate_wave<R: Rng + ?Sized>(
    wave_number: u32,
    defenders: &[DefenderId],
    rng: &mut R,
) -> Vec<WaveEnemy> {
    let total = enemy_count(wave_number, defenders.len());
    let assignments = balanced_assignment(total, defenders, rng);

    let weights: Vec<u32> = EnemyArchetype::ALL
        .iter()
        .map(|&a| spawn_weight(a, wave_number))
        .collect();

    assignments
        .into_iter()
        .enumerate()
        .map(|(index, assigned_defender)| {
            let archetype = weighted_choice(&EnemyArchetype::ALL, &weights, rng)
                .copied()
                .unwrap_or(EnemyArchetype::Virus);
            let profile = get_profile(archetype);
            WaveEnemy {
                archetype,
                health: scale_stat(profile.health, wave_number).floor(),
                speed: profile.speed,
                base_damage: profile.damage,
                damage: balanced_damage(profile.damage, wave_number),
                score_value: profile.score_value,
                spawn: spawn_point(index, wave_number),
                assigned_defender,
            }
        })
        .collect()
}

/// Shuffled balanced partition of `total` enemies over `defenders`.
///
/// Each defender gets `total / n` enemies; the remainder goes to the first
/// defenders of a shuffled order. The returned list is shuffled as well.
pub fn balanced_assignment<R: Rng + ?Sized>(
    total: usize,
    defenders: &[DefenderId],
    rng: &mut R,
) -> Vec<DefenderId> {
    if defenders.is_empty() {
        return Vec::new();
    }
    let base = total / defenders.len();
    let remainder = total % defenders.len();

    let mut order = defenders.to_vec();
    order.shuffle(rng);

    let mut assignments = Vec::with_capacity(total);
    for (i, &id) in order.iter().enumerate() {
        let count = base + usize::from(i < remainder);
        assignments.extend(std::iter::repeat(id).take(count));
    }
    assignments.shuffle(rng);
    assignments
}

/// Perimeter spawn point for the `index`-th enemy of a wave.
///
/// Points sit just outside all four edges of the field. Later waves
/// add corner points to the ring.
pub fn spawn_point(index: usize, wave_number: u32) -> Position {
    let left = -SPAWN_MARGIN;
    let right = FIELD_WIDTH + SPAWN_MARGIN;
    let top = -SPAWN_MARGIN;
    let bottom = FIELD_HEIGHT + SPAWN_MARGIN;

    let mut ring = vec![
        Position::new(left, FIELD_HEIGHT * 0.3),
        Position::new(FIELD_WIDTH * 0.25, top),
        Position::new(right, FIELD_HEIGHT * 0.3),
        Position::new(FIELD_WIDTH * 0.75, bottom),
        Position::new(left, FIELD_HEIGHT * 0.7),
        Position::new(FIELD_WIDTH * 0.75, top),
        Position::new(right, FIELD_HEIGHT * 0.7),
        Position::new(FIELD_WIDTH * 0.25, bottom),
    ];
    if wave_number >= EXTRA_SPAWN_POINTS_WAVE {
        ring.extend([
            Position::new(left, top),
            Position::new(right, top),
            Position::new(right, bottom),
            Position::new(left, bottom),
        ]);
    }
    ring[index % ring.len()]
}
