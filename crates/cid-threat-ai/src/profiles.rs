//! Archetype-specific behavioral profiles.
//!
//! Consolidates per-archetype stats, spawn weights and targeting affinity.

use cid_core::constants::*;
use cid_core::enums::{DefenderId, EnemyArchetype};

/// Behavioral profile for an enemy archetype.
pub struct EnemyBehaviorProfile {
    /// Hit points at wave 1.
    pub health: f64,
    /// Movement speed (units/s). Never wave-scaled.
    pub speed: f64,
    /// Encounter damage at wave 1.
    pub damage: i32,
    /// Score for destroying the enemy.
    pub score_value: i64,
    /// Base weight in the wave archetype draw.
    pub spawn_weight: u32,
    /// Defender preferred when the assigned one is compromised.
    pub affinity: Option<DefenderId>,
}

/// Get the behavioral profile for a given archetype.
pub fn get_profile(archetype: EnemyArchetype) -> EnemyBehaviorProfile {
    match archetype {
        EnemyArchetype::Virus => EnemyBehaviorProfile {
            health: 40.0,
            speed: 40.0,
            damage: 20,
            score_value: 10,
            spawn_weight: 4,
            affinity: None,
        },
        EnemyArchetype::Trojan => EnemyBehaviorProfile {
            health: 60.0,
            speed: 30.0,
            damage: 25,
            score_value: 15,
            spawn_weight: 3,
            affinity: None,
        },
        EnemyArchetype::DDoS => EnemyBehaviorProfile {
            health: 30.0,
            speed: 60.0,
            damage: 15,
            score_value: 5,
            spawn_weight: 3,
            affinity: Some(DefenderId::Availability),
        },
        EnemyArchetype::Phishing => EnemyBehaviorProfile {
            health: 50.0,
            speed: 35.0,
            damage: 30,
            score_value: 20,
            spawn_weight: 2,
            affinity: Some(DefenderId::Confidentiality),
        },
        EnemyArchetype::Ransomware => EnemyBehaviorProfile {
            health: 80.0,
            speed: 25.0,
            damage: 35,
            score_value: 30,
            spawn_weight: 1,
            affinity: Some(DefenderId::Integrity),
        },
    }
}

/// Spawn weight of an archetype for a given wave, including late-wave bonuses.
pub fn spawn_weight(archetype: EnemyArchetype, wave_number: u32) -> u32 {
    let mut weight = get_profile(archetype).spawn_weight;
    let high_threat = matches!(
        archetype,
        EnemyArchetype::Phishing | EnemyArchetype::Ransomware
    );
    if high_threat && wave_number > HIGH_THREAT_WAVE {
        weight += 1;
    }
    if archetype == EnemyArchetype::Ransomware && wave_number > RANSOMWARE_SURGE_WAVE {
        weight += 1;
    }
    weight
}

/// Wave multiplier applied to health and damage: `1 + (wave - 1) * k`.
pub fn wave_multiplier(wave_number: u32) -> f64 {
    1.0 + wave_number.saturating_sub(1) as f64 * WAVE_STAT_SCALE
}

/// Scale a base stat for the given wave.
pub fn scale_stat(base: f64, wave_number: u32) -> f64 {
    base * wave_multiplier(wave_number)
}

/// Wave-scaled integer damage, floored.
pub fn balanced_damage(base_damage: i32, wave_number: u32) -> i32 {
    // Nudge keeps exact products like 25 * 1.12 from flooring one short.
    (base_damage as f64 * wave_multiplier(wave_number) + 1e-9).floor() as i32
}
