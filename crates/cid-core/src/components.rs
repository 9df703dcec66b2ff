//! ECS components for hecs entities.
//!
//! Components are plain data. The few methods here only keep a component's own
//! fields consistent (health clamping, debuff bookkeeping); game rules live in systems.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Marks an entity as an enemy threat.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy;

/// Marks an entity as a player-built tower.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tower;

/// Identity and behavior state of an enemy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyProfile {
    /// Stable id, unique within a session.
    pub id: u32,
    pub archetype: EnemyArchetype,
    pub state: EnemyState,
    /// Defender assigned by the wave generator.
    pub assigned_defender: DefenderId,
    /// Defender currently being marched on (may differ once the assigned one falls).
    pub target: Option<DefenderId>,
    /// Score awarded when the enemy is destroyed.
    pub score_value: i64,
    /// Wave the enemy spawned in.
    pub spawn_wave: u32,
}

/// Hit points of an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

impl Health {
    pub fn new(max: f64) -> Self {
        Self { current: max, max }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    /// Apply damage, clamping at zero. Returns `true` if this hit killed.
    /// Non-positive amounts are ignored so health never rises through this path.
    pub fn take_damage(&mut self, amount: f64) -> bool {
        if amount <= 0.0 || self.is_dead() {
            return false;
        }
        self.current = (self.current - amount).max(0.0);
        self.is_dead()
    }
}

/// A timed speed reduction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlowEffect {
    pub factor: f64,
    pub remaining_secs: f64,
}

/// Movement and attack stats of an enemy, with timed debuffs.
///
/// Debuffs refresh rather than stack: `base_speed` and `base_damage` are never
/// modified, and expiry restores them exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub base_speed: f64,
    pub speed: f64,
    /// Archetype damage before wave scaling; encounter damage derives from it.
    pub base_damage: i32,
    /// Wave-scaled damage as spawned.
    pub scaled_damage: i32,
    /// Current damage (zero while blocked).
    pub damage: i32,
    pub slow: Option<SlowEffect>,
    pub block_remaining_secs: Option<f64>,
}

impl EnemyStats {
    pub fn new(speed: f64, base_damage: i32, scaled_damage: i32) -> Self {
        Self {
            base_speed: speed,
            speed,
            base_damage,
            scaled_damage,
            damage: scaled_damage,
            slow: None,
            block_remaining_secs: None,
        }
    }

    /// Scale speed by `factor` for `duration_secs`. Re-applying refreshes the timer.
    pub fn slow(&mut self, factor: f64, duration_secs: f64) {
        let factor = factor.clamp(0.0, 1.0);
        self.slow = Some(SlowEffect {
            factor,
            remaining_secs: duration_secs.max(0.0),
        });
        self.speed = self.base_speed * factor;
    }

    /// Zero damage for `duration_secs`. Re-applying refreshes the timer.
    pub fn block_attacks(&mut self, duration_secs: f64) {
        self.block_remaining_secs = Some(duration_secs.max(0.0));
        self.damage = 0;
    }

    pub fn is_blocked(&self) -> bool {
        self.block_remaining_secs.is_some()
    }

    pub fn is_slowed(&self) -> bool {
        self.slow.is_some()
    }

    /// Count down active debuffs, restoring the original values on expiry.
    pub fn tick_effects(&mut self, dt: f64) {
        if let Some(slow) = self.slow.as_mut() {
            slow.remaining_secs -= dt;
            if slow.remaining_secs <= 0.0 {
                self.slow = None;
                self.speed = self.base_speed;
            }
        }
        if let Some(remaining) = self.block_remaining_secs.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.block_remaining_secs = None;
                self.damage = self.scaled_damage;
            }
        }
    }
}

/// Tower identity, level and live stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerState {
    pub id: u32,
    pub kind: TowerKind,
    pub special: TowerSpecial,
    pub level: u8,
    pub damage: f64,
    pub range: f64,
    pub fire_rate_hz: f64,
    pub cooldown_remaining: f64,
    /// Score required for the next upgrade.
    pub upgrade_cost: i64,
    /// Total score spent on this tower (build plus upgrades).
    pub invested: i64,
}

impl TowerState {
    pub fn cooldown_secs(&self) -> f64 {
        if self.fire_rate_hz > 0.0 {
            1.0 / self.fire_rate_hz
        } else {
            f64::INFINITY
        }
    }
}

/// A shot in flight toward an enemy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProjectileState {
    pub target_enemy: u32,
    pub damage: f64,
    pub speed: f64,
    pub special: TowerSpecial,
}

/// A short-lived visual particle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    pub vx: f64,
    pub vy: f64,
    pub life_secs: f64,
    pub max_life_secs: f64,
}
