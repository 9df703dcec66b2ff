//! Defender: one security pillar with bounded health.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::DefenderId;
use crate::types::Position;

/// A security pillar being protected.
///
/// Health always stays in `0..=max_health`. A defender at zero health is
/// compromised and stays in the session, excluded from targeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defender {
    pub id: DefenderId,
    pub display_name: String,
    health: i32,
    max_health: i32,
    pub position: Position,
}

impl Defender {
    /// Create a defender at full health for the given wave.
    pub fn new(id: DefenderId, wave_number: u32) -> Self {
        let max_health = max_health_for_wave(wave_number);
        Self {
            id,
            display_name: id.display_name().to_string(),
            health: max_health,
            max_health,
            position: defender_position(id),
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_compromised(&self) -> bool {
        !self.is_alive()
    }

    /// Heal by `amount`, capped at max health. Returns the health actually restored.
    /// A compromised defender cannot be healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if self.is_compromised() || amount <= 0 {
            return 0;
        }
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.max_health);
        self.health - before
    }

    /// Apply damage, floored at zero. Returns `true` if this hit compromised the defender.
    pub fn damage(&mut self, amount: i32) -> bool {
        if amount <= 0 || self.is_compromised() {
            return false;
        }
        self.health = self.health.saturating_sub(amount).max(0);
        self.health == 0
    }

    /// Raise max health for a new wave. Never lowers it and never heals.
    pub fn raise_max_health(&mut self, wave_number: u32) {
        self.max_health = self.max_health.max(max_health_for_wave(wave_number));
    }

    #[cfg(any(test, feature = "test-hooks"))]
    pub fn set_health(&mut self, health: i32) {
        self.health = health.clamp(0, self.max_health);
    }
}

/// Max health for a wave: base plus a capped per-wave bonus.
pub fn max_health_for_wave(wave_number: u32) -> i32 {
    let waves_past_first = wave_number.saturating_sub(1).min(i32::MAX as u32) as i32;
    let bonus = waves_past_first
        .saturating_mul(DEFENDER_HEALTH_PER_WAVE)
        .min(DEFENDER_HEALTH_BONUS_CAP);
    DEFENDER_BASE_HEALTH + bonus
}

/// Fixed field position of a pillar.
pub fn defender_position(id: DefenderId) -> Position {
    let (x, y) = match id {
        DefenderId::Confidentiality => CONFIDENTIALITY_POSITION,
        DefenderId::Integrity => INTEGRITY_POSITION,
        DefenderId::Availability => AVAILABILITY_POSITION,
    };
    Position::new(x, y)
}
