//! Game state snapshot: the complete visible state handed to the renderer each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::question::Question;
use crate::types::{Position, SimTime};

/// Complete game state published after each tick. Read-only for consumers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub wave_number: u32,
    pub max_waves: u32,
    pub score: i64,
    /// Seconds until the next wave spawns (None once all waves are out).
    pub next_wave_in_secs: Option<f64>,
    pub selected_tower: Option<TowerKind>,
    pub defenders: Vec<DefenderView>,
    pub enemies: Vec<EnemyView>,
    pub towers: Vec<TowerView>,
    pub projectiles: Vec<ProjectileView>,
    pub particles: Vec<ParticleView>,
    pub messages: Vec<MessageView>,
    pub encounter: Option<EncounterView>,
    pub stats: AnswerStats,
    /// Events raised since the previous snapshot.
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefenderView {
    pub id: DefenderId,
    pub display_name: String,
    pub health: i32,
    pub max_health: i32,
    pub position: Position,
    pub compromised: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u32,
    pub archetype: EnemyArchetype,
    pub state: EnemyState,
    pub position: Position,
    pub health: f64,
    pub max_health: f64,
    pub speed: f64,
    pub damage: i32,
    pub target: Option<DefenderId>,
    pub slowed: bool,
    pub blocked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerView {
    pub id: u32,
    pub kind: TowerKind,
    pub special: TowerSpecial,
    pub position: Position,
    pub level: u8,
    pub damage: f64,
    pub range: f64,
    pub fire_rate_hz: f64,
    /// Cost of the next upgrade (None at max level).
    pub upgrade_cost: Option<i64>,
    pub sell_value: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Position,
    pub target_enemy: u32,
    pub special: TowerSpecial,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleView {
    pub kind: ParticleKind,
    pub position: Position,
    /// Remaining life fraction (0.0 - 1.0).
    pub alpha: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageView {
    pub text: String,
    pub level: MessageLevel,
    pub anchor: MessageAnchor,
    pub offset: f64,
    pub alpha: f64,
}

/// The pending question shown while in `GamePhase::Question`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterView {
    pub enemy_id: u32,
    pub defender: DefenderId,
    /// Damage the defender takes on a wrong answer or timeout.
    pub damage: i32,
    pub question: Question,
    pub time_remaining_secs: f64,
    pub time_limit_secs: f64,
}

/// Running answer tally. Timeouts count as wrong answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerStats {
    pub correct: u32,
    pub wrong: u32,
}

impl AnswerStats {
    pub fn total(&self) -> u32 {
        self.correct + self.wrong
    }

    /// Rounded accuracy percentage; 100 before any answer.
    pub fn accuracy_percent(&self) -> u32 {
        let total = self.total();
        if total == 0 {
            return 100;
        }
        ((self.correct as f64 / total as f64) * 100.0).round() as u32
    }

    pub fn record(&mut self, result: AnswerResult) {
        match result {
            AnswerResult::Correct => self.correct += 1,
            AnswerResult::Wrong | AnswerResult::TimedOut => self.wrong += 1,
        }
    }
}
