//! Encounter data model: one enemy-defender contact awaiting an answer.
//!
//! Stored in `SimulationEngine` as a single optional slot, NOT as an ECS entity.

use cid_core::enums::DefenderId;
use cid_core::question::Question;
use cid_core::state::{AnswerStats, EncounterView};

/// A contact between an enemy and a defender, resolved by a question.
#[derive(Debug, Clone)]
pub struct Encounter {
    /// The hecs entity of the attacking enemy.
    pub enemy: hecs::Entity,
    pub enemy_id: u32,
    pub defender: DefenderId,
    /// Wave-balanced damage dealt on a wrong answer or timeout.
    pub damage: i32,
    pub question: Question,
    pub time_remaining_secs: f64,
    pub time_limit_secs: f64,
}

impl Encounter {
    pub fn view(&self) -> EncounterView {
        EncounterView {
            enemy_id: self.enemy_id,
            defender: self.defender,
            damage: self.damage,
            question: self.question.clone(),
            time_remaining_secs: self.time_remaining_secs.max(0.0),
            time_limit_secs: self.time_limit_secs,
        }
    }
}

/// Running score state tracked by the engine.
#[derive(Debug, Clone, Default)]
pub struct ScoreState {
    pub score: i64,
    pub stats: AnswerStats,
    pub enemies_destroyed: u32,
    pub towers_built: u32,
}

impl ScoreState {
    pub fn new(starting_score: i64) -> Self {
        Self {
            score: starting_score,
            ..Default::default()
        }
    }
}
