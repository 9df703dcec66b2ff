//! Events emitted by the simulation for audio and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Notable gameplay moments, drained into each snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    WaveStarted {
        wave_number: u32,
        enemy_count: u32,
    },
    /// An enemy reached a defender and a question is now pending.
    EnemyContact {
        enemy_id: u32,
        defender: DefenderId,
        damage: i32,
    },
    AnswerCorrect {
        defender: DefenderId,
        healed: i32,
    },
    AnswerWrong {
        defender: DefenderId,
        damage: i32,
    },
    QuestionTimedOut {
        defender: DefenderId,
        damage: i32,
    },
    EnemyDestroyed {
        enemy_id: u32,
        archetype: EnemyArchetype,
        score_awarded: i64,
    },
    DefenderCompromised {
        defender: DefenderId,
    },
    TowerBuilt {
        tower_id: u32,
        kind: TowerKind,
    },
    TowerUpgraded {
        tower_id: u32,
        level: u8,
    },
    TowerSold {
        tower_id: u32,
        refund: i64,
    },
    GameOver {
        wave_number: u32,
        score: i64,
    },
    Victory {
        score: i64,
    },
}

/// A fading on-screen notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenMessage {
    pub id: u32,
    pub level: MessageLevel,
    pub anchor: MessageAnchor,
    pub text: String,
    pub age_secs: f64,
    pub duration_secs: f64,
    /// Vertical stacking offset among messages sharing an anchor.
    pub offset: f64,
}

impl ScreenMessage {
    /// Opacity in `0.0..=1.0`, fading linearly over the message lifetime.
    pub fn alpha(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        (1.0 - self.age_secs / self.duration_secs).clamp(0.0, 1.0)
    }

    pub fn is_expired(&self) -> bool {
        self.age_secs >= self.duration_secs
    }
}
