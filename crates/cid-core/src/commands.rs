//! Player commands sent from the host to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Navigation ---
    /// Leave the intro screen early.
    SkipIntro,
    /// Start a fresh session from the menu.
    StartGame,
    /// Reset the session and start playing again.
    Restart,
    /// Return to the menu from pause or a finished run.
    ReturnToMenu,
    Pause,
    Resume,

    // --- Towers ---
    /// Choose the tower type used by the next placement.
    SelectTowerType { kind: TowerKind },
    /// Try to build the selected tower at a field position.
    PlaceTower { x: f64, y: f64 },
    UpgradeTower { tower_id: u32 },
    SellTower { tower_id: u32 },

    // --- Encounters ---
    /// Answer the pending question with an option index.
    SubmitAnswer { option: usize },
}
