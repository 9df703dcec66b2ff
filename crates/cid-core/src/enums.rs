//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Intro,
    Menu,
    Playing,
    Paused,
    /// An encounter is awaiting an answer. Combat simulation is suspended.
    Question,
    GameOver,
    Victory,
}

impl GamePhase {
    /// Terminal phases accept only `Restart` / `ReturnToMenu`.
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Victory)
    }

    /// Phases in which a session exists (entities, score, defenders).
    pub fn in_session(self) -> bool {
        matches!(
            self,
            GamePhase::Playing
                | GamePhase::Paused
                | GamePhase::Question
                | GamePhase::GameOver
                | GamePhase::Victory
        )
    }
}

/// The three security pillars protected by defenders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DefenderId {
    Confidentiality,
    Integrity,
    Availability,
}

impl DefenderId {
    pub const ALL: [DefenderId; 3] = [
        DefenderId::Confidentiality,
        DefenderId::Integrity,
        DefenderId::Availability,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            DefenderId::Confidentiality => "Confidentiality",
            DefenderId::Integrity => "Integrity",
            DefenderId::Availability => "Availability",
        }
    }
}

/// Cyber-threat archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyArchetype {
    Virus,
    Trojan,
    DDoS,
    Phishing,
    Ransomware,
}

impl EnemyArchetype {
    pub const ALL: [EnemyArchetype; 5] = [
        EnemyArchetype::Virus,
        EnemyArchetype::Trojan,
        EnemyArchetype::DDoS,
        EnemyArchetype::Phishing,
        EnemyArchetype::Ransomware,
    ];
}

/// Enemy behavior state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    /// Marching toward a defender.
    #[default]
    Seeking,
    /// Reached its defender; the encounter is awaiting resolution.
    Attacking,
}

/// Placeable tower type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    Firewall,
    Encryption,
    Ids,
    Antivirus,
}

impl TowerKind {
    pub const ALL: [TowerKind; 4] = [
        TowerKind::Firewall,
        TowerKind::Encryption,
        TowerKind::Ids,
        TowerKind::Antivirus,
    ];
}

/// Tower special ability. Drives both target selection and on-hit effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerSpecial {
    #[default]
    None,
    Block,
    Slow,
    Splash,
    RapidFire,
}

/// Policy deciding when lost defenders end the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverPolicy {
    /// Losing any single defender ends the run.
    #[default]
    AnyDefenderCompromised,
    /// The run ends only when every defender is compromised.
    AllDefendersCompromised,
}

/// Screen message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Screen message vertical anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageAnchor {
    Top,
    Center,
    Bottom,
}

/// Visual particle burst type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Build,
    Error,
    Muzzle,
    Hit,
    Heal,
    Damage,
    Celebration,
}

/// How an encounter was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerResult {
    Correct,
    Wrong,
    TimedOut,
}
