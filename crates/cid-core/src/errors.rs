//! Refusal reasons for player actions.
//!
//! All of these are recoverable. A refused action leaves the session untouched.

use thiserror::Error;

use crate::enums::DefenderId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    #[error("no tower type selected")]
    NoTowerSelected,
    #[error("insufficient score: need {cost}, have {have}")]
    InsufficientScore { cost: i64, have: i64 },
    #[error("too close to another tower ({distance:.1} units)")]
    TooCloseToTower { distance: f64 },
    #[error("cannot build inside the {defender:?} restricted zone")]
    RestrictedZone { defender: DefenderId },
    #[error("position ({x:.1}, {y:.1}) is outside the field")]
    OutOfBounds { x: f64, y: f64 },
    #[error("towers can only be built while playing")]
    NotPlaying,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TowerError {
    #[error("tower {0} not found")]
    NotFound(u32),
    #[error("tower is already at max level")]
    MaxLevel,
    #[error("insufficient score: need {cost}, have {have}")]
    InsufficientScore { cost: i64, have: i64 },
    #[error("towers can only be changed while playing")]
    NotPlaying,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnswerError {
    #[error("no encounter is awaiting an answer")]
    NoPendingEncounter,
    #[error("option {0} does not exist")]
    InvalidOption(usize),
    #[error("no question is being asked")]
    NotInQuestion,
}
