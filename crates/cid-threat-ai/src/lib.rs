//! Enemy AI for CID Defender.
//!
//! Implements archetype profiles, the enemy behavior state machine,
//! defender targeting, and wave generation. Pure functions over plain data.

pub mod fsm;
pub mod profiles;
pub mod random;
pub mod targeting;
pub mod wave;

pub use cid_core as core;

#[cfg(test)]
mod tests;
