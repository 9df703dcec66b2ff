//! Simulation engine for CID Defender.
//!
//! Owns the hecs ECS world, runs systems once per host frame,
//! resolves encounters, and produces GameStateSnapshots for the renderer.

pub mod encounter;
pub mod engine;
pub mod messages;
pub mod systems;
pub mod world_setup;

pub use cid_core as core;
pub use engine::{SimConfig, SimulationEngine};
