//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are pure functions that take `&mut World` (or `&World` for read-only).
//! They do not own state. Entity state lives in components, session state in the engine.

pub mod effects;
pub mod enemy_ai;
pub mod projectiles;
pub mod snapshot;
pub mod tower_fire;
pub mod wave_spawner;
