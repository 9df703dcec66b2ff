//! Core types and definitions for the CID Defender simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, state snapshots, events, errors and constants.
//! It has no dependency on any runtime or rendering framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod defender;
pub mod enums;
pub mod errors;
pub mod events;
pub mod question;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
