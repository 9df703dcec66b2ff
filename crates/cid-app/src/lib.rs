//! CID Defender headless host.
//!
//! This crate drives the simulation engine on its own thread, forwards
//! player commands to it over a channel and hands every snapshot to a
//! `Renderer` sink. An optional auto-player stands in for a human.

pub mod autoplay;
pub mod game_loop;
pub mod renderer;
pub mod state;

pub use cid_core as core;
