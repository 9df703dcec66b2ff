//! Application state shared between the host and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use anyhow::{anyhow, bail, Context};

use cid_core::commands::PlayerCommand;
use cid_core::state::GameStateSnapshot;
use cid_sim::engine::SimulationEngine;

use crate::game_loop::{self, LoopOptions, LoopSummary};
use crate::renderer::Renderer;

/// Commands sent from the host to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Handle to a running game loop.
///
/// Shareable across threads:
/// - `mpsc::Sender` is wrapped in `Mutex` (Sender is Send but not Sync)
/// - `Mutex<Option<...>>` holds what only exists once the loop is started
/// - `Arc<Mutex<...>>` holds the latest snapshot, shared with the loop thread
pub struct AppState {
    /// `None` before `start` is called.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Updated by the game loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    loop_handle: Mutex<Option<JoinHandle<LoopSummary>>>,
    /// Whether the game loop has been started.
    pub running: Mutex<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            loop_handle: Mutex::new(None),
            running: Mutex::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the game loop thread. Fails if one is already running.
    pub fn start(
        &self,
        engine: SimulationEngine,
        options: LoopOptions,
        renderer: Box<dyn Renderer>,
    ) -> anyhow::Result<()> {
        let mut running = self.running.lock().map_err(|e| anyhow!(e.to_string()))?;
        if *running {
            bail!("simulation already running");
        }

        let (cmd_tx, handle) =
            game_loop::spawn_game_loop(engine, options, renderer, self.latest_snapshot.clone())
                .context("failed to spawn game loop thread")?;

        *self.command_tx.lock().map_err(|e| anyhow!(e.to_string()))? = Some(cmd_tx);
        *self.loop_handle.lock().map_err(|e| anyhow!(e.to_string()))? = Some(handle);
        *running = true;
        Ok(())
    }

    /// Send a player command to the simulation.
    pub fn send_command(&self, command: PlayerCommand) -> anyhow::Result<()> {
        let tx_lock = self.command_tx.lock().map_err(|e| anyhow!(e.to_string()))?;
        match tx_lock.as_ref() {
            Some(tx) => tx
                .send(GameLoopCommand::PlayerCommand(command))
                .context("game loop is no longer running"),
            None => bail!("simulation not started"),
        }
    }

    /// Get the latest snapshot synchronously.
    pub fn snapshot(&self) -> Option<GameStateSnapshot> {
        self.latest_snapshot
            .lock()
            .ok()
            .and_then(|lock| lock.clone())
    }

    /// Wait for the loop to stop on its own and return its summary.
    pub fn wait(&self) -> anyhow::Result<LoopSummary> {
        let handle = self
            .loop_handle
            .lock()
            .map_err(|e| anyhow!(e.to_string()))?
            .take()
            .context("simulation not started")?;
        let summary = handle
            .join()
            .map_err(|_| anyhow!("game loop thread panicked"))?;

        *self.running.lock().map_err(|e| anyhow!(e.to_string()))? = false;
        self.command_tx
            .lock()
            .map_err(|e| anyhow!(e.to_string()))?
            .take();
        Ok(summary)
    }

    /// Ask the loop to stop, then wait for it.
    pub fn shutdown(&self) -> anyhow::Result<LoopSummary> {
        if let Some(tx) = self
            .command_tx
            .lock()
            .map_err(|e| anyhow!(e.to_string()))?
            .as_ref()
        {
            // The loop may already have stopped on its own.
            let _ = tx.send(GameLoopCommand::Shutdown);
        }
        self.wait()
    }
}
