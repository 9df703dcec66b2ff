//! Game loop thread: runs the simulation engine at a fixed rate and hands
//! snapshots to the renderer.
//!
//! The engine is moved into this thread and owned by it. Commands arrive via
//! `mpsc` channel. The latest snapshot is kept in shared state for polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use cid_core::constants::TICK_RATE;
use cid_core::enums::GamePhase;
use cid_core::state::{AnswerStats, GameStateSnapshot};
use cid_sim::engine::SimulationEngine;

use crate::autoplay::AutoPlayer;
use crate::renderer::Renderer;
use crate::state::GameLoopCommand;

/// How the loop is driven.
pub struct LoopOptions {
    /// Ticks per second; each tick advances the engine by `1 / tick_rate`.
    pub tick_rate: u32,
    /// Stop after this many ticks.
    pub max_ticks: Option<u64>,
    /// Sleep between ticks to match wall-clock time.
    pub realtime: bool,
    /// Stop once the session reaches game over or victory.
    pub stop_on_end: bool,
    pub autoplayer: Option<AutoPlayer>,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            max_ticks: None,
            realtime: true,
            stop_on_end: true,
            autoplayer: None,
        }
    }
}

/// Outcome of a finished loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoopSummary {
    pub ticks: u64,
    pub phase: GamePhase,
    pub wave_number: u32,
    pub score: i64,
    pub stats: AnswerStats,
}

impl LoopSummary {
    fn from_snapshot(ticks: u64, snapshot: Option<&GameStateSnapshot>) -> Self {
        match snapshot {
            Some(s) => Self {
                ticks,
                phase: s.phase,
                wave_number: s.wave_number,
                score: s.score,
                stats: s.stats,
            },
            None => Self {
                ticks,
                phase: GamePhase::default(),
                wave_number: 0,
                score: 0,
                stats: AnswerStats::default(),
            },
        }
    }
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the handle yielding the loop summary.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    options: LoopOptions,
    renderer: Box<dyn Renderer>,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<LoopSummary>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("cid-game-loop".into())
        .spawn(move || run_game_loop(engine, cmd_rx, options, renderer, &latest_snapshot))?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown, channel disconnect, the tick limit
/// or, if requested, the end of the session.
pub fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    mut options: LoopOptions,
    mut renderer: Box<dyn Renderer>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) -> LoopSummary {
    let tick_rate = options.tick_rate.max(1);
    let dt = 1.0 / f64::from(tick_rate);
    let tick_duration = Duration::from_secs_f64(dt);
    let mut next_tick_time = Instant::now();
    let mut last: Option<GameStateSnapshot> = None;
    let mut ticks: u64 = 0;

    info!(tick_rate, realtime = options.realtime, "game loop started");

    let reason = 'outer: loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    debug!(command = ?cmd, "command received");
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) => break 'outer "shutdown",
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => break 'outer "disconnected",
            }
        }

        // 2. Let the auto-player react to the previous frame
        if let (Some(bot), Some(snapshot)) = (options.autoplayer.as_mut(), last.as_ref()) {
            engine.queue_commands(bot.decide(snapshot));
        }

        // 3. Advance one tick
        let snapshot = engine.tick(dt);
        ticks += 1;

        // 4. Hand the frame to the renderer
        renderer.render(&snapshot);

        // 5. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }
        let ended = snapshot.phase.is_terminal();
        last = Some(snapshot);

        if options.stop_on_end && ended {
            break "session ended";
        }
        if options.max_ticks.is_some_and(|max| ticks >= max) {
            break "tick limit";
        }

        // 6. Sleep until next tick
        if options.realtime {
            next_tick_time += tick_duration;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > tick_duration * 2 {
                // Too far behind, reset to avoid catch-up spiral
                next_tick_time = now;
            }
        }
    };

    renderer.finish();
    let summary = LoopSummary::from_snapshot(ticks, last.as_ref());
    info!(
        reason,
        ticks,
        phase = ?summary.phase,
        wave = summary.wave_number,
        score = summary.score,
        "game loop stopped"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use cid_core::commands::PlayerCommand;
    use cid_sim::engine::SimConfig;

    struct FrameCounter(Arc<Mutex<u64>>);

    impl Renderer for FrameCounter {
        fn render(&mut self, _snapshot: &GameStateSnapshot) {
            if let Ok(mut frames) = self.0.lock() {
                *frames += 1;
            }
        }
    }

    fn engine() -> SimulationEngine {
        SimulationEngine::new(SimConfig::default()).unwrap()
    }

    fn headless(max_ticks: u64) -> LoopOptions {
        LoopOptions {
            max_ticks: Some(max_ticks),
            realtime: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::StartGame))
            .unwrap();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::Pause))
            .unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let mut commands = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            commands.push(cmd);
        }

        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::PlayerCommand(PlayerCommand::StartGame)
        ));
        assert!(matches!(
            commands[1],
            GameLoopCommand::PlayerCommand(PlayerCommand::Pause)
        ));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_loop_stops_at_tick_limit() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();
        let frames = Arc::new(Mutex::new(0));
        let latest = Mutex::new(None);

        let summary = run_game_loop(
            engine(),
            rx,
            headless(25),
            Box::new(FrameCounter(frames.clone())),
            &latest,
        );
        drop(tx);

        assert_eq!(summary.ticks, 25);
        assert_eq!(*frames.lock().unwrap(), 25);
        assert!(latest.lock().unwrap().is_some());
    }

    #[test]
    fn test_commands_reach_engine() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::SkipIntro))
            .unwrap();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::StartGame))
            .unwrap();
        let latest = Mutex::new(None);

        let summary = run_game_loop(
            engine(),
            rx,
            headless(1),
            Box::new(FrameCounter(Arc::default())),
            &latest,
        );
        assert_eq!(summary.phase, GamePhase::Playing);
        assert_eq!(summary.score, 200);
        drop(tx);
    }

    #[test]
    fn test_shutdown_and_disconnect_stop_loop() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();
        tx.send(GameLoopCommand::Shutdown).unwrap();
        let latest = Mutex::new(None);
        let summary = run_game_loop(
            engine(),
            rx,
            LoopOptions::default(),
            Box::new(FrameCounter(Arc::default())),
            &latest,
        );
        assert_eq!(summary.ticks, 0);

        let (tx, rx) = mpsc::channel::<GameLoopCommand>();
        drop(tx);
        let summary = run_game_loop(
            engine(),
            rx,
            LoopOptions::default(),
            Box::new(FrameCounter(Arc::default())),
            &latest,
        );
        assert_eq!(summary.ticks, 0);
    }

    #[test]
    fn test_autoplayer_finishes_a_session() {
        let (_tx, rx) = mpsc::channel::<GameLoopCommand>();
        let latest = Mutex::new(None);
        let options = LoopOptions {
            max_ticks: Some(60 * 60 * 10),
            realtime: false,
            stop_on_end: true,
            autoplayer: Some(AutoPlayer::new(0.8, 7)),
            ..Default::default()
        };

        let summary = run_game_loop(
            engine(),
            rx,
            options,
            Box::new(FrameCounter(Arc::default())),
            &latest,
        );
        assert!(summary.phase.is_terminal(), "ended in {:?}", summary.phase);
        assert!(summary.stats.total() > 0);
    }

    #[test]
    fn test_snapshot_serialization_under_3ms() {
        let mut engine = engine();
        engine.queue_commands([PlayerCommand::SkipIntro, PlayerCommand::StartGame]);

        // Run enough ticks to populate entities
        for _ in 0..120 {
            engine.tick(1.0 / 60.0);
        }

        let snapshot = engine.tick(1.0 / 60.0);
        let start = Instant::now();
        let json = serde_json::to_string(&snapshot).unwrap();
        let elapsed = start.elapsed();

        assert!(
            elapsed < Duration::from_millis(3),
            "Snapshot serialization took {:?}, should be <3ms",
            elapsed
        );
        assert!(!json.is_empty());
    }
}
