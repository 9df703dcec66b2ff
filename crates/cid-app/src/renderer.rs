//! Renderer sinks. A renderer sees every snapshot once, read-only.

use std::io::Write;

use tracing::{debug, info, warn};

use cid_core::enums::GamePhase;
use cid_core::events::GameEvent;
use cid_core::state::GameStateSnapshot;

/// Consumes one snapshot per tick. Never feeds anything back to the engine.
pub trait Renderer: Send {
    fn render(&mut self, snapshot: &GameStateSnapshot);

    /// Called once after the last frame.
    fn finish(&mut self) {}
}

/// Reports phase changes and game events through `tracing`.
#[derive(Debug, Default)]
pub struct LogRenderer {
    last_phase: Option<GamePhase>,
}

impl Renderer for LogRenderer {
    fn render(&mut self, snapshot: &GameStateSnapshot) {
        if self.last_phase != Some(snapshot.phase) {
            info!(phase = ?snapshot.phase, tick = snapshot.time.tick, "phase changed");
            self.last_phase = Some(snapshot.phase);
        }

        for event in &snapshot.events {
            match event {
                GameEvent::WaveStarted {
                    wave_number,
                    enemy_count,
                } => info!(wave = wave_number, enemies = enemy_count, "wave started"),
                GameEvent::EnemyContact {
                    enemy_id,
                    defender,
                    damage,
                } => {
                    if let Some(encounter) = &snapshot.encounter {
                        info!(
                            enemy = enemy_id,
                            ?defender,
                            damage,
                            question = %encounter.question.text,
                            "question asked"
                        );
                    }
                }
                GameEvent::AnswerCorrect { defender, healed } => {
                    info!(?defender, healed, score = snapshot.score, "answered correctly")
                }
                GameEvent::AnswerWrong { defender, damage } => {
                    info!(?defender, damage, "answered wrong")
                }
                GameEvent::QuestionTimedOut { defender, damage } => {
                    info!(?defender, damage, "question timed out")
                }
                GameEvent::DefenderCompromised { defender } => {
                    warn!(?defender, "defender compromised")
                }
                GameEvent::GameOver { wave_number, score } => {
                    info!(wave = wave_number, score, "game over")
                }
                GameEvent::Victory { score } => info!(score, "victory"),
                other => debug!(event = ?other),
            }
        }
    }
}

/// Writes every snapshot as one JSON line.
pub struct JsonLinesRenderer<W: Write + Send> {
    out: W,
    failed: bool,
}

impl<W: Write + Send> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, failed: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, snapshot: &GameStateSnapshot) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, snapshot)?;
        self.out.write_all(b"\n")
    }
}

impl<W: Write + Send> Renderer for JsonLinesRenderer<W> {
    fn render(&mut self, snapshot: &GameStateSnapshot) {
        if self.failed {
            return;
        }
        if let Err(err) = self.write_line(snapshot) {
            // Stop after the first failure rather than logging once per tick.
            warn!(%err, "snapshot dump failed, disabling");
            self.failed = true;
        }
    }

    fn finish(&mut self) {
        if let Err(err) = self.out.flush() {
            warn!(%err, "snapshot dump flush failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_lines_one_line_per_frame() {
        let mut renderer = JsonLinesRenderer::new(Vec::new());
        let snapshot = GameStateSnapshot::default();
        renderer.render(&snapshot);
        renderer.render(&snapshot);
        renderer.finish();

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: GameStateSnapshot = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.phase, snapshot.phase);
    }
}
