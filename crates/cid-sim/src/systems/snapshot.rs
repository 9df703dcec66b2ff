//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only. It never modifies the world.

use std::collections::BTreeMap;

use hecs::World;

use cid_core::components::*;
use cid_core::constants::{MAX_TOWER_LEVEL, SELL_REFUND_FRACTION};
use cid_core::defender::Defender;
use cid_core::enums::*;
use cid_core::events::GameEvent;
use cid_core::state::*;
use cid_core::types::{Position, SimTime};

use crate::encounter::{Encounter, ScoreState};
use crate::messages::MessageLog;

/// Engine state outside the ECS world that the snapshot needs.
pub struct SessionRefs<'a> {
    pub time: &'a SimTime,
    pub phase: GamePhase,
    pub wave_number: u32,
    pub max_waves: u32,
    pub next_wave_in_secs: Option<f64>,
    pub selected_tower: Option<TowerKind>,
    pub defenders: &'a BTreeMap<DefenderId, Defender>,
    pub encounter: Option<&'a Encounter>,
    pub score: &'a ScoreState,
    pub messages: &'a MessageLog,
}

/// Build a complete GameStateSnapshot from the current world and session state.
pub fn build_snapshot(world: &World, session: SessionRefs<'_>, events: Vec<GameEvent>) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *session.time,
        phase: session.phase,
        wave_number: session.wave_number,
        max_waves: session.max_waves,
        score: session.score.score,
        next_wave_in_secs: session.next_wave_in_secs,
        selected_tower: session.selected_tower,
        defenders: build_defenders(session.defenders),
        enemies: build_enemies(world),
        towers: build_towers(world),
        projectiles: build_projectiles(world),
        particles: build_particles(world),
        messages: session.messages.views(),
        encounter: session.encounter.map(Encounter::view),
        stats: session.score.stats,
        events,
    }
}

fn build_defenders(defenders: &BTreeMap<DefenderId, Defender>) -> Vec<DefenderView> {
    defenders
        .values()
        .map(|d| DefenderView {
            id: d.id,
            display_name: d.display_name.clone(),
            health: d.health(),
            max_health: d.max_health(),
            position: d.position,
            compromised: d.is_compromised(),
        })
        .collect()
}

fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&Enemy, &EnemyProfile, &Position, &Health, &EnemyStats)>()
        .iter()
        .map(|(_, (_, profile, pos, health, stats))| EnemyView {
            id: profile.id,
            archetype: profile.archetype,
            state: profile.state,
            position: *pos,
            health: health.current,
            max_health: health.max,
            speed: stats.speed,
            damage: stats.damage,
            target: profile.target,
            slowed: stats.is_slowed(),
            blocked: stats.is_blocked(),
        })
        .collect();

    enemies.sort_by_key(|e| e.id);
    enemies
}

fn build_towers(world: &World) -> Vec<TowerView> {
    let mut towers: Vec<TowerView> = world
        .query::<(&Tower, &Position, &TowerState)>()
        .iter()
        .map(|(_, (_, pos, tower))| TowerView {
            id: tower.id,
            kind: tower.kind,
            special: tower.special,
            position: *pos,
            level: tower.level,
            damage: tower.damage,
            range: tower.range,
            fire_rate_hz: tower.fire_rate_hz,
            upgrade_cost: (tower.level < MAX_TOWER_LEVEL).then_some(tower.upgrade_cost),
            sell_value: sell_value(tower),
        })
        .collect();

    towers.sort_by_key(|t| t.id);
    towers
}

/// Refund for selling a tower: a fixed share of everything spent on it.
pub fn sell_value(tower: &TowerState) -> i64 {
    (tower.invested as f64 * SELL_REFUND_FRACTION).floor() as i64
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    world
        .query::<(&Position, &ProjectileState)>()
        .iter()
        .map(|(_, (pos, shot))| ProjectileView {
            position: *pos,
            target_enemy: shot.target_enemy,
            special: shot.special,
        })
        .collect()
}

fn build_particles(world: &World) -> Vec<ParticleView> {
    world
        .query::<(&Position, &Particle)>()
        .iter()
        .map(|(_, (pos, particle))| ParticleView {
            kind: particle.kind,
            position: *pos,
            alpha: if particle.max_life_secs > 0.0 {
                (particle.life_secs / particle.max_life_secs).clamp(0.0, 1.0)
            } else {
                0.0
            },
        })
        .collect()
}
