//! Entity spawn factories for the simulation world.
//!
//! Creates defenders, enemies, towers, projectiles and particles with
//! the appropriate component bundles.

use std::collections::BTreeMap;

use hecs::World;
use rand::Rng;

use cid_core::components::*;
use cid_core::constants::*;
use cid_core::defender::Defender;
use cid_core::enums::*;
use cid_core::types::Position;

use cid_threat_ai::wave::WaveEnemy;

/// Build stats and price of a tower type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TowerTemplate {
    pub cost: i64,
    pub damage: f64,
    pub range: f64,
    pub fire_rate_hz: f64,
    pub special: TowerSpecial,
}

/// Get the build template for a tower type.
pub fn tower_template(kind: TowerKind) -> TowerTemplate {
    match kind {
        TowerKind::Firewall => TowerTemplate {
            cost: 100,
            damage: 25.0,
            range: 120.0,
            fire_rate_hz: 1.0,
            special: TowerSpecial::Block,
        },
        TowerKind::Encryption => TowerTemplate {
            cost: 150,
            damage: 20.0,
            range: 100.0,
            fire_rate_hz: 1.2,
            special: TowerSpecial::Slow,
        },
        TowerKind::Ids => TowerTemplate {
            cost: 200,
            damage: 35.0,
            range: 140.0,
            fire_rate_hz: 0.8,
            special: TowerSpecial::Splash,
        },
        TowerKind::Antivirus => TowerTemplate {
            cost: 180,
            damage: 30.0,
            range: 110.0,
            fire_rate_hz: 1.1,
            special: TowerSpecial::RapidFire,
        },
    }
}

/// Fresh defenders for a new session, at full health for `wave_number`.
pub fn setup_defenders(wave_number: u32) -> BTreeMap<DefenderId, Defender> {
    DefenderId::ALL
        .iter()
        .map(|&id| (id, Defender::new(id, wave_number)))
        .collect()
}

/// Spawn one enemy of a generated wave.
pub fn spawn_enemy(world: &mut World, id: u32, wave_number: u32, enemy: &WaveEnemy) -> hecs::Entity {
    let profile = EnemyProfile {
        id,
        archetype: enemy.archetype,
        state: EnemyState::Seeking,
        assigned_defender: enemy.assigned_defender,
        target: Some(enemy.assigned_defender),
        score_value: enemy.score_value,
        spawn_wave: wave_number,
    };

    world.spawn((
        Enemy,
        enemy.spawn,
        profile,
        Health::new(enemy.health),
        EnemyStats::new(enemy.speed, enemy.base_damage, enemy.damage),
    ))
}

/// Spawn a level-1 tower built from its template.
pub fn spawn_tower(world: &mut World, id: u32, kind: TowerKind, position: Position) -> hecs::Entity {
    let template = tower_template(kind);
    let state = TowerState {
        id,
        kind,
        special: template.special,
        level: 1,
        damage: template.damage,
        range: template.range,
        fire_rate_hz: template.fire_rate_hz,
        cooldown_remaining: 0.0,
        upgrade_cost: BASE_UPGRADE_COST,
        invested: template.cost,
    };
    world.spawn((Tower, position, state))
}

/// Spawn a projectile at `origin` aimed at an enemy.
pub fn spawn_projectile(
    world: &mut World,
    origin: Position,
    target_enemy: u32,
    damage: f64,
    special: TowerSpecial,
) -> hecs::Entity {
    world.spawn((
        origin,
        ProjectileState {
            target_enemy,
            damage,
            speed: PROJECTILE_SPEED,
            special,
        },
    ))
}

/// Particle count and speed range for a burst kind.
fn burst_params(kind: ParticleKind) -> (usize, f64, f64) {
    match kind {
        ParticleKind::Build => (12, 30.0, 80.0),
        ParticleKind::Error => (8, 40.0, 90.0),
        ParticleKind::Muzzle => (3, 20.0, 50.0),
        ParticleKind::Hit => (6, 30.0, 70.0),
        ParticleKind::Heal => (10, 20.0, 50.0),
        ParticleKind::Damage => (10, 40.0, 100.0),
        ParticleKind::Celebration => (30, 50.0, 150.0),
    }
}

/// Spawn a radial particle burst, stopping at the live particle cap.
pub fn spawn_particle_burst<R: Rng + ?Sized>(
    world: &mut World,
    rng: &mut R,
    kind: ParticleKind,
    at: Position,
) {
    let live = world.query::<&Particle>().iter().count();
    let (count, min_speed, max_speed) = burst_params(kind);
    let count = count.min(MAX_PARTICLES.saturating_sub(live));

    for _ in 0..count {
        let angle: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
        let speed: f64 = rng.gen_range(min_speed..max_speed);
        let life: f64 = rng.gen_range(0.5..1.0);
        world.spawn((
            at,
            Particle {
                kind,
                vx: speed * angle.cos(),
                vy: speed * angle.sin(),
                life_secs: life,
                max_life_secs: life,
            },
        ));
    }
}
