//! Projectile system: flight toward the target enemy and on-hit effects.

use std::collections::HashMap;

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use cid_core::components::{Enemy, EnemyProfile, EnemyStats, Health, ProjectileState};
use cid_core::constants::*;
use cid_core::enums::{EnemyArchetype, ParticleKind, TowerSpecial};
use cid_core::types::Position;

use crate::world_setup;

/// An enemy destroyed by tower fire.
#[derive(Debug, Clone, Copy)]
pub struct Kill {
    pub entity: Entity,
    pub enemy_id: u32,
    pub archetype: EnemyArchetype,
    pub score_value: i64,
    pub position: Position,
}

/// Applies a projectile's damage and side effect to the enemy it reached.
pub trait OnHitEffect {
    /// Returns the enemies killed by this hit.
    fn apply(&self, world: &mut World, target: Entity, damage: f64) -> Vec<Kill>;
}

impl OnHitEffect for TowerSpecial {
    fn apply(&self, world: &mut World, target: Entity, damage: f64) -> Vec<Kill> {
        let mut kills = Vec::new();
        let Ok(center) = world.get::<&Position>(target).map(|p| *p) else {
            return kills;
        };

        if let Ok(mut stats) = world.get::<&mut EnemyStats>(target) {
            match self {
                TowerSpecial::Slow => stats.slow(SLOW_FACTOR, SLOW_DURATION_SECS),
                TowerSpecial::Block => stats.block_attacks(BLOCK_DURATION_SECS),
                TowerSpecial::None | TowerSpecial::Splash | TowerSpecial::RapidFire => {}
            }
        }

        damage_enemy(world, target, damage, &mut kills);

        if *self == TowerSpecial::Splash {
            let splashed: Vec<Entity> = world
                .query::<(&Enemy, &Position, &Health)>()
                .iter()
                .filter(|(entity, (_, pos, health))| {
                    *entity != target
                        && !health.is_dead()
                        && pos.distance_to(&center) <= CLUSTER_RADIUS
                })
                .map(|(entity, _)| entity)
                .collect();
            for entity in splashed {
                damage_enemy(world, entity, damage * SPLASH_DAMAGE_FACTOR, &mut kills);
            }
        }
        kills
    }
}

fn damage_enemy(world: &mut World, entity: Entity, amount: f64, kills: &mut Vec<Kill>) {
    if let Ok((health, profile, pos)) =
        world.query_one_mut::<(&mut Health, &EnemyProfile, &Position)>(entity)
    {
        if health.take_damage(amount) {
            kills.push(Kill {
                entity,
                enemy_id: profile.id,
                archetype: profile.archetype,
                score_value: profile.score_value,
                position: *pos,
            });
        }
    }
}

/// Run the projectile system: move shots, resolve impacts, remove the dead.
///
/// Projectiles whose target is gone or dead are discarded without effect.
/// Killed enemies are despawned here and returned for scoring.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    despawn_buffer: &mut Vec<Entity>,
    dt: f64,
) -> Vec<Kill> {
    let targets: HashMap<u32, (Entity, Position)> = world
        .query::<(&Enemy, &EnemyProfile, &Position, &Health)>()
        .iter()
        .filter(|(_, (_, _, _, health))| !health.is_dead())
        .map(|(entity, (_, profile, pos, _))| (profile.id, (entity, *pos)))
        .collect();

    despawn_buffer.clear();
    let mut impacts: Vec<(Entity, Position, ProjectileState)> = Vec::new();
    for (entity, (pos, shot)) in world.query_mut::<(&mut Position, &ProjectileState)>() {
        let Some(&(target, target_pos)) = targets.get(&shot.target_enemy) else {
            despawn_buffer.push(entity);
            continue;
        };
        let (moved, arrived) = pos.step_toward(&target_pos, shot.speed * dt);
        *pos = moved;
        if arrived {
            impacts.push((target, target_pos, *shot));
            despawn_buffer.push(entity);
        }
    }
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }

    let mut kills = Vec::new();
    for (target, at, shot) in impacts {
        kills.extend(shot.special.apply(world, target, shot.damage));
        world_setup::spawn_particle_burst(world, rng, ParticleKind::Hit, at);
    }
    for kill in &kills {
        let _ = world.despawn(kill.entity);
    }
    kills
}

#[cfg(test)]
mod tests {
    use super::*;
    use cid_core::enums::{DefenderId, EnemyState};

    fn spawn(world: &mut World, id: u32, x: f64, health: f64) -> Entity {
        world.spawn((
            Enemy,
            Position::new(x, 200.0),
            EnemyProfile {
                id,
                archetype: EnemyArchetype::Trojan,
                state: EnemyState::Seeking,
                assigned_defender: DefenderId::Integrity,
                target: Some(DefenderId::Integrity),
                score_value: 15,
                spawn_wave: 1,
            },
            Health::new(health),
            EnemyStats::new(30.0, 25, 25),
        ))
    }

    fn health_of(world: &World, e: Entity) -> f64 {
        world.get::<&Health>(e).map(|h| h.current).unwrap()
    }

    #[test]
    fn splash_hits_cluster_at_reduced_damage() {
        let mut world = World::new();
        let primary = spawn(&mut world, 1, 100.0, 200.0);
        let near_a = spawn(&mut world, 2, 130.0, 200.0);
        let near_b = spawn(&mut world, 3, 60.0, 200.0);
        let far = spawn(&mut world, 4, 300.0, 200.0);

        let kills = TowerSpecial::Splash.apply(&mut world, primary, 35.0);
        assert!(kills.is_empty());
        assert_eq!(health_of(&world, primary), 165.0);
        assert!((health_of(&world, near_a) - (200.0 - 35.0 * SPLASH_DAMAGE_FACTOR)).abs() < 1e-9);
        assert!((health_of(&world, near_b) - (200.0 - 35.0 * SPLASH_DAMAGE_FACTOR)).abs() < 1e-9);
        assert_eq!(health_of(&world, far), 200.0);
    }

    #[test]
    fn slow_and_block_apply_effects_with_full_damage() {
        let mut world = World::new();
        let e = spawn(&mut world, 1, 100.0, 100.0);
        TowerSpecial::Slow.apply(&mut world, e, 20.0);
        TowerSpecial::Block.apply(&mut world, e, 25.0);
        assert_eq!(health_of(&world, e), 55.0);
        let stats = *world.get::<&EnemyStats>(e).unwrap();
        assert_eq!(stats.speed, 15.0);
        assert_eq!(stats.damage, 0);
    }

    #[test]
    fn lethal_hit_reports_kill() {
        let mut world = World::new();
        let e = spawn(&mut world, 9, 100.0, 20.0);
        let kills = TowerSpecial::RapidFire.apply(&mut world, e, 30.0);
        assert_eq!(kills.len(), 1);
        assert_eq!(kills[0].enemy_id, 9);
        assert_eq!(kills[0].score_value, 15);
    }

    #[test]
    fn projectile_without_target_is_discarded() {
        let mut world = World::new();
        let mut rng = <ChaCha8Rng as rand::SeedableRng>::seed_from_u64(1);
        let mut buffer = Vec::new();
        world_setup::spawn_projectile(&mut world, Position::new(0.0, 0.0), 42, 10.0, TowerSpecial::None);
        let kills = run(&mut world, &mut rng, &mut buffer, 0.1);
        assert!(kills.is_empty());
        assert_eq!(world.query::<&ProjectileState>().iter().count(), 0);
    }

    #[test]
    fn projectile_travels_then_hits() {
        let mut world = World::new();
        let mut rng = <ChaCha8Rng as rand::SeedableRng>::seed_from_u64(1);
        let mut buffer = Vec::new();
        let target = spawn(&mut world, 1, 100.0, 100.0);
        world_setup::spawn_projectile(&mut world, Position::new(0.0, 200.0), 1, 10.0, TowerSpecial::None);

        // 100 units at 200 units/s: still in flight after 0.25 s, lands by 0.5 s.
        run(&mut world, &mut rng, &mut buffer, 0.25);
        assert_eq!(health_of(&world, target), 100.0);
        run(&mut world, &mut rng, &mut buffer, 0.25);
        assert_eq!(health_of(&world, target), 90.0);
        assert_eq!(world.query::<&ProjectileState>().iter().count(), 0);
    }
}
