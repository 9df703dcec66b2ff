//! Particle system: drift and expiry of visual bursts.

use hecs::{Entity, World};

use cid_core::components::Particle;
use cid_core::types::Position;

/// Move particles and despawn the ones whose life ran out.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>, dt: f64) {
    despawn_buffer.clear();

    for (entity, (pos, particle)) in world.query_mut::<(&mut Position, &mut Particle)>() {
        particle.life_secs -= dt;
        if particle.life_secs <= 0.0 {
            despawn_buffer.push(entity);
            continue;
        }
        pos.x += particle.vx * dt;
        pos.y += particle.vy * dt;
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cid_core::enums::ParticleKind;

    #[test]
    fn particles_drift_and_expire() {
        let mut world = World::new();
        let mut buffer = Vec::new();
        let e = world.spawn((
            Position::new(0.0, 0.0),
            Particle {
                kind: ParticleKind::Hit,
                vx: 10.0,
                vy: 0.0,
                life_secs: 0.5,
                max_life_secs: 0.5,
            },
        ));
        run(&mut world, &mut buffer, 0.25);
        assert_eq!(world.get::<&Position>(e).unwrap().x, 2.5);
        run(&mut world, &mut buffer, 0.25);
        assert!(!world.contains(e));
    }
}
