//! Tower fire system: cooldowns, target selection per special ability, projectile launch.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use cid_core::components::{Enemy, EnemyProfile, EnemyStats, Health, Tower, TowerState};
use cid_core::constants::CLUSTER_RADIUS;
use cid_core::enums::{ParticleKind, TowerSpecial};
use cid_core::types::Position;

use crate::world_setup;

/// What a tower can see of an enemy when choosing a target.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub entity: Entity,
    pub id: u32,
    pub position: Position,
    pub health: f64,
    pub speed: f64,
    pub damage: i32,
}

/// Picks a target among the enemies in a tower's range.
pub trait TargetSelector {
    /// `in_range` and `all` are in enemy id order; the first candidate wins ties.
    fn select(&self, origin: &Position, in_range: &[Candidate], all: &[Candidate]) -> Option<Candidate>;
}

impl TargetSelector for TowerSpecial {
    fn select(&self, origin: &Position, in_range: &[Candidate], all: &[Candidate]) -> Option<Candidate> {
        match self {
            TowerSpecial::None => best_by(in_range, |c| -origin.distance_to(&c.position)),
            TowerSpecial::RapidFire => best_by(in_range, |c| -c.health),
            TowerSpecial::Slow => best_by(in_range, |c| c.speed),
            TowerSpecial::Block => best_by(in_range, |c| c.damage as f64),
            TowerSpecial::Splash => best_by(in_range, |c| neighbours(c, all) as f64),
        }
    }
}

/// Highest-scoring candidate; ties keep the earliest.
fn best_by(candidates: &[Candidate], score: impl Fn(&Candidate) -> f64) -> Option<Candidate> {
    let mut best: Option<(Candidate, f64)> = None;
    for c in candidates {
        let s = score(c);
        if best.map_or(true, |(_, b)| s > b) {
            best = Some((*c, s));
        }
    }
    best.map(|(c, _)| c)
}

/// Number of other enemies within the cluster radius of `c`.
fn neighbours(c: &Candidate, all: &[Candidate]) -> usize {
    all.iter()
        .filter(|o| o.id != c.id && o.position.distance_to(&c.position) <= CLUSTER_RADIUS)
        .count()
}

/// Live enemies as targeting candidates, in id order.
pub fn collect_candidates(world: &World) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = world
        .query::<(&Enemy, &EnemyProfile, &Position, &Health, &EnemyStats)>()
        .iter()
        .filter(|(_, (_, _, _, health, _))| !health.is_dead())
        .map(|(entity, (_, profile, pos, health, stats))| Candidate {
            entity,
            id: profile.id,
            position: *pos,
            health: health.current,
            speed: stats.speed,
            damage: stats.damage,
        })
        .collect();
    candidates.sort_by_key(|c| c.id);
    candidates
}

/// Run the tower fire system: count down cooldowns and launch projectiles.
/// Returns the number of shots fired.
pub fn run(world: &mut World, rng: &mut ChaCha8Rng, dt: f64) -> u32 {
    let candidates = collect_candidates(world);
    let mut shots: Vec<(Position, u32, f64, TowerSpecial)> = Vec::new();

    for (_entity, (_tower, pos, tower)) in world.query_mut::<(&Tower, &Position, &mut TowerState)>() {
        tower.cooldown_remaining = (tower.cooldown_remaining - dt).max(0.0);
        if tower.cooldown_remaining > 0.0 {
            continue;
        }

        let in_range: Vec<Candidate> = candidates
            .iter()
            .filter(|c| pos.distance_to(&c.position) <= tower.range)
            .copied()
            .collect();
        if let Some(target) = tower.special.select(pos, &in_range, &candidates) {
            shots.push((*pos, target.id, tower.damage, tower.special));
            tower.cooldown_remaining = tower.cooldown_secs();
        }
    }

    for &(origin, target, damage, special) in &shots {
        world_setup::spawn_projectile(world, origin, target, damage, special);
        world_setup::spawn_particle_burst(world, rng, ParticleKind::Muzzle, origin);
    }
    shots.len() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: u32, x: f64, y: f64, health: f64, speed: f64, damage: i32) -> Candidate {
        Candidate {
            entity: Entity::DANGLING,
            id,
            position: Position::new(x, y),
            health,
            speed,
            damage,
        }
    }

    #[test]
    fn heuristics_pick_expected_targets() {
        let origin = Position::new(0.0, 0.0);
        let all = vec![
            candidate(1, 10.0, 0.0, 50.0, 30.0, 20),
            candidate(2, 100.0, 0.0, 10.0, 60.0, 35),
            candidate(3, 120.0, 0.0, 80.0, 25.0, 15),
            candidate(4, 130.0, 0.0, 40.0, 40.0, 25),
        ];
        let pick = |s: TowerSpecial| s.select(&origin, &all, &all).map(|c| c.id);
        assert_eq!(pick(TowerSpecial::None), Some(1));
        assert_eq!(pick(TowerSpecial::RapidFire), Some(2));
        assert_eq!(pick(TowerSpecial::Slow), Some(2));
        assert_eq!(pick(TowerSpecial::Block), Some(2));
        // Enemies 2, 3 and 4 each have two neighbours; the first of them wins.
        assert_eq!(pick(TowerSpecial::Splash), Some(2));
    }

    #[test]
    fn ties_keep_first_candidate() {
        let origin = Position::new(0.0, 0.0);
        let all = vec![
            candidate(1, 10.0, 0.0, 50.0, 30.0, 20),
            candidate(2, 0.0, 10.0, 50.0, 30.0, 20),
        ];
        for s in [
            TowerSpecial::None,
            TowerSpecial::RapidFire,
            TowerSpecial::Slow,
            TowerSpecial::Block,
            TowerSpecial::Splash,
        ] {
            assert_eq!(s.select(&origin, &all, &all).map(|c| c.id), Some(1));
        }
    }

    #[test]
    fn no_candidates_no_target() {
        assert!(TowerSpecial::None
            .select(&Position::default(), &[], &[])
            .is_none());
    }
}
