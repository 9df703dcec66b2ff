//! Enemy AI system: debuff timers, retargeting, movement and contact detection.
//!
//! Calls the enemy FSM from cid-threat-ai and writes the result back
//! into ECS components.

use std::collections::BTreeMap;

use hecs::{Entity, World};

use cid_core::components::{Enemy, EnemyProfile, EnemyStats};
use cid_core::defender::Defender;
use cid_core::enums::{DefenderId, EnemyArchetype};
use cid_core::types::Position;

use cid_threat_ai::fsm::{evaluate, EnemyContext};
use cid_threat_ai::targeting::{select_target, DefenderTarget};

/// An enemy that just reached its defender.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub entity: Entity,
    pub enemy_id: u32,
    pub archetype: EnemyArchetype,
    pub defender: DefenderId,
    /// Unscaled archetype damage.
    pub base_damage: i32,
    /// Whether a Block effect was active at contact.
    pub blocked: bool,
}

/// Advance every enemy by `dt`, in id order.
///
/// Stops at the first contact so at most one encounter is raised per tick;
/// the remaining enemies stay untouched until play resumes.
pub fn run(world: &mut World, defenders: &BTreeMap<DefenderId, Defender>, dt: f64) -> Option<Contact> {
    let targets: Vec<DefenderTarget> = defenders
        .values()
        .map(|d| DefenderTarget {
            id: d.id,
            position: d.position,
            alive: d.is_alive(),
        })
        .collect();
    let is_live = |id: Option<DefenderId>| {
        id.and_then(|id| defenders.get(&id))
            .map_or(false, |d| d.is_alive())
    };

    let mut order: Vec<(Entity, u32)> = world
        .query::<(&Enemy, &EnemyProfile)>()
        .iter()
        .map(|(entity, (_, profile))| (entity, profile.id))
        .collect();
    order.sort_by_key(|&(_, id)| id);

    for (entity, _) in order {
        let Ok((pos, profile, stats)) =
            world.query_one_mut::<(&mut Position, &mut EnemyProfile, &mut EnemyStats)>(entity)
        else {
            continue;
        };

        stats.tick_effects(dt);

        if !is_live(profile.target) {
            profile.target =
                select_target(profile.archetype, profile.assigned_defender, pos, &targets);
        }
        let target_pos = profile
            .target
            .and_then(|id| defenders.get(&id))
            .map(|d| d.position);

        let update = evaluate(&EnemyContext {
            state: profile.state,
            position: *pos,
            target: target_pos,
            speed: stats.speed,
            dt,
        });
        *pos = update.new_position;
        profile.state = update.new_state;

        if update.contact {
            if let Some(defender) = profile.target {
                return Some(Contact {
                    entity,
                    enemy_id: profile.id,
                    archetype: profile.archetype,
                    defender,
                    base_damage: stats.base_damage,
                    blocked: stats.is_blocked(),
                });
            }
        }
    }
    None
}
