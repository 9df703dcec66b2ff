//! Enemy behavior finite state machine.
//!
//! Pure function computing movement and the Seeking → Attacking transition
//! for one enemy. No ECS dependency; operates on plain data.

use cid_core::constants::CONTACT_RADIUS;
use cid_core::enums::EnemyState;
use cid_core::types::Position;

/// Input to the enemy FSM for a single entity.
pub struct EnemyContext {
    pub state: EnemyState,
    pub position: Position,
    /// Position of the live defender being pursued, if any.
    pub target: Option<Position>,
    pub speed: f64,
    pub dt: f64,
}

/// Output from the enemy FSM.
pub struct EnemyUpdate {
    pub new_state: EnemyState,
    pub new_position: Position,
    /// Set exactly once, on the tick the enemy enters `Attacking`.
    pub contact: bool,
}

/// Evaluate the FSM for one enemy.
pub fn evaluate(ctx: &EnemyContext) -> EnemyUpdate {
    let no_change = EnemyUpdate {
        new_state: ctx.state,
        new_position: ctx.position,
        contact: false,
    };

    // Attacking enemies hold position until their encounter resolves.
    if ctx.state == EnemyState::Attacking {
        return no_change;
    }

    // No live defender: idle in place.
    let Some(target) = ctx.target else {
        return no_change;
    };

    let new_position = if ctx.position.distance_to(&target) < CONTACT_RADIUS {
        ctx.position
    } else {
        ctx.position.step_toward(&target, (ctx.speed * ctx.dt).max(0.0)).0
    };

    if new_position.distance_to(&target) < CONTACT_RADIUS {
        EnemyUpdate {
            new_state: EnemyState::Attacking,
            new_position,
            contact: true,
        }
    } else {
        EnemyUpdate {
            new_state: EnemyState::Seeking,
            new_position,
            contact: false,
        }
    }
}
