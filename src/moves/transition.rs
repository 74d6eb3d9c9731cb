//! Position transitions
//!
//! Copy-then-mutate: every function takes the parent position by reference
//! (or by value when it is consumed) and returns a new one. The parent is
//! never modified, so the hash of the result is a pure function of
//! (parent, side, move, effectiveness).

use glam::Vec3;

use crate::combat::resolution::{resolve_contact, Contact};
use crate::combat::stance::ControlState;
use crate::core::error::{FightError, Result};
use crate::core::types::Side;
use crate::engine::Engine;
use crate::moves::definition::{ControlTransition, LimbRole, MoveDef};
use crate::moves::legality::legality;
use crate::physics::PhysicsValidator;
use crate::position::quantize::MAX_RECOVERY_TICKS;
use crate::position::{Actor, Position};

/// Closest the fighters' centres can get
const MIN_SEPARATION: f32 = 0.5;

/// Apply one move for `side`, refusing anything that fails legality
///
/// `effectiveness` scales the balance the move takes from the opponent and
/// the force it delivers; the actor's own physics are nominal.
pub fn apply_move(
    position: &Position,
    side: Side,
    def: &MoveDef,
    effectiveness: f32,
    engine: &Engine,
) -> Result<(Position, Contact)> {
    legality(position, side, def, &engine.physics).map_err(|why| FightError::IllegalMove {
        move_id: def.id.to_string(),
        side,
        reason: why.to_string(),
    })?;

    let effectiveness = effectiveness.clamp(0.0, 1.0);
    let mut next = position.clone();

    move_actor(&mut next, side, def);

    let (actor, opponent) = next.pair_mut(side);
    let effect = &def.physics;
    actor.momentum.linear += effect.linear_delta;
    actor.momentum.rotational += effect.rotational_delta;
    actor.body.hip_rotation += effect.hip_delta;
    actor.body.torso_rotation += effect.torso_delta;
    actor.body.weight_distribution += effect.weight_delta;

    let contact = resolve_contact(def, actor, opponent, effectiveness);
    let landed = !def.needs_contact() || contact.hit;

    actor.balance = (actor.balance - effect.balance_cost).clamp(0.0, 1.0);

    if let Some(angle) = def.extension_angle {
        for limb in def.limb_set(actor.stance).iter() {
            let config = actor.limb_mut(limb);
            config.extended = true;
            config.angle = angle;
        }
    }

    if let Some(posture) = &def.posture {
        if let Some(p) = posture.actor {
            actor.posture = p;
        }
        if landed {
            if let Some(p) = posture.opponent {
                opponent.posture = p;
            }
        }
    }

    if landed {
        if let Some(damage) = &def.damage {
            opponent.balance =
                (opponent.balance - damage.balance_effect * effectiveness).clamp(0.0, 1.0);
        }
        if let Some(control) = &def.control {
            apply_control(actor, opponent, control);
        }
    }

    let ticks = if landed {
        effect.recovery_hit
    } else {
        effect.recovery_miss
    };
    actor.body.recovery_ticks = ticks.min(MAX_RECOVERY_TICKS);
    actor.body.recovering = ticks > 0;

    if def.switch_stance {
        actor.stance = actor.stance.switched();
    }

    next.refresh_distance();
    Ok((next, contact))
}

/// Close the turn: physics advance, ply count, canonical form
pub fn end_turn(mut position: Position, physics: &PhysicsValidator) -> Position {
    physics.advance(&mut position);
    position.move_count += 1;
    position.canonicalize();
    position
}

/// One tree ply: a single move followed by the end of the turn
pub fn step(
    position: &Position,
    side: Side,
    def: &MoveDef,
    effectiveness: f32,
    engine: &Engine,
) -> Result<(Position, Contact)> {
    let (next, contact) = apply_move(position, side, def, effectiveness, engine)?;
    Ok((end_turn(next, &engine.physics), contact))
}

/// Displace the actor along the line to the opponent and sideways
fn move_actor(position: &mut Position, side: Side, def: &MoveDef) {
    if def.displacement == 0.0 && def.lateral == 0.0 {
        return;
    }

    let origin = position.actor(side).pose.location;
    let target = position.actor(side.opponent()).pose.location;
    let offset = Vec3::new(target.x - origin.x, target.y - origin.y, 0.0);
    let separation = offset.length();
    let toward = if separation > f32::EPSILON {
        offset / separation
    } else {
        position.actor(side).pose.forward()
    };
    let left = Vec3::new(-toward.y, toward.x, 0.0);

    let advance = def.displacement.min((separation - MIN_SEPARATION).max(0.0));
    position.actor_mut(side).pose.location = origin + toward * advance + left * def.lateral;
    position.face_each_other();
}

/// Hand over control: release every binding, set the new states, bind again
fn apply_control(actor: &mut Actor, opponent: &mut Actor, control: &ControlTransition) {
    actor.release_limbs();
    opponent.release_limbs();
    actor.control = control.actor;
    opponent.control = control.actor.mirrored();

    if control.actor == ControlState::None {
        return;
    }
    for limb in LimbRole::resolve_all(&control.bind_actor, actor.stance).iter() {
        let config = actor.limb_mut(limb);
        config.free = false;
        config.extended = true;
    }
    for limb in LimbRole::resolve_all(&control.bind_opponent, opponent.stance).iter() {
        let config = opponent.limb_mut(limb);
        config.free = false;
        config.extended = false;
    }
}
