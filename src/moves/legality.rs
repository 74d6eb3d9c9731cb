//! Position-only legality
//!
//! Looks at the physical position and nothing else; overlay condition is
//! handled separately by `viability`. Callers clear the acting side's
//! transient state (`Position::prepare_turn`) before asking.

use thiserror::Error;

use crate::combat::stance::{ControlState, Posture, Stance};
use crate::core::types::{Limb, LimbSet, Side};
use crate::moves::definition::MoveDef;
use crate::physics::{PhysicsRejection, PhysicsValidator};
use crate::position::{DistanceBand, Position};

/// First legality check a move failed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Illegal {
    #[error("actor posture {0:?} not allowed")]
    ActorPosture(Posture),

    #[error("opponent posture {0:?} not allowed")]
    OpponentPosture(Posture),

    #[error("control state {0:?} not allowed")]
    Control(ControlState),

    #[error("stance {0:?} not allowed")]
    Stance(Stance),

    #[error("out of reach at {0:?}")]
    OutOfReach(DistanceBand),

    #[error("opponent has no kick in flight")]
    NoExtendedLeg,

    #[error("{0:?} is bound or still extended")]
    LimbUnavailable(Limb),

    #[error("balance {balance} below the {required} this move needs")]
    Balance { balance: f32, required: f32 },

    #[error("physically inadmissible: {0}")]
    Physics(#[from] PhysicsRejection),
}

/// Check every position prerequisite in order; returns the limbs the move
/// would occupy
pub fn legality(
    position: &Position,
    side: Side,
    def: &MoveDef,
    physics: &PhysicsValidator,
) -> Result<LimbSet, Illegal> {
    let actor = position.actor(side);
    let opponent = position.actor(side.opponent());
    let requires = &def.requires;

    if !requires.admits_actor_posture(actor.posture) {
        return Err(Illegal::ActorPosture(actor.posture));
    }
    if !requires.admits_opponent_posture(opponent.posture) {
        return Err(Illegal::OpponentPosture(opponent.posture));
    }
    if !requires.admits_control(actor.control) {
        return Err(Illegal::Control(actor.control));
    }
    if !requires.admits_stance(actor.stance) {
        return Err(Illegal::Stance(actor.stance));
    }
    if !def.reach.contains(position.distance) {
        return Err(Illegal::OutOfReach(position.distance));
    }
    if requires.opponent_extended_leg && !opponent.has_extended_leg() {
        return Err(Illegal::NoExtendedLeg);
    }

    let limbs = def.limb_set(actor.stance);
    if let Some(limb) = limbs.iter().find(|l| !actor.limb(*l).available()) {
        return Err(Illegal::LimbUnavailable(limb));
    }

    let required = def.category.min_balance();
    if actor.balance < required {
        return Err(Illegal::Balance {
            balance: actor.balance,
            required,
        });
    }

    physics.check(actor, def)?;
    Ok(limbs)
}
