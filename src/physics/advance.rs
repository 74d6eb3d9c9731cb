//! End-of-turn state advance
//!
//! Applied to both fighters after every ply, whether or not they acted.

use crate::combat::stance::Posture;
use crate::core::config::PhysicsConfig;
use crate::position::quantize::{
    approach, snap_toward_zero, LINEAR_SCALE, ROTATIONAL_SCALE,
};
use crate::position::{Actor, Position};

/// One decay step for a single momentum component
///
/// Truncating toward zero on the grid makes every non-zero value shrink by
/// at least one grid step per turn, so decay always reaches exactly zero.
pub fn decay_component(value: f32, decay: f32, epsilon: f32, scale: f32) -> f32 {
    let decayed = value * decay;
    if decayed.abs() < epsilon {
        0.0
    } else {
        snap_toward_zero(decayed, scale)
    }
}

/// Upper bound on the turns a momentum value needs to decay to zero
pub fn turns_to_rest(momentum: f32, decay: f32, epsilon: f32) -> u32 {
    let magnitude = momentum.abs();
    if magnitude == 0.0 {
        return 0;
    }
    if magnitude * decay < epsilon || decay <= 0.0 {
        return 1;
    }
    let turns = ((epsilon / magnitude).ln() / decay.ln()).floor();
    turns as u32 + 1
}

pub fn advance_actor(actor: &mut Actor, config: &PhysicsConfig) {
    let momentum = &mut actor.momentum;
    momentum.linear = decay_component(
        momentum.linear,
        momentum.decay,
        config.momentum_epsilon,
        LINEAR_SCALE,
    );
    momentum.rotational = decay_component(
        momentum.rotational,
        momentum.decay,
        config.momentum_epsilon,
        ROTATIONAL_SCALE,
    );

    let body = &mut actor.body;
    if body.recovering {
        body.recovery_ticks = body.recovery_ticks.saturating_sub(1);
        if body.recovery_ticks == 0 {
            body.recovering = false;
        }
    }
    body.hip_rotation = approach(body.hip_rotation, 0.0, config.hip_return_step);
    body.torso_rotation = approach(body.torso_rotation, 0.0, config.torso_return_step);
    body.weight_distribution = approach(body.weight_distribution, 0.5, config.weight_return_step);

    let regained = if actor.posture == Posture::Grounded {
        config.grounded_balance_recovery
    } else {
        config.balance_recovery
    };
    actor.balance = (actor.balance + regained).min(1.0);
}

pub fn advance_position(position: &mut Position, config: &PhysicsConfig) {
    advance_actor(&mut position.a, config);
    advance_actor(&mut position.b, config);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_momentum_snaps_to_zero() {
        assert_eq!(decay_component(0.1, 0.4, 0.05, LINEAR_SCALE), 0.0);
        assert_eq!(decay_component(-0.1, 0.6, 0.05, LINEAR_SCALE), 0.0);
        assert_eq!(decay_component(2.5, 0.6, 0.05, LINEAR_SCALE), 1.5);
    }

    #[test]
    fn test_high_decay_still_reaches_zero() {
        let config = PhysicsConfig::default();
        let mut actor = Actor::ready(0.0, 0.0);
        actor.momentum.linear = 10.0;
        actor.momentum.rotational = -20.0;
        actor.momentum.decay = 0.99;

        let mut turns = 0;
        while !actor.momentum.is_zero() {
            advance_actor(&mut actor, &config);
            turns += 1;
            assert!(turns <= 400, "decay stalled");
        }
    }

    #[test]
    fn test_turns_to_rest_bounds_actual_decay() {
        let config = PhysicsConfig::default();
        for (value, decay) in [(2.5f32, 0.6f32), (9.9, 0.9), (0.3, 0.5), (4.0, 0.0)] {
            let bound = turns_to_rest(value, decay, config.momentum_epsilon);
            let mut current = value;
            let mut turns = 0;
            while current != 0.0 {
                current = decay_component(current, decay, config.momentum_epsilon, LINEAR_SCALE);
                turns += 1;
            }
            assert!(turns <= bound, "{value} at {decay}: {turns} > {bound}");
        }
    }

    #[test]
    fn test_body_drifts_to_neutral_without_overshoot() {
        let config = PhysicsConfig::default();
        let mut actor = Actor::ready(0.0, 0.0);
        actor.body.hip_rotation = 20.0;
        actor.body.torso_rotation = -10.0;
        actor.body.weight_distribution = 0.45;
        actor.body.recovering = true;
        actor.body.recovery_ticks = 1;
        actor.balance = 0.5;

        advance_actor(&mut actor, &config);

        assert_eq!(actor.body.hip_rotation, 5.0);
        assert_eq!(actor.body.torso_rotation, 0.0);
        assert_eq!(actor.body.weight_distribution, 0.5);
        assert!(!actor.body.recovering);
        assert!((actor.balance - 0.55).abs() < 1e-6);
    }

    #[test]
    fn test_grounded_recovers_balance_slower() {
        let config = PhysicsConfig::default();
        let mut actor = Actor::ready(0.0, 0.0);
        actor.posture = Posture::Grounded;
        actor.balance = 0.3;
        advance_actor(&mut actor, &config);
        assert!((actor.balance - 0.32).abs() < 1e-6);
    }
}
