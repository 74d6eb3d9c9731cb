//! Physics-admissibility gate
//!
//! Three independent checks: momentum redirection, biomechanical viability
//! and recovery feasibility. Every rule compares signs or thresholds, never
//! magnitudes of the move against magnitudes of the state, so a move that is
//! rejected at some momentum stays rejected at any higher momentum of the
//! same sign.

use thiserror::Error;

use crate::core::config::PhysicsConfig;
use crate::moves::definition::MoveDef;
use crate::position::Actor;

/// Why a move is physically impossible right now
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PhysicsRejection {
    #[error("cannot reverse linear momentum {momentum}")]
    LinearReversal { momentum: f32 },

    #[error("rotational delta {delta} too large while carrying linear momentum {momentum}")]
    RotationUnderLinear { momentum: f32, delta: f32 },

    #[error("must unwind rotational momentum {momentum} first")]
    MustUnwind { momentum: f32 },

    #[error("still recovering ({ticks} ticks), commitment {commitment} too high")]
    Recovering { ticks: u8, commitment: f32 },

    #[error("hips over-rotated ({hip} deg)")]
    HipsOverRotated { hip: f32 },

    #[error("strike rotates against hip rotation {hip} deg")]
    CounterRotation { hip: f32 },

    #[error("weight distribution {weight} outside the working band")]
    WeightOffCentre { weight: f32 },

    #[error("already off-balance, commitment {commitment} too high")]
    Overcommitted { commitment: f32 },
}

fn opposes(current: f32, delta: f32) -> bool {
    current * delta < 0.0
}

/// Validates moves against an actor's momentum and body configuration
#[derive(Debug, Clone, Default)]
pub struct PhysicsValidator {
    pub config: PhysicsConfig,
}

impl PhysicsValidator {
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }

    /// Run all three checks in order
    pub fn check(&self, actor: &Actor, def: &MoveDef) -> Result<(), PhysicsRejection> {
        self.check_redirection(actor, def)?;
        self.check_biomechanics(actor, def)?;
        self.check_recovery(actor, def)
    }

    pub fn admits(&self, actor: &Actor, def: &MoveDef) -> bool {
        self.check(actor, def).is_ok()
    }

    fn check_redirection(&self, actor: &Actor, def: &MoveDef) -> Result<(), PhysicsRejection> {
        let c = &self.config;
        let linear = actor.momentum.linear;
        let rotational = actor.momentum.rotational;
        let effect = &def.physics;

        if linear.abs() > c.linear_redirect_threshold {
            if opposes(linear, effect.linear_delta) {
                return Err(PhysicsRejection::LinearReversal { momentum: linear });
            }
            if effect.rotational_delta.abs() > c.rotational_limit_under_linear {
                return Err(PhysicsRejection::RotationUnderLinear {
                    momentum: linear,
                    delta: effect.rotational_delta,
                });
            }
        }

        if rotational.abs() > c.rotational_unwind_threshold
            && opposes(rotational, effect.rotational_delta)
        {
            return Err(PhysicsRejection::MustUnwind {
                momentum: rotational,
            });
        }

        Ok(())
    }

    fn check_biomechanics(&self, actor: &Actor, def: &MoveDef) -> Result<(), PhysicsRejection> {
        let c = &self.config;
        let body = &actor.body;
        let commitment = def.physics.commitment;

        if body.recovering
            && body.recovery_ticks > c.recovering_tick_allowance
            && commitment > c.recovering_commitment_max
        {
            return Err(PhysicsRejection::Recovering {
                ticks: body.recovery_ticks,
                commitment,
            });
        }

        let hip = body.hip_rotation;
        if hip.abs() > c.hip_rotation_limit {
            if def.category.needs_hip_alignment() {
                return Err(PhysicsRejection::HipsOverRotated { hip });
            }
            if def.category.is_strike() && opposes(hip, def.physics.rotational_delta) {
                return Err(PhysicsRejection::CounterRotation { hip });
            }
        }

        let weight = body.weight_distribution;
        if def.category.needs_weight_band() && !(c.weight_band_min..=c.weight_band_max).contains(&weight)
        {
            return Err(PhysicsRejection::WeightOffCentre { weight });
        }

        Ok(())
    }

    fn check_recovery(&self, actor: &Actor, def: &MoveDef) -> Result<(), PhysicsRejection> {
        let c = &self.config;
        let momentum = &actor.momentum;
        let commitment = def.physics.commitment;

        let off_balance = momentum.linear.abs() > c.moderate_linear
            || momentum.rotational.abs() > c.moderate_rotational;
        if off_balance && commitment > c.overcommit_threshold {
            return Err(PhysicsRejection::Overcommitted { commitment });
        }
        Ok(())
    }
}
