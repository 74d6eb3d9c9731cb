//! Physical state of one fighter
//!
//! Everything here is part of the tree key. Condition (fatigue, damage)
//! lives in `Overlay` and is deliberately absent.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::combat::stance::{ControlState, Posture, Stance};
use crate::core::types::Limb;
use crate::position::quantize::{
    snap, snap_clamped, wrap_degrees, ANGLE_LIMIT, ANGLE_SCALE, DECAY_MAX, DECAY_SCALE,
    LINEAR_LIMIT, LINEAR_SCALE, LOCATION_LIMIT, LOCATION_SCALE, MAX_RECOVERY_TICKS,
    ROTATIONAL_LIMIT, ROTATIONAL_SCALE, UNIT_SCALE,
};

/// Location in metres plus facing in degrees (0 = +x)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub location: Vec3,
    pub facing: f32,
}

impl Pose {
    pub fn new(location: Vec3, facing: f32) -> Self {
        Self { location, facing }
    }

    /// Unit vector in the facing direction (ground plane)
    pub fn forward(&self) -> Vec3 {
        let radians = self.facing.to_radians();
        Vec3::new(radians.cos(), radians.sin(), 0.0)
    }

    fn canonicalize(&mut self) {
        let l = self.location;
        self.location = Vec3::new(
            snap_clamped(l.x, LOCATION_SCALE, -LOCATION_LIMIT, LOCATION_LIMIT),
            snap_clamped(l.y, LOCATION_SCALE, -LOCATION_LIMIT, LOCATION_LIMIT),
            snap_clamped(l.z, LOCATION_SCALE, -LOCATION_LIMIT, LOCATION_LIMIT),
        );
        self.facing = wrap_degrees(self.facing);
    }
}

/// One limb's configuration (damage is tracked in the overlay)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimbConfig {
    /// Not bound by a grip or a clinch
    pub free: bool,
    pub extended: bool,
    /// Angle relative to the torso, degrees
    pub angle: f32,
}

impl LimbConfig {
    /// Free, retracted, at rest
    pub fn ready() -> Self {
        Self {
            free: true,
            extended: false,
            angle: 0.0,
        }
    }

    /// Can this limb start a new move?
    pub fn available(&self) -> bool {
        self.free && !self.extended
    }

    pub fn retract(&mut self) {
        self.extended = false;
        self.angle = 0.0;
    }

    pub fn code(&self) -> char {
        match (self.free, self.extended) {
            (true, false) => '-',
            (true, true) => 'E',
            (false, true) => 'B',
            (false, false) => 'X',
        }
    }

    pub fn from_code(c: char) -> Option<(bool, bool)> {
        match c {
            '-' => Some((true, false)),
            'E' => Some((true, true)),
            'B' => Some((false, true)),
            'X' => Some((false, false)),
            _ => None,
        }
    }
}

/// Linear and rotational momentum with a per-turn decay factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Momentum {
    /// Positive = toward the opponent
    pub linear: f32,
    /// Positive = rotation driven from the rear side
    pub rotational: f32,
    /// Fraction of momentum kept at the end of each turn
    pub decay: f32,
}

impl Momentum {
    pub const DEFAULT_DECAY: f32 = 0.6;

    pub fn at_rest() -> Self {
        Self {
            linear: 0.0,
            rotational: 0.0,
            decay: Self::DEFAULT_DECAY,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.linear == 0.0 && self.rotational == 0.0
    }
}

/// Hip/torso wind-up, weight distribution and post-move recovery
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    /// Degrees; positive = rear hip driven forward
    pub hip_rotation: f32,
    /// Degrees, same sign convention as hips
    pub torso_rotation: f32,
    /// 0.0 = all weight on the rear leg, 1.0 = all on the lead leg
    pub weight_distribution: f32,
    pub recovering: bool,
    pub recovery_ticks: u8,
}

impl BodyConfig {
    pub fn neutral() -> Self {
        Self {
            hip_rotation: 0.0,
            torso_rotation: 0.0,
            weight_distribution: 0.5,
            recovering: false,
            recovery_ticks: 0,
        }
    }
}

/// Complete physical state of one fighter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub pose: Pose,
    pub stance: Stance,
    /// 0.0 (on the floor) to 1.0 (perfectly set)
    pub balance: f32,
    /// Indexed by `Limb::index`
    pub limbs: [LimbConfig; 4],
    pub control: ControlState,
    pub posture: Posture,
    pub momentum: Momentum,
    pub body: BodyConfig,
}

impl Actor {
    /// Fresh fighter standing at `x`, facing `facing` degrees
    pub fn ready(x: f32, facing: f32) -> Self {
        Self {
            pose: Pose::new(Vec3::new(x, 0.0, 0.0), facing),
            stance: Stance::Orthodox,
            balance: 1.0,
            limbs: [LimbConfig::ready(); 4],
            control: ControlState::None,
            posture: Posture::Standing,
            momentum: Momentum::at_rest(),
            body: BodyConfig::neutral(),
        }
    }

    pub fn limb(&self, limb: Limb) -> &LimbConfig {
        &self.limbs[limb.index()]
    }

    pub fn limb_mut(&mut self, limb: Limb) -> &mut LimbConfig {
        &mut self.limbs[limb.index()]
    }

    /// Does any free leg stick out (kick in flight)?
    pub fn has_extended_leg(&self) -> bool {
        [Limb::LeftLeg, Limb::RightLeg]
            .iter()
            .any(|l| self.limb(*l).free && self.limb(*l).extended)
    }

    /// Clear state that only lasts until this fighter moves again
    pub fn clear_transients(&mut self) {
        for limb in self.limbs.iter_mut() {
            if limb.free && limb.extended {
                limb.retract();
            }
        }
        if self.posture.is_transient() {
            self.posture = Posture::Standing;
        }
    }

    /// Release every limb binding
    pub fn release_limbs(&mut self) {
        for limb in self.limbs.iter_mut() {
            limb.free = true;
            limb.retract();
        }
    }

    /// Snap every continuous field to the shared grid
    pub fn canonicalize(&mut self) {
        self.pose.canonicalize();
        self.balance = snap_clamped(self.balance, UNIT_SCALE, 0.0, 1.0);
        for limb in self.limbs.iter_mut() {
            limb.angle = snap_clamped(limb.angle, ANGLE_SCALE, -ANGLE_LIMIT, ANGLE_LIMIT);
        }

        let m = &mut self.momentum;
        m.linear = snap_clamped(m.linear, LINEAR_SCALE, -LINEAR_LIMIT, LINEAR_LIMIT);
        m.rotational = snap_clamped(
            m.rotational,
            ROTATIONAL_SCALE,
            -ROTATIONAL_LIMIT,
            ROTATIONAL_LIMIT,
        );
        m.decay = snap_clamped(m.decay, DECAY_SCALE, 0.0, DECAY_MAX);

        let b = &mut self.body;
        b.hip_rotation = snap_clamped(b.hip_rotation, ANGLE_SCALE, -ANGLE_LIMIT, ANGLE_LIMIT);
        b.torso_rotation = snap_clamped(b.torso_rotation, ANGLE_SCALE, -ANGLE_LIMIT, ANGLE_LIMIT);
        b.weight_distribution = snap(b.weight_distribution.clamp(0.0, 1.0), UNIT_SCALE);
        b.recovery_ticks = b.recovery_ticks.min(MAX_RECOVERY_TICKS);
        if !b.recovering {
            b.recovery_ticks = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_actor_has_all_limbs_available() {
        let actor = Actor::ready(0.0, 0.0);
        assert!(Limb::all().iter().all(|l| actor.limb(*l).available()));
        assert_eq!(actor.balance, 1.0);
        assert!(actor.momentum.is_zero());
    }

    #[test]
    fn test_clear_transients_keeps_bindings() {
        let mut actor = Actor::ready(0.0, 0.0);
        actor.posture = Posture::Crouched;
        actor.limb_mut(Limb::LeftArm).extended = true;
        actor.limb_mut(Limb::RightArm).free = false;
        actor.limb_mut(Limb::RightArm).extended = true;

        actor.clear_transients();

        assert_eq!(actor.posture, Posture::Standing);
        assert!(actor.limb(Limb::LeftArm).available());
        assert_eq!(actor.limb(Limb::RightArm).code(), 'B');
    }

    #[test]
    fn test_grounded_is_not_transient() {
        let mut actor = Actor::ready(0.0, 0.0);
        actor.posture = Posture::Grounded;
        actor.clear_transients();
        assert_eq!(actor.posture, Posture::Grounded);
    }

    #[test]
    fn test_canonicalize_clamps_and_snaps() {
        let mut actor = Actor::ready(0.0, 0.0);
        actor.balance = 1.3;
        actor.momentum.linear = 0.3333;
        actor.body.hip_rotation = 250.0;
        actor.pose.facing = -1.0;

        actor.canonicalize();

        assert_eq!(actor.balance, 1.0);
        assert_eq!(actor.momentum.linear, 0.3);
        assert_eq!(actor.body.hip_rotation, 180.0);
        assert_eq!(actor.pose.facing, 359.0);
    }

    #[test]
    fn test_limb_codes() {
        for c in ['-', 'E', 'B', 'X'] {
            let (free, extended) = LimbConfig::from_code(c).unwrap();
            let limb = LimbConfig {
                free,
                extended,
                angle: 0.0,
            };
            assert_eq!(limb.code(), c);
        }
    }
}
