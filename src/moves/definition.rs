//! Move definitions loaded from the TOML catalogue
//!
//! A move is data: classification, costs, reach, the physical effect on the
//! actor, and optional damage, posture and control effects. Behaviour is
//! provided by the free functions in `legality`, `viability` and
//! `transition`, dispatched on `MoveType` and `MoveCategory`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::combat::stance::{ControlState, Posture, Stance};
use crate::combat::zones::{TargetHeight, Zone};
use crate::core::types::{Limb, LimbSet};
use crate::position::DistanceBand;

/// Stable move identifier (the catalogue key)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveId(pub String);

impl MoveId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MoveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// General move type; per-turn caps are counted per type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveType {
    Positional,
    Evasion,
    Deflection,
    Defensive,
    Offensive,
}

impl MoveType {
    pub fn all() -> [MoveType; 5] {
        [
            MoveType::Positional,
            MoveType::Evasion,
            MoveType::Deflection,
            MoveType::Defensive,
            MoveType::Offensive,
        ]
    }

    pub fn index(self) -> usize {
        match self {
            MoveType::Positional => 0,
            MoveType::Evasion => 1,
            MoveType::Deflection => 2,
            MoveType::Defensive => 3,
            MoveType::Offensive => 4,
        }
    }
}

/// Specific move category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCategory {
    Strike,
    Kick,
    Knee,
    Elbow,
    Step,
    Footwork,
    Slip,
    Duck,
    Parry,
    Catch,
    Block,
    Reset,
    Clinch,
    ClinchBreak,
    Takedown,
    Throw,
    Sweep,
    Trip,
    GroundStrike,
    GroundEscape,
    StandUp,
}

impl MoveCategory {
    /// Balance an actor needs before attempting a move of this category
    pub fn min_balance(self) -> f32 {
        match self {
            MoveCategory::Kick | MoveCategory::Throw => 0.6,
            MoveCategory::Knee | MoveCategory::Takedown | MoveCategory::Sweep | MoveCategory::Trip => 0.5,
            MoveCategory::Strike | MoveCategory::Elbow | MoveCategory::Catch | MoveCategory::Clinch => 0.4,
            MoveCategory::Step | MoveCategory::Footwork | MoveCategory::Slip | MoveCategory::Duck => 0.3,
            MoveCategory::Parry | MoveCategory::ClinchBreak => 0.2,
            MoveCategory::Block
            | MoveCategory::Reset
            | MoveCategory::GroundStrike
            | MoveCategory::GroundEscape
            | MoveCategory::StandUp => 0.0,
        }
    }

    /// Striking categories (subject to the hip counter-rotation rule)
    pub fn is_strike(self) -> bool {
        matches!(
            self,
            MoveCategory::Strike
                | MoveCategory::Kick
                | MoveCategory::Knee
                | MoveCategory::Elbow
                | MoveCategory::GroundStrike
        )
    }

    /// Off-balancing attacks resolved by a balance contest
    pub fn is_grapple(self) -> bool {
        matches!(
            self,
            MoveCategory::Takedown | MoveCategory::Throw | MoveCategory::Sweep | MoveCategory::Trip
        )
    }

    /// Blocked while the hips are over-rotated
    pub fn needs_hip_alignment(self) -> bool {
        matches!(self, MoveCategory::Takedown | MoveCategory::Throw)
    }

    /// Blocked while weight sits too far on one leg
    pub fn needs_weight_band(self) -> bool {
        matches!(self, MoveCategory::Sweep | MoveCategory::Trip | MoveCategory::Throw)
    }
}

/// Limb named relative to the current stance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimbRole {
    LeadArm,
    RearArm,
    LeadLeg,
    RearLeg,
}

impl LimbRole {
    pub fn resolve(self, stance: Stance) -> Limb {
        match self {
            LimbRole::LeadArm => stance.lead_arm(),
            LimbRole::RearArm => stance.rear_arm(),
            LimbRole::LeadLeg => stance.lead_leg(),
            LimbRole::RearLeg => stance.rear_leg(),
        }
    }

    pub fn resolve_all(roles: &[LimbRole], stance: Stance) -> LimbSet {
        roles.iter().map(|role| role.resolve(stance)).collect()
    }
}

/// Inclusive range of distance bands a move works from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reach {
    pub min: DistanceBand,
    pub max: DistanceBand,
}

impl Reach {
    pub fn contains(&self, band: DistanceBand) -> bool {
        self.min <= band && band <= self.max
    }
}

impl Default for Reach {
    fn default() -> Self {
        Self {
            min: DistanceBand::Clinch,
            max: DistanceBand::VeryLong,
        }
    }
}

/// What a move does to the actor's own body
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsEffect {
    pub linear_delta: f32,
    pub rotational_delta: f32,
    pub hip_delta: f32,
    pub torso_delta: f32,
    pub weight_delta: f32,
    /// 0.0 (free to abort) to 1.0 (fully committed)
    pub commitment: f32,
    pub recovery_hit: u8,
    pub recovery_miss: u8,
    /// Balance spent; negative values restore balance
    pub balance_cost: f32,
}

/// What a move does to the opponent when it lands
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageEffect {
    /// Direct aggregate damage
    pub damage: f32,
    /// Fatigue inflicted
    pub fatigue: f32,
    /// Opponent limb that absorbs `limb_damage`
    pub target_limb: Option<LimbRole>,
    pub limb_damage: f32,
    /// Nominal force delivered
    pub force: f32,
    /// Opponent balance removed
    pub balance_effect: f32,
    /// Zones hit, in order
    pub zones: Vec<Zone>,
}

/// Posture changes: the actor's applies always, the opponent's only on success
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureTransition {
    pub actor: Option<Posture>,
    pub opponent: Option<Posture>,
}

/// Control change applied on success; the opponent takes the mirrored state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlTransition {
    pub actor: ControlState,
    #[serde(default)]
    pub bind_actor: Vec<LimbRole>,
    #[serde(default)]
    pub bind_opponent: Vec<LimbRole>,
}

fn standing_only() -> Vec<Posture> {
    vec![Posture::Standing]
}

fn uncontrolled_only() -> Vec<ControlState> {
    vec![ControlState::None]
}

/// Position prerequisites; an empty list admits anything
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prerequisites {
    #[serde(default = "standing_only")]
    pub actor_posture: Vec<Posture>,
    #[serde(default)]
    pub opponent_posture: Vec<Posture>,
    #[serde(default = "uncontrolled_only")]
    pub control: Vec<ControlState>,
    #[serde(default)]
    pub stance: Vec<Stance>,
    /// Opponent must have a free leg extended (kick in flight)
    #[serde(default)]
    pub opponent_extended_leg: bool,
}

impl Default for Prerequisites {
    fn default() -> Self {
        Self {
            actor_posture: standing_only(),
            opponent_posture: Vec::new(),
            control: uncontrolled_only(),
            stance: Vec::new(),
            opponent_extended_leg: false,
        }
    }
}

fn admits<T: PartialEq>(allowed: &[T], value: &T) -> bool {
    allowed.is_empty() || allowed.contains(value)
}

impl Prerequisites {
    pub fn admits_actor_posture(&self, posture: Posture) -> bool {
        admits(&self.actor_posture, &posture)
    }

    pub fn admits_opponent_posture(&self, posture: Posture) -> bool {
        admits(&self.opponent_posture, &posture)
    }

    pub fn admits_control(&self, control: ControlState) -> bool {
        admits(&self.control, &control)
    }

    pub fn admits_stance(&self, stance: Stance) -> bool {
        admits(&self.stance, &stance)
    }
}

fn combinable_default() -> bool {
    true
}

/// One catalogue entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveDef {
    pub id: MoveId,
    pub name: String,
    pub move_type: MoveType,
    pub category: MoveCategory,
    /// Milliseconds of the turn budget consumed
    pub time_cost: u32,
    pub energy_cost: f32,
    #[serde(default)]
    pub reach: Reach,
    #[serde(default)]
    pub target: TargetHeight,
    #[serde(default)]
    pub limbs: Vec<LimbRole>,
    #[serde(default = "combinable_default")]
    pub combinable: bool,
    #[serde(default)]
    pub physics: PhysicsEffect,
    #[serde(default)]
    pub damage: Option<DamageEffect>,
    #[serde(default)]
    pub posture: Option<PostureTransition>,
    #[serde(default)]
    pub control: Option<ControlTransition>,
    #[serde(default)]
    pub requires: Prerequisites,
    /// Overrides the default limb damage ceiling for the limbs used
    #[serde(default)]
    pub limb_damage_limit: Option<f32>,
    /// Metres moved toward the opponent
    #[serde(default)]
    pub displacement: f32,
    /// Metres moved to the actor's left
    #[serde(default)]
    pub lateral: f32,
    /// Angle the used limbs end at; `None` leaves them retracted
    #[serde(default)]
    pub extension_angle: Option<f32>,
    #[serde(default)]
    pub switch_stance: bool,
}

impl MoveDef {
    /// Limbs this move occupies for the given stance
    pub fn limb_set(&self, stance: Stance) -> LimbSet {
        LimbRole::resolve_all(&self.limbs, stance)
    }

    pub fn is_offensive(&self) -> bool {
        self.move_type == MoveType::Offensive
    }

    /// Does this move need to win a contact check to take effect?
    pub fn needs_contact(&self) -> bool {
        self.is_offensive() || self.category == MoveCategory::Catch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limb_roles_follow_stance() {
        assert_eq!(LimbRole::LeadArm.resolve(Stance::Orthodox), Limb::LeftArm);
        assert_eq!(LimbRole::LeadArm.resolve(Stance::Southpaw), Limb::RightArm);
        assert_eq!(LimbRole::RearLeg.resolve(Stance::Square), Limb::RightLeg);
    }

    #[test]
    fn test_reach_is_inclusive() {
        let reach = Reach {
            min: DistanceBand::Short,
            max: DistanceBand::Medium,
        };
        assert!(reach.contains(DistanceBand::Short));
        assert!(reach.contains(DistanceBand::Medium));
        assert!(!reach.contains(DistanceBand::Clinch));
        assert!(!reach.contains(DistanceBand::Long));
    }

    #[test]
    fn test_default_prerequisites() {
        let requires = Prerequisites::default();
        assert!(requires.admits_actor_posture(Posture::Standing));
        assert!(!requires.admits_actor_posture(Posture::Grounded));
        assert!(requires.admits_opponent_posture(Posture::Grounded));
        assert!(!requires.admits_control(ControlState::Clinch));
        assert!(requires.admits_stance(Stance::Square));
    }

    #[test]
    fn test_category_families() {
        assert!(MoveCategory::Throw.needs_hip_alignment());
        assert!(MoveCategory::Throw.needs_weight_band());
        assert!(!MoveCategory::Sweep.needs_hip_alignment());
        assert!(MoveCategory::Kick.is_strike());
        assert!(MoveCategory::Kick.min_balance() > MoveCategory::Strike.min_balance());
    }
}
