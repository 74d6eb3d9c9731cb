//! Overlay-only viability
//!
//! How well a fighter in a given condition can perform a move. Zero means the
//! move cannot be performed at all; anything else scales its delivered
//! effect.

use crate::combat::overlay::Overlay;
use crate::core::config::ConditionConfig;
use crate::core::types::LimbSet;
use crate::moves::definition::MoveDef;

/// Effectiveness in [0, 1] for `def` performed with `limbs`
pub fn viability(
    overlay: &Overlay,
    def: &MoveDef,
    limbs: LimbSet,
    condition: &ConditionConfig,
) -> f32 {
    if overlay.damage > condition.incapacitated_damage {
        return 0.0;
    }
    if overlay.fatigue + def.energy_cost > 1.0 {
        return 0.0;
    }

    let limit = def
        .limb_damage_limit
        .unwrap_or(condition.default_limb_damage_limit);
    let mut limb_factor = 1.0;
    for limb in limbs.iter() {
        let damage = overlay.limb(limb);
        if damage > limit {
            return 0.0;
        }
        limb_factor *= 1.0 - 0.5 * damage;
    }

    let score = (1.0 - 0.5 * overlay.fatigue) * (1.0 - 0.3 * overlay.damage) * limb_factor;
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Limb;
    use crate::moves::registry::MoveRegistry;

    fn roundhouse() -> MoveDef {
        MoveRegistry::standard()
            .unwrap()
            .get_str("roundhouse_kick")
            .unwrap()
            .clone()
    }

    #[test]
    fn test_fresh_fighter_is_fully_effective() {
        let kick = roundhouse();
        let limbs = LimbSet::empty().with(Limb::RightLeg);
        let v = viability(&Overlay::fresh(), &kick, limbs, &ConditionConfig::default());
        assert_eq!(v, 1.0);
    }

    #[test]
    fn test_incapacitated_cannot_move() {
        let kick = roundhouse();
        let overlay = Overlay {
            damage: 0.95,
            ..Overlay::fresh()
        };
        let v = viability(&overlay, &kick, LimbSet::empty(), &ConditionConfig::default());
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_move_specific_limb_limit() {
        let kick = roundhouse();
        let limbs = LimbSet::empty().with(Limb::RightLeg);
        let mut overlay = Overlay::fresh();
        overlay.add_limb_damage(Limb::RightLeg, 0.6);

        // Roundhouse carries a 0.5 limit, tighter than the default 0.7
        assert_eq!(viability(&overlay, &kick, limbs, &ConditionConfig::default()), 0.0);

        // Damage to an unused limb only matters through aggregate damage
        let other = LimbSet::empty().with(Limb::LeftLeg);
        assert!(viability(&overlay, &kick, other, &ConditionConfig::default()) > 0.0);
    }

    #[test]
    fn test_exhaustion_blocks_expensive_moves() {
        let kick = roundhouse();
        let overlay = Overlay {
            fatigue: 0.95,
            ..Overlay::fresh()
        };
        assert_eq!(
            viability(&overlay, &kick, LimbSet::empty(), &ConditionConfig::default()),
            0.0
        );
    }

    #[test]
    fn test_condition_scales_effectiveness() {
        let kick = roundhouse();
        let overlay = Overlay {
            fatigue: 0.4,
            damage: 0.5,
            ..Overlay::fresh()
        };
        let v = viability(&overlay, &kick, LimbSet::empty(), &ConditionConfig::default());
        assert!((v - 0.8 * 0.85).abs() < 1e-6);
    }
}
