//! Contact resolution
//!
//! Deterministic: whether a move lands depends only on the two fighters'
//! physical state and the attacker's effectiveness. No dice.

use serde::{Deserialize, Serialize};

use crate::combat::stance::Posture;
use crate::combat::zones::{TargetHeight, Zone};
use crate::moves::definition::{MoveCategory, MoveDef};
use crate::position::Actor;

/// Share of the defender's balance the attacker must match to off-balance them
pub const GRAPPLE_BALANCE_RATIO: f32 = 0.8;

/// Outcome of one move against the opponent
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Contact {
    pub hit: bool,
    /// Estimated force delivered (0 on a miss)
    pub force: f32,
    /// Zones struck, in order
    pub zones: Vec<Zone>,
}

impl Contact {
    pub fn miss() -> Self {
        Self::default()
    }
}

/// Does this posture take the fighter out of the strike's line?
fn evades(posture: Posture, target: TargetHeight) -> bool {
    matches!(
        (posture, target),
        (Posture::Crouched, TargetHeight::High) | (Posture::Jumping, TargetHeight::Low)
    )
}

/// Force estimate from nominal force, effectiveness, balance and momentum
pub fn estimate_force(base: f32, effectiveness: f32, attacker: &Actor) -> f32 {
    let balance = 0.5 + 0.5 * attacker.balance;
    let momentum =
        1.0 + 0.15 * attacker.momentum.linear.abs() + 0.05 * attacker.momentum.rotational.abs();
    base * effectiveness * balance * momentum
}

/// Resolve a move's contact with the defender
///
/// `attacker` carries the momentum the move has just added; `defender` is
/// untouched by the move.
pub fn resolve_contact(
    def: &MoveDef,
    attacker: &Actor,
    defender: &Actor,
    effectiveness: f32,
) -> Contact {
    if !def.needs_contact() {
        return Contact::miss();
    }

    let hit = if def.category == MoveCategory::Catch {
        defender.has_extended_leg()
    } else if def.category.is_grapple() {
        attacker.balance * effectiveness >= GRAPPLE_BALANCE_RATIO * defender.balance
    } else {
        !evades(defender.posture, def.target)
    };

    if !hit {
        return Contact::miss();
    }

    let (force, zones) = match &def.damage {
        Some(damage) => (
            estimate_force(damage.force, effectiveness, attacker),
            damage.zones.clone(),
        ),
        None => (0.0, Vec::new()),
    };

    Contact { hit, force, zones }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::registry::MoveRegistry;

    fn pair() -> (Actor, Actor) {
        (Actor::ready(-2.0, 0.0), Actor::ready(2.0, 180.0))
    }

    #[test]
    fn test_duck_evades_high_strike() {
        let registry = MoveRegistry::standard().unwrap();
        let jab = registry.get_str("jab").unwrap();
        let (attacker, mut defender) = pair();

        assert!(resolve_contact(jab, &attacker, &defender, 1.0).hit);

        defender.posture = Posture::Crouched;
        let contact = resolve_contact(jab, &attacker, &defender, 1.0);
        assert!(!contact.hit);
        assert_eq!(contact.force, 0.0);
    }

    #[test]
    fn test_momentum_adds_force() {
        let registry = MoveRegistry::standard().unwrap();
        let cross = registry.get_str("cross").unwrap();
        let (mut attacker, defender) = pair();

        let still = resolve_contact(cross, &attacker, &defender, 1.0).force;
        attacker.momentum.linear = 2.0;
        let moving = resolve_contact(cross, &attacker, &defender, 1.0).force;
        assert!(moving > still);

        let tired = resolve_contact(cross, &attacker, &defender, 0.5).force;
        assert!(tired < moving);
    }

    #[test]
    fn test_grapple_is_a_balance_contest() {
        let registry = MoveRegistry::standard().unwrap();
        let takedown = registry.get_str("single_leg").unwrap();
        let (mut attacker, defender) = pair();

        assert!(resolve_contact(takedown, &attacker, &defender, 1.0).hit);

        attacker.balance = 0.7;
        assert!(!resolve_contact(takedown, &attacker, &defender, 1.0).hit);
    }

    #[test]
    fn test_catch_needs_a_kick_in_flight() {
        let registry = MoveRegistry::standard().unwrap();
        let catch = registry.get_str("catch_kick").unwrap();
        let (attacker, mut defender) = pair();

        assert!(!resolve_contact(catch, &attacker, &defender, 1.0).hit);
        defender.limbs[3].extended = true;
        assert!(resolve_contact(catch, &attacker, &defender, 1.0).hit);
    }

    #[test]
    fn test_non_contact_moves_never_hit() {
        let registry = MoveRegistry::standard().unwrap();
        let step = registry.get_str("step_forward").unwrap();
        let (attacker, defender) = pair();
        assert_eq!(resolve_contact(step, &attacker, &defender, 1.0), Contact::miss());
    }
}
