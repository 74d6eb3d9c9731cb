//! Moves: catalogue, legality, viability and transitions
//!
//! Legality looks only at the position, viability only at the overlay. A
//! move is selectable when both agree.

pub mod definition;
pub mod legality;
pub mod registry;
pub mod transition;
pub mod viability;

pub use definition::{
    ControlTransition, DamageEffect, LimbRole, MoveCategory, MoveDef, MoveId, MoveType,
    PhysicsEffect, PostureTransition, Prerequisites, Reach,
};
pub use legality::{legality, Illegal};
pub use registry::{Candidate, MoveRegistry};
pub use transition::{apply_move, end_turn, step};
pub use viability::viability;

use crate::combat::overlay::Overlay;
use crate::core::types::Side;
use crate::engine::Engine;
use crate::position::Position;

/// Every legal, viable move for `side`, in catalogue order
///
/// `position` must already be prepared for the acting side.
pub fn selectable<'e>(
    position: &Position,
    side: Side,
    overlay: &Overlay,
    engine: &'e Engine,
) -> Vec<Candidate<'e>> {
    engine
        .registry
        .iter()
        .filter_map(|def| match legality(position, side, def, &engine.physics) {
            Ok(limbs) => {
                let effectiveness = viability(overlay, def, limbs, &engine.config.condition);
                (effectiveness > 0.0).then_some(Candidate {
                    def,
                    limbs,
                    effectiveness,
                })
            }
            Err(why) => {
                tracing::trace!("{} rejected for {:?}: {}", def.id, side, why);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_offers_strikes_and_steps() {
        let engine = Engine::standard().unwrap();
        let mut position = Position::opening();
        position.prepare_turn(Side::A);

        let candidates = selectable(&position, Side::A, &Overlay::fresh(), &engine);
        let ids: Vec<&str> = candidates.iter().map(|c| c.def.id.as_str()).collect();

        assert!(ids.contains(&"jab"));
        assert!(ids.contains(&"step_forward"));
        assert!(!ids.contains(&"knee"));
        assert!(!ids.contains(&"stand_up"));
        assert!(candidates.iter().all(|c| c.effectiveness == 1.0));
    }

    #[test]
    fn test_exhausted_fighter_keeps_only_cheap_moves() {
        let engine = Engine::standard().unwrap();
        let position = Position::opening();
        let overlay = Overlay {
            fatigue: 0.98,
            ..Overlay::fresh()
        };

        let candidates = selectable(&position, Side::A, &overlay, &engine);
        assert!(!candidates.is_empty());
        assert!(candidates.iter().all(|c| c.def.energy_cost <= 0.02));
    }
}
