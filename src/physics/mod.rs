//! Physics: the admissibility gate and the end-of-turn advance

pub mod advance;
pub mod validator;

pub use advance::{advance_actor, advance_position, decay_component, turns_to_rest};
pub use validator::{PhysicsRejection, PhysicsValidator};

use crate::position::Position;

impl PhysicsValidator {
    /// Advance both fighters by one turn
    pub fn advance(&self, position: &mut Position) {
        advance_position(position, &self.config);
    }
}
