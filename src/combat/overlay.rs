//! Condition overlay for a fighter
//!
//! Fatigue and damage change every turn but never take part in position
//! hashing. The overlay is attached to a position only during play.

use serde::{Deserialize, Serialize};

use crate::core::types::{Limb, PerSide};
use crate::position::Position;

/// Per-fighter condition (all values 0.0 to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Overlay {
    /// Combat fatigue
    pub fatigue: f32,
    /// Aggregate damage taken
    pub damage: f32,
    /// Damage per limb, indexed by `Limb::index`
    pub limb_damage: [f32; 4],
}

impl Overlay {
    /// A fresh fighter
    pub fn fresh() -> Self {
        Self::default()
    }

    /// Apply fatigue (additive, clamped)
    pub fn add_fatigue(&mut self, amount: f32) {
        self.fatigue = (self.fatigue + amount).clamp(0.0, 1.0);
    }

    /// Recover fatigue
    pub fn recover_fatigue(&mut self, amount: f32) {
        self.fatigue = (self.fatigue - amount).max(0.0);
    }

    pub fn add_damage(&mut self, amount: f32) {
        self.damage = (self.damage + amount).clamp(0.0, 1.0);
    }

    pub fn add_limb_damage(&mut self, limb: Limb, amount: f32) {
        let slot = &mut self.limb_damage[limb.index()];
        *slot = (*slot + amount).clamp(0.0, 1.0);
    }

    pub fn limb(&self, limb: Limb) -> f32 {
        self.limb_damage[limb.index()]
    }
}

/// A position with condition attached; used for forward play and notation,
/// never as a tree key
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeState {
    pub position: Position,
    pub overlays: PerSide<Overlay>,
}

impl RuntimeState {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            overlays: PerSide::splat(Overlay::fresh()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_overlay_is_fresh() {
        let overlay = Overlay::default();
        assert_eq!(overlay.fatigue, 0.0);
        assert_eq!(overlay.damage, 0.0);
        assert_eq!(overlay.limb_damage, [0.0; 4]);
    }

    #[test]
    fn test_fatigue_clamped() {
        let mut overlay = Overlay::fresh();
        overlay.add_fatigue(0.5);
        assert_eq!(overlay.fatigue, 0.5);

        overlay.add_fatigue(0.7);
        assert_eq!(overlay.fatigue, 1.0); // Clamped

        overlay.recover_fatigue(0.3);
        assert!((overlay.fatigue - 0.7).abs() < 0.001);
    }

    #[test]
    fn test_limb_damage_is_per_limb() {
        let mut overlay = Overlay::fresh();
        overlay.add_limb_damage(Limb::LeftLeg, 0.4);
        overlay.add_limb_damage(Limb::LeftLeg, 0.8);

        assert_eq!(overlay.limb(Limb::LeftLeg), 1.0);
        assert_eq!(overlay.limb(Limb::RightLeg), 0.0);
    }
}
