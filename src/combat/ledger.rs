//! Path-local damage bookkeeping
//!
//! A ledger travels along one path through the tree. The same position can
//! be reached by many paths, each with its own ledger, so nothing here is
//! ever stored on a node.

use serde::{Deserialize, Serialize};

use crate::combat::overlay::Overlay;
use crate::combat::resolution::Contact;
use crate::combat::zones::Zone;
use crate::core::config::ConditionConfig;
use crate::core::types::{PerSide, Side};
use crate::moves::definition::MoveDef;
use crate::position::Position;

/// A hit on a critical zone, kept for the critical-hit terminal rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalHit {
    pub zone: Zone,
    pub force: f32,
    /// Direct damage the hit dealt
    pub damage: f32,
    /// Side that was hit
    pub target: Side,
    /// Target's aggregate damage just before the hit
    pub prior_damage: f32,
}

/// Cumulative condition along one path
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DamageLedger {
    pub overlays: PerSide<Overlay>,
    pub hits: PerSide<u32>,
    pub criticals: Vec<CriticalHit>,
}

impl DamageLedger {
    pub fn fresh() -> Self {
        Self::default()
    }

    /// Both sides' aggregate damage; used to rank competing paths
    pub fn total_damage(&self) -> f32 {
        self.overlays.a.damage + self.overlays.b.damage
    }

    pub fn total_fatigue(&self) -> f32 {
        self.overlays.a.fatigue + self.overlays.b.fatigue
    }

    pub fn overlay(&self, side: Side) -> &Overlay {
        &self.overlays[side]
    }

    /// Account for one ply played by `side`: the move's charge followed by
    /// the per-ply fatigue recovery
    ///
    /// `before` is the position the move was chosen from, `after` the
    /// position right after the move and before the end-of-turn advance.
    /// Returns the damage dealt to the defender.
    #[allow(clippy::too_many_arguments)]
    pub fn record_ply(
        &mut self,
        side: Side,
        def: &MoveDef,
        effectiveness: f32,
        contact: &Contact,
        before: &Position,
        after: &Position,
        condition: &ConditionConfig,
    ) -> f32 {
        let dealt = self.charge(side, def, effectiveness, contact, before, after, condition);
        self.recover(condition);
        dealt
    }

    /// Charge one move without any recovery
    #[allow(clippy::too_many_arguments)]
    pub fn charge(
        &mut self,
        side: Side,
        def: &MoveDef,
        effectiveness: f32,
        contact: &Contact,
        before: &Position,
        after: &Position,
        condition: &ConditionConfig,
    ) -> f32 {
        let defender = side.opponent();
        self.overlays[side].add_fatigue(def.energy_cost);

        let balance_drop = (before.actor(defender).balance - after.actor(defender).balance).max(0.0);
        let mut dealt = condition.balance_damage_factor * balance_drop;

        if contact.hit {
            if let Some(effect) = &def.damage {
                let prior_damage = self.overlays[defender].damage;
                let direct = effect.damage * effectiveness;
                dealt += direct;

                let target = &mut self.overlays[defender];
                target.add_fatigue(effect.fatigue * effectiveness);
                if let Some(role) = effect.target_limb {
                    let limb = role.resolve(before.actor(defender).stance);
                    target.add_limb_damage(limb, effect.limb_damage * effectiveness);
                }
                self.hits[side] += 1;

                for zone in contact.zones.iter().filter(|z| z.is_critical()) {
                    self.criticals.push(CriticalHit {
                        zone: *zone,
                        force: contact.force,
                        damage: direct,
                        target: defender,
                        prior_damage,
                    });
                }
            }
        }

        self.overlays[defender].add_damage(dealt);
        dealt
    }

    /// Fatigue both sides recover per ply
    pub fn recover(&mut self, condition: &ConditionConfig) {
        for overlay in [&mut self.overlays.a, &mut self.overlays.b] {
            overlay.recover_fatigue(condition.fatigue_recovery);
        }
    }
}
