//! Terminal classification
//!
//! Rules are evaluated in a fixed priority order and the first one that
//! fires decides. The first three depend only on the position; the last two
//! need the path's damage ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::combat::ledger::DamageLedger;
use crate::combat::stance::Posture;
use crate::core::config::TerminalConfig;
use crate::core::types::Side;
use crate::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalReason {
    /// Depth ceiling reached
    Stalemate,
    /// Balance below the fallen threshold
    Fallen,
    /// Grounded with too little balance to defend
    Helpless,
    /// Path damage over the threshold
    DamageThreshold,
    /// Fight-ending hit on a critical zone
    CriticalHit,
    /// The side to move has no legal, viable move
    NoMoves,
}

impl fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TerminalReason::Stalemate => "stalemate",
            TerminalReason::Fallen => "fallen",
            TerminalReason::Helpless => "helpless",
            TerminalReason::DamageThreshold => "damage threshold",
            TerminalReason::CriticalHit => "critical hit",
            TerminalReason::NoMoves => "no moves",
        };
        f.write_str(name)
    }
}

/// Why a line ended and who won it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub reason: TerminalReason,
    pub winner: Option<Side>,
}

impl Verdict {
    pub fn new(reason: TerminalReason, winner: Option<Side>) -> Self {
        Self { reason, winner }
    }

    pub fn no_moves(stuck: Side) -> Self {
        Self::new(TerminalReason::NoMoves, Some(stuck.opponent()))
    }
}

/// Apply a per-side losing condition; both sides losing is a draw
fn side_rule(reason: TerminalReason, loses: impl Fn(Side) -> bool) -> Option<Verdict> {
    match (loses(Side::A), loses(Side::B)) {
        (false, false) => None,
        (true, true) => Some(Verdict::new(reason, None)),
        (true, false) => Some(Verdict::new(reason, Some(Side::B))),
        (false, true) => Some(Verdict::new(reason, Some(Side::A))),
    }
}

/// Path-independent rules: depth ceiling, fallen, helpless
pub fn classify_position(position: &Position, config: &TerminalConfig) -> Option<Verdict> {
    if position.move_count == config.depth_ceiling {
        return Some(Verdict::new(TerminalReason::Stalemate, None));
    }

    side_rule(TerminalReason::Fallen, |side| {
        position.actor(side).balance < config.fallen_balance
    })
    .or_else(|| {
        side_rule(TerminalReason::Helpless, |side| {
            let actor = position.actor(side);
            actor.posture == Posture::Grounded && actor.balance < config.helpless_balance
        })
    })
}

/// Full classification of a position reached along a path
pub fn classify(
    position: &Position,
    ledger: &DamageLedger,
    config: &TerminalConfig,
) -> Option<Verdict> {
    classify_position(position, config)
        .or_else(|| {
            side_rule(TerminalReason::DamageThreshold, |side| {
                ledger.overlay(side).damage > config.damage_threshold
            })
        })
        .or_else(|| {
            side_rule(TerminalReason::CriticalHit, |side| {
                ledger.criticals.iter().any(|hit| {
                    let nominal = hit.zone.nominal_force() * config.critical_force_multiplier;
                    let scaled = nominal * (1.0 - hit.prior_damage).clamp(0.0, 1.0);
                    hit.target == side && (hit.force > nominal || hit.force > scaled)
                })
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ledger::CriticalHit;
    use crate::combat::zones::Zone;

    fn config() -> TerminalConfig {
        TerminalConfig::default()
    }

    #[test]
    fn test_fallen_regardless_of_turn() {
        for move_count in [4, 5] {
            let mut position = Position::opening();
            position.move_count = move_count;
            position.b.balance = 0.15;
            let verdict = classify_position(&position, &config()).unwrap();
            assert_eq!(verdict, Verdict::new(TerminalReason::Fallen, Some(Side::A)));
        }
    }

    #[test]
    fn test_helpless_needs_grounded() {
        let mut position = Position::opening();
        position.a.balance = 0.3;
        assert_eq!(classify_position(&position, &config()), None);

        position.a.posture = Posture::Grounded;
        let verdict = classify_position(&position, &config()).unwrap();
        assert_eq!(verdict.reason, TerminalReason::Helpless);
        assert_eq!(verdict.winner, Some(Side::B));
    }

    #[test]
    fn test_depth_ceiling_outranks_damage() {
        let mut position = Position::opening();
        position.move_count = config().depth_ceiling;
        let mut ledger = DamageLedger::fresh();
        ledger.overlays.a.damage = 0.95;

        let verdict = classify(&position, &ledger, &config()).unwrap();
        assert_eq!(verdict, Verdict::new(TerminalReason::Stalemate, None));

        position.move_count -= 1;
        let verdict = classify(&position, &ledger, &config()).unwrap();
        assert_eq!(verdict, Verdict::new(TerminalReason::DamageThreshold, Some(Side::B)));
    }

    #[test]
    fn test_mutual_fall_has_no_winner() {
        let mut position = Position::opening();
        position.a.balance = 0.1;
        position.b.balance = 0.1;
        let verdict = classify_position(&position, &config()).unwrap();
        assert_eq!(verdict.winner, None);
    }

    #[test]
    fn test_critical_threshold_scales_with_prior_damage() {
        let position = Position::opening();
        let nominal = Zone::Jaw.nominal_force() * 1.5;
        let mut ledger = DamageLedger::fresh();
        ledger.criticals.push(CriticalHit {
            zone: Zone::Jaw,
            force: nominal * 0.8,
            damage: 0.1,
            target: Side::B,
            prior_damage: 0.0,
        });
        assert_eq!(classify(&position, &ledger, &config()), None);

        ledger.criticals[0].prior_damage = 0.5;
        let verdict = classify(&position, &ledger, &config()).unwrap();
        assert_eq!(verdict, Verdict::new(TerminalReason::CriticalHit, Some(Side::A)));
    }
}
