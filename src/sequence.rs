//! Per-turn action sequence assembly
//!
//! A turn is one or more moves that fit the time budget, never reuse a limb,
//! and respect per-type caps. Only forward play samples sequences; tree
//! expansion enumerates single moves.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::core::config::SequenceConfig;
use crate::core::types::{Limb, LimbSet};
use crate::moves::definition::MoveType;
use crate::moves::registry::Candidate;

/// Why a candidate cannot join the current sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("needs {needed} ms, {remaining} ms left")]
    OverBudget { needed: u32, remaining: u32 },

    #[error("{0:?} already committed this turn")]
    LimbConflict(Limb),

    #[error("move cannot follow another move")]
    NotCombinable,

    #[error("{0:?} cap reached")]
    TypeCap(MoveType),
}

/// Moves chosen for one turn, with running totals
#[derive(Debug, Clone, Default)]
pub struct ActionSequence<'a> {
    moves: Vec<Candidate<'a>>,
    time_used: u32,
    limbs: LimbSet,
    type_counts: [u8; 5],
}

impl<'a> ActionSequence<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moves(&self) -> &[Candidate<'a>] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn time_used(&self) -> u32 {
        self.time_used
    }

    pub fn limbs(&self) -> LimbSet {
        self.limbs
    }

    pub fn count(&self, move_type: MoveType) -> u8 {
        self.type_counts[move_type.index()]
    }

    fn push(&mut self, candidate: Candidate<'a>) {
        self.time_used += candidate.def.time_cost;
        self.limbs = self.limbs.union(candidate.limbs);
        self.type_counts[candidate.move_type().index()] += 1;
        self.moves.push(candidate);
    }
}

/// Outcome of planning a turn
#[derive(Debug, Clone)]
pub enum TurnPlan<'a> {
    /// Nothing legal and viable at turn start
    NoOptions,
    Sequence(ActionSequence<'a>),
}

#[derive(Debug, Clone, Default)]
pub struct SequenceBuilder {
    pub config: SequenceConfig,
}

impl SequenceBuilder {
    pub fn new(config: SequenceConfig) -> Self {
        Self { config }
    }

    pub fn cap(&self, move_type: MoveType) -> u8 {
        match move_type {
            MoveType::Positional => self.config.positional_cap,
            _ => self.config.type_cap,
        }
    }

    /// Check constraints (time, limbs, combinability, type cap) in order
    pub fn admits(
        &self,
        sequence: &ActionSequence<'_>,
        candidate: &Candidate<'_>,
    ) -> Result<(), Rejection> {
        let remaining = self.config.time_budget_ms.saturating_sub(sequence.time_used);
        if candidate.def.time_cost > remaining {
            return Err(Rejection::OverBudget {
                needed: candidate.def.time_cost,
                remaining,
            });
        }
        if let Some(limb) = candidate.limbs.iter().find(|l| sequence.limbs.contains(*l)) {
            return Err(Rejection::LimbConflict(limb));
        }
        if !sequence.is_empty() && !candidate.def.combinable {
            return Err(Rejection::NotCombinable);
        }
        let move_type = candidate.move_type();
        if sequence.count(move_type) >= self.cap(move_type) {
            return Err(Rejection::TypeCap(move_type));
        }
        Ok(())
    }

    /// Sample a sequence from the turn's candidates
    pub fn build<'a, R: Rng>(&self, candidates: &[Candidate<'a>], rng: &mut R) -> TurnPlan<'a> {
        let mut sequence = ActionSequence::new();

        loop {
            let options: Vec<&Candidate<'a>> = candidates
                .iter()
                .filter(|c| self.admits(&sequence, c).is_ok())
                .collect();
            let Some(choice) = options.choose(rng) else {
                break;
            };
            sequence.push(**choice);

            if rng.gen_bool(self.config.early_stop_chance) {
                break;
            }
        }

        if sequence.is_empty() {
            TurnPlan::NoOptions
        } else {
            TurnPlan::Sequence(sequence)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::registry::MoveRegistry;
    use crate::position::Position;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn candidates<'a>(registry: &'a MoveRegistry, ids: &[&str]) -> Vec<Candidate<'a>> {
        let stance = Position::opening().a.stance;
        ids.iter()
            .map(|id| {
                let def = registry.get_str(id).unwrap();
                Candidate {
                    def,
                    limbs: def.limb_set(stance),
                    effectiveness: 1.0,
                }
            })
            .collect()
    }

    fn never_stop() -> SequenceBuilder {
        SequenceBuilder::new(SequenceConfig {
            early_stop_chance: 0.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_no_candidates_is_no_options() {
        let builder = SequenceBuilder::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(builder.build(&[], &mut rng), TurnPlan::NoOptions));
    }

    #[test]
    fn test_limbs_never_reused() {
        let registry = MoveRegistry::standard().unwrap();
        let pool = candidates(&registry, &["jab", "lead_hook", "parry"]);
        let builder = never_stop();

        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            match builder.build(&pool, &mut rng) {
                TurnPlan::Sequence(sequence) => assert_eq!(sequence.len(), 1),
                TurnPlan::NoOptions => panic!("expected a move"),
            }
        }
    }

    #[test]
    fn test_budget_and_caps_hold() {
        let registry = MoveRegistry::standard().unwrap();
        let pool = candidates(
            &registry,
            &["jab", "cross", "low_kick", "step_forward", "circle_left", "duck", "slip"],
        );
        let builder = never_stop();

        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let TurnPlan::Sequence(sequence) = builder.build(&pool, &mut rng) else {
                panic!("expected a sequence");
            };
            assert!(sequence.time_used() <= 1000);
            assert!(sequence.count(MoveType::Positional) <= 1);
            assert!(sequence.count(MoveType::Offensive) <= 2);
            assert!(sequence.count(MoveType::Evasion) <= 2);
        }
    }

    #[test]
    fn test_non_combinable_only_leads() {
        let registry = MoveRegistry::standard().unwrap();
        let pool = candidates(&registry, &["jab", "spinning_back_kick"]);
        let builder = never_stop();
        let mut sequence = ActionSequence::new();

        assert!(builder.admits(&sequence, &pool[1]).is_ok());
        sequence.push(pool[0]);
        assert_eq!(builder.admits(&sequence, &pool[1]), Err(Rejection::NotCombinable));
    }

    #[test]
    fn test_over_budget_rejected() {
        let registry = MoveRegistry::standard().unwrap();
        let pool = candidates(&registry, &["flying_knee", "low_kick"]);
        let builder = never_stop();
        let mut sequence = ActionSequence::new();
        sequence.push(pool[1]);

        assert!(matches!(
            builder.admits(&sequence, &pool[0]),
            Err(Rejection::OverBudget { needed: 700, remaining: 500 })
        ));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let registry = MoveRegistry::standard().unwrap();
        let pool = candidates(&registry, &["jab", "cross", "low_kick", "duck", "slip"]);
        let builder = SequenceBuilder::default();

        let ids = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            match builder.build(&pool, &mut rng) {
                TurnPlan::Sequence(s) => s
                    .moves()
                    .iter()
                    .map(|c| c.def.id.clone())
                    .collect::<Vec<_>>(),
                TurnPlan::NoOptions => Vec::new(),
            }
        };
        assert_eq!(ids(7), ids(7));
    }
}
