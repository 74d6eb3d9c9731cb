//! Seeded forward play
//!
//! One fight is strictly sequential. Every turn the acting side samples an
//! action sequence, plays it move by move, and the turn closes with the
//! physics advance. Fights share nothing but the store, so a batch of seeds
//! runs in parallel.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::ledger::DamageLedger;
use crate::combat::overlay::RuntimeState;
use crate::combat::terminal::{classify, Verdict};
use crate::core::error::{FightError, Result};
use crate::core::types::{FightId, PerSide, Side};
use crate::engine::Engine;
use crate::moves::definition::MoveId;
use crate::moves::{apply_move, end_turn, selectable};
use crate::notation::encode;
use crate::position::Position;
use crate::sequence::{SequenceBuilder, TurnPlan};
use crate::store::TablebaseStore;
use crate::tree::records::{FightRecord, NoMovesIncident};

/// One move as it was played
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayedMove {
    pub ply: u32,
    pub side: Side,
    pub move_id: MoveId,
    pub hit: bool,
    pub damage: f32,
}

/// Result of one forward-play fight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FightReport {
    pub id: FightId,
    pub seed: u64,
    pub turns: u32,
    pub verdict: Verdict,
    pub moves: Vec<PlayedMove>,
    /// Sequences cut short because an earlier move made a later one illegal
    pub truncated: u32,
    pub hits: PerSide<u32>,
    pub damage: PerSide<f32>,
    /// Final position with both overlays, in compact notation
    pub final_state: String,
}

pub struct FightSimulator<'a> {
    engine: &'a Engine,
    store: &'a dyn TablebaseStore,
    builder: SequenceBuilder,
}

impl<'a> FightSimulator<'a> {
    pub fn new(engine: &'a Engine, store: &'a dyn TablebaseStore) -> Self {
        Self {
            engine,
            store,
            builder: SequenceBuilder::new(engine.config.sequence.clone()),
        }
    }

    /// Play one fight from the opening; the same seed plays the same fight
    pub fn run(&self, seed: u64) -> Result<FightReport> {
        let id = FightId::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let terminal = &self.engine.config.terminal;
        let condition = &self.engine.config.condition;

        let mut position = Position::opening();
        let mut ledger = DamageLedger::fresh();
        let mut moves = Vec::new();
        let mut truncated = 0;

        let verdict = loop {
            if let Some(verdict) = classify(&position, &ledger, terminal) {
                break verdict;
            }

            let side = position.side_to_act();
            let mut current = position.clone();
            current.prepare_turn(side);

            let candidates = selectable(&current, side, ledger.overlay(side), self.engine);
            let sequence = match self.builder.build(&candidates, &mut rng) {
                TurnPlan::Sequence(sequence) => sequence,
                TurnPlan::NoOptions => {
                    let state = RuntimeState {
                        position: current.clone(),
                        overlays: ledger.overlays,
                    };
                    tracing::debug!("Fight {} stuck: no options for {:?}", id, side);
                    self.store.record_incident(NoMovesIncident {
                        fight: id,
                        seed,
                        side,
                        depth: current.move_count,
                        position: encode(&state),
                    })?;
                    break Verdict::no_moves(side);
                }
            };

            for candidate in sequence.moves() {
                let def = candidate.def;
                match apply_move(&current, side, def, candidate.effectiveness, self.engine) {
                    Ok((next, contact)) => {
                        let damage = ledger.charge(
                            side,
                            def,
                            candidate.effectiveness,
                            &contact,
                            &current,
                            &next,
                            condition,
                        );
                        moves.push(PlayedMove {
                            ply: current.move_count,
                            side,
                            move_id: def.id.clone(),
                            hit: contact.hit,
                            damage,
                        });
                        current = next;
                    }
                    Err(FightError::IllegalMove { move_id, reason, .. }) => {
                        tracing::trace!("Sequence truncated at {}: {}", move_id, reason);
                        truncated += 1;
                        break;
                    }
                    Err(e) => return Err(e),
                }
            }

            position = end_turn(current, &self.engine.physics);
            ledger.recover(condition);
        };

        let report = FightReport {
            id,
            seed,
            turns: position.move_count,
            verdict,
            moves,
            truncated,
            hits: ledger.hits,
            damage: ledger.overlays.map(|o| o.damage),
            final_state: encode(&RuntimeState {
                position,
                overlays: ledger.overlays,
            }),
        };

        self.store.record_fight(FightRecord {
            id,
            seed,
            turns: report.turns,
            verdict,
        })?;
        tracing::debug!(
            "Fight {} (seed {}) ended after {} turns: {} ({:?})",
            id,
            seed,
            report.turns,
            verdict.reason,
            verdict.winner
        );
        Ok(report)
    }

    /// Play one fight per seed in parallel
    ///
    /// A failed fight is logged and skipped; store failures abort the batch.
    pub fn run_many(&self, seeds: &[u64]) -> Result<Vec<FightReport>> {
        let results: Vec<Result<FightReport>> =
            seeds.par_iter().map(|&seed| self.run(seed)).collect();

        let mut reports = Vec::with_capacity(results.len());
        for (seed, result) in seeds.iter().zip(results) {
            match result {
                Ok(report) => reports.push(report),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => tracing::warn!("Fight with seed {} failed: {}", seed, e),
            }
        }
        Ok(reports)
    }
}
