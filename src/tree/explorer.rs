//! Breadth-first tree expansion
//!
//! A batch takes the shallowest unexpanded nodes, expands each one in
//! memory (in parallel once the batch is large enough), then commits the
//! leaves one at a time in hash order. Expansion enumerates every
//! selectable move; nothing here is random.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::ledger::DamageLedger;
use crate::combat::terminal::{classify, classify_position, Verdict};
use crate::core::error::{FightError, Result};
use crate::engine::Engine;
use crate::moves::{apply_move, end_turn, selectable};
use crate::notation::{decode_position, encode_position};
use crate::position::{Position, PositionHash};
use crate::store::TablebaseStore;
use crate::tree::records::{LeafExpansion, PathDamage, Transition, TreeNode};

/// Outcome of one batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Depth the batch was drawn from; `None` when the frontier was empty
    pub depth: Option<u32>,
    pub leaves: usize,
    pub expanded: usize,
    /// Leaves settled as terminal instead of getting children
    pub terminal_leaves: usize,
    pub failed: usize,
    pub new_nodes: usize,
    pub new_transitions: usize,
    pub new_paths: usize,
}

/// Totals over a multi-batch run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplorationReport {
    pub batches: usize,
    pub leaves: usize,
    pub terminal_leaves: usize,
    pub failed: usize,
    pub new_nodes: usize,
    pub new_transitions: usize,
    pub new_paths: usize,
    /// The frontier ran dry before the batch limit
    pub exhausted: bool,
}

impl ExplorationReport {
    fn absorb(&mut self, batch: &BatchReport) {
        self.batches += 1;
        self.leaves += batch.leaves;
        self.terminal_leaves += batch.terminal_leaves;
        self.failed += batch.failed;
        self.new_nodes += batch.new_nodes;
        self.new_transitions += batch.new_transitions;
        self.new_paths += batch.new_paths;
    }
}

pub struct TreeExplorer<'a> {
    engine: &'a Engine,
    store: &'a dyn TablebaseStore,
}

impl<'a> TreeExplorer<'a> {
    pub fn new(engine: &'a Engine, store: &'a dyn TablebaseStore) -> Self {
        Self { engine, store }
    }

    /// Store `position` as a tree root unless it is already present
    pub fn seed_root(&self, position: &Position) -> Result<PositionHash> {
        let position = position.canonical();
        let hash = position.hash();
        let notation = encode_position(&position);
        let node = match classify_position(&position, &self.engine.config.terminal) {
            Some(verdict) => TreeNode::settled(hash.clone(), notation, position.move_count, verdict),
            None => TreeNode::open(hash.clone(), notation, position.move_count),
        };
        if self.store.insert_node(node)? {
            tracing::debug!("Seeded root {}", hash);
        }
        Ok(hash)
    }

    /// Compute everything one node contributes to the tree without writing
    pub fn expand_leaf(&self, node: &TreeNode) -> Result<LeafExpansion> {
        let malformed = |reason: String| FightError::MalformedRecord {
            hash: node.hash.to_string(),
            reason,
        };

        let position = decode_position(&node.position).map_err(|e| malformed(e.to_string()))?;
        if position.hash() != node.hash {
            return Err(malformed("stored position does not match its hash".into()));
        }
        if position.move_count != node.depth {
            return Err(malformed(format!(
                "depth {} but position has {} plies",
                node.depth, position.move_count
            )));
        }

        let terminal = &self.engine.config.terminal;
        if let Some(verdict) = classify_position(&position, terminal) {
            return Ok(LeafExpansion::terminal(node.hash.clone(), verdict));
        }

        let ledger = match self.context(node)? {
            Context::Ledger(ledger) => ledger,
            Context::Settled(verdict) => {
                return Ok(LeafExpansion::terminal(node.hash.clone(), verdict))
            }
        };

        let side = position.side_to_act();
        let mut prepared = position;
        prepared.prepare_turn(side);

        let candidates = selectable(&prepared, side, ledger.overlay(side), self.engine);
        if candidates.is_empty() {
            tracing::debug!("No moves for {:?} at {}", side, node.hash);
            return Ok(LeafExpansion::terminal(
                node.hash.clone(),
                Verdict::no_moves(side),
            ));
        }

        let mut expansion = LeafExpansion::new(node.hash.clone());
        for candidate in candidates {
            let def = candidate.def;
            let (moved, contact) =
                apply_move(&prepared, side, def, candidate.effectiveness, self.engine)?;

            let mut path_ledger = ledger.clone();
            let dealt = path_ledger.record_ply(
                side,
                def,
                candidate.effectiveness,
                &contact,
                &prepared,
                &moved,
                &self.engine.config.condition,
            );

            let child = end_turn(moved, &self.engine.physics);
            let hash = child.hash();

            let notation = encode_position(&child);
            expansion.children.push(match classify_position(&child, terminal) {
                Some(verdict) => TreeNode::settled(hash.clone(), notation, child.move_count, verdict),
                None => TreeNode::open(hash.clone(), notation, child.move_count),
            });
            expansion.transitions.push(Transition {
                from: node.hash.clone(),
                to: hash.clone(),
                move_id: def.id.clone(),
                side,
                hit: contact.hit,
                force: contact.force,
                damage: dealt,
                zones: contact.zones,
            });
            let verdict = classify(&child, &path_ledger, terminal);
            expansion.paths.push(PathDamage {
                to: hash,
                from: node.hash.clone(),
                ledger: path_ledger,
                verdict,
            });
        }
        Ok(expansion)
    }

    /// Expand up to `limit` frontier nodes of the shallowest depth
    pub fn expand_batch(&self, limit: usize) -> Result<BatchReport> {
        let frontier = self.store.frontier(limit)?;
        let mut report = BatchReport {
            depth: frontier.first().map(|n| n.depth),
            leaves: frontier.len(),
            ..Default::default()
        };
        if frontier.is_empty() {
            return Ok(report);
        }

        let expansions: Vec<Result<LeafExpansion>> =
            if frontier.len() >= self.engine.config.exploration.parallel_threshold {
                frontier.par_iter().map(|node| self.expand_leaf(node)).collect()
            } else {
                frontier.iter().map(|node| self.expand_leaf(node)).collect()
            };

        for (node, expansion) in frontier.iter().zip(expansions) {
            match expansion {
                Ok(expansion) => {
                    if expansion.verdict.is_some() {
                        report.terminal_leaves += 1;
                    }
                    let summary = self.store.commit(expansion)?;
                    report.expanded += 1;
                    report.new_nodes += summary.new_nodes;
                    report.new_transitions += summary.new_transitions;
                    report.new_paths += summary.new_paths;
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!("Expansion of {} failed: {}", node.hash, e);
                    self.store.mark_failed(&node.hash, &e.to_string())?;
                    report.failed += 1;
                }
            }
        }

        tracing::debug!(
            depth = ?report.depth,
            leaves = report.leaves,
            new_nodes = report.new_nodes,
            failed = report.failed,
            "Batch committed"
        );
        Ok(report)
    }

    /// Run up to `batches` batches, stopping early once the frontier is empty
    pub fn run(&self, batches: usize, limit: usize) -> Result<ExplorationReport> {
        let mut report = ExplorationReport::default();
        for _ in 0..batches {
            let batch = self.expand_batch(limit)?;
            if batch.leaves == 0 {
                report.exhausted = true;
                break;
            }
            report.absorb(&batch);
        }
        Ok(report)
    }

    /// Ledger the node is expanded under
    ///
    /// Roots start fresh. Other nodes take the cheapest non-terminal incoming
    /// path (ties to the smallest parent hash); a node reached only along
    /// terminal paths is settled with the verdict of the first of those.
    fn context(&self, node: &TreeNode) -> Result<Context> {
        let mut incoming = self.store.paths_into(&node.hash)?;
        if incoming.is_empty() {
            return Ok(Context::Ledger(DamageLedger::fresh()));
        }

        incoming.sort_by(|a, b| {
            a.ledger
                .total_damage()
                .total_cmp(&b.ledger.total_damage())
                .then_with(|| a.from.cmp(&b.from))
        });
        if let Some(open) = incoming.iter().find(|p| !p.is_terminal()) {
            return Ok(Context::Ledger(open.ledger.clone()));
        }
        match incoming[0].verdict {
            Some(verdict) => Ok(Context::Settled(verdict)),
            None => Ok(Context::Ledger(incoming[0].ledger.clone())),
        }
    }
}

enum Context {
    Ledger(DamageLedger),
    Settled(Verdict),
}
