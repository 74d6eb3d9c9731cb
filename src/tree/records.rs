//! Persisted tablebase records

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::combat::ledger::DamageLedger;
use crate::combat::terminal::{TerminalReason, Verdict};
use crate::combat::zones::Zone;
use crate::core::types::{FightId, Side};
use crate::moves::definition::MoveId;
use crate::position::PositionHash;

/// One deduplicated position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub hash: PositionHash,
    /// Compact notation of the position with fresh overlays
    pub position: String,
    pub depth: u32,
    pub terminal: bool,
    pub reason: Option<TerminalReason>,
    pub winner: Option<Side>,
    pub expanded: bool,
    /// Set when expansion of this node failed; failed nodes are skipped
    #[serde(default)]
    pub failure: Option<String>,
}

impl TreeNode {
    /// A node waiting to be expanded
    pub fn open(hash: PositionHash, position: String, depth: u32) -> Self {
        Self {
            hash,
            position,
            depth,
            terminal: false,
            reason: None,
            winner: None,
            expanded: false,
            failure: None,
        }
    }

    /// A node that is settled as soon as it is created
    pub fn settled(hash: PositionHash, position: String, depth: u32, verdict: Verdict) -> Self {
        let mut node = Self::open(hash, position, depth);
        node.settle(verdict);
        node
    }

    pub fn settle(&mut self, verdict: Verdict) {
        self.terminal = true;
        self.reason = Some(verdict.reason);
        self.winner = verdict.winner;
        self.expanded = true;
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.reason.map(|reason| Verdict::new(reason, self.winner))
    }

    /// Still waiting for expansion
    pub fn is_frontier(&self) -> bool {
        !self.expanded && !self.terminal && self.failure.is_none()
    }
}

/// Key of a transition: one move by one side from one position
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransitionKey {
    pub from: PositionHash,
    pub move_id: MoveId,
    pub side: Side,
}

/// One edge of the tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from: PositionHash,
    pub to: PositionHash,
    pub move_id: MoveId,
    pub side: Side,
    pub hit: bool,
    pub force: f32,
    pub damage: f32,
    pub zones: Vec<Zone>,
}

impl Transition {
    pub fn key(&self) -> TransitionKey {
        TransitionKey {
            from: self.from.clone(),
            move_id: self.move_id.clone(),
            side: self.side,
        }
    }
}

/// Key of a path record: (to, from)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathKey {
    pub to: PositionHash,
    pub from: PositionHash,
}

/// Cumulative damage carried along one specific edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathDamage {
    pub to: PositionHash,
    pub from: PositionHash,
    pub ledger: DamageLedger,
    /// Full classification of `to` reached along this edge
    pub verdict: Option<Verdict>,
}

impl PathDamage {
    pub fn key(&self) -> PathKey {
        PathKey {
            to: self.to.clone(),
            from: self.from.clone(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.verdict.is_some()
    }

    /// Order between two records for the same edge: open before terminal,
    /// then less total damage, then less total fatigue
    pub fn preference(&self, other: &PathDamage) -> Ordering {
        self.is_terminal()
            .cmp(&other.is_terminal())
            .then_with(|| self.ledger.total_damage().total_cmp(&other.ledger.total_damage()))
            .then_with(|| self.ledger.total_fatigue().total_cmp(&other.ledger.total_fatigue()))
    }
}

/// A side with no legal, viable move during forward play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoMovesIncident {
    pub fight: FightId,
    pub seed: u64,
    pub side: Side,
    pub depth: u32,
    /// Compact notation including the overlays at the time
    pub position: String,
}

/// Summary of one forward-play fight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FightRecord {
    pub id: FightId,
    pub seed: u64,
    pub turns: u32,
    pub verdict: Verdict,
}

/// Everything one leaf expansion produced, committed as one unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafExpansion {
    pub parent: PositionHash,
    /// Verdict for the parent itself when it turned out terminal
    pub verdict: Option<Verdict>,
    pub children: Vec<TreeNode>,
    pub transitions: Vec<Transition>,
    pub paths: Vec<PathDamage>,
}

impl LeafExpansion {
    pub fn new(parent: PositionHash) -> Self {
        Self {
            parent,
            verdict: None,
            children: Vec::new(),
            transitions: Vec::new(),
            paths: Vec::new(),
        }
    }

    /// The parent is settled without children
    pub fn terminal(parent: PositionHash, verdict: Verdict) -> Self {
        Self {
            verdict: Some(verdict),
            ..Self::new(parent)
        }
    }
}
