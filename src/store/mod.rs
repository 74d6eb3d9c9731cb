//! Persistence port for the tablebase
//!
//! The explorer and the simulator only talk to `TablebaseStore`. Every
//! insert is at-most-once per key: inserting a record whose key already
//! exists is a no-op that reports `false`, never an error.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::PerSide;
use crate::position::PositionHash;
use crate::tree::records::{
    FightRecord, LeafExpansion, NoMovesIncident, PathDamage, Transition, TreeNode,
};

/// New records written by one leaf commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommitSummary {
    pub new_nodes: usize,
    pub new_transitions: usize,
    pub new_paths: usize,
}

/// Aggregate counts over the whole store
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreStats {
    pub nodes: usize,
    pub terminal_nodes: usize,
    pub expanded_nodes: usize,
    pub failed_nodes: usize,
    pub transitions: usize,
    pub paths: usize,
    pub terminal_paths: usize,
    /// Terminal nodes won by each side
    pub wins: PerSide<usize>,
    /// Terminal nodes with no winner
    pub draws: usize,
    pub no_move_incidents: usize,
    pub fights: usize,
    pub fight_wins: PerSide<usize>,
    pub fight_draws: usize,
}

/// Storage for nodes, transitions, path records and forward-play results
pub trait TablebaseStore: Send + Sync {
    /// Insert a node unless its hash is already stored
    fn insert_node(&self, node: TreeNode) -> Result<bool>;

    fn node(&self, hash: &PositionHash) -> Result<Option<TreeNode>>;

    /// Insert a transition unless its (from, move, side) key is already stored
    fn insert_transition(&self, transition: Transition) -> Result<bool>;

    fn transitions_from(&self, hash: &PositionHash) -> Result<Vec<Transition>>;

    /// Insert a path record; returns false when its (to, from) key was
    /// already stored
    ///
    /// Two moves from one parent can reach the same child. The stored record
    /// is then whichever of the two `PathDamage::preference` ranks first.
    fn insert_path(&self, path: PathDamage) -> Result<bool>;

    fn paths_into(&self, hash: &PositionHash) -> Result<Vec<PathDamage>>;

    /// Up to `limit` frontier nodes of the shallowest frontier depth, in hash
    /// order
    fn frontier(&self, limit: usize) -> Result<Vec<TreeNode>>;

    /// Write a leaf's children, edges and paths and settle the parent, all
    /// under one lock
    fn commit(&self, expansion: LeafExpansion) -> Result<CommitSummary>;

    /// Take a node out of the frontier after its expansion failed
    fn mark_failed(&self, hash: &PositionHash, reason: &str) -> Result<()>;

    fn record_incident(&self, incident: NoMovesIncident) -> Result<()>;

    fn incidents(&self) -> Result<Vec<NoMovesIncident>>;

    fn record_fight(&self, record: FightRecord) -> Result<()>;

    fn stats(&self) -> Result<StoreStats>;
}
