//! Tablebase tree: persisted records and the breadth-first explorer

pub mod explorer;
pub mod records;

pub use explorer::{BatchReport, ExplorationReport, TreeExplorer};
pub use records::{
    FightRecord, LeafExpansion, NoMovesIncident, PathDamage, PathKey, Transition, TransitionKey,
    TreeNode,
};
