//! Fight Tablebase - deduplicated position tree and forward play for a
//! stylized two-fighter duel

pub mod combat;
pub mod core;
pub mod engine;
pub mod moves;
pub mod notation;
pub mod physics;
pub mod position;
pub mod sequence;
pub mod simulation;
pub mod store;
pub mod tree;

pub use crate::core::{EngineConfig, FightError, PerSide, Result, Side};
pub use engine::Engine;
pub use position::{Position, PositionHash};
pub use simulation::{FightReport, FightSimulator};
pub use store::{JsonFileStore, MemoryStore, TablebaseStore};
pub use tree::TreeExplorer;
