pub mod config;
pub mod error;
pub mod types;

pub use config::{
    ConditionConfig, EngineConfig, ExplorationConfig, PhysicsConfig, SequenceConfig,
    TerminalConfig,
};
pub use error::{FightError, Result};
pub use types::{FightId, Limb, LimbSet, PerSide, Side};
