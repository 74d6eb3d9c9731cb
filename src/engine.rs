//! Engine context
//!
//! Everything the legality, viability and expansion routines need, bundled
//! into one value that is built once and passed by reference. No globals.

use std::path::Path;

use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::moves::registry::MoveRegistry;
use crate::physics::PhysicsValidator;

#[derive(Debug, Clone)]
pub struct Engine {
    pub registry: MoveRegistry,
    pub physics: PhysicsValidator,
    pub config: EngineConfig,
}

impl Engine {
    pub fn new(registry: MoveRegistry, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry,
            physics: PhysicsValidator::new(config.physics.clone()),
            config,
        })
    }

    /// Standard catalogue with default configuration
    pub fn standard() -> Result<Self> {
        Self::new(MoveRegistry::standard()?, EngineConfig::default())
    }

    /// Build from optional config and catalogue files, falling back to the
    /// defaults for whichever is missing
    pub fn load(config: Option<&Path>, moves: Option<&Path>) -> Result<Self> {
        let config = match config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };
        let registry = match moves {
            Some(path) => MoveRegistry::load(path)?,
            None => MoveRegistry::standard()?,
        };
        Self::new(registry, config)
    }
}
