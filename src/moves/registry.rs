//! Move catalogue
//!
//! Loaded once from TOML and then shared by reference. Iteration order is the
//! catalogue order, which keeps candidate lists (and therefore the tree)
//! deterministic.

use ahash::AHashMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::core::error::{FightError, Result};
use crate::core::types::LimbSet;
use crate::moves::definition::{MoveDef, MoveId, MoveType};

const STANDARD_CATALOGUE: &str = include_str!("../../data/moves.toml");

#[derive(Debug, Deserialize)]
struct Catalogue {
    moves: Vec<MoveDef>,
}

/// A move that is both legal and viable for one side right now
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub def: &'a MoveDef,
    /// Limbs resolved for the actor's current stance
    pub limbs: LimbSet,
    pub effectiveness: f32,
}

impl Candidate<'_> {
    pub fn move_type(&self) -> MoveType {
        self.def.move_type
    }
}

/// Registry of every move the engine knows
#[derive(Debug, Clone, Default)]
pub struct MoveRegistry {
    moves: Vec<MoveDef>,
    index: AHashMap<MoveId, usize>,
}

impl MoveRegistry {
    /// The catalogue shipped with the crate
    pub fn standard() -> Result<Self> {
        Self::from_toml_str(STANDARD_CATALOGUE)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalogue: Catalogue = toml::from_str(content)?;
        Self::from_moves(catalogue.moves)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_moves(moves: Vec<MoveDef>) -> Result<Self> {
        let mut index = AHashMap::with_capacity(moves.len());
        for (i, def) in moves.iter().enumerate() {
            validate(def)?;
            if index.insert(def.id.clone(), i).is_some() {
                return Err(FightError::InvalidConfig(format!(
                    "duplicate move id '{}'",
                    def.id
                )));
            }
        }
        tracing::debug!("Loaded {} moves", moves.len());
        Ok(Self { moves, index })
    }

    pub fn get(&self, id: &MoveId) -> Option<&MoveDef> {
        self.index.get(id).map(|&i| &self.moves[i])
    }

    pub fn get_str(&self, id: &str) -> Option<&MoveDef> {
        self.get(&MoveId::new(id))
    }

    /// Look up a move, failing with `UnknownMove`
    pub fn require(&self, id: &MoveId) -> Result<&MoveDef> {
        self.get(id)
            .ok_or_else(|| FightError::UnknownMove(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoveDef> {
        self.moves.iter()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

fn validate(def: &MoveDef) -> Result<()> {
    let fail = |reason: &str| -> Result<()> {
        Err(FightError::InvalidConfig(format!(
            "move '{}': {}",
            def.id, reason
        )))
    };

    if def.time_cost == 0 {
        return fail("time_cost must be positive");
    }
    if !(0.0..=1.0).contains(&def.energy_cost) {
        return fail("energy_cost must lie in [0, 1]");
    }
    if def.reach.min > def.reach.max {
        return fail("reach.min is farther than reach.max");
    }
    if !(0.0..=1.0).contains(&def.physics.commitment) {
        return fail("commitment must lie in [0, 1]");
    }
    if def.damage.is_some() && !def.needs_contact() {
        return fail("only offensive moves and catches carry a damage effect");
    }
    if let Some(damage) = &def.damage {
        if damage.zones.iter().any(|zone| zone.height() != def.target) {
            return fail("zones must sit at the move's target height");
        }
    }
    Ok(())
}
