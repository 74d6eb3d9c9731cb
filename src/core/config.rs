//! Engine configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. Every section can be overridden
//! from a partial TOML file; missing keys keep their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::combat::constants::{
    BALANCE_DAMAGE_FACTOR, BALANCE_RECOVERY, CRITICAL_FORCE_MULTIPLIER, DAMAGE_THRESHOLD,
    DEFAULT_LIMB_DAMAGE_LIMIT, DEPTH_CEILING, FALLEN_BALANCE, FATIGUE_RECOVERY_RATE,
    GROUNDED_BALANCE_RECOVERY, HELPLESS_BALANCE, INCAPACITATED_DAMAGE, TURN_TIME_BUDGET_MS,
};
use crate::core::error::{FightError, Result};

/// Thresholds used by the physics-admissibility gate and the end-of-turn advance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    // === MOMENTUM REDIRECTION ===
    /// Linear momentum magnitude above which the actor cannot reverse direction
    pub linear_redirect_threshold: f32,

    /// While above `linear_redirect_threshold`, moves adding more rotational
    /// momentum than this are rejected
    pub rotational_limit_under_linear: f32,

    /// Rotational momentum magnitude above which the actor must unwind before
    /// rotating the other way
    pub rotational_unwind_threshold: f32,

    // === BIOMECHANICS ===
    /// While recovering with more than this many ticks left, only low
    /// commitment moves are legal
    pub recovering_tick_allowance: u8,

    /// Commitment ceiling while deep in recovery
    pub recovering_commitment_max: f32,

    /// Hip rotation (degrees) beyond which throws/takedowns and counter-rotating
    /// strikes are impossible
    pub hip_rotation_limit: f32,

    /// Weight distribution band inside which sweeps, trips and throws work
    pub weight_band_min: f32,
    pub weight_band_max: f32,

    // === RECOVERY FEASIBILITY ===
    /// Moderate momentum levels; above either, heavily committed moves are illegal
    pub moderate_linear: f32,
    pub moderate_rotational: f32,

    /// Commitment above which a move counts as "heavily committed"
    pub overcommit_threshold: f32,

    // === END-OF-TURN ADVANCE ===
    /// Momentum magnitudes below this snap to exactly zero
    pub momentum_epsilon: f32,

    /// Per-turn drift of hip rotation toward neutral (degrees)
    pub hip_return_step: f32,

    /// Per-turn drift of torso rotation toward neutral (degrees)
    pub torso_return_step: f32,

    /// Per-turn drift of weight distribution toward 0.5
    pub weight_return_step: f32,

    /// Balance regained per turn while on the feet
    pub balance_recovery: f32,

    /// Balance regained per turn while grounded
    pub grounded_balance_recovery: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            linear_redirect_threshold: 2.0,
            rotational_limit_under_linear: 2.5,
            rotational_unwind_threshold: 3.0,
            recovering_tick_allowance: 2,
            recovering_commitment_max: 0.2,
            hip_rotation_limit: 60.0,
            weight_band_min: 0.2,
            weight_band_max: 0.8,
            moderate_linear: 1.5,
            moderate_rotational: 2.0,
            overcommit_threshold: 0.7,
            momentum_epsilon: 0.05,
            hip_return_step: 15.0,
            torso_return_step: 20.0,
            weight_return_step: 0.1,
            balance_recovery: BALANCE_RECOVERY,
            grounded_balance_recovery: GROUNDED_BALANCE_RECOVERY,
        }
    }
}

/// Terminal classification thresholds, applied in priority order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Ply count at which a line is declared a stalemate
    pub depth_ceiling: u32,

    /// Balance below which an actor has fallen
    pub fallen_balance: f32,

    /// Balance below which a grounded actor is helpless
    pub helpless_balance: f32,

    /// Path-cumulative damage above which the opponent wins
    pub damage_threshold: f32,

    /// Multiple of a zone's nominal force that ends the fight outright
    pub critical_force_multiplier: f32,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            depth_ceiling: DEPTH_CEILING,
            fallen_balance: FALLEN_BALANCE,
            helpless_balance: HELPLESS_BALANCE,
            damage_threshold: DAMAGE_THRESHOLD,
            critical_force_multiplier: CRITICAL_FORCE_MULTIPLIER,
        }
    }
}

/// Per-turn action sequence assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Time available to one side per turn (ms), identical for every move
    pub time_budget_ms: u32,

    /// Chance of ending the turn voluntarily after each accepted move
    pub early_stop_chance: f64,

    /// How many positional moves may share one turn
    pub positional_cap: u8,

    /// How many moves of any other general type may share one turn
    pub type_cap: u8,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: TURN_TIME_BUDGET_MS,
            early_stop_chance: 0.35,
            positional_cap: 1,
            type_cap: 2,
        }
    }
}

/// How overlay condition accrues and how it limits moves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionConfig {
    /// Aggregate damage above which no move can be performed
    pub incapacitated_damage: f32,

    /// Limb damage above which moves using that limb fail, unless the move
    /// carries its own limit
    pub default_limb_damage_limit: f32,

    /// Fatigue recovered by both sides every ply
    pub fatigue_recovery: f32,

    /// Damage credited per unit of balance the defender loses
    pub balance_damage_factor: f32,
}

impl Default for ConditionConfig {
    fn default() -> Self {
        Self {
            incapacitated_damage: INCAPACITATED_DAMAGE,
            default_limb_damage_limit: DEFAULT_LIMB_DAMAGE_LIMIT,
            fatigue_recovery: FATIGUE_RECOVERY_RATE,
            balance_damage_factor: BALANCE_DAMAGE_FACTOR,
        }
    }
}

/// Tree expansion batching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationConfig {
    /// Leaves pulled per batch
    pub batch_size: usize,

    /// Minimum leaves in a batch before expansion goes parallel
    ///
    /// Below this threshold, thread overhead exceeds benefits.
    pub parallel_threshold: usize,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            batch_size: 64,
            parallel_threshold: 8,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub physics: PhysicsConfig,
    pub terminal: TerminalConfig,
    pub sequence: SequenceConfig,
    pub condition: ConditionConfig,
    pub exploration: ExplorationConfig,
}

impl EngineConfig {
    /// Parse a (possibly partial) TOML document and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let p = &self.physics;
        if p.weight_band_min >= p.weight_band_max {
            return Err(FightError::InvalidConfig(format!(
                "weight_band_min ({}) should be < weight_band_max ({})",
                p.weight_band_min, p.weight_band_max
            )));
        }
        if p.momentum_epsilon <= 0.0 {
            return Err(FightError::InvalidConfig(
                "momentum_epsilon must be positive".into(),
            ));
        }
        if p.moderate_linear > p.linear_redirect_threshold {
            return Err(FightError::InvalidConfig(format!(
                "moderate_linear ({}) should be <= linear_redirect_threshold ({})",
                p.moderate_linear, p.linear_redirect_threshold
            )));
        }

        let t = &self.terminal;
        if t.fallen_balance >= t.helpless_balance {
            return Err(FightError::InvalidConfig(format!(
                "fallen_balance ({}) should be < helpless_balance ({})",
                t.fallen_balance, t.helpless_balance
            )));
        }
        if t.depth_ceiling == 0 {
            return Err(FightError::InvalidConfig("depth_ceiling must be > 0".into()));
        }

        let s = &self.sequence;
        if !(0.0..=1.0).contains(&s.early_stop_chance) {
            return Err(FightError::InvalidConfig(format!(
                "early_stop_chance ({}) must lie in [0, 1]",
                s.early_stop_chance
            )));
        }
        if s.time_budget_ms == 0 || s.type_cap == 0 {
            return Err(FightError::InvalidConfig(
                "time budget and type caps must be positive".into(),
            ));
        }

        if self.exploration.batch_size == 0 {
            return Err(FightError::InvalidConfig("batch_size must be > 0".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [terminal]
            depth_ceiling = 40

            [sequence]
            early_stop_chance = 0.0
            "#,
        )
        .unwrap();

        assert_eq!(config.terminal.depth_ceiling, 40);
        assert_eq!(config.sequence.early_stop_chance, 0.0);
        assert_eq!(config.physics, PhysicsConfig::default());
        assert_eq!(config.terminal.damage_threshold, DAMAGE_THRESHOLD);
    }

    #[test]
    fn test_inverted_weight_band_rejected() {
        let result = EngineConfig::from_toml_str(
            r#"
            [physics]
            weight_band_min = 0.9
            weight_band_max = 0.1
            "#,
        );
        assert!(matches!(result, Err(FightError::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let result = EngineConfig::from_toml_str("[terminal\ndepth_ceiling = ");
        assert!(matches!(result, Err(FightError::TomlError(_))));
    }
}
