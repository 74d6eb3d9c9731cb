//! Combat constants - default values for every tunable in one place
//!
//! `EngineConfig` starts from these; the tree and the simulator only ever
//! read the config, never these constants directly.

// Time constants
pub const TURN_TIME_BUDGET_MS: u32 = 1000;
pub const DEPTH_CEILING: u32 = 200;

// Condition constants
pub const FATIGUE_RECOVERY_RATE: f32 = 0.02;
pub const INCAPACITATED_DAMAGE: f32 = 0.9;
pub const DEFAULT_LIMB_DAMAGE_LIMIT: f32 = 0.7;
pub const BALANCE_DAMAGE_FACTOR: f32 = 0.1;

// Balance constants
pub const BALANCE_RECOVERY: f32 = 0.05;
pub const GROUNDED_BALANCE_RECOVERY: f32 = 0.02;

// Terminal thresholds
pub const FALLEN_BALANCE: f32 = 0.2;
pub const HELPLESS_BALANCE: f32 = 0.4;
pub const DAMAGE_THRESHOLD: f32 = 0.8;
pub const CRITICAL_FORCE_MULTIPLIER: f32 = 1.5;
