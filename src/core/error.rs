use thiserror::Error;

use crate::core::types::Side;

#[derive(Error, Debug)]
pub enum FightError {
    #[error("Invalid notation '{input}': {reason}")]
    InvalidNotation { input: String, reason: String },

    #[error("Malformed record for position {hash}: {reason}")]
    MalformedRecord { hash: String, reason: String },

    /// A caller tried to apply a move that fails legality or physics checks.
    #[error("Illegal move '{move_id}' for side {side:?}: {reason}")]
    IllegalMove {
        move_id: String,
        side: Side,
        reason: String,
    },

    #[error("Unknown move: {0}")]
    UnknownMove(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl FightError {
    /// Store-level failures abort a whole run; everything else is scoped to
    /// one fight or one leaf.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FightError::Store(_) | FightError::IoError(_) | FightError::SerdeError(_)
        )
    }

    pub fn notation(input: &str, reason: impl Into<String>) -> Self {
        FightError::InvalidNotation {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_store_errors_are_fatal() {
        assert!(FightError::Store("disk full".into()).is_fatal());
        assert!(FightError::IoError(std::io::Error::other("boom")).is_fatal());
        assert!(!FightError::notation("x", "too short").is_fatal());
        assert!(!FightError::IllegalMove {
            move_id: "jab".into(),
            side: Side::A,
            reason: "out of reach".into(),
        }
        .is_fatal());
    }
}
