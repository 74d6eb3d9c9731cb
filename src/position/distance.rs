//! Discrete distance bands between the two fighters

use serde::{Deserialize, Serialize};

/// Range band, ordered from closest to farthest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum DistanceBand {
    Clinch,
    Short,
    #[default]
    Medium,
    Long,
    VeryLong,
}

impl DistanceBand {
    pub fn all() -> [DistanceBand; 5] {
        [
            DistanceBand::Clinch,
            DistanceBand::Short,
            DistanceBand::Medium,
            DistanceBand::Long,
            DistanceBand::VeryLong,
        ]
    }

    /// Band for a separation in metres
    pub fn from_separation(metres: f32) -> Self {
        if metres < 1.25 {
            DistanceBand::Clinch
        } else if metres < 2.5 {
            DistanceBand::Short
        } else if metres < 4.5 {
            DistanceBand::Medium
        } else if metres < 6.5 {
            DistanceBand::Long
        } else {
            DistanceBand::VeryLong
        }
    }

    pub fn code(self) -> char {
        match self {
            DistanceBand::Clinch => 'c',
            DistanceBand::Short => 's',
            DistanceBand::Medium => 'm',
            DistanceBand::Long => 'l',
            DistanceBand::VeryLong => 'v',
        }
    }

    pub fn from_code(c: char) -> Option<Self> {
        Self::all().into_iter().find(|d| d.code() == c)
    }

    pub fn index(self) -> u32 {
        self as u32
    }
}
