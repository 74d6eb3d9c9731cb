//! Vulnerability zones (8 zones)
//!
//! Static parameter data: how much force each zone needs before a hit
//! there matters, and which zones can end a fight on their own.

use serde::{Deserialize, Serialize};

/// Height band a strike aims at / a zone sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TargetHeight {
    High,
    #[default]
    Mid,
    Low,
    /// Non-striking moves
    None,
}

/// Vulnerability zones for hit location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Knockout point
    Jaw,
    /// Knockout point
    Temple,
    Nose,
    /// Body shot that drops fighters
    Liver,
    SolarPlexus,
    Ribs,
    Thigh,
    Knee,
}

impl Zone {
    /// Returns all zones
    pub fn all() -> [Zone; 8] {
        [
            Zone::Jaw,
            Zone::Temple,
            Zone::Nose,
            Zone::Liver,
            Zone::SolarPlexus,
            Zone::Ribs,
            Zone::Thigh,
            Zone::Knee,
        ]
    }

    /// Force a hit must carry to register as effective on this zone
    pub fn nominal_force(&self) -> f32 {
        match self {
            Zone::Jaw => 4.0,
            Zone::Temple => 3.5,
            Zone::Nose => 2.5,
            Zone::Liver => 4.5,
            Zone::SolarPlexus => 4.0,
            Zone::Ribs => 5.0,
            Zone::Thigh => 5.5,
            Zone::Knee => 4.5,
        }
    }

    /// Can a single hit here end the fight?
    pub fn is_critical(&self) -> bool {
        matches!(self, Zone::Jaw | Zone::Temple | Zone::Liver)
    }

    /// Height band a strike must aim at to reach this zone
    pub fn height(&self) -> TargetHeight {
        match self {
            Zone::Jaw | Zone::Temple | Zone::Nose => TargetHeight::High,
            Zone::Liver | Zone::SolarPlexus | Zone::Ribs => TargetHeight::Mid,
            Zone::Thigh | Zone::Knee => TargetHeight::Low,
        }
    }
}
