//! Stance, posture and control state
//!
//! Every fighter is always in exactly one stance, one posture and one
//! control state. Each has a single-character code used by the notation.

use serde::{Deserialize, Serialize};

use crate::core::types::Limb;

/// Foot placement; decides which limbs lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Stance {
    /// Left side forward
    #[default]
    Orthodox,
    /// Right side forward
    Southpaw,
    /// Hips squared to the opponent
    Square,
}

impl Stance {
    pub fn all() -> [Stance; 3] {
        [Stance::Orthodox, Stance::Southpaw, Stance::Square]
    }

    pub fn code(self) -> char {
        match self {
            Stance::Orthodox => 'o',
            Stance::Southpaw => 's',
            Stance::Square => 'q',
        }
    }

    pub fn from_code(c: char) -> Option<Self> {
        Self::all().into_iter().find(|s| s.code() == c)
    }

    pub fn index(self) -> u32 {
        match self {
            Stance::Orthodox => 0,
            Stance::Southpaw => 1,
            Stance::Square => 2,
        }
    }

    /// Orthodox <-> southpaw; square has no mirror
    pub fn switched(self) -> Self {
        match self {
            Stance::Orthodox => Stance::Southpaw,
            Stance::Southpaw => Stance::Orthodox,
            Stance::Square => Stance::Square,
        }
    }

    fn leads_left(self) -> bool {
        !matches!(self, Stance::Southpaw)
    }

    pub fn lead_arm(self) -> Limb {
        if self.leads_left() {
            Limb::LeftArm
        } else {
            Limb::RightArm
        }
    }

    pub fn rear_arm(self) -> Limb {
        if self.leads_left() {
            Limb::RightArm
        } else {
            Limb::LeftArm
        }
    }

    pub fn lead_leg(self) -> Limb {
        if self.leads_left() {
            Limb::LeftLeg
        } else {
            Limb::RightLeg
        }
    }

    pub fn rear_leg(self) -> Limb {
        if self.leads_left() {
            Limb::RightLeg
        } else {
            Limb::LeftLeg
        }
    }
}

/// Body height / orientation level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Posture {
    #[default]
    Standing,
    Crouched,
    Grounded,
    Jumping,
    Spinning,
}

impl Posture {
    pub fn all() -> [Posture; 5] {
        [
            Posture::Standing,
            Posture::Crouched,
            Posture::Grounded,
            Posture::Jumping,
            Posture::Spinning,
        ]
    }

    pub fn code(self) -> char {
        match self {
            Posture::Standing => 'S',
            Posture::Crouched => 'C',
            Posture::Grounded => 'G',
            Posture::Jumping => 'J',
            Posture::Spinning => 'R',
        }
    }

    pub fn from_code(c: char) -> Option<Self> {
        Self::all().into_iter().find(|p| p.code() == c)
    }

    pub fn index(self) -> u32 {
        match self {
            Posture::Standing => 0,
            Posture::Crouched => 1,
            Posture::Grounded => 2,
            Posture::Jumping => 3,
            Posture::Spinning => 4,
        }
    }

    /// Postures that only last until the owner moves again
    pub fn is_transient(self) -> bool {
        matches!(self, Posture::Crouched | Posture::Jumping | Posture::Spinning)
    }
}

/// Grappling relationship as seen by one fighter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ControlState {
    #[default]
    None,
    Clinch,
    Mount,
    Mounted,
    BackControl,
    BackTaken,
}

impl ControlState {
    pub fn all() -> [ControlState; 6] {
        [
            ControlState::None,
            ControlState::Clinch,
            ControlState::Mount,
            ControlState::Mounted,
            ControlState::BackControl,
            ControlState::BackTaken,
        ]
    }

    pub fn code(self) -> char {
        match self {
            ControlState::None => 'n',
            ControlState::Clinch => 'c',
            ControlState::Mount => 'm',
            ControlState::Mounted => 'u',
            ControlState::BackControl => 'b',
            ControlState::BackTaken => 't',
        }
    }

    pub fn from_code(c: char) -> Option<Self> {
        Self::all().into_iter().find(|s| s.code() == c)
    }

    pub fn index(self) -> u32 {
        match self {
            ControlState::None => 0,
            ControlState::Clinch => 1,
            ControlState::Mount => 2,
            ControlState::Mounted => 3,
            ControlState::BackControl => 4,
            ControlState::BackTaken => 5,
        }
    }

    /// The state the opponent is in when this fighter holds `self`
    pub fn mirrored(self) -> Self {
        match self {
            ControlState::None => ControlState::None,
            ControlState::Clinch => ControlState::Clinch,
            ControlState::Mount => ControlState::Mounted,
            ControlState::Mounted => ControlState::Mount,
            ControlState::BackControl => ControlState::BackTaken,
            ControlState::BackTaken => ControlState::BackControl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for stance in Stance::all() {
            assert_eq!(Stance::from_code(stance.code()), Some(stance));
        }
        for posture in Posture::all() {
            assert_eq!(Posture::from_code(posture.code()), Some(posture));
        }
        for control in ControlState::all() {
            assert_eq!(ControlState::from_code(control.code()), Some(control));
        }
        assert_eq!(Stance::from_code('x'), None);
    }

    #[test]
    fn test_southpaw_leads_right() {
        assert_eq!(Stance::Orthodox.lead_arm(), Limb::LeftArm);
        assert_eq!(Stance::Southpaw.lead_arm(), Limb::RightArm);
        assert_eq!(Stance::Southpaw.rear_leg(), Limb::LeftLeg);
        assert_eq!(Stance::Square.switched(), Stance::Square);
    }

    #[test]
    fn test_control_mirroring() {
        assert_eq!(ControlState::Mount.mirrored(), ControlState::Mounted);
        assert_eq!(ControlState::Clinch.mirrored(), ControlState::Clinch);
        for control in ControlState::all() {
            assert_eq!(control.mirrored().mirrored(), control);
        }
    }

    #[test]
    fn test_transient_postures() {
        assert!(Posture::Crouched.is_transient());
        assert!(!Posture::Grounded.is_transient());
        assert!(!Posture::Standing.is_transient());
    }
}
