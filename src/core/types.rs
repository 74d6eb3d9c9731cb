//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use uuid::Uuid;

/// Unique identifier for a simulated fight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FightId(pub Uuid);

impl FightId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FightId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FightId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the two combatants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Fixed alternation: A acts on even plies, B on odd plies.
    pub fn to_act(depth: u32) -> Side {
        if depth % 2 == 0 {
            Side::A
        } else {
            Side::B
        }
    }

    pub fn code(self) -> char {
        match self {
            Side::A => 'A',
            Side::B => 'B',
        }
    }

    pub fn from_code(c: char) -> Option<Side> {
        match c {
            'A' => Some(Side::A),
            'B' => Some(Side::B),
            _ => None,
        }
    }
}

/// A value held once per side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerSide<T> {
    pub a: T,
    pub b: T,
}

impl<T> PerSide<T> {
    pub fn new(a: T, b: T) -> Self {
        Self { a, b }
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> PerSide<U> {
        PerSide {
            a: f(&self.a),
            b: f(&self.b),
        }
    }
}

impl<T: Clone> PerSide<T> {
    pub fn splat(value: T) -> Self {
        Self {
            a: value.clone(),
            b: value,
        }
    }
}

impl<T> Index<Side> for PerSide<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }
}

impl<T> IndexMut<Side> for PerSide<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }
}

/// Anatomical limbs (four per actor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Limb {
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

impl Limb {
    pub fn all() -> [Limb; 4] {
        [Limb::LeftArm, Limb::RightArm, Limb::LeftLeg, Limb::RightLeg]
    }

    pub fn index(self) -> usize {
        match self {
            Limb::LeftArm => 0,
            Limb::RightArm => 1,
            Limb::LeftLeg => 2,
            Limb::RightLeg => 3,
        }
    }
}

/// Set of limbs committed by a move or a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LimbSet(u8);

impl LimbSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn with(mut self, limb: Limb) -> Self {
        self.insert(limb);
        self
    }

    pub fn insert(&mut self, limb: Limb) {
        self.0 |= 1 << limb.index();
    }

    pub fn contains(&self, limb: Limb) -> bool {
        self.0 & (1 << limb.index()) != 0
    }

    pub fn intersects(&self, other: LimbSet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn union(&self, other: LimbSet) -> LimbSet {
        LimbSet(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Limb> + '_ {
        Limb::all().into_iter().filter(move |l| self.contains(*l))
    }
}

impl FromIterator<Limb> for LimbSet {
    fn from_iter<I: IntoIterator<Item = Limb>>(iter: I) -> Self {
        iter.into_iter().fold(LimbSet::empty(), LimbSet::with)
    }
}
