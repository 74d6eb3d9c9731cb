//! Position model: the deduplicated tree key
//!
//! A `Position` is both fighters' physical state plus the range band and
//! the ply count. It hashes to a `PositionHash`; condition (fatigue and
//! damage) never enters it.

pub mod actor;
pub mod distance;
pub mod hash;
pub mod quantize;

pub use actor::{Actor, BodyConfig, LimbConfig, Momentum, Pose};
pub use distance::DistanceBand;
pub use hash::PositionHash;

use serde::{Deserialize, Serialize};

use crate::core::types::Side;

/// Physical state of a fight at one ply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub a: Actor,
    pub b: Actor,
    pub distance: DistanceBand,
    /// Plies played so far; also the tree depth
    pub move_count: u32,
}

impl Position {
    /// Fixed opening: orthodox fighters 4 m apart, facing each other, at rest
    pub fn opening() -> Self {
        let mut position = Self {
            a: Actor::ready(-2.0, 0.0),
            b: Actor::ready(2.0, 180.0),
            distance: DistanceBand::Medium,
            move_count: 0,
        };
        position.canonicalize();
        position
    }

    pub fn actor(&self, side: Side) -> &Actor {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    pub fn actor_mut(&mut self, side: Side) -> &mut Actor {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }

    /// Actor and opponent, mutably, at the same time
    pub fn pair_mut(&mut self, side: Side) -> (&mut Actor, &mut Actor) {
        match side {
            Side::A => (&mut self.a, &mut self.b),
            Side::B => (&mut self.b, &mut self.a),
        }
    }

    pub fn side_to_act(&self) -> Side {
        Side::to_act(self.move_count)
    }

    /// Distance between the two fighters in metres
    pub fn separation(&self) -> f32 {
        self.a.pose.location.distance(self.b.pose.location)
    }

    /// Re-derive the range band from the fighters' locations
    pub fn refresh_distance(&mut self) {
        self.distance = DistanceBand::from_separation(self.separation());
    }

    /// Turn both fighters to face each other on the ground plane
    pub fn face_each_other(&mut self) {
        let delta = self.b.pose.location - self.a.pose.location;
        if delta.x == 0.0 && delta.y == 0.0 {
            return;
        }
        let bearing = delta.y.atan2(delta.x).to_degrees();
        self.a.pose.facing = bearing;
        self.b.pose.facing = bearing + 180.0;
    }

    /// Clear the acting side's transient state before it moves
    pub fn prepare_turn(&mut self, side: Side) {
        self.actor_mut(side).clear_transients();
    }

    /// Snap every continuous field to the grid and re-derive the band
    pub fn canonicalize(&mut self) {
        self.a.canonicalize();
        self.b.canonicalize();
        self.refresh_distance();
    }

    pub fn canonical(&self) -> Self {
        let mut position = self.clone();
        position.canonicalize();
        position
    }

    /// Digest of the canonical form
    pub fn hash(&self) -> PositionHash {
        hash::digest(&self.canonical())
    }
}
