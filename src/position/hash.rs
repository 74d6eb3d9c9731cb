//! Position hashing
//!
//! The digest is a fixed-width bit packing of every quantized field, rendered
//! as lowercase hex. Packing is lossless on canonical positions, so two
//! positions share a digest exactly when they are field-wise equal on the
//! grid. Overlay condition is not an input.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::position::actor::Actor;
use crate::position::quantize::{
    to_fixed, ANGLE_LIMIT, ANGLE_SCALE, DECAY_SCALE, LINEAR_LIMIT, LINEAR_SCALE, LOCATION_LIMIT,
    LOCATION_SCALE, ROTATIONAL_LIMIT, ROTATIONAL_SCALE, UNIT_SCALE,
};
use crate::position::Position;

/// Hex digest identifying one canonical position
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PositionHash(String);

impl PositionHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap a digest read back from storage
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }
}

impl fmt::Display for PositionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Little-endian bit accumulator
struct BitPacker {
    bytes: Vec<u8>,
    acc: u64,
    filled: u32,
}

impl BitPacker {
    fn new() -> Self {
        Self {
            bytes: Vec::with_capacity(48),
            acc: 0,
            filled: 0,
        }
    }

    /// Append the low `bits` bits of `value`
    fn push(&mut self, value: u32, bits: u32) {
        debug_assert!(bits <= 32);
        debug_assert!(bits == 32 || value < (1u32 << bits), "{value} overflows {bits} bits");
        self.acc |= (value as u64) << self.filled;
        self.filled += bits;
        while self.filled >= 8 {
            self.bytes.push(self.acc as u8);
            self.acc >>= 8;
            self.filled -= 8;
        }
        self.acc &= (1u64 << self.filled) - 1;
    }

    fn push_flag(&mut self, flag: bool) {
        self.push(flag as u32, 1);
    }

    /// Signed grid value shifted into [0, 2 * limit]
    fn push_signed(&mut self, value: f32, scale: f32, limit: f32, bits: u32) {
        let offset = to_fixed(limit, scale);
        let units = (to_fixed(value, scale) + offset).clamp(0, 2 * offset);
        self.push(units as u32, bits);
    }

    fn push_unsigned(&mut self, value: f32, scale: f32, bits: u32) {
        self.push(to_fixed(value, scale).max(0) as u32, bits);
    }

    fn finish(mut self) -> Vec<u8> {
        if self.filled > 0 {
            self.bytes.push(self.acc as u8);
        }
        self.bytes
    }
}

fn pack_actor(packer: &mut BitPacker, actor: &Actor) {
    packer.push(actor.stance.index(), 2);
    packer.push(actor.posture.index(), 3);
    packer.push(actor.control.index(), 3);
    packer.push_unsigned(actor.balance, UNIT_SCALE, 7);

    for limb in &actor.limbs {
        packer.push_flag(limb.free);
        packer.push_flag(limb.extended);
        packer.push_signed(limb.angle, ANGLE_SCALE, ANGLE_LIMIT, 9);
    }

    let m = &actor.momentum;
    packer.push_signed(m.linear, LINEAR_SCALE, LINEAR_LIMIT, 8);
    packer.push_signed(m.rotational, ROTATIONAL_SCALE, ROTATIONAL_LIMIT, 9);
    packer.push_unsigned(m.decay, DECAY_SCALE, 7);

    let b = &actor.body;
    packer.push_signed(b.hip_rotation, ANGLE_SCALE, ANGLE_LIMIT, 9);
    packer.push_signed(b.torso_rotation, ANGLE_SCALE, ANGLE_LIMIT, 9);
    packer.push_unsigned(b.weight_distribution, UNIT_SCALE, 7);
    packer.push_flag(b.recovering);
    packer.push(b.recovery_ticks as u32, 4);

    let l = actor.pose.location;
    for coord in [l.x, l.y, l.z] {
        packer.push_signed(coord, LOCATION_SCALE, LOCATION_LIMIT, 9);
    }
    packer.push_unsigned(actor.pose.facing, ANGLE_SCALE, 9);
}

/// Digest of an already canonical position
pub(crate) fn digest(position: &Position) -> PositionHash {
    let mut packer = BitPacker::new();
    pack_actor(&mut packer, &position.a);
    pack_actor(&mut packer, &position.b);
    packer.push(position.distance.index(), 3);
    packer.push(position.move_count, 32);

    let hex = packer
        .finish()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>();
    PositionHash(hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packer_spans_byte_boundaries() {
        let mut packer = BitPacker::new();
        packer.push(0b101, 3);
        packer.push(0x1ff, 9);
        packer.push(0xabcd_ef01, 32);
        let bytes = packer.finish();
        assert_eq!(bytes.len(), 6);
        assert_eq!(bytes[0], 0b1111_1101);
    }

    #[test]
    fn test_digest_has_fixed_width() {
        let opening = Position::opening();
        let mut later = opening.clone();
        later.move_count = u32::MAX;
        later.a.momentum.linear = -10.0;
        later.canonicalize();

        assert_eq!(opening.hash().as_str().len(), later.hash().as_str().len());
        assert!(opening
            .hash()
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_each_field_moves_the_digest() {
        let base = Position::opening();
        let base_hash = base.hash();

        let mut variants = Vec::new();
        let mut p = base.clone();
        p.a.balance = 0.99;
        variants.push(p);
        let mut p = base.clone();
        p.b.momentum.rotational = -0.1;
        variants.push(p);
        let mut p = base.clone();
        p.b.limbs[3].extended = true;
        variants.push(p);
        let mut p = base.clone();
        p.a.body.recovering = true;
        variants.push(p);
        let mut p = base.clone();
        p.a.pose.location.y = 0.05;
        variants.push(p);
        let mut p = base.clone();
        p.move_count = 1;
        variants.push(p);

        for variant in variants {
            assert_ne!(variant.hash(), base_hash, "{variant:?}");
        }
    }
}
