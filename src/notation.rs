//! Compact position notation
//!
//! ```text
//! <A>/<B>/<distance>/<turn>/<move_count>
//! fighter = stance.balance.fatigue.damage.lin,rot,decay.hip,torso,weight,rec,ticks.limbs.PC.x,y,z,facing.a0,a1,a2,a3
//! ```
//!
//! Every number is an integer on the quantization grid. Limb damage is not
//! carried, so decoding yields zero limb damage.

use glam::Vec3;
use nom::character::complete::{anychar, char, i32 as signed, u32 as unsigned};
use nom::combinator::{all_consuming, map_opt};
use nom::multi::count;
use nom::{IResult, Parser};

use crate::combat::overlay::{Overlay, RuntimeState};
use crate::combat::stance::{ControlState, Posture, Stance};
use crate::core::error::{FightError, Result};
use crate::core::types::{PerSide, Side};
use crate::position::quantize::{
    from_fixed, to_fixed, ANGLE_SCALE, DECAY_SCALE, LINEAR_SCALE, LOCATION_SCALE,
    ROTATIONAL_SCALE, UNIT_SCALE,
};
use crate::position::{Actor, BodyConfig, DistanceBand, LimbConfig, Momentum, Pose, Position};

type Res<'a, T> = IResult<&'a str, T>;

/// Render a position with its overlays
pub fn encode(state: &RuntimeState) -> String {
    let position = state.position.canonical();
    format!(
        "{}/{}/{}/{}/{}",
        encode_fighter(&position.a, &state.overlays.a),
        encode_fighter(&position.b, &state.overlays.b),
        position.distance.code(),
        position.side_to_act().code(),
        position.move_count
    )
}

/// Render a bare position; overlays are written fresh
pub fn encode_position(position: &Position) -> String {
    encode(&RuntimeState::new(position.clone()))
}

fn encode_fighter(actor: &Actor, overlay: &Overlay) -> String {
    let m = &actor.momentum;
    let b = &actor.body;
    let l = actor.pose.location;
    let limbs: String = actor.limbs.iter().map(LimbConfig::code).collect();
    let angles: Vec<String> = actor
        .limbs
        .iter()
        .map(|limb| to_fixed(limb.angle, ANGLE_SCALE).to_string())
        .collect();

    format!(
        "{}.{}.{}.{}.{},{},{}.{},{},{},{},{}.{}.{}{}.{},{},{},{}.{}",
        actor.stance.code(),
        to_fixed(actor.balance, UNIT_SCALE),
        to_fixed(overlay.fatigue, UNIT_SCALE),
        to_fixed(overlay.damage, UNIT_SCALE),
        to_fixed(m.linear, LINEAR_SCALE),
        to_fixed(m.rotational, ROTATIONAL_SCALE),
        to_fixed(m.decay, DECAY_SCALE),
        to_fixed(b.hip_rotation, ANGLE_SCALE),
        to_fixed(b.torso_rotation, ANGLE_SCALE),
        to_fixed(b.weight_distribution, UNIT_SCALE),
        b.recovering as u8,
        b.recovery_ticks,
        limbs,
        actor.posture.code(),
        actor.control.code(),
        to_fixed(l.x, LOCATION_SCALE),
        to_fixed(l.y, LOCATION_SCALE),
        to_fixed(l.z, LOCATION_SCALE),
        to_fixed(actor.pose.facing, ANGLE_SCALE),
        angles.join(",")
    )
}

/// Parse a notation string back into a position with overlays
pub fn decode(input: &str) -> Result<RuntimeState> {
    let (_, parsed) = all_consuming(notation)
        .parse(input.trim())
        .map_err(|e| FightError::notation(input, e.to_string()))?;
    let Parsed {
        a: (a, overlay_a),
        b: (b, overlay_b),
        distance,
        turn,
        move_count,
    } = parsed;

    let position = Position {
        a,
        b,
        distance,
        move_count,
    };

    if position.side_to_act() != turn {
        return Err(FightError::notation(
            input,
            format!(
                "turn marker {} does not match move count {}",
                turn.code(),
                move_count
            ),
        ));
    }
    let derived = DistanceBand::from_separation(position.separation());
    if derived != distance {
        return Err(FightError::notation(
            input,
            format!(
                "distance '{}' does not match fighter locations ('{}')",
                distance.code(),
                derived.code()
            ),
        ));
    }
    if position.canonical() != position {
        return Err(FightError::notation(input, "field out of range"));
    }
    for overlay in [&overlay_a, &overlay_b] {
        if !(0.0..=1.0).contains(&overlay.fatigue) || !(0.0..=1.0).contains(&overlay.damage) {
            return Err(FightError::notation(input, "condition out of range"));
        }
    }

    Ok(RuntimeState {
        position,
        overlays: PerSide::new(overlay_a, overlay_b),
    })
}

/// Parse notation, discarding the overlays
pub fn decode_position(input: &str) -> Result<Position> {
    decode(input).map(|state| state.position)
}

struct Parsed {
    a: (Actor, Overlay),
    b: (Actor, Overlay),
    distance: DistanceBand,
    turn: Side,
    move_count: u32,
}

fn dot(input: &str) -> Res<'_, char> {
    char('.').parse(input)
}

fn comma(input: &str) -> Res<'_, char> {
    char(',').parse(input)
}

fn slash(input: &str) -> Res<'_, char> {
    char('/').parse(input)
}

fn any(input: &str) -> Res<'_, char> {
    anychar(input)
}

fn natural(input: &str) -> Res<'_, u32> {
    unsigned(input)
}

fn integer(input: &str) -> Res<'_, i32> {
    signed(input)
}

fn fixed(input: &str, scale: f32) -> Res<'_, f32> {
    let (input, units) = integer(input)?;
    Ok((input, from_fixed(units, scale)))
}

fn notation(input: &str) -> Res<'_, Parsed> {
    let (input, a) = fighter(input)?;
    let (input, _) = slash(input)?;
    let (input, b) = fighter(input)?;
    let (input, _) = slash(input)?;
    let (input, distance) = map_opt(any, DistanceBand::from_code).parse(input)?;
    let (input, _) = slash(input)?;
    let (input, turn) = map_opt(any, Side::from_code).parse(input)?;
    let (input, _) = slash(input)?;
    let (input, move_count) = natural(input)?;
    Ok((
        input,
        Parsed {
            a,
            b,
            distance,
            turn,
            move_count,
        },
    ))
}

fn fighter(input: &str) -> Res<'_, (Actor, Overlay)> {
    let (input, stance) = map_opt(any, Stance::from_code).parse(input)?;
    let (input, _) = dot(input)?;
    let (input, balance) = fixed(input, UNIT_SCALE)?;
    let (input, _) = dot(input)?;
    let (input, fatigue) = fixed(input, UNIT_SCALE)?;
    let (input, _) = dot(input)?;
    let (input, damage) = fixed(input, UNIT_SCALE)?;
    let (input, _) = dot(input)?;
    let (input, momentum) = momentum(input)?;
    let (input, _) = dot(input)?;
    let (input, body) = body(input)?;
    let (input, _) = dot(input)?;
    let (input, codes) = count(map_opt(any, LimbConfig::from_code), 4).parse(input)?;
    let (input, _) = dot(input)?;
    let (input, posture) = map_opt(any, Posture::from_code).parse(input)?;
    let (input, control) = map_opt(any, ControlState::from_code).parse(input)?;
    let (input, _) = dot(input)?;
    let (input, pose) = pose(input)?;
    let (input, _) = dot(input)?;
    let (input, angles) = angles(input)?;

    let mut limbs = [LimbConfig::ready(); 4];
    for ((limb, (free, extended)), angle) in limbs.iter_mut().zip(codes).zip(angles) {
        *limb = LimbConfig {
            free,
            extended,
            angle,
        };
    }

    let actor = Actor {
        pose,
        stance,
        balance,
        limbs,
        control,
        posture,
        momentum,
        body,
    };
    let overlay = Overlay {
        fatigue,
        damage,
        limb_damage: [0.0; 4],
    };
    Ok((input, (actor, overlay)))
}

fn momentum(input: &str) -> Res<'_, Momentum> {
    let (input, linear) = fixed(input, LINEAR_SCALE)?;
    let (input, _) = comma(input)?;
    let (input, rotational) = fixed(input, ROTATIONAL_SCALE)?;
    let (input, _) = comma(input)?;
    let (input, decay) = fixed(input, DECAY_SCALE)?;
    Ok((
        input,
        Momentum {
            linear,
            rotational,
            decay,
        },
    ))
}

fn body(input: &str) -> Res<'_, BodyConfig> {
    let (input, hip_rotation) = fixed(input, ANGLE_SCALE)?;
    let (input, _) = comma(input)?;
    let (input, torso_rotation) = fixed(input, ANGLE_SCALE)?;
    let (input, _) = comma(input)?;
    let (input, weight_distribution) = fixed(input, UNIT_SCALE)?;
    let (input, _) = comma(input)?;
    let (input, recovering) = map_opt(any, |c| match c {
        '0' => Some(false),
        '1' => Some(true),
        _ => None,
    })
    .parse(input)?;
    let (input, _) = comma(input)?;
    let (input, ticks) = map_opt(natural, |t| u8::try_from(t).ok()).parse(input)?;
    Ok((
        input,
        BodyConfig {
            hip_rotation,
            torso_rotation,
            weight_distribution,
            recovering,
            recovery_ticks: ticks,
        },
    ))
}

fn pose(input: &str) -> Res<'_, Pose> {
    let (input, x) = fixed(input, LOCATION_SCALE)?;
    let (input, _) = comma(input)?;
    let (input, y) = fixed(input, LOCATION_SCALE)?;
    let (input, _) = comma(input)?;
    let (input, z) = fixed(input, LOCATION_SCALE)?;
    let (input, _) = comma(input)?;
    let (input, facing) = fixed(input, ANGLE_SCALE)?;
    Ok((input, Pose::new(Vec3::new(x, y, z), facing)))
}

fn angles(input: &str) -> Res<'_, [f32; 4]> {
    let (input, a0) = fixed(input, ANGLE_SCALE)?;
    let (input, _) = comma(input)?;
    let (input, a1) = fixed(input, ANGLE_SCALE)?;
    let (input, _) = comma(input)?;
    let (input, a2) = fixed(input, ANGLE_SCALE)?;
    let (input, _) = comma(input)?;
    let (input, a3) = fixed(input, ANGLE_SCALE)?;
    Ok((input, [a0, a1, a2, a3]))
}
