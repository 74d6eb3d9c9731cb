//! Fixed-point grid shared by canonicalization, hashing and notation
//!
//! Continuous fields are snapped to these grids after every transition so
//! floating-point noise can never split one physical position into two
//! tree nodes.

/// Balance and weight distribution: hundredths
pub const UNIT_SCALE: f32 = 100.0;
/// Linear momentum: tenths
pub const LINEAR_SCALE: f32 = 10.0;
/// Rotational momentum: tenths
pub const ROTATIONAL_SCALE: f32 = 10.0;
/// Decay rate: hundredths
pub const DECAY_SCALE: f32 = 100.0;
/// Angles: whole degrees
pub const ANGLE_SCALE: f32 = 1.0;
/// Location: 5 cm
pub const LOCATION_SCALE: f32 = 20.0;

pub const LINEAR_LIMIT: f32 = 10.0;
pub const ROTATIONAL_LIMIT: f32 = 20.0;
pub const DECAY_MAX: f32 = 0.99;
pub const ANGLE_LIMIT: f32 = 180.0;
pub const LOCATION_LIMIT: f32 = 12.75;
pub const MAX_RECOVERY_TICKS: u8 = 15;

/// Nearest grid step, as an integer
pub fn to_fixed(value: f32, scale: f32) -> i32 {
    (value * scale).round() as i32
}

pub fn from_fixed(units: i32, scale: f32) -> f32 {
    units as f32 / scale
}

/// Round to the nearest grid point
pub fn snap(value: f32, scale: f32) -> f32 {
    from_fixed(to_fixed(value, scale), scale)
}

/// Clamp then round
pub fn snap_clamped(value: f32, scale: f32, min: f32, max: f32) -> f32 {
    snap(value.clamp(min, max), scale)
}

/// Round toward zero
///
/// The small bias keeps values that already sit on the grid (but are stored
/// a hair below it, e.g. 0.7 as 0.69999999) from dropping a step.
pub fn snap_toward_zero(value: f32, scale: f32) -> f32 {
    let units = (value.abs() * scale + 1e-3).floor();
    if units == 0.0 {
        0.0
    } else {
        units.copysign(value) / scale
    }
}

/// Degrees in [0, 360)
pub fn wrap_degrees(value: f32) -> f32 {
    let wrapped = value.rem_euclid(360.0);
    let snapped = snap(wrapped, ANGLE_SCALE);
    if snapped >= 360.0 {
        0.0
    } else {
        snapped
    }
}

/// Move `value` toward `target` by at most `step`, never past it
pub fn approach(value: f32, target: f32, step: f32) -> f32 {
    if value > target {
        (value - step).max(target)
    } else {
        (value + step).min(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_is_idempotent() {
        for raw in [0.3f32, 0.7, -1.25, 2.449, 0.005] {
            let once = snap(raw, LINEAR_SCALE);
            assert_eq!(snap(once, LINEAR_SCALE), once);
        }
    }

    #[test]
    fn test_snap_toward_zero_keeps_grid_values() {
        assert_eq!(snap_toward_zero(0.7, LINEAR_SCALE), 0.7);
        assert_eq!(snap_toward_zero(-0.7, LINEAR_SCALE), -0.7);
        assert_eq!(snap_toward_zero(0.79, LINEAR_SCALE), 0.7);
        assert_eq!(snap_toward_zero(-0.79, LINEAR_SCALE), -0.7);
        assert_eq!(snap_toward_zero(0.04, LINEAR_SCALE), 0.0);
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(-90.0), 270.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(359.7), 0.0);
        assert_eq!(wrap_degrees(180.0), 180.0);
    }

    #[test]
    fn test_approach_does_not_overshoot() {
        assert_eq!(approach(10.0, 0.0, 15.0), 0.0);
        assert_eq!(approach(-10.0, 0.0, 4.0), -6.0);
        assert_eq!(approach(0.45, 0.5, 0.1), 0.5);
    }
}
