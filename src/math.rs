use glam::{Mat3A, Vec3A};
use std::f32::consts::{PI, TAU};

/// Rotation about the vertical axis
#[must_use]
pub fn yaw_rotation(yaw: f32) -> Mat3A {
    Mat3A::from_rotation_y(yaw)
}

/// Unit forward vector for a yaw angle
///
/// Yaw 0 faces down the negative Z axis, positive yaw turns left.
#[must_use]
pub fn forward_from_yaw(yaw: f32) -> Vec3A {
    yaw_rotation(yaw) * Vec3A::NEG_Z
}

/// Rotates `offset` (given in car space) into world space
#[must_use]
pub fn rotate_by_yaw(offset: Vec3A, yaw: f32) -> Vec3A {
    yaw_rotation(yaw) * offset
}

/// Wraps an angle into `(-PI, PI]`
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    if angle > -PI && angle <= PI {
        return angle;
    }

    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped == -PI { PI } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn wrap_keeps_small_angles() {
        assert_eq!(wrap_angle(0.25), 0.25);
        assert_eq!(wrap_angle(-0.25), -0.25);
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-6);
    }

    #[test]
    fn zero_yaw_faces_negative_z() {
        let fwd = forward_from_yaw(0.0);
        assert!(fwd.abs_diff_eq(Vec3A::NEG_Z, 1e-6));
    }

    #[test]
    fn positive_yaw_turns_left() {
        // A quarter turn left from -Z ends up facing -X
        let fwd = forward_from_yaw(FRAC_PI_2);
        assert!(fwd.abs_diff_eq(Vec3A::NEG_X, 1e-6));
        assert!(fwd.is_normalized());
    }
}
