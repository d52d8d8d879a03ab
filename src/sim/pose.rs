use std::fmt::Display;

use glam::{Mat3A, Vec3A};

use crate::math;

/// Position and heading of a car or projectile, in track-local coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub pos: Vec3A,
    /// Rotation about the vertical axis, 0 faces -Z
    pub yaw: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Pose {
    pub const DEFAULT: Self = Self {
        pos: Vec3A::ZERO,
        yaw: 0.0,
    };

    #[must_use]
    pub const fn new(pos: Vec3A, yaw: f32) -> Self {
        Self { pos, yaw }
    }

    #[must_use]
    pub fn rot_mat(&self) -> Mat3A {
        math::yaw_rotation(self.yaw)
    }

    #[must_use]
    pub fn get_forward_dir(&self) -> Vec3A {
        math::forward_from_yaw(self.yaw)
    }

    #[must_use]
    pub fn get_right_dir(&self) -> Vec3A {
        self.rot_mat() * Vec3A::X
    }

    /// Converts a car-space offset (x right, y up, -z forward) to a world position
    #[must_use]
    pub fn local_to_world(&self, offset: Vec3A) -> Vec3A {
        self.pos + math::rotate_by_yaw(offset, self.yaw)
    }

    /// Shifts the pose along Z when the track window slides
    pub fn rebase(&mut self, delta_z: f32) {
        self.pos.z += delta_z;
    }
}

impl Display for Pose {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("Pose {")?;
        f.write_fmt(format_args!("\n\tpos: {}", self.pos))?;
        f.write_fmt(format_args!("\n\tyaw: {}", self.yaw))?;
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_offset_follows_heading() {
        let pose = Pose::new(Vec3A::new(1.0, 0.0, 1.0), std::f32::consts::PI);
        // Facing +Z, so "two ahead" lands at z = 3
        let nose = pose.local_to_world(Vec3A::new(0.0, 0.5, -2.0));
        assert!(nose.abs_diff_eq(Vec3A::new(1.0, 0.5, 3.0), 1e-5));
    }

    #[test]
    fn rebase_only_moves_z() {
        let mut pose = Pose::new(Vec3A::new(3.0, 1.0, -250.0), 0.4);
        pose.rebase(200.0);
        assert_eq!(pose.pos, Vec3A::new(3.0, 1.0, -50.0));
        assert_eq!(pose.yaw, 0.4);
    }
}
