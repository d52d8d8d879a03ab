use glam::Vec3A;

use super::Pose;
use crate::consts::camera::{
    CHASE_OFFSET, COCKPIT_LOOK_DIST, COCKPIT_OFFSET, ORBIT_HEIGHT, ORBIT_RADIUS, ORBIT_SPEED,
    OVERHEAD_HEIGHT,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CameraView {
    /// Behind and above the car
    #[default]
    Chase,
    /// Driver's seat, looking down the heading
    Cockpit,
    /// Straight down from above the car
    Overhead,
    /// Slowly circles the car
    Orbit,
}

impl CameraView {
    pub const ALL: [Self; 4] = [Self::Chase, Self::Cockpit, Self::Overhead, Self::Orbit];

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Chase => Self::Cockpit,
            Self::Cockpit => Self::Overhead,
            Self::Overhead => Self::Orbit,
            Self::Orbit => Self::Chase,
        }
    }
}

/// Where the camera sits and what it looks at
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraFrame {
    pub eye: Vec3A,
    pub target: Vec3A,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraRig {
    pub view: CameraView,
    /// Only advances while the orbit view is shown
    orbit_angle: f32,
}

impl CameraRig {
    #[must_use]
    pub const fn new(view: CameraView) -> Self {
        Self {
            view,
            orbit_angle: 0.0,
        }
    }

    #[must_use]
    pub const fn orbit_angle(&self) -> f32 {
        self.orbit_angle
    }

    pub const fn cycle(&mut self) -> CameraView {
        self.view = self.view.next();
        self.view
    }

    /// Frames the car for this tick
    pub fn update(&mut self, pose: &Pose) -> CameraFrame {
        if self.view == CameraView::Orbit {
            self.orbit_angle += ORBIT_SPEED;
        }
        self.frame(pose)
    }

    /// Frames the car without advancing the orbit
    #[must_use]
    pub fn frame(&self, pose: &Pose) -> CameraFrame {
        let car = pose.pos;
        match self.view {
            CameraView::Chase => CameraFrame {
                eye: pose.local_to_world(CHASE_OFFSET),
                target: car,
            },
            CameraView::Cockpit => CameraFrame {
                eye: pose.local_to_world(COCKPIT_OFFSET),
                target: car + pose.get_forward_dir() * COCKPIT_LOOK_DIST,
            },
            CameraView::Overhead => CameraFrame {
                eye: Vec3A::new(car.x, OVERHEAD_HEIGHT, car.z),
                target: car,
            },
            CameraView::Orbit => {
                let (sin, cos) = self.orbit_angle.sin_cos();
                CameraFrame {
                    eye: Vec3A::new(
                        car.x + ORBIT_RADIUS * cos,
                        ORBIT_HEIGHT,
                        car.z + ORBIT_RADIUS * sin,
                    ),
                    target: car,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn cycles_through_all_views() {
        let mut rig = CameraRig::default();
        let seen: Vec<_> = (0..4).map(|_| rig.cycle()).collect();
        assert_eq!(
            seen,
            [
                CameraView::Cockpit,
                CameraView::Overhead,
                CameraView::Orbit,
                CameraView::Chase
            ]
        );
    }

    #[test]
    fn chase_sits_behind_the_car() {
        let rig = CameraRig::new(CameraView::Chase);
        let pose = Pose::new(Vec3A::new(0.0, 0.0, -10.0), 0.0);
        let frame = rig.frame(&pose);
        assert!(frame.eye.abs_diff_eq(Vec3A::new(0.0, 3.0, -2.0), 1e-5));
        assert_eq!(frame.target, pose.pos);

        // Turned around, the camera swings to the other side
        let turned = Pose::new(pose.pos, PI);
        let frame = rig.frame(&turned);
        assert!(frame.eye.abs_diff_eq(Vec3A::new(0.0, 3.0, -18.0), 1e-4));
    }

    #[test]
    fn cockpit_looks_ahead() {
        let rig = CameraRig::new(CameraView::Cockpit);
        let frame = rig.frame(&Pose::DEFAULT);
        assert!(frame.target.abs_diff_eq(Vec3A::new(0.0, 0.0, -10.0), 1e-5));
    }

    #[test]
    fn orbit_only_turns_when_shown() {
        let mut rig = CameraRig::new(CameraView::Chase);
        rig.update(&Pose::DEFAULT);
        assert_eq!(rig.orbit_angle(), 0.0);

        rig.view = CameraView::Orbit;
        let frame = rig.update(&Pose::DEFAULT);
        assert_eq!(rig.orbit_angle(), ORBIT_SPEED);
        assert!((frame.eye.length() - (ORBIT_RADIUS.powi(2) + ORBIT_HEIGHT.powi(2)).sqrt()).abs() < 1e-4);
    }
}
