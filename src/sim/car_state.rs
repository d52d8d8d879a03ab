use std::ops::{Deref, DerefMut};

use glam::Vec3A;

use crate::{CarConfig, InputState, Pose, consts};

/// Which speed profile drove the car on the last tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DriveMode {
    #[default]
    Base,
    Turbo,
    Nitro,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarState {
    pub pose: Pose,
    /// Signed speed along the heading, negative when reversing
    pub speed: f32,
    /// Goes from 0 to `NitroConfig::max`
    pub nitro_charge: f32,
    pub ammo_count: u32,
    /// Timestamp of the last shot or the last missile restored, whichever came later
    pub recharge_clock_ms: f64,
    /// Mode used on the last tick
    pub mode: DriveMode,
    /// True if nitro burned on the last tick
    pub is_nitro_active: bool,
    /// Controls from the last time this car was simulated, used for fire edge detection
    pub prev_controls: InputState,
}

impl Default for CarState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl CarState {
    pub const DEFAULT: Self = Self {
        pose: Pose {
            pos: consts::car::spawn::POS,
            yaw: consts::car::spawn::YAW,
        },
        speed: 0.0,
        nitro_charge: consts::car::nitro::MAX,
        ammo_count: consts::missile::MAX_AMMO,
        recharge_clock_ms: 0.0,
        mode: DriveMode::Base,
        is_nitro_active: false,
        prev_controls: InputState::DEFAULT,
    };

    /// Fresh state at the spawn pose, with a full nitro tank and full ammo for `config`
    #[must_use]
    pub const fn spawn(config: &CarConfig) -> Self {
        Self {
            nitro_charge: config.nitro.max,
            ammo_count: config.ammo.max_ammo,
            ..Self::DEFAULT
        }
    }

    #[must_use]
    pub fn velocity(&self) -> Vec3A {
        self.pose.get_forward_dir() * self.speed
    }

    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.speed != 0.0
    }
}

impl Deref for CarState {
    type Target = Pose;
    fn deref(&self) -> &Self::Target {
        &self.pose
    }
}

impl DerefMut for CarState {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.pose
    }
}
