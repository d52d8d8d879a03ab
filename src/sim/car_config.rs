use glam::Vec3A;

use crate::{
    consts,
    error::{ConfigError, check_non_negative, check_positive, check_range},
};

/// Acceleration and top speed for one driving mode
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeedProfile {
    /// Speed gained per tick while accelerating
    pub accel: f32,
    /// Top speed, also the clamp applied at the end of a tick in this mode
    pub max_speed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NitroConfig {
    /// Full tank
    pub max: f32,
    pub drain_per_tick: f32,
    pub recharge_per_tick: f32,
    /// Multiplies the turbo acceleration while nitro burns
    pub accel_scale: f32,
    /// Multiplies the turbo top speed while nitro burns
    pub speed_scale: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmmoConfig {
    pub max_ammo: u32,
    /// Time without firing before one missile is restored
    pub recharge_interval_ms: f64,
    /// Where missiles appear, in car space (x right, y up, -z forward)
    pub muzzle_offset: Vec3A,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarConfig {
    pub base: SpeedProfile,
    /// Used while accelerate and the boost modifier are both held
    pub turbo: SpeedProfile,
    /// Speed lost per tick when coasting
    pub decel: f32,
    /// Yaw change per tick at standstill
    pub turn_rate: f32,
    /// Fraction of `turn_rate` lost at the active mode's top speed
    pub turn_speed_damping: f32,
    /// Speed multiplier applied every tick the brake is held
    pub brake_factor: f32,
    pub nitro: NitroConfig,
    pub ammo: AmmoConfig,
    pub display_speed_scale: f32,
}

impl Default for CarConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl CarConfig {
    pub const DEFAULT: Self = Self {
        base: SpeedProfile {
            accel: consts::car::ACCEL,
            max_speed: consts::car::MAX_SPEED,
        },
        turbo: SpeedProfile {
            accel: consts::car::TURBO_ACCEL,
            max_speed: consts::car::TURBO_MAX_SPEED,
        },
        decel: consts::car::DECEL,
        turn_rate: consts::car::TURN_RATE,
        turn_speed_damping: consts::car::TURN_SPEED_DAMPING,
        brake_factor: consts::car::BRAKE_FACTOR,
        nitro: NitroConfig {
            max: consts::car::nitro::MAX,
            drain_per_tick: consts::car::nitro::DRAIN_PER_TICK,
            recharge_per_tick: consts::car::nitro::RECHARGE_PER_TICK,
            accel_scale: consts::car::nitro::ACCEL_SCALE,
            speed_scale: consts::car::nitro::SPEED_SCALE,
        },
        ammo: AmmoConfig {
            max_ammo: consts::missile::MAX_AMMO,
            recharge_interval_ms: consts::missile::RECHARGE_INTERVAL_MS,
            muzzle_offset: Vec3A::new(
                0.0,
                consts::missile::SPAWN_HEIGHT_OFFSET,
                -consts::missile::SPAWN_FORWARD_OFFSET,
            ),
        },
        display_speed_scale: consts::car::DISPLAY_SPEED_SCALE,
    };

    /// Profile used while nitro is burning
    #[must_use]
    pub const fn nitro_profile(&self) -> SpeedProfile {
        SpeedProfile {
            accel: self.turbo.accel * self.nitro.accel_scale,
            max_speed: self.turbo.max_speed * self.nitro.speed_scale,
        }
    }

    /// Lowest speed the car can reach (full reverse)
    #[must_use]
    pub const fn min_speed(&self) -> f32 {
        -self.base.max_speed / 2.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("base.accel", self.base.accel.into())?;
        check_positive("base.max_speed", self.base.max_speed.into())?;
        check_positive("turbo.accel", self.turbo.accel.into())?;
        check_positive("turbo.max_speed", self.turbo.max_speed.into())?;
        if self.turbo.max_speed < self.base.max_speed {
            return Err(ConfigError::TurboSlowerThanBase {
                base: self.base.max_speed,
                turbo: self.turbo.max_speed,
            });
        }

        check_non_negative("decel", self.decel.into())?;
        check_non_negative("turn_rate", self.turn_rate.into())?;
        check_range("turn_speed_damping", self.turn_speed_damping.into(), 0.0, 1.0)?;
        check_range("brake_factor", self.brake_factor.into(), 0.0, 1.0)?;

        check_positive("nitro.max", self.nitro.max.into())?;
        check_non_negative("nitro.drain_per_tick", self.nitro.drain_per_tick.into())?;
        check_non_negative("nitro.recharge_per_tick", self.nitro.recharge_per_tick.into())?;
        check_range("nitro.accel_scale", self.nitro.accel_scale.into(), 1.0, f64::MAX)?;
        check_range("nitro.speed_scale", self.nitro.speed_scale.into(), 1.0, f64::MAX)?;

        check_non_negative("ammo.recharge_interval_ms", self.ammo.recharge_interval_ms)?;
        check_positive("display_speed_scale", self.display_speed_scale.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(CarConfig::DEFAULT.validate(), Ok(()));
    }

    #[test]
    fn nitro_profile_scales_turbo() {
        let profile = CarConfig::DEFAULT.nitro_profile();
        assert!((profile.accel - 0.03).abs() < 1e-6);
        assert!((profile.max_speed - 0.6).abs() < 1e-6);
    }

    #[test]
    fn rejects_slow_turbo() {
        let mut config = CarConfig::DEFAULT;
        config.turbo.max_speed = 0.1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TurboSlowerThanBase { .. })
        ));
    }

    #[test]
    fn rejects_brake_that_speeds_up() {
        let config = CarConfig {
            brake_factor: 1.5,
            ..CarConfig::DEFAULT
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                name: "brake_factor",
                ..
            })
        ));
    }
}
