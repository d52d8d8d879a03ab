use super::{CarConfig, CarState, DriveMode, InputState, Pose, Projectile, SpeedProfile};
use crate::{consts, math};
use glam::Vec3A;
use log::debug;

/// Read-only projection of the car for the HUD and audio adapters
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Telemetry {
    /// Absolute speed in display units
    pub speed_kmh: f32,
    /// Goes from 0 to 100
    pub nitro_percent: f32,
    pub ammo_count: u32,
    pub mode: DriveMode,
    pub nitro_active: bool,
    pub turbo_active: bool,
    pub braking: bool,
    pub is_moving: bool,
    /// Suggested engine loop volume, from 0 to `ENGINE_VOLUME_MAX`
    pub engine_volume: f32,
}

/// Everything one call to [`Car::update`] produced
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarTickOutput {
    pub pose: Pose,
    pub telemetry: Telemetry,
    /// Missile launched this tick, to be handed to the projectile manager
    pub fired: Option<Projectile>,
}

/// The player's car. Only this type writes to its state during a session.
#[derive(Clone, Debug)]
pub struct Car {
    /// The controls to simulate the car with on the next update
    pub controls: InputState,
    pub(crate) config: CarConfig,
    pub(crate) internal_state: CarState,
}

impl Default for Car {
    fn default() -> Self {
        Self::new(CarConfig::DEFAULT)
    }
}

impl Car {
    #[must_use]
    pub const fn new(config: CarConfig) -> Self {
        Self {
            controls: InputState::DEFAULT,
            internal_state: CarState::spawn(&config),
            config,
        }
    }

    /// Configuration for this car
    #[must_use]
    pub const fn config(&self) -> &CarConfig {
        &self.config
    }

    #[must_use]
    pub const fn pose(&self) -> &Pose {
        &self.internal_state.pose
    }

    #[must_use]
    pub const fn get_state(&self) -> CarState {
        self.internal_state
    }

    /// Overwrites the car's state. Values are clamped into their valid ranges.
    pub fn set_state(&mut self, state: &CarState) {
        let mut state = *state;
        state.speed = state
            .speed
            .clamp(self.config.min_speed(), self.config.nitro_profile().max_speed);
        state.nitro_charge = state.nitro_charge.clamp(0.0, self.config.nitro.max);
        state.ammo_count = state.ammo_count.min(self.config.ammo.max_ammo);
        state.yaw = math::wrap_angle(state.yaw);
        self.internal_state = state;
    }

    /// Puts the car back at the spawn pose with a full tank and full ammo
    pub fn respawn(&mut self) {
        self.internal_state = CarState::spawn(&self.config);
        self.controls = InputState::DEFAULT;
    }

    #[must_use]
    pub fn get_forward_dir(&self) -> Vec3A {
        self.internal_state.get_forward_dir()
    }

    #[must_use]
    pub fn get_right_dir(&self) -> Vec3A {
        self.internal_state.get_right_dir()
    }

    /// Launches a missile from the car's nose if there is ammo left
    ///
    /// Returns `None` and leaves the state untouched when out of ammo.
    pub fn fire(&mut self, now_ms: f64) -> Option<Projectile> {
        let state = &mut self.internal_state;
        if state.ammo_count == 0 {
            return None;
        }

        let pos = state.pose.local_to_world(self.config.ammo.muzzle_offset);
        state.ammo_count -= 1;
        state.recharge_clock_ms = now_ms;

        debug!("Missile fired, {} left", state.ammo_count);
        Some(Projectile::new(Pose::new(pos, state.pose.yaw), now_ms))
    }

    /// Sets `controls` and simulates one tick
    pub fn update(&mut self, controls: InputState, now_ms: f64) -> CarTickOutput {
        self.controls = controls;
        self.tick(now_ms)
    }

    /// Simulates one tick with the current `controls`
    pub fn tick(&mut self, now_ms: f64) -> CarTickOutput {
        let controls = self.controls;
        let nitro_active = controls.nitro && self.internal_state.nitro_charge > 0.0;
        let (mode, profile) = self.select_mode(&controls, nitro_active);

        self.update_nitro(nitro_active);
        self.update_speed(&controls, nitro_active, profile);
        self.update_heading(&controls, profile);

        let state = &mut self.internal_state;
        state.pose.pos += state.pose.get_forward_dir() * state.speed;

        let fired = if controls.fire && !state.prev_controls.fire {
            self.fire(now_ms)
        } else {
            None
        };

        self.update_ammo(now_ms);

        let state = &mut self.internal_state;
        state.mode = mode;
        state.is_nitro_active = nitro_active;
        state.prev_controls = controls;

        CarTickOutput {
            pose: state.pose,
            telemetry: self.telemetry(),
            fired,
        }
    }

    fn select_mode(&self, controls: &InputState, nitro_active: bool) -> (DriveMode, SpeedProfile) {
        if nitro_active {
            (DriveMode::Nitro, self.config.nitro_profile())
        } else if controls.is_boosted() {
            (DriveMode::Turbo, self.config.turbo)
        } else {
            (DriveMode::Base, self.config.base)
        }
    }

    fn update_nitro(&mut self, nitro_active: bool) {
        let nitro = &self.config.nitro;
        let charge = &mut self.internal_state.nitro_charge;
        *charge = if nitro_active {
            (*charge - nitro.drain_per_tick).max(0.0)
        } else {
            (*charge + nitro.recharge_per_tick).min(nitro.max)
        };
    }

    fn update_speed(&mut self, controls: &InputState, nitro_active: bool, profile: SpeedProfile) {
        let min_speed = self.config.min_speed();
        let speed = &mut self.internal_state.speed;

        if controls.accelerate || nitro_active {
            *speed = (*speed + profile.accel).min(profile.max_speed);
        } else if controls.reverse {
            *speed = (*speed - self.config.base.accel).max(min_speed);
        } else if *speed > 0.0 {
            *speed = (*speed - self.config.decel).max(0.0);
        } else if *speed < 0.0 {
            *speed = (*speed + self.config.decel).min(0.0);
        }

        if controls.brake {
            *speed *= self.config.brake_factor;
        }

        // Dropping out of a faster mode brings the car back under the new ceiling
        *speed = speed.clamp(min_speed, profile.max_speed);
    }

    fn update_heading(&mut self, controls: &InputState, profile: SpeedProfile) {
        let state = &mut self.internal_state;
        if state.speed == 0.0 {
            return;
        }

        let speed_factor = (state.speed.abs() / profile.max_speed).min(1.0);
        let turn_rate = self.config.turn_rate * (1.0 - speed_factor * self.config.turn_speed_damping);

        let mut yaw = state.pose.yaw;
        if controls.steer_left {
            yaw += turn_rate;
        }
        if controls.steer_right {
            yaw -= turn_rate;
        }
        state.pose.yaw = math::wrap_angle(yaw);
    }

    fn update_ammo(&mut self, now_ms: f64) {
        let ammo = &self.config.ammo;
        let state = &mut self.internal_state;
        if state.ammo_count < ammo.max_ammo
            && now_ms - state.recharge_clock_ms > ammo.recharge_interval_ms
        {
            state.ammo_count += 1;
            state.recharge_clock_ms = now_ms;
            debug!("Missile recharged, {} available", state.ammo_count);
        }
    }

    /// Derived values for the HUD and audio, no side effects
    #[must_use]
    pub fn telemetry(&self) -> Telemetry {
        let state = &self.internal_state;
        let speed = state.speed.abs();

        Telemetry {
            speed_kmh: speed * self.config.display_speed_scale,
            nitro_percent: state.nitro_charge / self.config.nitro.max * 100.0,
            ammo_count: state.ammo_count,
            mode: state.mode,
            nitro_active: state.is_nitro_active,
            turbo_active: state.mode == DriveMode::Turbo,
            braking: state.prev_controls.brake,
            is_moving: state.is_moving(),
            engine_volume: (speed / self.config.base.max_speed * consts::car::ENGINE_VOLUME_MAX)
                .min(consts::car::ENGINE_VOLUME_MAX),
        }
    }

    /// Shifts the car along Z when the track window slides
    pub(crate) fn rebase(&mut self, delta_z: f32) {
        self.internal_state.pose.rebase(delta_z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCELERATE: InputState = InputState {
        accelerate: true,
        ..InputState::DEFAULT
    };

    #[test]
    fn accelerates_to_base_cap() {
        let mut car = Car::default();
        for tick in 1..=50 {
            car.update(ACCELERATE, 0.0);
            if tick < 17 {
                assert!(car.get_state().speed < 0.25);
            } else {
                assert_eq!(car.get_state().speed, 0.25);
            }
        }
    }

    #[test]
    fn coasting_stops_at_zero() {
        let mut car = Car::default();
        car.set_state(&CarState {
            speed: 0.01,
            ..car.get_state()
        });
        car.update(InputState::DEFAULT, 0.0);
        assert!((car.get_state().speed - 0.002).abs() < 1e-6);
        car.update(InputState::DEFAULT, 0.0);
        assert_eq!(car.get_state().speed, 0.0);

        car.set_state(&CarState {
            speed: -0.005,
            ..car.get_state()
        });
        car.update(InputState::DEFAULT, 0.0);
        assert_eq!(car.get_state().speed, 0.0);
    }

    #[test]
    fn reverse_is_capped_at_half_base() {
        let reverse = InputState {
            reverse: true,
            ..InputState::DEFAULT
        };
        let mut car = Car::default();
        for _ in 0..100 {
            car.update(reverse, 0.0);
        }
        assert_eq!(car.get_state().speed, -0.125);
        // Reversing moves towards +Z
        assert!(car.pose().pos.z > 0.0);
    }

    #[test]
    fn turbo_raises_ceiling() {
        let turbo = InputState {
            accelerate: true,
            boost_modifier: true,
            ..InputState::DEFAULT
        };
        let mut car = Car::default();
        for _ in 0..100 {
            car.update(turbo, 0.0);
        }
        assert_eq!(car.get_state().speed, 0.4);
        assert!(car.telemetry().turbo_active);

        // Releasing the modifier drops back under the base ceiling
        car.update(ACCELERATE, 0.0);
        assert_eq!(car.get_state().speed, 0.25);
    }

    #[test]
    fn empty_nitro_falls_through() {
        let mut car = Car::default();
        car.set_state(&CarState {
            speed: 0.2,
            nitro_charge: 0.0,
            ..car.get_state()
        });

        let nitro = InputState {
            nitro: true,
            accelerate: true,
            ..InputState::DEFAULT
        };
        let out = car.update(nitro, 0.0);
        assert!(!out.telemetry.nitro_active);
        assert!((car.get_state().speed - 0.215).abs() < 1e-6);
        assert!((car.get_state().nitro_charge - 0.2).abs() < 1e-6);
    }

    #[test]
    fn nitro_drains_and_recharges() {
        let nitro = InputState {
            nitro: true,
            ..InputState::DEFAULT
        };
        let mut car = Car::default();
        for _ in 0..150 {
            car.update(nitro, 0.0);
            let charge = car.get_state().nitro_charge;
            assert!((0.0..=100.0).contains(&charge));
        }
        assert_eq!(car.get_state().nitro_charge, 0.0);
        assert!(car.get_state().speed <= 0.6);

        for _ in 0..1000 {
            car.update(InputState::DEFAULT, 0.0);
        }
        assert_eq!(car.get_state().nitro_charge, 100.0);
    }

    #[test]
    fn held_nitro_on_empty_tank_alternates() {
        let nitro = InputState {
            nitro: true,
            accelerate: true,
            ..InputState::DEFAULT
        };
        let mut car = Car::default();
        car.set_state(&CarState {
            speed: 0.25,
            nitro_charge: 0.0,
            ..car.get_state()
        });

        for _ in 0..4 {
            let out = car.update(nitro, 0.0);
            assert_eq!(out.telemetry.mode, DriveMode::Base);
            assert!(!out.telemetry.nitro_active);
            assert!((car.get_state().nitro_charge - 0.2).abs() < 1e-6);
            assert_eq!(car.get_state().speed, 0.25);

            let out = car.update(nitro, 0.0);
            assert_eq!(out.telemetry.mode, DriveMode::Nitro);
            assert!(out.telemetry.nitro_active);
            assert_eq!(car.get_state().nitro_charge, 0.0);
            assert!(car.get_state().speed > 0.25);
        }
    }

    #[test]
    fn no_turning_in_place() {
        let left = InputState {
            steer_left: true,
            ..InputState::DEFAULT
        };
        let mut car = Car::default();
        car.update(left, 0.0);
        assert_eq!(car.pose().yaw, 0.0);
    }

    #[test]
    fn turning_is_damped_by_speed() {
        let left = InputState {
            accelerate: true,
            steer_left: true,
            ..InputState::DEFAULT
        };
        let mut car = Car::default();
        car.set_state(&CarState {
            speed: 0.25,
            ..car.get_state()
        });
        car.update(left, 0.0);
        // Full damping at top speed
        assert!((car.pose().yaw - 0.035 * 0.7).abs() < 1e-6);
    }

    #[test]
    fn brakes_and_steers_in_one_tick() {
        let input = InputState {
            brake: true,
            steer_left: true,
            ..InputState::DEFAULT
        };
        let mut car = Car::default();
        car.set_state(&CarState {
            speed: 0.2,
            ..car.get_state()
        });
        car.update(input, 0.0);

        // Coast by decel, then scale by the brake factor
        let speed = (0.2 - 0.008) * 0.92;
        assert!((car.get_state().speed - speed).abs() < 1e-6);
        assert!(car.telemetry().braking);

        // Turn rate is damped by the braked speed
        let yaw = 0.035 * (1.0 - speed / 0.25 * 0.3);
        assert!((car.pose().yaw - yaw).abs() < 1e-6);
    }

    #[test]
    fn respawn_restores_spawn_state() {
        let mut car = Car::default();
        car.fire(0.0);
        car.update(
            InputState {
                nitro: true,
                steer_right: true,
                ..InputState::DEFAULT
            },
            16.0,
        );
        assert_ne!(car.get_state(), CarState::spawn(car.config()));

        car.respawn();
        assert_eq!(car.get_state(), CarState::spawn(car.config()));
        assert_eq!(car.controls, InputState::DEFAULT);
    }

    #[test]
    fn fire_until_empty() {
        let mut car = Car::default();
        for expected in [2, 1, 0] {
            assert!(car.fire(0.0).is_some());
            assert_eq!(car.get_state().ammo_count, expected);
        }
        let before = car.get_state();
        assert!(car.fire(10.0).is_none());
        assert_eq!(car.get_state(), before);
    }

    #[test]
    fn missile_spawns_at_nose() {
        let mut car = Car::default();
        let missile = car.fire(0.0).unwrap();
        assert!(missile.pose.pos.abs_diff_eq(Vec3A::new(0.0, 0.5, -2.0), 1e-6));
        assert_eq!(missile.pose.yaw, 0.0);
    }

    #[test]
    fn holding_fire_shoots_once() {
        let fire = InputState {
            fire: true,
            ..InputState::DEFAULT
        };
        let mut car = Car::default();
        assert!(car.update(fire, 0.0).fired.is_some());
        assert!(car.update(fire, 16.0).fired.is_none());
        car.update(InputState::DEFAULT, 32.0);
        assert!(car.update(fire, 48.0).fired.is_some());
        assert_eq!(car.get_state().ammo_count, 1);
    }

    #[test]
    fn ammo_recharges_after_interval() {
        let mut car = Car::default();
        car.fire(1000.0);
        car.update(InputState::DEFAULT, 6000.0);
        assert_eq!(car.get_state().ammo_count, 2);
        car.update(InputState::DEFAULT, 6001.0);
        assert_eq!(car.get_state().ammo_count, 3);

        // Never above the cap
        car.update(InputState::DEFAULT, 60_000.0);
        assert_eq!(car.get_state().ammo_count, 3);
    }

    #[test]
    fn telemetry_is_scaled() {
        let mut car = Car::default();
        car.set_state(&CarState {
            speed: -0.1,
            nitro_charge: 50.0,
            ..car.get_state()
        });
        let telemetry = car.telemetry();
        assert!((telemetry.speed_kmh - 50.0).abs() < 1e-4);
        assert_eq!(telemetry.nitro_percent, 50.0);
        assert!(telemetry.is_moving);
    }
}
