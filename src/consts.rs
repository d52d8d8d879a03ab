//! Tuning constants. Speeds and accelerations are in world units per tick,
//! timestamps and intervals are in milliseconds.

pub mod car {
    use glam::Vec3A;

    pub const ACCEL: f32 = 0.015;
    pub const DECEL: f32 = 0.008;
    pub const MAX_SPEED: f32 = 0.25;
    pub const TURBO_ACCEL: f32 = 0.02;
    pub const TURBO_MAX_SPEED: f32 = 0.4;
    /// Base yaw change per tick, in radians
    pub const TURN_RATE: f32 = 0.035;
    /// How much of the turn rate is lost at the mode's top speed
    pub const TURN_SPEED_DAMPING: f32 = 0.3;
    pub const BRAKE_FACTOR: f32 = 0.92;
    /// Multiplier from internal speed to km/h shown on the HUD
    pub const DISPLAY_SPEED_SCALE: f32 = 500.0;
    /// Engine loop volume at or above the base top speed
    pub const ENGINE_VOLUME_MAX: f32 = 0.7;

    pub mod spawn {
        use super::Vec3A;

        pub const POS: Vec3A = Vec3A::ZERO;
        pub const YAW: f32 = 0.0;
    }

    pub mod nitro {
        pub const MAX: f32 = 100.0;
        pub const DRAIN_PER_TICK: f32 = 1.0;
        pub const RECHARGE_PER_TICK: f32 = 0.2;
        /// Applied on top of the turbo acceleration
        pub const ACCEL_SCALE: f32 = 1.5;
        /// Applied on top of the turbo top speed
        pub const SPEED_SCALE: f32 = 1.5;
    }
}

pub mod missile {
    pub const MAX_AMMO: u32 = 3;
    pub const RECHARGE_INTERVAL_MS: f64 = 5000.0;
    pub const SPEED: f32 = 1.0;
    pub const DESPAWN_RADIUS: f32 = 100.0;
    /// Spawn point relative to the car, along its heading
    pub const SPAWN_FORWARD_OFFSET: f32 = 2.0;
    pub const SPAWN_HEIGHT_OFFSET: f32 = 0.5;
}

pub mod track {
    pub const SEGMENT_COUNT: usize = 3;
    /// Upper bound on `TrackConfig::segment_count`
    pub const MAX_SEGMENT_COUNT: usize = 16;
    pub const SEGMENT_LENGTH: f32 = 200.0;
    pub const FIRST_SEGMENT_START_Z: f32 = 0.0;
}

pub mod lap {
    pub const LINE_Z: f32 = -39.0;
    pub const REARM_Z: f32 = -41.0;
}

pub mod camera {
    use glam::Vec3A;

    pub const CHASE_OFFSET: Vec3A = Vec3A::new(0.0, 3.0, 8.0);
    pub const COCKPIT_OFFSET: Vec3A = Vec3A::new(0.0, 1.2, -0.5);
    pub const COCKPIT_LOOK_DIST: f32 = 10.0;
    pub const OVERHEAD_HEIGHT: f32 = 20.0;
    pub const ORBIT_RADIUS: f32 = 15.0;
    pub const ORBIT_HEIGHT: f32 = 5.0;
    pub const ORBIT_SPEED: f32 = 0.005;
}

pub mod perf {
    pub const HISTORY_SIZE: usize = 60;
    pub const TARGET_FPS: f64 = 60.0;
    pub const LOW_FPS_RATIO: f64 = 0.8;
    pub const SLOW_FRAME_RATIO: f64 = 1.2;
}

pub mod assets {
    pub const MAX_RETRIES: u32 = 3;
    pub const RETRY_DELAY_MS: u64 = 1000;
}
