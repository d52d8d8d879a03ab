use log::{info, warn};

use super::{
    AdvanceResult, CameraFrame, CameraRig, CameraView, Car, CarConfig, CarState, FrameStats,
    FrameStatsConfig, HudSnapshot, InputState, Key, LapConfig, LapEvent, LapTimer, PerfWarning,
    Pose, ProjectileConfig, ProjectileId, ProjectileManager, SimEvent, SimObserver, Telemetry,
    TrackConfig, TrackSegment, TrackSegmentManager,
};
use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    pub car: CarConfig,
    pub projectile: ProjectileConfig,
    pub track: TrackConfig,
    pub lap: LapConfig,
    pub frame_stats: FrameStatsConfig,
    /// View shown when the session starts
    pub camera_view: CameraView,
    /// Seed for segment decoration. Leave as `None` to seed from system entropy.
    pub rng_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl SessionConfig {
    pub const DEFAULT: Self = Self {
        car: CarConfig::DEFAULT,
        projectile: ProjectileConfig::DEFAULT,
        track: TrackConfig::DEFAULT,
        lap: LapConfig::DEFAULT,
        frame_stats: FrameStatsConfig::DEFAULT,
        camera_view: CameraView::Chase,
        rng_seed: None,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.car.validate()?;
        self.projectile.validate()?;
        self.track.validate()?;
        self.lap.validate()?;
        self.frame_stats.validate()
    }
}

/// What happened during one [`Session::step`]
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub tick_count: u64,
    /// Car pose after rebasing
    pub pose: Pose,
    pub telemetry: Telemetry,
    pub camera: CameraFrame,
    pub fired: Option<ProjectileId>,
    pub expired: Vec<ProjectileId>,
    pub advance: AdvanceResult,
    pub lap: Option<LapEvent>,
    pub perf_warnings: Vec<PerfWarning>,
}

impl TickReport {
    /// Flattens the report into notifications, in the order collaborators should apply them
    #[must_use]
    pub fn events(&self, projectiles: &ProjectileManager) -> Vec<SimEvent> {
        let mut events = Vec::new();

        if let Some(segment) = self.advance.evicted {
            events.push(SimEvent::SegmentEvicted(segment));
        }
        if let Some(segment) = self.advance.added {
            events.push(SimEvent::SegmentAdded(segment));
        }
        if self.advance.did_advance {
            events.push(SimEvent::Rebased {
                delta_z: self.advance.rebased_by,
            });
        }

        if let Some(id) = self.fired {
            // A missile can expire on the tick it was fired if the radius is tiny
            if let Some(projectile) = projectiles.get(id) {
                events.push(SimEvent::ProjectileSpawned {
                    id,
                    projectile: *projectile,
                });
            }
        }
        events.extend(
            self.expired
                .iter()
                .filter(|&&id| Some(id) != self.fired)
                .map(|&id| SimEvent::ProjectileExpired(id)),
        );

        events.push(SimEvent::CarMoved {
            pose: self.pose,
            telemetry: self.telemetry,
        });
        events.push(SimEvent::Camera(self.camera));

        if let Some(lap) = self.lap {
            events.push(SimEvent::Lap(lap));
        }
        events.extend(self.perf_warnings.iter().copied().map(SimEvent::Perf));

        events
    }
}

/// Handles a collaborator must release when the session ends
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Teardown {
    pub projectiles: Vec<ProjectileId>,
    pub segments: Vec<TrackSegment>,
}

/// One race: a single car on an endless track
///
/// The session owns every core component and is the only thing that advances them. Each
/// [`step`](Self::step) runs the car, slides the track window, shifts every stored position
/// by the same amount, and only then lets projectiles, the lap timer, and the camera read
/// the car's pose.
#[derive(Clone, Debug)]
pub struct Session {
    config: SessionConfig,
    car: Car,
    projectiles: ProjectileManager,
    track: TrackSegmentManager,
    lap_timer: LapTimer,
    camera: CameraRig,
    frame_stats: FrameStats,
    tick_count: u64,
    last_now_ms: f64,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let session = Self {
            car: Car::new(config.car),
            projectiles: ProjectileManager::new(config.projectile),
            track: TrackSegmentManager::new(config.track, config.rng_seed)?,
            lap_timer: LapTimer::new(config.lap),
            camera: CameraRig::new(config.camera_view),
            frame_stats: FrameStats::new(config.frame_stats),
            tick_count: 0,
            last_now_ms: 0.0,
            config,
        };

        info!(
            "Session created with {} segments of length {}",
            session.track.len(),
            config.track.segment_length
        );

        Ok(session)
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub const fn car(&self) -> &Car {
        &self.car
    }

    #[must_use]
    pub const fn car_state(&self) -> CarState {
        self.car.get_state()
    }

    /// Replaces the car's state, for tests and scripted starts
    pub fn set_car_state(&mut self, state: &CarState) {
        self.car.set_state(state);
    }

    #[must_use]
    pub const fn controls(&self) -> &InputState {
        &self.car.controls
    }

    /// Sets the controls used from the next step on
    pub const fn set_controls(&mut self, controls: InputState) {
        self.car.controls = controls;
    }

    /// Applies a key event. The camera key cycles views on press.
    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        if !self.car.controls.set_key(key, pressed) && key == Key::C && pressed {
            let view = self.camera.cycle();
            info!("Camera view: {view:?}");
        }
    }

    #[must_use]
    pub const fn projectiles(&self) -> &ProjectileManager {
        &self.projectiles
    }

    #[must_use]
    pub const fn track(&self) -> &TrackSegmentManager {
        &self.track
    }

    #[must_use]
    pub const fn lap_timer(&self) -> &LapTimer {
        &self.lap_timer
    }

    #[must_use]
    pub const fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub const fn set_camera_view(&mut self, view: CameraView) {
        self.camera.view = view;
    }

    #[must_use]
    pub const fn frame_stats(&self) -> &FrameStats {
        &self.frame_stats
    }

    #[must_use]
    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot::new(
            &self.car.telemetry(),
            self.config.car.ammo.max_ammo,
            &self.lap_timer,
            self.camera.view,
            self.last_now_ms,
        )
    }

    /// Advances the race by one tick using the current controls
    pub fn step(&mut self, now_ms: f64) -> TickReport {
        let car_out = self.car.tick(now_ms);
        let fired = car_out.fired.map(|projectile| self.projectiles.spawn(projectile));

        let advance = self.track.advance(self.car.pose().pos);
        if advance.did_advance {
            self.rebase(advance.rebased_by);
        }

        let car_pos = self.car.pose().pos;
        let expired = self.projectiles.update(car_pos);
        let lap = self.lap_timer.check(car_pos, now_ms);
        let camera = self.camera.update(self.car.pose());
        let perf_warnings = self.frame_stats.record(now_ms);

        self.tick_count += 1;
        self.last_now_ms = now_ms;

        TickReport {
            tick_count: self.tick_count,
            pose: *self.car.pose(),
            telemetry: car_out.telemetry,
            camera,
            fired,
            expired,
            advance,
            lap,
            perf_warnings,
        }
    }

    /// Like [`step`](Self::step), then hands every event to `observer`
    ///
    /// Observer failures are logged and dropped. The simulation never sees them.
    pub fn step_with(&mut self, now_ms: f64, observer: &mut dyn SimObserver) -> TickReport {
        let report = self.step(now_ms);
        for event in report.events(&self.projectiles) {
            if let Err(err) = observer.on_event(&event) {
                warn!("Collaborator failed to handle {event:?}: {err}");
            }
        }
        report
    }

    /// Shifts every stored track-local Z by `delta_z`
    fn rebase(&mut self, delta_z: f32) {
        self.car.rebase(delta_z);
        self.projectiles.rebase(delta_z);
        self.lap_timer.rebase(delta_z);
    }

    /// Ends the session, returning what collaborators must release
    #[must_use]
    pub fn teardown(mut self) -> Teardown {
        info!(
            "Session ended after {} ticks, {} laps",
            self.tick_count,
            self.lap_timer.laps_completed()
        );

        Teardown {
            projectiles: self.projectiles.clear(),
            segments: self.track.segments().to_vec(),
        }
    }
}
