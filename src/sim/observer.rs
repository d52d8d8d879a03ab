use super::{
    CameraFrame, LapEvent, PerfWarning, Pose, Projectile, ProjectileId, Telemetry, TrackSegment,
};
use crate::error::CollaboratorError;

/// Notification for the renderer, audio, and HUD adapters
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimEvent {
    CarMoved { pose: Pose, telemetry: Telemetry },
    Camera(CameraFrame),
    ProjectileSpawned { id: ProjectileId, projectile: Projectile },
    ProjectileExpired(ProjectileId),
    /// Already in the coordinates that hold after the tick's rebase
    SegmentAdded(TrackSegment),
    /// Its geometry can be released
    SegmentEvicted(TrackSegment),
    /// Every track-local Z the adapter holds must be shifted by this much
    Rebased { delta_z: f32 },
    Lap(LapEvent),
    Perf(PerfWarning),
}

/// Receives the session's events. Errors are logged by the session and otherwise ignored.
pub trait SimObserver {
    fn on_event(&mut self, event: &SimEvent) -> Result<(), CollaboratorError>;
}

impl<F> SimObserver for F
where
    F: FnMut(&SimEvent) -> Result<(), CollaboratorError>,
{
    fn on_event(&mut self, event: &SimEvent) -> Result<(), CollaboratorError> {
        self(event)
    }
}

/// Keeps every event, for tests and replays
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    pub events: Vec<SimEvent>,
}

impl SimObserver for EventLog {
    fn on_event(&mut self, event: &SimEvent) -> Result<(), CollaboratorError> {
        self.events.push(*event);
        Ok(())
    }
}
