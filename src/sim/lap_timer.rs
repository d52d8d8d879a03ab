use glam::Vec3A;
use log::info;

use crate::{consts, error::ConfigError};

/// Start/finish line along the Z axis
///
/// A lap is counted when the car crosses `line_z` coming from the side `rearm_z` is on.
/// Crossing back over `rearm_z` in the other direction arms the line again.
///
/// With the defaults a forward crossing increases Z, while driving down the track decreases
/// it, so driving straight ahead never completes a lap. The car has to turn around.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LapConfig {
    pub line_z: f32,
    pub rearm_z: f32,
}

impl Default for LapConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl LapConfig {
    pub const DEFAULT: Self = Self {
        line_z: consts::lap::LINE_Z,
        rearm_z: consts::lap::REARM_Z,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.line_z.is_finite() || !self.rearm_z.is_finite() || self.line_z == self.rearm_z {
            return Err(ConfigError::LapLinesOverlap {
                line: self.line_z,
                rearm: self.rearm_z,
            });
        }

        Ok(())
    }

    /// +1 if a forward crossing increases Z, -1 otherwise
    fn forward_sign(&self) -> f32 {
        (self.line_z - self.rearm_z).signum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LapEvent {
    /// First forward crossing, the timer is now running
    Started { at_ms: f64 },
    /// A lap was completed and the next one began at the same instant
    Completed {
        lap: u32,
        duration_ms: f64,
        is_best: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LapTimer {
    config: LapConfig,
    last_z: Option<f32>,
    current_lap_start_ms: Option<f64>,
    best_lap_ms: Option<f64>,
    last_lap_ms: Option<f64>,
    /// Set by a forward crossing, cleared by a backward one
    crossed: bool,
    laps_completed: u32,
}

impl Default for LapTimer {
    fn default() -> Self {
        Self::new(LapConfig::DEFAULT)
    }
}

fn crosses(prev: f32, cur: f32, line: f32, sign: f32) -> bool {
    prev * sign < line * sign && cur * sign >= line * sign
}

impl LapTimer {
    #[must_use]
    pub const fn new(config: LapConfig) -> Self {
        Self {
            config,
            last_z: None,
            current_lap_start_ms: None,
            best_lap_ms: None,
            last_lap_ms: None,
            crossed: false,
            laps_completed: 0,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &LapConfig {
        &self.config
    }

    /// True once the first forward crossing has happened
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.current_lap_start_ms.is_some()
    }

    #[must_use]
    pub const fn current_lap_start_ms(&self) -> Option<f64> {
        self.current_lap_start_ms
    }

    #[must_use]
    pub const fn best_lap_ms(&self) -> Option<f64> {
        self.best_lap_ms
    }

    #[must_use]
    pub const fn last_lap_ms(&self) -> Option<f64> {
        self.last_lap_ms
    }

    #[must_use]
    pub const fn laps_completed(&self) -> u32 {
        self.laps_completed
    }

    /// Z seen on the previous check, in the current track-local frame
    #[must_use]
    pub const fn last_z(&self) -> Option<f32> {
        self.last_z
    }

    /// Time spent on the lap in progress
    #[must_use]
    pub fn current_lap_ms(&self, now_ms: f64) -> Option<f64> {
        self.current_lap_start_ms
            .map(|start| (now_ms - start).max(0.0))
    }

    /// Feeds one tick's car position. The first call only records the position.
    pub fn check(&mut self, car_pos: Vec3A, now_ms: f64) -> Option<LapEvent> {
        let cur = car_pos.z;
        let Some(prev) = self.last_z.replace(cur) else {
            return None;
        };

        let sign = self.config.forward_sign();
        if crosses(prev, cur, self.config.line_z, sign) {
            if self.crossed {
                return None;
            }
            self.crossed = true;
            return Some(self.on_line_crossed(now_ms));
        }

        if crosses(prev, cur, self.config.rearm_z, -sign) {
            self.crossed = false;
        }

        None
    }

    fn on_line_crossed(&mut self, now_ms: f64) -> LapEvent {
        let Some(start) = self.current_lap_start_ms.replace(now_ms) else {
            info!("Lap timer started");
            return LapEvent::Started { at_ms: now_ms };
        };

        let duration_ms = now_ms - start;
        let is_best = self.best_lap_ms.is_none_or(|best| duration_ms < best);
        if is_best {
            self.best_lap_ms = Some(duration_ms);
        }
        self.last_lap_ms = Some(duration_ms);
        self.laps_completed += 1;

        if is_best {
            info!("Lap {} completed in {duration_ms} ms (new best)", self.laps_completed);
        } else {
            info!("Lap {} completed in {duration_ms} ms", self.laps_completed);
        }

        LapEvent::Completed {
            lap: self.laps_completed,
            duration_ms,
            is_best,
        }
    }

    /// Shifts the remembered position along with the track window
    pub fn rebase(&mut self, delta_z: f32) {
        if let Some(z) = &mut self.last_z {
            *z += delta_z;
        }
    }

    /// Forgets all laps and positions
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }
}
