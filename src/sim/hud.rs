use std::fmt::Display;

use super::{CameraView, LapTimer, Telemetry};

/// Everything the HUD shows for one tick
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HudSnapshot {
    pub speed_kmh: f32,
    pub nitro_percent: f32,
    pub ammo_count: u32,
    pub max_ammo: u32,
    /// `None` until the car first crosses the start line
    pub current_lap_ms: Option<f64>,
    pub best_lap_ms: Option<f64>,
    pub laps_completed: u32,
    pub camera_view: CameraView,
}

impl HudSnapshot {
    #[must_use]
    pub fn new(
        telemetry: &Telemetry,
        max_ammo: u32,
        lap_timer: &LapTimer,
        camera_view: CameraView,
        now_ms: f64,
    ) -> Self {
        Self {
            speed_kmh: telemetry.speed_kmh,
            nitro_percent: telemetry.nitro_percent,
            ammo_count: telemetry.ammo_count,
            max_ammo,
            current_lap_ms: lap_timer.current_lap_ms(now_ms),
            best_lap_ms: lap_timer.best_lap_ms(),
            laps_completed: lap_timer.laps_completed(),
            camera_view,
        }
    }

    /// Speed rounded to whole km/h
    #[must_use]
    pub fn speed_label(&self) -> String {
        format!("{} km/h", self.speed_kmh.round())
    }
}

impl Display for HudSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_fmt(format_args!("{}", self.speed_label()))?;
        f.write_fmt(format_args!(" | nitro {:.0}%", self.nitro_percent))?;
        f.write_fmt(format_args!(" | missiles {}/{}", self.ammo_count, self.max_ammo))?;
        f.write_fmt(format_args!(
            " | lap {}",
            format_lap_time(self.current_lap_ms.unwrap_or(0.0))
        ))?;
        if let Some(best) = self.best_lap_ms {
            f.write_fmt(format_args!(" | best {}", format_lap_time(best)))?;
        }
        Ok(())
    }
}

/// Formats a duration as `MM:SS.mmm`, truncating to whole milliseconds
#[must_use]
pub fn format_lap_time(ms: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total_ms = if ms.is_finite() && ms > 0.0 {
        ms.floor() as u64
    } else {
        0
    };

    let minutes = total_ms / 60_000;
    let seconds = total_ms / 1000 % 60;
    let millis = total_ms % 1000;
    format!("{minutes:02}:{seconds:02}.{millis:03}")
}
