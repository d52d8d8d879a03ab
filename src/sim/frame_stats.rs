use std::collections::VecDeque;

use log::warn;

use crate::{
    consts::perf,
    error::{ConfigError, check_positive, check_range},
};

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameStatsConfig {
    /// Number of frames averaged
    pub history_size: usize,
    pub target_fps: f64,
    /// Warn when the average FPS drops below this fraction of the target
    pub low_fps_ratio: f64,
    /// Warn when the average frame time exceeds this multiple of the target
    pub slow_frame_ratio: f64,
}

impl Default for FrameStatsConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FrameStatsConfig {
    pub const DEFAULT: Self = Self {
        history_size: perf::HISTORY_SIZE,
        target_fps: perf::TARGET_FPS,
        low_fps_ratio: perf::LOW_FPS_RATIO,
        slow_frame_ratio: perf::SLOW_FRAME_RATIO,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        #[allow(clippy::cast_precision_loss)]
        check_positive("perf.history_size", self.history_size as f64)?;
        check_positive("perf.target_fps", self.target_fps)?;
        check_range("perf.low_fps_ratio", self.low_fps_ratio, 0.0, 1.0)?;
        check_range("perf.slow_frame_ratio", self.slow_frame_ratio, 1.0, f64::MAX)
    }

    #[must_use]
    pub fn target_frame_ms(&self) -> f64 {
        1000.0 / self.target_fps
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PerfWarning {
    LowFps { average_fps: f64 },
    SlowFrames { average_frame_ms: f64 },
}

/// Rolling frame-time monitor. Never feeds back into the simulation.
#[derive(Clone, Debug)]
pub struct FrameStats {
    config: FrameStatsConfig,
    frame_times_ms: VecDeque<f64>,
    last_frame_ms: Option<f64>,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(FrameStatsConfig::DEFAULT)
    }
}

impl FrameStats {
    #[must_use]
    pub fn new(config: FrameStatsConfig) -> Self {
        Self {
            frame_times_ms: VecDeque::with_capacity(config.history_size),
            config,
            last_frame_ms: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &FrameStatsConfig {
        &self.config
    }

    /// Records the frame that started at `now_ms`
    ///
    /// The first call only sets the reference point. Warnings are logged as well as returned.
    pub fn record(&mut self, now_ms: f64) -> Vec<PerfWarning> {
        let Some(last) = self.last_frame_ms.replace(now_ms) else {
            return Vec::new();
        };

        if self.frame_times_ms.len() == self.config.history_size {
            self.frame_times_ms.pop_front();
        }
        self.frame_times_ms.push_back((now_ms - last).max(0.0));

        let warnings = self.warnings();
        for warning in &warnings {
            match warning {
                PerfWarning::LowFps { average_fps } => {
                    warn!("Low FPS: {average_fps:.1}");
                }
                PerfWarning::SlowFrames { average_frame_ms } => {
                    warn!("Slow frames: {average_frame_ms:.2} ms");
                }
            }
        }
        warnings
    }

    #[must_use]
    pub fn average_frame_ms(&self) -> Option<f64> {
        if self.frame_times_ms.is_empty() {
            return None;
        }

        #[allow(clippy::cast_precision_loss)]
        let count = self.frame_times_ms.len() as f64;
        Some(self.frame_times_ms.iter().sum::<f64>() / count)
    }

    #[must_use]
    pub fn average_fps(&self) -> Option<f64> {
        self.average_frame_ms()
            .filter(|&ms| ms > 0.0)
            .map(|ms| 1000.0 / ms)
    }

    #[must_use]
    pub fn warnings(&self) -> Vec<PerfWarning> {
        let mut warnings = Vec::new();

        let min_fps = self.config.target_fps * self.config.low_fps_ratio;
        if let Some(average_fps) = self.average_fps().filter(|&fps| fps < min_fps) {
            warnings.push(PerfWarning::LowFps { average_fps });
        }

        let max_frame_ms = self.config.target_frame_ms() * self.config.slow_frame_ratio;
        if let Some(average_frame_ms) = self.average_frame_ms().filter(|&ms| ms > max_frame_ms) {
            warnings.push(PerfWarning::SlowFrames { average_frame_ms });
        }

        warnings
    }

    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.frame_times_ms.len()
    }

    pub fn reset(&mut self) {
        self.frame_times_ms.clear();
        self.last_frame_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(stats: &mut FrameStats, frames: usize, frame_ms: f64) -> Vec<PerfWarning> {
        let mut now = match stats.last_frame_ms {
            Some(last) => last,
            None => {
                stats.record(0.0);
                0.0
            }
        };
        let mut warnings = Vec::new();
        for _ in 0..frames {
            now += frame_ms;
            warnings = stats.record(now);
        }
        warnings
    }

    #[test]
    fn steady_sixty_is_quiet() {
        let mut stats = FrameStats::default();
        assert!(feed(&mut stats, 120, 1000.0 / 60.0).is_empty());
        assert_eq!(stats.sample_count(), 60);
        assert!((stats.average_fps().unwrap() - 60.0).abs() < 1e-6);
    }

    #[test]
    fn thirty_fps_warns_twice() {
        let mut stats = FrameStats::default();
        let warnings = feed(&mut stats, 60, 1000.0 / 30.0);
        assert_eq!(warnings.len(), 2);
        assert!(matches!(warnings[0], PerfWarning::LowFps { .. }));
        assert!(matches!(warnings[1], PerfWarning::SlowFrames { .. }));
    }

    #[test]
    fn window_forgets_old_frames() {
        let mut stats = FrameStats::default();
        feed(&mut stats, 60, 100.0);
        assert!(feed(&mut stats, 60, 10.0).is_empty());
    }

    #[test]
    fn reset_clears_history() {
        let mut stats = FrameStats::default();
        feed(&mut stats, 10, 16.0);
        stats.reset();
        assert_eq!(stats.sample_count(), 0);
        assert_eq!(stats.average_fps(), None);
    }
}
