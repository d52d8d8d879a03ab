use arrayvec::ArrayVec;
use fastrand::Rng;
use glam::Vec3A;
use log::debug;

use crate::{
    consts::{self, track::MAX_SEGMENT_COUNT},
    error::{ConfigError, check_positive, check_range},
};

/// One fixed-length piece of road
///
/// The car drives towards -Z, so a segment spans `[start_z - length, start_z]`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackSegment {
    /// Counts up from 0 in creation order, never reused
    pub index: u64,
    /// Track-local Z where the segment begins
    pub start_z: f32,
    /// Seed for the renderer's scenery generator
    pub seed: u64,
}

impl TrackSegment {
    #[must_use]
    pub fn end_z(&self, segment_length: f32) -> f32 {
        self.start_z - segment_length
    }

    #[must_use]
    pub fn contains_z(&self, z: f32, segment_length: f32) -> bool {
        z <= self.start_z && z > self.end_z(segment_length)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackConfig {
    /// Number of live segments, between 1 and `MAX_SEGMENT_COUNT`
    pub segment_count: usize,
    pub segment_length: f32,
    /// Start of the oldest segment, in track-local Z
    pub first_start_z: f32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TrackConfig {
    pub const DEFAULT: Self = Self {
        segment_count: consts::track::SEGMENT_COUNT,
        segment_length: consts::track::SEGMENT_LENGTH,
        first_start_z: consts::track::FIRST_SEGMENT_START_Z,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        #[allow(clippy::cast_precision_loss)]
        check_range(
            "track.segment_count",
            self.segment_count as f64,
            1.0,
            MAX_SEGMENT_COUNT as f64,
        )?;
        check_positive("track.segment_length", self.segment_length.into())?;
        check_range(
            "track.first_start_z",
            self.first_start_z.into(),
            f64::from(f32::MIN),
            f64::from(f32::MAX),
        )
    }
}

/// What one call to [`TrackSegmentManager::advance`] did
///
/// Both segments are reported in the coordinates that hold after the call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdvanceResult {
    pub did_advance: bool,
    /// Amount added to every track-local Z coordinate, 0 if nothing moved
    pub rebased_by: f32,
    pub evicted: Option<TrackSegment>,
    pub added: Option<TrackSegment>,
}

impl AdvanceResult {
    pub const NONE: Self = Self {
        did_advance: false,
        rebased_by: 0.0,
        evicted: None,
        added: None,
    };
}

/// Keeps a sliding window of segments under the car
///
/// Once the car has driven past the whole oldest segment, that segment is evicted, a new one
/// is appended after the newest, and every coordinate is shifted back by one segment length
/// so positions stay within a few segments of the origin no matter how far the car goes.
#[derive(Clone, Debug)]
pub struct TrackSegmentManager {
    config: TrackConfig,
    /// Oldest first
    segments: ArrayVec<TrackSegment, MAX_SEGMENT_COUNT>,
    next_index: u64,
    rng: Rng,
    /// Total Z folded back so far, kept in f64 so it stays exact over long sessions
    distance_rebased: f64,
}

impl TrackSegmentManager {
    pub fn new(config: TrackConfig, rng_seed: Option<u64>) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match rng_seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };

        let mut manager = Self {
            config,
            segments: ArrayVec::new(),
            next_index: 0,
            rng,
            distance_rebased: 0.0,
        };

        for i in 0..config.segment_count {
            #[allow(clippy::cast_precision_loss)]
            let start_z = config.first_start_z - i as f32 * config.segment_length;
            let segment = manager.make_segment(start_z);
            manager.segments.push(segment);
        }

        Ok(manager)
    }

    fn make_segment(&mut self, start_z: f32) -> TrackSegment {
        let segment = TrackSegment {
            index: self.next_index,
            start_z,
            seed: self.rng.u64(..),
        };
        self.next_index += 1;
        segment
    }

    #[must_use]
    pub const fn config(&self) -> &TrackConfig {
        &self.config
    }

    /// Live segments, oldest first
    #[must_use]
    pub fn segments(&self) -> &[TrackSegment] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total distance the window has been shifted since the session started
    #[must_use]
    pub const fn distance_rebased(&self) -> f64 {
        self.distance_rebased
    }

    /// The car must be below this Z for the window to advance
    #[must_use]
    pub fn advance_threshold_z(&self) -> f32 {
        self.segments
            .first()
            .map_or(f32::NEG_INFINITY, |oldest| {
                oldest.end_z(self.config.segment_length)
            })
    }

    /// Distance driven down the track, independent of rebasing
    #[must_use]
    pub fn track_distance(&self, z: f32) -> f64 {
        f64::from(self.config.first_start_z) - f64::from(z) + self.distance_rebased
    }

    /// Segment under a track-local Z, if any
    #[must_use]
    pub fn segment_at(&self, z: f32) -> Option<&TrackSegment> {
        self.segments
            .iter()
            .find(|segment| segment.contains_z(z, self.config.segment_length))
    }

    /// Slides the window forward by at most one segment
    ///
    /// The caller must shift the car and anything else holding track-local positions by
    /// `rebased_by` before they are read again.
    pub fn advance(&mut self, car_pos: Vec3A) -> AdvanceResult {
        if car_pos.z >= self.advance_threshold_z() {
            return AdvanceResult::NONE;
        }

        let Some(newest) = self.segments.last().copied() else {
            return AdvanceResult::NONE;
        };
        let Some(mut evicted) = self.segments.pop_at(0) else {
            return AdvanceResult::NONE;
        };

        let length = self.config.segment_length;
        let added = self.make_segment(newest.start_z - length);
        self.segments.push(added);

        for segment in &mut self.segments {
            segment.start_z += length;
        }
        evicted.start_z += length;
        self.distance_rebased += f64::from(length);

        debug!(
            "Track advanced: evicted segment {}, added segment {}, rebased by {length}",
            evicted.index, added.index
        );

        AdvanceResult {
            did_advance: true,
            rebased_by: length,
            evicted: Some(evicted),
            added: self.segments.last().copied(),
        }
    }
}
