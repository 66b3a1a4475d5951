//! Ordered per-(user, image) sample sequences.
//!
//! A [`GazeTrace`] owns the chronological samples one user produced on one
//! image. Insertion order is chronological order; the scoring engine relies
//! on that to use sample indices as a proxy for time. Window lookups run a
//! binary search over the monotonic timestamp sequence.

use crate::sample::{PositionSample, ZoomLevel};
use serde::{Deserialize, Serialize};

/// Errors raised when constructing a trace from raw samples.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("samples are not in chronological order at index {index}")]
    OutOfOrder { index: usize },
}

/// A closed time window in milliseconds since the recording epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_ms: f64,
    pub end_ms: f64,
}

impl TimeWindow {
    /// Window covering the whole recording.
    pub const ALL: TimeWindow = TimeWindow {
        start_ms: f64::NEG_INFINITY,
        end_ms: f64::INFINITY,
    };

    pub fn new(start_ms: f64, end_ms: f64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Whether a timestamp falls inside this window.
    pub fn contains(&self, timestamp_ms: f64) -> bool {
        timestamp_ms >= self.start_ms && timestamp_ms <= self.end_ms
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::ALL
    }
}

/// Chronological position samples for one user on one image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GazeTrace {
    samples: Vec<PositionSample>,
}

impl GazeTrace {
    /// Build a trace from samples, validating chronological order.
    pub fn new(samples: Vec<PositionSample>) -> Result<Self, TraceError> {
        for (index, pair) in samples.windows(2).enumerate() {
            if pair[1].timestamp_ms < pair[0].timestamp_ms {
                return Err(TraceError::OutOfOrder { index: index + 1 });
            }
        }
        Ok(Self { samples })
    }

    /// The recorded samples, in chronological order.
    pub fn samples(&self) -> &[PositionSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Highest zoom level reached in this trace (0 when empty).
    pub fn max_zoom(&self) -> ZoomLevel {
        self.samples.iter().map(|s| s.zoom).max().unwrap_or(0)
    }

    /// Tightest `[start, end]` index pair whose timestamps fall inside
    /// `window`, or `None` when the window covers no samples.
    ///
    /// Timestamps are non-decreasing, so both bounds are found with a
    /// binary search (`partition_point`).
    pub fn window_indexes(&self, window: TimeWindow) -> Option<(usize, usize)> {
        if self.samples.is_empty() {
            return None;
        }
        let start = self
            .samples
            .partition_point(|s| s.timestamp_ms < window.start_ms);
        let end = self
            .samples
            .partition_point(|s| s.timestamp_ms <= window.end_ms);
        if start >= end {
            return None;
        }
        Some((start, end - 1))
    }

    /// Samples inside `window`, as a slice (empty when out of range).
    pub fn window_slice(&self, window: TimeWindow) -> &[PositionSample] {
        match self.window_indexes(window) {
            Some((start, end)) => &self.samples[start..=end],
            None => &[],
        }
    }

    /// Number of samples inside `window`.
    pub fn samples_in_window(&self, window: TimeWindow) -> usize {
        self.window_slice(window).len()
    }

    /// Active viewing time inside `window`, in seconds.
    ///
    /// Samples arrive at most 5 s apart while the viewer is open, so an
    /// inter-sample gap of `afk_gap_ms` or more means the user was away;
    /// such a gap is excluded and the pair after it skipped.
    pub fn time_spent_secs(&self, window: TimeWindow, afk_gap_ms: f64) -> f64 {
        let slice = self.window_slice(window);
        if slice.len() < 2 {
            return 0.0;
        }

        let mut total_ms = 0.0;
        let mut i = 1;
        while i < slice.len() {
            let gap = slice[i].timestamp_ms - slice[i - 1].timestamp_ms;
            if gap < afk_gap_ms {
                total_ms += gap;
                i += 1;
            } else {
                i += 2;
            }
        }
        total_ms / 1000.0
    }

    /// Per-zoom-level sample counts inside `window`.
    ///
    /// Index 0 holds the count for zoom level 1. Samples with zoom 0 or
    /// above `max_zoom` are ignored.
    pub fn zoom_histogram(&self, window: TimeWindow, max_zoom: ZoomLevel) -> Vec<usize> {
        let mut histogram = vec![0usize; max_zoom as usize];
        for sample in self.window_slice(window) {
            if sample.zoom >= 1 && sample.zoom <= max_zoom {
                histogram[sample.zoom as usize - 1] += 1;
            }
        }
        histogram
    }
}
