//! Nearest-annotation disambiguation for click events that were recorded
//! without a target region.
//!
//! The viewer logged *that* an annotation was clicked but not always
//! *which one*. The closest positional sample in time tells us roughly
//! where the user was looking; the nearest region to that position is the
//! best available guess. This is a heuristic, not a guarantee — equally
//! distant regions are resolved by storage order.

use gazetrace_session_model::{GazeTrace, RegionId, RegionOfInterest};

/// Resolve the region a click at `event_timestamp_ms` most plausibly
/// targeted. Returns `None` when the region list is empty or the trace
/// has no samples; callers treat that as "event ignored".
pub fn resolve_nearest_region(
    event_timestamp_ms: f64,
    trace: &GazeTrace,
    regions: &[RegionOfInterest],
) -> Option<RegionId> {
    let index = nearest_sample_index(trace, event_timestamp_ms)?;
    let sample = &trace.samples()[index];

    let mut best: Option<(f64, RegionId)> = None;
    for region in regions {
        let distance = region.distance_to(sample.x, sample.y);
        if best.map(|(d, _)| distance < d).unwrap_or(true) {
            best = Some((distance, region.id));
        }
    }
    best.map(|(_, id)| id)
}

/// Index of the sample whose timestamp is closest to `timestamp_ms`.
///
/// Directional scan: the first sample at or after the target is compared
/// against its immediate predecessor and the numerically closer one wins;
/// on an exact tie the earlier sample is preferred. When every sample
/// precedes the target, the last one is used.
pub fn nearest_sample_index(trace: &GazeTrace, timestamp_ms: f64) -> Option<usize> {
    let samples = trace.samples();
    if samples.is_empty() {
        return None;
    }

    let at_or_after = samples.partition_point(|s| s.timestamp_ms < timestamp_ms);
    if at_or_after >= samples.len() {
        return Some(samples.len() - 1);
    }
    if at_or_after == 0 {
        return Some(0);
    }

    let prev_dist = (timestamp_ms - samples[at_or_after - 1].timestamp_ms).abs();
    let next_dist = (samples[at_or_after].timestamp_ms - timestamp_ms).abs();
    if prev_dist <= next_dist {
        Some(at_or_after - 1)
    } else {
        Some(at_or_after)
    }
}
