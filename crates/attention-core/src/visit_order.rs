//! Visit-order inference: which of two regions was genuinely examined
//! first?
//!
//! Only near-maximum zoom counts as genuine close inspection — shallow
//! passes over a region do not. Sample indices stand in for wall-clock
//! order, which is valid because traces store samples chronologically.
//! The result is an approximation, not a guarantee.

use crate::kernel::KernelCache;
use gazetrace_session_model::{GazeTrace, RegionOfInterest, ZoomLevel};

/// Zoom levels within this distance of the maximum count as close
/// inspection.
const DEEP_ZOOM_MARGIN: ZoomLevel = 5;

/// Whether `region_a` was examined before `region_b` in `trace`.
///
/// A sample covers a region when its zoom is deep enough (above the kernel
/// cutoff and within [`DEEP_ZOOM_MARGIN`] of `max_zoom`) and its position
/// lies within half the kernel footprint of the region on both axes.
/// Covering sample indices are collected per region, stopping early once
/// both regions have `min_samples` of them; the region with the lower mean
/// index was examined first. Regions never covered lose: if neither was
/// covered, or only `region_a` lacks coverage, the answer is `false`.
///
/// The cache is read, never populated: deep samples whose zoom has no
/// cached kernel are skipped (with a debug event), so a cold cache covers
/// nothing. Warm it from the trace first, as
/// [`ImageSession`](crate::session::ImageSession) does on attach.
pub fn visited_before(
    region_a: &RegionOfInterest,
    region_b: &RegionOfInterest,
    trace: &GazeTrace,
    kernels: &KernelCache,
    min_samples: usize,
    max_zoom: ZoomLevel,
) -> bool {
    let deep_cutoff = max_zoom.saturating_sub(DEEP_ZOOM_MARGIN);

    let mut indices_a: Vec<usize> = Vec::new();
    let mut indices_b: Vec<usize> = Vec::new();

    for (index, sample) in trace.samples().iter().enumerate() {
        if !kernels.accepts(sample.zoom) || sample.zoom <= deep_cutoff {
            continue;
        }
        let Some(kernel) = kernels.get(sample.zoom) else {
            tracing::debug!(zoom = sample.zoom, "no cached kernel for deep sample, skipping");
            continue;
        };
        let half_w = kernel.width / 2.0;
        let half_h = kernel.height / 2.0;

        let covers = |region: &RegionOfInterest| {
            (sample.x - region.x).abs() <= half_w && (sample.y - region.y).abs() <= half_h
        };

        if indices_a.len() < min_samples && covers(region_a) {
            indices_a.push(index);
        }
        if indices_b.len() < min_samples && covers(region_b) {
            indices_b.push(index);
        }
        if indices_a.len() >= min_samples && indices_b.len() >= min_samples {
            break;
        }
    }

    match (indices_a.is_empty(), indices_b.is_empty()) {
        (true, _) => false,
        (false, true) => true,
        (false, false) => mean(&indices_a) < mean(&indices_b),
    }
}

fn mean(indices: &[usize]) -> f64 {
    indices.iter().sum::<usize>() as f64 / indices.len() as f64
}
