//! Attention scoring: how thoroughly did a user examine the regions of
//! interest on an image?
//!
//! A resolved annotation click is taken as proof the region was examined
//! and scores 1.0 outright. Without a click, the region's saturated heat
//! is compared against a threshold at 90% of the saturation cap. With no
//! regions defined, the mean of the dense surface is thresholded instead.

use crate::heatmap::HeatmapAccumulator;
use crate::kernel::KernelCache;
use gazetrace_common::ScoringConfig;
use gazetrace_session_model::{ClickEvent, GazeTrace, RegionOfInterest, TimeWindow, ZoomLevel};
use serde::{Deserialize, Serialize};

/// Result of scoring one (user, image) pair over a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttentionScore {
    /// Whole-image score in [0, 1]: mean of per-region scores, or the
    /// thresholded surface mean when no regions are defined.
    pub overall: f64,

    /// Per-region scores in region storage order, when regions exist.
    pub per_region: Option<Vec<f64>>,
}

/// Scores traces against regions of interest.
#[derive(Debug, Clone, Copy)]
pub struct AttentionScorer {
    config: ScoringConfig,
}

impl AttentionScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score a trace over `window`.
    ///
    /// Returns `None` when the window covers no samples — the "never
    /// opened" case, deliberately distinct from a genuine 0.0 score.
    /// Unresolved click events are ignored. `image_size` is the dense
    /// fallback target used when `regions` is empty.
    #[allow(clippy::too_many_arguments)]
    pub fn score(
        &self,
        trace: &GazeTrace,
        clicks: &[ClickEvent],
        regions: &[RegionOfInterest],
        window: TimeWindow,
        kernels: &mut KernelCache,
        max_zoom_seen: ZoomLevel,
        image_size: (usize, usize),
    ) -> Option<AttentionScore> {
        let (start, end) = trace.window_indexes(window)?;
        let samples = &trace.samples()[start..=end];
        let accumulator = HeatmapAccumulator::new(self.config.decay_ratio);
        let threshold = self.config.heat_threshold();

        if regions.is_empty() {
            let surface =
                accumulator.dense(samples, kernels, image_size.0, image_size.1, max_zoom_seen);
            let overall = (surface.mean() / threshold).min(1.0);
            return Some(AttentionScore {
                overall,
                per_region: None,
            });
        }

        let heat = accumulator.regions(samples, kernels, regions, max_zoom_seen);
        let per_region: Vec<f64> = regions
            .iter()
            .zip(&heat)
            .map(|(region, &heat)| {
                if clicked_in_window(clicks, region, window) {
                    1.0
                } else {
                    (heat / threshold).min(1.0)
                }
            })
            .collect();

        let overall = per_region.iter().sum::<f64>() / per_region.len() as f64;
        tracing::debug!(
            regions = regions.len(),
            samples = samples.len(),
            overall,
            "scored trace"
        );

        Some(AttentionScore {
            overall,
            per_region: Some(per_region),
        })
    }
}

/// Whether a resolved click targeting `region` falls inside `window`.
fn clicked_in_window(clicks: &[ClickEvent], region: &RegionOfInterest, window: TimeWindow) -> bool {
    clicks
        .iter()
        .any(|c| c.region == Some(region.id) && window.contains(c.timestamp_ms))
}
