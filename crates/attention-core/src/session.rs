//! Per-image session state and the external scoring interface.
//!
//! An [`ImageSession`] owns everything one image accumulates over a study:
//! the region-of-interest list, one trace and click log per user, and the
//! lazily-built kernel cache shared by all of them (viewport footprints
//! are image-specific, so kernels are too). Sessions are independent:
//! callers parallelize across images or users by giving each worker its
//! own session, and nothing here is shared mutable state.
//!
//! Computed surfaces and scores are returned by value and never retained.

use crate::heatmap::{AttentionSurface, HeatmapAccumulator};
use crate::kernel::KernelCache;
use crate::resolve::resolve_nearest_region;
use crate::scanpath::{self, ScanpathPoint};
use crate::score::{AttentionScore, AttentionScorer};
use crate::visit_order;
use gazetrace_common::{GazeError, GazeResult, ScoringConfig};
use gazetrace_session_model::{
    ClickEvent, GazeTrace, RegionId, RegionOfInterest, TimeWindow, ZoomLevel,
};
use std::collections::HashMap;

/// All gaze data one image accumulated, across users.
#[derive(Debug)]
pub struct ImageSession {
    image_width: usize,
    image_height: usize,
    regions: Vec<RegionOfInterest>,
    kernels: KernelCache,
    traces: HashMap<String, GazeTrace>,
    clicks: HashMap<String, Vec<ClickEvent>>,
    config: ScoringConfig,
}

impl ImageSession {
    /// Create a session for an image of the given pixel dimensions.
    pub fn new(
        image_width: usize,
        image_height: usize,
        regions: Vec<RegionOfInterest>,
        config: ScoringConfig,
    ) -> GazeResult<Self> {
        config.validate()?;
        if image_width == 0 || image_height == 0 {
            return Err(GazeError::session(format!(
                "image dimensions must be non-zero, got {image_width}x{image_height}"
            )));
        }
        Ok(Self {
            image_width,
            image_height,
            regions,
            kernels: KernelCache::new(config.sigma_divisor, config.min_kernel_zoom),
            traces: HashMap::new(),
            clicks: HashMap::new(),
            config,
        })
    }

    /// Attach a user's position trace, warming the kernel cache from the
    /// first-seen footprint at each new deep zoom level.
    pub fn attach_trace(&mut self, user_id: impl Into<String>, trace: GazeTrace) {
        for sample in trace.samples() {
            self.kernels
                .get_or_create(sample.zoom, sample.corners.dimensions());
        }
        let user_id = user_id.into();
        tracing::debug!(
            user = %user_id,
            samples = trace.len(),
            kernels = self.kernels.len(),
            "attached trace"
        );
        self.traces.insert(user_id, trace);
    }

    /// Attach a user's click events, disambiguating unresolved ones
    /// against the user's trace. The trace must be attached first.
    pub fn attach_clicks(
        &mut self,
        user_id: &str,
        clicks: Vec<ClickEvent>,
    ) -> GazeResult<()> {
        let trace = self
            .traces
            .get(user_id)
            .ok_or_else(|| GazeError::unknown_user(user_id))?;

        let resolved = clicks
            .into_iter()
            .map(|mut click| {
                if click.region.is_none() {
                    click.region =
                        resolve_nearest_region(click.timestamp_ms, trace, &self.regions);
                }
                click
            })
            .collect();
        self.clicks.insert(user_id.to_string(), resolved);
        Ok(())
    }

    /// Users with an attached trace.
    pub fn user_ids(&self) -> impl Iterator<Item = &str> {
        self.traces.keys().map(String::as_str)
    }

    /// The image's regions of interest.
    pub fn regions(&self) -> &[RegionOfInterest] {
        &self.regions
    }

    /// Highest zoom level any user reached on this image (0 when no
    /// samples exist).
    pub fn max_zoom(&self) -> ZoomLevel {
        self.traces.values().map(GazeTrace::max_zoom).max().unwrap_or(0)
    }

    /// Score a user's attention over `window`.
    ///
    /// `Ok(None)` means the user never opened the image inside the window;
    /// callers must treat that differently from a genuine low score.
    pub fn score(
        &mut self,
        user_id: &str,
        window: TimeWindow,
    ) -> GazeResult<Option<AttentionScore>> {
        let max_zoom = self.max_zoom();
        let trace = self
            .traces
            .get(user_id)
            .ok_or_else(|| GazeError::unknown_user(user_id))?;
        let clicks = self.clicks.get(user_id).map(Vec::as_slice).unwrap_or(&[]);

        let scorer = AttentionScorer::new(self.config);
        Ok(scorer.score(
            trace,
            clicks,
            &self.regions,
            window,
            &mut self.kernels,
            max_zoom,
            (self.image_width, self.image_height),
        ))
    }

    /// Dense attention surface for a user over the whole recording.
    ///
    /// The surface is the dominant memory cost per (user, image); it is
    /// returned by value and the caller should drop it once consumed.
    pub fn heatmap(&mut self, user_id: &str) -> GazeResult<AttentionSurface> {
        let max_zoom = self.max_zoom();
        let trace = self
            .traces
            .get(user_id)
            .ok_or_else(|| GazeError::unknown_user(user_id))?;

        let accumulator = HeatmapAccumulator::new(self.config.decay_ratio);
        Ok(accumulator.dense(
            trace.samples(),
            &mut self.kernels,
            self.image_width,
            self.image_height,
            max_zoom,
        ))
    }

    /// Simplified scanpath for a user, for visualization.
    pub fn simplify_scanpath(&self, user_id: &str) -> GazeResult<Vec<ScanpathPoint>> {
        let trace = self
            .traces
            .get(user_id)
            .ok_or_else(|| GazeError::unknown_user(user_id))?;
        Ok(scanpath::simplify(
            trace.samples(),
            self.config.cluster_cap,
            self.config.point_duration,
        ))
    }

    /// Whether `region_a` was examined before `region_b` by this user.
    pub fn visited_before(
        &self,
        region_a: RegionId,
        region_b: RegionId,
        user_id: &str,
    ) -> GazeResult<bool> {
        let trace = self
            .traces
            .get(user_id)
            .ok_or_else(|| GazeError::unknown_user(user_id))?;
        let a = self.region(region_a)?;
        let b = self.region(region_b)?;

        Ok(visit_order::visited_before(
            a,
            b,
            trace,
            &self.kernels,
            self.config.min_covering_samples,
            self.max_zoom(),
        ))
    }

    fn region(&self, id: RegionId) -> GazeResult<&RegionOfInterest> {
        self.regions
            .iter()
            .find(|r| r.id == id)
            .ok_or(GazeError::UnknownRegion { region_id: id.0 })
    }
}
