//! Saturating heatmap accumulation.
//!
//! Every deep-zoom sample stamps its zoom level's Gaussian kernel onto the
//! target, scaled by how close the zoom was to the session maximum. Cells
//! collect *lists* of contributions; the final value of a cell is a
//! geometric-decay sum of its sorted contributions, which caps repeated
//! viewing at `1 / (1 - r)` instead of letting hundreds of overlapping
//! samples blow up a plain sum — while still rewarding revisits with
//! diminishing returns (a plain `max()` would ignore them entirely).

use crate::kernel::KernelCache;
use gazetrace_session_model::{PositionSample, RegionOfInterest, ZoomLevel};
use serde::{Deserialize, Serialize};

/// Sum a cell's contributions with geometric decay.
///
/// Contributions are sorted descending and summed as `Σ v_i * r^i`, so the
/// result never exceeds `max(values) / (1 - r)` and adding values never
/// decreases it.
pub fn saturate(values: &mut [f64], decay_ratio: f64) -> f64 {
    values.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    let mut total = 0.0;
    let mut weight = 1.0;
    for value in values.iter() {
        total += value * weight;
        weight *= decay_ratio;
    }
    total
}

/// A dense attention surface over the on-screen image area.
///
/// Cell values are already saturated; `saturation_cap` is the theoretical
/// maximum (`1 / (1 - r)`) renderers should normalize against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttentionSurface {
    pub cols: usize,
    pub rows: usize,
    pub cells: Vec<f64>,
    pub saturation_cap: f64,
}

impl AttentionSurface {
    pub fn cell(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.cells[row * self.cols + col])
    }

    /// Cell value normalized against the saturation cap, in [0, 1].
    pub fn normalized_cell(&self, col: usize, row: usize) -> Option<f64> {
        let value = self.cell(col, row)?;
        Some((value / self.saturation_cap).min(1.0))
    }

    /// Mean over all cells (0.0 for an empty surface).
    pub fn mean(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.cells.iter().sum::<f64>() / self.cells.len() as f64
    }

    /// Highest accumulated cell value.
    pub fn max(&self) -> f64 {
        self.cells.iter().copied().fold(0.0_f64, f64::max)
    }
}

/// Accumulates kernel-weighted contributions into dense or per-region
/// targets.
#[derive(Debug, Clone, Copy)]
pub struct HeatmapAccumulator {
    decay_ratio: f64,
}

impl HeatmapAccumulator {
    pub fn new(decay_ratio: f64) -> Self {
        Self { decay_ratio }
    }

    /// Asymptotic per-cell maximum under the saturating aggregator.
    pub fn saturation_cap(&self) -> f64 {
        1.0 / (1.0 - self.decay_ratio)
    }

    /// Accumulate a dense surface of `cols` × `rows` cells.
    ///
    /// Only cells inside each kernel's bounding box are touched, clipped to
    /// the surface bounds; runtime is O(samples × kernel area).
    pub fn dense(
        &self,
        samples: &[PositionSample],
        kernels: &mut KernelCache,
        cols: usize,
        rows: usize,
        max_zoom_seen: ZoomLevel,
    ) -> AttentionSurface {
        let mut contributions: Vec<Vec<f64>> = vec![Vec::new(); cols * rows];
        let mut stamped = 0usize;

        for sample in samples {
            let Some((kernel, scale)) = self.kernel_for(sample, kernels, max_zoom_seen) else {
                continue;
            };

            // Top-left of the kernel's bounding box, in integer cells.
            let x0 = (sample.x - (kernel.cols / 2) as f64).floor() as i64;
            let y0 = (sample.y - (kernel.rows / 2) as f64).floor() as i64;

            for j in 0..kernel.rows {
                let gy = y0 + j as i64;
                if gy < 0 || gy >= rows as i64 {
                    continue;
                }
                for i in 0..kernel.cols {
                    let gx = x0 + i as i64;
                    if gx < 0 || gx >= cols as i64 {
                        continue;
                    }
                    let weight = kernel.weights[j * kernel.cols + i] * scale;
                    contributions[gy as usize * cols + gx as usize].push(weight);
                }
            }
            stamped += 1;
        }

        let cells = contributions
            .iter_mut()
            .map(|list| saturate(list, self.decay_ratio))
            .collect();

        tracing::debug!(
            samples = samples.len(),
            stamped,
            cols,
            rows,
            "accumulated dense attention surface"
        );

        AttentionSurface {
            cols,
            rows,
            cells,
            saturation_cap: self.saturation_cap(),
        }
    }

    /// Accumulate saturated heat at each region's location.
    pub fn regions(
        &self,
        samples: &[PositionSample],
        kernels: &mut KernelCache,
        regions: &[RegionOfInterest],
        max_zoom_seen: ZoomLevel,
    ) -> Vec<f64> {
        let mut contributions: Vec<Vec<f64>> = vec![Vec::new(); regions.len()];

        for sample in samples {
            let Some((kernel, scale)) = self.kernel_for(sample, kernels, max_zoom_seen) else {
                continue;
            };

            let x0 = (sample.x - (kernel.cols / 2) as f64).floor() as i64;
            let y0 = (sample.y - (kernel.rows / 2) as f64).floor() as i64;

            for (slot, region) in contributions.iter_mut().zip(regions) {
                let i = region.x.floor() as i64 - x0;
                let j = region.y.floor() as i64 - y0;
                if i < 0 || i >= kernel.cols as i64 || j < 0 || j >= kernel.rows as i64 {
                    continue;
                }
                let weight = kernel.weights[j as usize * kernel.cols + i as usize] * scale;
                slot.push(weight);
            }
        }

        contributions
            .iter_mut()
            .map(|list| saturate(list, self.decay_ratio))
            .collect()
    }

    /// Kernel and zoom-severity multiplier for a sample, or `None` when
    /// the sample is too shallow to carry spatial weight.
    fn kernel_for<'a>(
        &self,
        sample: &PositionSample,
        kernels: &'a mut KernelCache,
        max_zoom_seen: ZoomLevel,
    ) -> Option<(&'a crate::kernel::GaussianKernel, f64)> {
        if max_zoom_seen == 0 {
            return None;
        }
        let kernel = kernels.get_or_create(sample.zoom, sample.corners.dimensions())?;
        let scale = sample.zoom as f64 / max_zoom_seen as f64;
        Some((kernel, scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazetrace_session_model::RegionId;

    fn region(id: u64, x: f64, y: f64) -> RegionOfInterest {
        RegionOfInterest {
            id: RegionId(id),
            x,
            y,
            local_order: id as u32,
        }
    }

    #[test]
    fn test_saturate_single_value_is_identity() {
        let mut values = vec![0.7];
        assert!((saturate(&mut values, 0.95) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_saturate_two_values_decay() {
        let mut values = vec![0.5, 0.5];
        let expected = 0.5 + 0.5 * 0.95;
        assert!((saturate(&mut values, 0.95) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_saturate_sorts_descending_first() {
        // Largest value must take the undecayed slot.
        let mut values = vec![0.1, 0.9];
        let expected = 0.9 + 0.1 * 0.95;
        assert!((saturate(&mut values, 0.95) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_saturate_works_on_borrowed_slices() {
        let mut values = [0.5, 0.5];
        let expected = 0.5 + 0.5 * 0.95;
        assert!((saturate(&mut values, 0.95) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_saturate_bounded_by_cap() {
        let mut values = vec![1.0; 500];
        let total = saturate(&mut values, 0.95);
        assert!(total <= 1.0 / (1.0 - 0.95));
        assert!(total > 19.9);
    }

    #[test]
    fn test_dense_accumulates_at_sample_position() {
        let samples = vec![
            PositionSample::new(50.0, 50.0, 5, 0.0, (8.0, 8.0)),
            PositionSample::new(50.0, 50.0, 5, 1000.0, (8.0, 8.0)),
        ];
        let mut kernels = KernelCache::new(6.0, 3);
        let accumulator = HeatmapAccumulator::new(0.95);
        let surface = accumulator.dense(&samples, &mut kernels, 100, 100, 5);

        // Kernel peak lands on the sample cell: two full-weight
        // contributions under decay.
        let peak = surface.cell(50, 50).unwrap();
        assert!((peak - (1.0 + 0.95)).abs() < 1e-9);
        // Far corner untouched.
        assert_eq!(surface.cell(0, 99), Some(0.0));
    }

    #[test]
    fn test_dense_clips_at_image_bounds() {
        // Sample near the top-left corner; kernel partially off-image.
        let samples = vec![PositionSample::new(1.0, 1.0, 5, 0.0, (16.0, 16.0))];
        let mut kernels = KernelCache::new(6.0, 3);
        let accumulator = HeatmapAccumulator::new(0.95);
        let surface = accumulator.dense(&samples, &mut kernels, 40, 40, 5);
        assert!(surface.cell(1, 1).unwrap() > 0.0);
        assert!(surface.max() <= surface.saturation_cap);
    }

    #[test]
    fn test_dense_skips_shallow_zoom() {
        let samples = vec![PositionSample::new(50.0, 50.0, 2, 0.0, (200.0, 200.0))];
        let mut kernels = KernelCache::new(6.0, 3);
        let accumulator = HeatmapAccumulator::new(0.95);
        let surface = accumulator.dense(&samples, &mut kernels, 100, 100, 5);
        assert_eq!(surface.max(), 0.0);
    }

    #[test]
    fn test_zoom_severity_scales_contributions() {
        let deep = vec![PositionSample::new(50.0, 50.0, 10, 0.0, (8.0, 8.0))];
        let mid = vec![PositionSample::new(50.0, 50.0, 5, 0.0, (8.0, 8.0))];
        let accumulator = HeatmapAccumulator::new(0.95);

        let mut kernels = KernelCache::new(6.0, 3);
        let deep_surface = accumulator.dense(&deep, &mut kernels, 100, 100, 10);
        let mut kernels = KernelCache::new(6.0, 3);
        let mid_surface = accumulator.dense(&mid, &mut kernels, 100, 100, 10);

        let deep_peak = deep_surface.cell(50, 50).unwrap();
        let mid_peak = mid_surface.cell(50, 50).unwrap();
        assert!((deep_peak - 1.0).abs() < 1e-9);
        assert!((mid_peak - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_region_target_matches_dense_peak() {
        let samples = vec![
            PositionSample::new(50.0, 50.0, 5, 0.0, (8.0, 8.0)),
            PositionSample::new(50.0, 50.0, 5, 1000.0, (8.0, 8.0)),
            PositionSample::new(50.0, 50.0, 5, 2000.0, (8.0, 8.0)),
        ];
        let regions = vec![region(1, 50.0, 50.0), region(2, 500.0, 500.0)];
        let mut kernels = KernelCache::new(6.0, 3);
        let accumulator = HeatmapAccumulator::new(0.95);
        let heat = accumulator.regions(&samples, &mut kernels, &regions, 5);

        let expected = 1.0 + 0.95 + 0.95 * 0.95;
        assert!((heat[0] - expected).abs() < 1e-9);
        assert_eq!(heat[1], 0.0);
    }

    #[test]
    fn test_empty_samples_zero_surface() {
        let mut kernels = KernelCache::new(6.0, 3);
        let accumulator = HeatmapAccumulator::new(0.95);
        let surface = accumulator.dense(&[], &mut kernels, 10, 10, 0);
        assert_eq!(surface.mean(), 0.0);
        assert!((surface.saturation_cap - 20.0).abs() < 1e-9);
    }
}
