//! Per-zoom Gaussian kernels and their session-scoped cache.
//!
//! Each zoom level deep enough to carry spatial weight gets one Gaussian
//! matrix sized to the on-screen viewport footprint at that zoom. The cache
//! is owned by the image session; there is no process-wide state.

use gazetrace_session_model::ZoomLevel;
use std::collections::HashMap;

/// A 2D Gaussian weight matrix for one zoom level.
///
/// Weights are stored row-major (`rows` × `cols`); the peak sits at the
/// matrix center. `width`/`height` keep the fractional footprint the matrix
/// was built from, which visit-order inference uses for coverage tests.
#[derive(Debug, Clone)]
pub struct GaussianKernel {
    pub cols: usize,
    pub rows: usize,
    pub weights: Vec<f64>,
    /// Viewport footprint width the kernel derives from (pixels).
    pub width: f64,
    /// Viewport footprint height the kernel derives from (pixels).
    pub height: f64,
}

impl GaussianKernel {
    /// Build a kernel for the given viewport footprint.
    ///
    /// Dimensions are floor-clamped to 1 and rounded up to the enclosing
    /// integer; `sigma = max(1, dimension / sigma_divisor)` per axis.
    pub fn from_footprint(footprint: (f64, f64), sigma_divisor: f64) -> Self {
        let width = footprint.0.max(1.0);
        let height = footprint.1.max(1.0);
        let cols = width.ceil() as usize;
        let rows = height.ceil() as usize;

        let sx = (width / sigma_divisor).max(1.0);
        let sy = (height / sigma_divisor).max(1.0);

        // Integer-division center, matching the recorded-score convention.
        let cx = (cols / 2) as f64;
        let cy = (rows / 2) as f64;

        let mut weights = vec![0.0; cols * rows];
        for j in 0..rows {
            for i in 0..cols {
                let dx = i as f64 - cx;
                let dy = j as f64 - cy;
                weights[j * cols + i] =
                    (-(dx * dx / (2.0 * sx * sx) + dy * dy / (2.0 * sy * sy))).exp();
            }
        }

        Self {
            cols,
            rows,
            weights,
            width,
            height,
        }
    }

    /// Weight at the given cell, or `None` outside the matrix.
    pub fn weight_at(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.weights[row * self.cols + col])
    }

    /// The peak (center) weight. Always 1.0 by construction.
    pub fn peak(&self) -> f64 {
        self.weights[(self.rows / 2) * self.cols + self.cols / 2]
    }
}

/// Lazily-populated kernel cache, one kernel per zoom level.
///
/// A kernel is built from the footprint of the *first* sample seen at its
/// zoom level and reused unconditionally afterwards, even if later samples
/// report a slightly different footprint. This is a deliberate
/// approximation carried over from the recorded scores: re-deriving
/// kernels per sample would change historical score values.
///
/// Zoom levels at or below `min_kernel_zoom` cover too much of the image
/// to be informative and never receive a kernel.
#[derive(Debug)]
pub struct KernelCache {
    kernels: HashMap<ZoomLevel, GaussianKernel>,
    sigma_divisor: f64,
    min_kernel_zoom: ZoomLevel,
}

impl KernelCache {
    pub fn new(sigma_divisor: f64, min_kernel_zoom: ZoomLevel) -> Self {
        Self {
            kernels: HashMap::new(),
            sigma_divisor,
            min_kernel_zoom,
        }
    }

    /// Whether this zoom level is deep enough to carry spatial weight.
    pub fn accepts(&self, zoom: ZoomLevel) -> bool {
        zoom > self.min_kernel_zoom
    }

    /// Fetch the kernel for `zoom`, creating it from `footprint` on first
    /// use. Returns `None` for zoom levels below the kernel cutoff.
    pub fn get_or_create(&mut self, zoom: ZoomLevel, footprint: (f64, f64)) -> Option<&GaussianKernel> {
        if !self.accepts(zoom) {
            return None;
        }
        Some(self.kernels.entry(zoom).or_insert_with(|| {
            tracing::debug!(zoom, ?footprint, "creating gaussian kernel");
            GaussianKernel::from_footprint(footprint, self.sigma_divisor)
        }))
    }

    /// Fetch an already-created kernel.
    pub fn get(&self, zoom: ZoomLevel) -> Option<&GaussianKernel> {
        self.kernels.get(&zoom)
    }

    /// Number of distinct zoom levels cached so far.
    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }
}
