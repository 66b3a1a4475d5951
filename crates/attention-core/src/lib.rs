//! GazeTrace Attention Core
//!
//! Turns sparse, irregular viewport-position streams into dense attention
//! maps and scalar attention scores:
//! - **Kernels:** Per-zoom Gaussian weight matrices sized to the viewport footprint
//! - **Heatmaps:** Saturating accumulation of kernel-weighted contributions
//! - **Scoring:** 0..1 per-region scores combining clicks and accumulated heat
//! - **Visit order:** Which of two regions was genuinely examined first
//! - **Scanpaths:** Cluster-based simplification for legible visualization
//!
//! This crate is pure computation — no I/O, no platform dependencies.
//! All inputs are data; all outputs are data. Surfaces are returned by
//! value and never retained internally, since dense per-image, per-user
//! surfaces are the dominant memory cost.

pub mod heatmap;
pub mod kernel;
pub mod resolve;
pub mod scanpath;
pub mod score;
pub mod session;
pub mod visit_order;

pub use heatmap::{AttentionSurface, HeatmapAccumulator};
pub use kernel::{GaussianKernel, KernelCache};
pub use score::{AttentionScore, AttentionScorer};
pub use session::ImageSession;
