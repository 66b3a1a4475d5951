//! Position samples recorded while a user pans and zooms an image.
//!
//! Each sample captures where the viewport was centered, how deep the user
//! had zoomed, and the four corners of the on-screen viewport in image
//! pixels. Samples are recorded in append-only JSONL format, one object
//! per line.

use serde::{Deserialize, Serialize};

/// Zoom level of the viewer, from 1 (fully zoomed out) to the session
/// maximum (typically 10).
pub type ZoomLevel = u8;

/// The four corners of the on-screen viewport, in image pixels.
///
/// Corner order follows the recording client: the first corner is taken as
/// the reference when measuring the viewport footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportCorners(pub [(f64, f64); 4]);

impl ViewportCorners {
    /// Axis-aligned footprint of the viewport: the maximum pairwise
    /// distance between the reference corner and the other three, per axis.
    pub fn dimensions(&self) -> (f64, f64) {
        let [(x0, y0), (x1, y1), (x2, y2), (x3, y3)] = self.0;

        let x = (x0 - x1).abs().max((x0 - x2).abs()).max((x0 - x3).abs());
        let y = (y0 - y1).abs().max((y0 - y2).abs()).max((y0 - y3).abs());
        (x, y)
    }

    /// Axis-aligned rectangle covering `(width, height)` centered at origin.
    pub fn axis_aligned(width: f64, height: f64) -> Self {
        Self([(0.0, 0.0), (width, 0.0), (0.0, height), (width, height)])
    }
}

/// A single recorded viewport position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    /// Viewport center X in image pixels.
    pub x: f64,

    /// Viewport center Y in image pixels.
    pub y: f64,

    /// Zoom level at sample time.
    pub zoom: ZoomLevel,

    /// Milliseconds since the recording epoch. Non-decreasing within a
    /// trace; repeats are allowed.
    #[serde(rename = "t")]
    pub timestamp_ms: f64,

    /// On-screen viewport corners at sample time.
    pub corners: ViewportCorners,
}

impl PositionSample {
    /// Create a sample with an axis-aligned viewport footprint.
    pub fn new(x: f64, y: f64, zoom: ZoomLevel, timestamp_ms: f64, footprint: (f64, f64)) -> Self {
        Self {
            x,
            y,
            zoom,
            timestamp_ms,
            corners: ViewportCorners::axis_aligned(footprint.0, footprint.1),
        }
    }

    /// Position as an `(x, y)` pair.
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Parse samples from JSONL content (one JSON object per line).
pub fn parse_samples(jsonl: &str) -> Result<Vec<PositionSample>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize samples to JSONL format.
pub fn serialize_samples(samples: &[PositionSample]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for sample in samples {
        output.push_str(&serde_json::to_string(sample)?);
        output.push('\n');
    }
    Ok(output)
}
