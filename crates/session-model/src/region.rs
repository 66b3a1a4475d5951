//! Regions of interest (annotations) and annotation-click events.

use serde::{Deserialize, Serialize};

/// Identifier of an annotated region within an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub u64);

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An annotated region of interest on an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    /// Stable annotation identifier.
    pub id: RegionId,

    /// Region center X in image pixels.
    pub x: f64,

    /// Region center Y in image pixels.
    pub y: f64,

    /// Canonical sequential numbering of regions within the image,
    /// independent of storage order. Used by visit-order inference.
    pub local_order: u32,
}

impl RegionOfInterest {
    /// Euclidean distance from this region's center to a point.
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        ((self.x - x).powi(2) + (self.y - y).powi(2)).sqrt()
    }
}

/// An explicit annotation-click event recorded by the viewer.
///
/// The recording client did not always log which annotation was clicked;
/// `region == None` marks an unresolved event that must be disambiguated
/// against the user's position trace before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickEvent {
    /// Target region, if the client recorded it.
    pub region: Option<RegionId>,

    /// Milliseconds since the recording epoch.
    #[serde(rename = "t")]
    pub timestamp_ms: f64,

    /// Action kind as logged by the client (e.g. "AnnotationSelect").
    pub action: String,
}

impl ClickEvent {
    /// Create a resolved click event.
    pub fn resolved(region: RegionId, timestamp_ms: f64, action: impl Into<String>) -> Self {
        Self {
            region: Some(region),
            timestamp_ms,
            action: action.into(),
        }
    }

    /// Create an unresolved click event.
    pub fn unresolved(timestamp_ms: f64, action: impl Into<String>) -> Self {
        Self {
            region: None,
            timestamp_ms,
            action: action.into(),
        }
    }
}
