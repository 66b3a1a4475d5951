//! Scanpath simplification.
//!
//! Raw traces run to thousands of samples; drawing them all makes the
//! scanpath unreadable. Samples are clustered as (x, y, scaled-time)
//! triples and each cluster becomes one representative point whose
//! duration grows with cluster size, so larger markers mean denser dwell.
//! Cluster centers are re-sorted by time afterwards, because clustering
//! itself does not preserve chronological order.

use gazetrace_session_model::PositionSample;
use serde::{Deserialize, Serialize};

/// Divisor applied to timestamps before clustering so the time axis is
/// commensurate with pixel coordinates.
const TIME_SCALE: f64 = 100_000.0;

/// Lloyd-iteration cap; assignments stabilize long before this on real
/// traces.
const MAX_ITERATIONS: usize = 50;

/// One representative point of a simplified scanpath.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanpathPoint {
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: f64,
    /// Marker weight: base point duration × cluster member count.
    pub duration: f64,
}

/// Reduce `samples` to at most `min(cluster_cap, len / 10)` representative
/// points, chronologically ordered.
///
/// When the resolved cluster count is zero (fewer than 10 samples) the
/// input is returned unchanged, one point per sample at the base duration.
pub fn simplify(
    samples: &[PositionSample],
    cluster_cap: usize,
    point_duration: f64,
) -> Vec<ScanpathPoint> {
    let k = cluster_cap.min(samples.len() / 10);
    if k == 0 {
        return samples
            .iter()
            .map(|s| ScanpathPoint {
                x: s.x,
                y: s.y,
                timestamp_ms: s.timestamp_ms,
                duration: point_duration,
            })
            .collect();
    }

    let points: Vec<[f64; 3]> = samples
        .iter()
        .map(|s| [s.x, s.y, s.timestamp_ms / TIME_SCALE])
        .collect();

    let (centers, sizes) = kmeans(&points, k);

    let mut clusters: Vec<(usize, [f64; 3])> = sizes.into_iter().zip(centers).collect();
    // Recover chronological order from the time coordinate.
    clusters.sort_by(|a, b| a.1[2].partial_cmp(&b.1[2]).unwrap_or(std::cmp::Ordering::Equal));

    clusters
        .into_iter()
        .filter(|(size, _)| *size > 0)
        .map(|(size, center)| ScanpathPoint {
            x: center[0],
            y: center[1],
            timestamp_ms: center[2] * TIME_SCALE,
            duration: point_duration * size as f64,
        })
        .collect()
}

/// Deterministic k-means over 3D points.
///
/// Centers seed at evenly-spaced positions along the chronological input
/// (reproducible, unlike randomized init) and refine with Lloyd
/// iterations. A center whose cluster empties keeps its previous
/// position. Returns centers and member counts.
fn kmeans(points: &[[f64; 3]], k: usize) -> (Vec<[f64; 3]>, Vec<usize>) {
    let mut centers: Vec<[f64; 3]> = (0..k).map(|j| points[j * points.len() / k]).collect();
    let mut assignment = vec![0usize; points.len()];

    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;
        for (point, slot) in points.iter().zip(assignment.iter_mut()) {
            let nearest = nearest_center(point, &centers);
            if nearest != *slot {
                *slot = nearest;
                changed = true;
            }
        }

        let mut sums = vec![[0.0; 3]; k];
        let mut counts = vec![0usize; k];
        for (point, &slot) in points.iter().zip(&assignment) {
            for axis in 0..3 {
                sums[slot][axis] += point[axis];
            }
            counts[slot] += 1;
        }
        for j in 0..k {
            if counts[j] > 0 {
                for axis in 0..3 {
                    centers[j][axis] = sums[j][axis] / counts[j] as f64;
                }
            }
        }

        if !changed {
            break;
        }
    }

    let mut sizes = vec![0usize; k];
    for &slot in &assignment {
        sizes[slot] += 1;
    }
    (centers, sizes)
}

fn nearest_center(point: &[f64; 3], centers: &[[f64; 3]]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (j, center) in centers.iter().enumerate() {
        let dist = (0..3).map(|axis| (point[axis] - center[axis]).powi(2)).sum::<f64>();
        if dist < best_dist {
            best_dist = dist;
            best = j;
        }
    }
    best
}
