//! Detected time intervals and the passes that refine them.
//!
//! Detectors emit raw [`Segment`]s; the merge, padding/dedup, overlap
//! resolution, and spread selection passes each consume one generation of
//! segments and return a new one. No pass mutates its input in place.

mod dedup;
mod merge;
mod overlap;
mod spread;

pub use dedup::pad_and_deduplicate;
pub use merge::merge_segments;
pub use overlap::resolve_overlaps;
pub use spread::{SpreadMode, spread_select};

use serde::{Deserialize, Serialize};

/// A detected audio segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds. Always greater than `start`.
    pub end: f64,
    /// Label of the producing detector, or a composite label after merging.
    pub detector: String,
    /// Detector-defined confidence. Comparable only within one run.
    pub score: f64,
    /// Auxiliary fields carried across passes.
    #[serde(default)]
    pub attrs: SegmentAttrs,
}

/// Auxiliary segment fields.
///
/// `raw_start`/`raw_end` hold the pre-padding bounds so that geometry in
/// later passes can ignore however much padding was requested.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentAttrs {
    /// Start time before padding was applied, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_start: Option<f64>,
    /// End time before padding was applied, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_end: Option<f64>,
    /// Sorted labels of every detector that contributed via merges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detectors: Option<Vec<String>>,
    /// Label of the highest-scoring contributor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_detector: Option<String>,
    /// Editor-facing enable flag. The engine only carries it through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl Segment {
    /// Create a segment with empty attrs.
    pub fn new(start: f64, end: f64, detector: impl Into<String>, score: f64) -> Self {
        Self {
            start,
            end,
            detector: detector.into(),
            score,
            attrs: SegmentAttrs::default(),
        }
    }

    /// Segment duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Segment duration in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.duration() * 1000.0
    }

    /// Midpoint of the segment in seconds.
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// Pre-padding bounds if recorded, otherwise the current bounds.
    pub fn raw_bounds(&self) -> (f64, f64) {
        (
            self.attrs.raw_start.unwrap_or(self.start),
            self.attrs.raw_end.unwrap_or(self.end),
        )
    }

    /// Whether the segment is enabled. Unset means enabled.
    pub fn is_enabled(&self) -> bool {
        self.attrs.enabled.unwrap_or(true)
    }
}

/// Intersection-over-Union of two intervals.
///
/// Returns 0.0 when the union is empty or degenerate.
pub fn interval_iou(a: (f64, f64), b: (f64, f64)) -> f64 {
    let inter = (a.1.min(b.1) - a.0.max(b.0)).max(0.0);
    let union = (a.1 - a.0) + (b.1 - b.0) - inter;
    if union <= 0.0 { 0.0 } else { inter / union }
}

/// Sort segments by start time ascending, score descending on ties.
pub(crate) fn sort_by_start(segments: &mut [Segment]) {
    segments.sort_by(|a, b| {
        a.start
            .partial_cmp(&b.start)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_and_midpoint() {
        let seg = Segment::new(1.0, 3.0, "energy", 0.5);
        assert_eq!(seg.duration(), 2.0);
        assert_eq!(seg.duration_ms(), 2000.0);
        assert_eq!(seg.midpoint(), 2.0);
    }

    #[test]
    fn test_raw_bounds_fall_back_to_current() {
        let mut seg = Segment::new(5.0, 6.0, "energy", 0.5);
        assert_eq!(seg.raw_bounds(), (5.0, 6.0));
        seg.attrs.raw_start = Some(5.2);
        seg.attrs.raw_end = Some(5.8);
        assert_eq!(seg.raw_bounds(), (5.2, 5.8));
    }

    #[test]
    fn test_enabled_defaults_to_true() {
        let mut seg = Segment::new(0.0, 1.0, "energy", 0.5);
        assert!(seg.is_enabled());
        seg.attrs.enabled = Some(false);
        assert!(!seg.is_enabled());
    }

    #[test]
    fn test_interval_iou() {
        assert_eq!(interval_iou((0.0, 1.0), (2.0, 3.0)), 0.0);
        assert_eq!(interval_iou((0.0, 2.0), (0.0, 2.0)), 1.0);
        let iou = interval_iou((0.0, 2.0), (1.0, 3.0));
        assert!((iou - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_iou_degenerate_interval() {
        assert_eq!(interval_iou((1.0, 1.0), (1.0, 1.0)), 0.0);
    }
}
