//! Score-greedy overlap resolution.

use super::{Segment, interval_iou, sort_by_start};

/// Prune overlapping candidates, keeping the highest-scoring ones.
///
/// Candidates are visited in score order. One is kept only if, against
/// every already-kept segment, its IoU on the current (post-dedup) bounds
/// stays below `iou_threshold` and the two are not within `min_gap_ms` of
/// each other. The kept set is returned sorted by start ascending, score
/// descending on ties.
pub fn resolve_overlaps(segments: Vec<Segment>, iou_threshold: f64, min_gap_ms: f64) -> Vec<Segment> {
    if segments.is_empty() {
        return Vec::new();
    }

    let gap_sec = min_gap_ms / 1000.0;

    let mut by_score = segments;
    by_score.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<Segment> = Vec::with_capacity(by_score.len());
    for cand in by_score {
        let conflicts = kept.iter().any(|other| {
            interval_iou((cand.start, cand.end), (other.start, other.end)) >= iou_threshold
                || (cand.start < other.end + gap_sec && other.start < cand.end + gap_sec)
        });
        if !conflicts {
            kept.push(cand);
        }
    }

    sort_by_start(&mut kept);
    kept
}
