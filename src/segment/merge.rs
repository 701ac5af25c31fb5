//! Raw-overlap merge pass.

use std::collections::BTreeSet;

use super::{Segment, sort_by_start};

/// Merge raw detector output that touches or nearly touches, then filter
/// by duration bounds.
///
/// Bounds are clamped into `[0, audio_duration]` first; anything that
/// collapses to zero width is dropped. A segment merges into the current
/// accumulator when its start lies within `merge_gap_ms` of the
/// accumulator's end. Merging takes the union of bounds, the max of
/// scores, the union of contributing detector labels, and records the
/// higher-scoring contributor as the primary detector.
///
/// The result is sorted by start and every duration in milliseconds lies
/// within `[min_duration_ms, max_duration_ms]`. Applying the pass to its
/// own output with the same gap is a no-op.
pub fn merge_segments(
    segments: Vec<Segment>,
    merge_gap_ms: f64,
    min_duration_ms: f64,
    max_duration_ms: f64,
    audio_duration: f64,
) -> Vec<Segment> {
    if segments.is_empty() {
        return Vec::new();
    }

    let gap_sec = merge_gap_ms / 1000.0;

    let mut clamped: Vec<Segment> = segments
        .into_iter()
        .filter_map(|mut seg| {
            seg.start = seg.start.clamp(0.0, audio_duration);
            seg.end = seg.end.clamp(0.0, audio_duration);
            (seg.end > seg.start).then_some(seg)
        })
        .collect();

    if clamped.is_empty() {
        return Vec::new();
    }

    sort_by_start(&mut clamped);

    let mut merged: Vec<Segment> = Vec::with_capacity(clamped.len());
    for seg in clamped {
        match merged.last_mut() {
            Some(last) if seg.start <= last.end + gap_sec => {
                merge_into(last, seg);
            }
            _ => merged.push(seg),
        }
    }

    merged
        .into_iter()
        .filter(|seg| {
            let dur_ms = seg.duration_ms();
            dur_ms >= min_duration_ms && dur_ms <= max_duration_ms
        })
        .collect()
}

/// Fold `seg` into the accumulator `last`.
fn merge_into(last: &mut Segment, seg: Segment) {
    let mut labels: BTreeSet<String> = last
        .attrs
        .detectors
        .take()
        .unwrap_or_else(|| vec![last.detector.clone()])
        .into_iter()
        .collect();
    labels.extend(
        seg.attrs
            .detectors
            .unwrap_or_else(|| vec![seg.detector.clone()]),
    );

    let primary = if last.score >= seg.score {
        last.detector.clone()
    } else {
        seg.detector.clone()
    };

    last.start = last.start.min(seg.start);
    last.end = last.end.max(seg.end);
    last.score = last.score.max(seg.score);
    last.detector = primary.clone();
    last.attrs.detectors = Some(labels.into_iter().collect());
    last.attrs.primary_detector = Some(primary);
    // The later contribution wins for the editor flag, matching how the
    // rest of the attrs are folded left to right.
    last.attrs.enabled = seg.attrs.enabled.or(last.attrs.enabled);
}
