//! Padding application and padding-aware deduplication.

use super::{Segment, interval_iou, sort_by_start};
use crate::constants::padding::RAW_IOU_THRESHOLD;

/// Apply asymmetric pre/post padding and remove the redundancy it creates.
///
/// Each segment's padded bounds are clamped into `[0, audio_duration]`;
/// segments that collapse to zero width are dropped. The pre-padding bounds
/// are stored in `attrs.raw_start`/`attrs.raw_end` before `start`/`end`
/// are widened.
///
/// With `chain_merge` set, candidates are chain-merged on their padded
/// bounds with `min_gap_ms` tolerance (the legacy behavior). Otherwise a
/// non-chaining dedup runs: candidates are visited in padded-start order
/// and dropped when their raw interval is contained in, overlaps, or has
/// IoU at or above 0.5 with any kept segment's raw interval. Because only
/// raw bounds are compared, the decision is invariant to how much padding
/// was requested: distant events with heavily overlapping padding stay
/// distinct.
pub fn pad_and_deduplicate(
    segments: Vec<Segment>,
    pre_pad_ms: f64,
    post_pad_ms: f64,
    audio_duration: f64,
    min_gap_ms: f64,
    chain_merge: bool,
) -> Vec<Segment> {
    let pre = pre_pad_ms / 1000.0;
    let post = post_pad_ms / 1000.0;

    let mut padded: Vec<Segment> = segments
        .into_iter()
        .filter_map(|mut seg| {
            let padded_start = (seg.start - pre).max(0.0);
            let padded_end = (seg.end + post).min(audio_duration);
            if padded_end <= padded_start {
                return None;
            }
            seg.attrs.raw_start = Some(seg.start);
            seg.attrs.raw_end = Some(seg.end);
            seg.start = padded_start;
            seg.end = padded_end;
            Some(seg)
        })
        .collect();

    if padded.is_empty() {
        return Vec::new();
    }

    sort_by_start(&mut padded);

    if chain_merge {
        return chain_merge_padded(padded, min_gap_ms / 1000.0);
    }

    let mut kept: Vec<Segment> = Vec::with_capacity(padded.len());
    for cand in padded {
        if !kept.iter().any(|other| raw_duplicate(&cand, other)) {
            kept.push(cand);
        }
    }
    kept
}

/// Whether the candidate's raw interval duplicates an already-kept one.
fn raw_duplicate(cand: &Segment, other: &Segment) -> bool {
    let (c0, c1) = cand.raw_bounds();
    let (o0, o1) = other.raw_bounds();
    let contained = (c0 >= o0 && c1 <= o1) || (o0 >= c0 && o1 <= c1);
    let overlaps = (c1.min(o1) - c0.max(o0)) > 0.0;
    contained || overlaps || interval_iou((c0, c1), (o0, o1)) >= RAW_IOU_THRESHOLD
}

/// Legacy behavior: chain-merge on the padded bounds.
fn chain_merge_padded(padded: Vec<Segment>, gap_sec: f64) -> Vec<Segment> {
    let mut merged: Vec<Segment> = Vec::with_capacity(padded.len());
    for seg in padded {
        match merged.last_mut() {
            Some(last) if seg.start <= last.end + gap_sec => {
                let primary = if last.score >= seg.score {
                    last.detector.clone()
                } else {
                    seg.detector.clone()
                };
                last.end = last.end.max(seg.end);
                last.score = last.score.max(seg.score);
                last.detector = primary.clone();
                last.attrs.primary_detector = Some(primary);
                last.attrs.raw_end = seg.attrs.raw_end.or(last.attrs.raw_end);
                last.attrs.enabled = seg.attrs.enabled.or(last.attrs.enabled);
            }
            _ => merged.push(seg),
        }
    }
    merged
}
