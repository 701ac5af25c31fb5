//! End-to-end tests for the segment refinement chain.

use samplepacker::segment::{
    Segment, SpreadMode, merge_segments, pad_and_deduplicate, resolve_overlaps, spread_select,
};

fn make_segment(start: f64, end: f64, detector: &str, score: f64) -> Segment {
    Segment::new(start, end, detector, score)
}

#[test]
fn test_full_refinement_chain() {
    let audio_duration = 60.0;
    let raw = vec![
        make_segment(10.0, 10.5, "energy", 2.0),
        make_segment(10.6, 11.2, "transient", 1.5),
        make_segment(30.0, 30.3, "transient", 3.0),
        make_segment(45.0, 45.3, "energy", 1.0),
        make_segment(-1.0, -0.5, "energy", 0.2),
    ];

    let merged = merge_segments(raw, 150.0, 200.0, 60_000.0, audio_duration);
    assert_eq!(merged.len(), 3);
    assert_eq!(merged[0].start, 10.0);
    assert_eq!(merged[0].end, 11.2);
    // The first pair merged across the 100ms gap and kept both labels.
    assert_eq!(
        merged[0].attrs.detectors.as_deref(),
        Some(["energy".to_string(), "transient".to_string()].as_slice())
    );
    assert_eq!(merged[0].attrs.primary_detector.as_deref(), Some("energy"));

    let padded = pad_and_deduplicate(merged, 500.0, 500.0, audio_duration, 0.0, false);
    assert_eq!(padded.len(), 3);
    assert_eq!(padded[0].start, 9.5);
    assert!((padded[0].end - 11.7).abs() < 1e-9);
    assert_eq!(padded[0].attrs.raw_start, Some(10.0));
    assert_eq!(padded[0].attrs.raw_end, Some(11.2));

    let resolved = resolve_overlaps(padded, 0.5, 0.0);
    assert_eq!(resolved.len(), 3);

    let selected = spread_select(resolved, 2, audio_duration, SpreadMode::Strict);
    assert_eq!(selected.len(), 2);
    assert_eq!(selected[0].start, 9.5);
    // The second window holds two candidates; the higher score wins.
    assert_eq!(selected[1].start, 29.5);
    assert_eq!(selected[1].score, 3.0);
}

#[test]
fn test_heavy_padding_keeps_distant_events_distinct() {
    // 400ms events 2s apart with 3s of padding on each side. The padded
    // intervals overlap almost entirely, but deduplication compares the
    // raw bounds, which are disjoint.
    let raw = vec![
        make_segment(10.0, 10.4, "energy", 1.0),
        make_segment(12.0, 12.4, "energy", 1.0),
    ];
    let out = pad_and_deduplicate(raw.clone(), 3000.0, 3000.0, 60.0, 0.0, false);
    assert_eq!(out.len(), 2);

    // The legacy chain merge collapses the same input into one span.
    let chained = pad_and_deduplicate(raw, 3000.0, 3000.0, 60.0, 0.0, true);
    assert_eq!(chained.len(), 1);
    assert_eq!(chained[0].start, 7.0);
    assert!((chained[0].end - 15.4).abs() < 1e-9);
}

#[test]
fn test_keep_highest_prunes_before_selection() {
    let audio_duration = 40.0;
    let candidates = vec![
        make_segment(10.0, 12.0, "energy", 0.4),
        make_segment(10.5, 12.5, "spectral", 0.9),
        make_segment(30.0, 31.0, "transient", 0.7),
    ];

    let resolved = resolve_overlaps(candidates, 0.2, 0.0);
    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved[0].detector, "spectral");

    let selected = spread_select(resolved, 8, audio_duration, SpreadMode::Strict);
    assert_eq!(selected.len(), 2);
}

#[test]
fn test_strict_underselects_clustered_input_closest_fills() {
    // Five candidates all in the first quarter of a 100s recording.
    let candidates: Vec<Segment> = (0..5)
        .map(|i| {
            let start = 5.0 + f64::from(i);
            make_segment(start, start + 0.2, "energy", 1.0)
        })
        .collect();

    let strict = spread_select(candidates.clone(), 4, 100.0, SpreadMode::Strict);
    assert_eq!(strict.len(), 1);

    let closest = spread_select(candidates, 4, 100.0, SpreadMode::Closest);
    assert_eq!(closest.len(), 4);
    assert!(closest.windows(2).all(|w| w[0].start <= w[1].start));
}

#[test]
fn test_merge_is_idempotent_on_its_own_output() {
    let raw = vec![
        make_segment(1.0, 2.0, "energy", 1.0),
        make_segment(2.1, 3.0, "energy", 2.0),
        make_segment(10.0, 11.0, "transient", 0.5),
    ];
    let once = merge_segments(raw, 200.0, 100.0, 60_000.0, 20.0);
    let twice = merge_segments(once.clone(), 200.0, 100.0, 60_000.0, 20.0);
    assert_eq!(once.len(), twice.len());
    for (a, b) in once.iter().zip(&twice) {
        assert_eq!(a.start, b.start);
        assert_eq!(a.end, b.end);
    }
}
