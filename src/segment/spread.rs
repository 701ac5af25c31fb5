//! Duration-bounded, time-distributed sample selection.

use serde::{Deserialize, Serialize};

use super::{Segment, sort_by_start};

/// Policy for distributing the selection across the recording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpreadMode {
    /// One winner per time window; empty windows contribute nothing.
    #[default]
    Strict,
    /// Fill every window from the nearest remaining candidate, always
    /// returning `min(max_samples, candidates)` results.
    Closest,
}

impl std::fmt::Display for SpreadMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Closest => write!(f, "closest"),
        }
    }
}

/// Distribute at most `max_samples` selections across the file's duration.
///
/// `[0, audio_duration)` is partitioned into `max_samples` equal-width
/// windows and candidates are assigned by their midpoint. In `strict` mode
/// each non-empty window contributes its highest-scoring candidate, so the
/// result may be shorter than the cap. In `closest` mode each window takes
/// the unused candidate whose midpoint is nearest the window center, and
/// windows left empty are then filled from the globally nearest unused
/// candidate, guaranteeing `min(max_samples, candidates)` results.
///
/// Empty input, a zero cap, or a non-positive duration all yield an empty
/// result; when the candidate count does not exceed the cap, all
/// candidates are returned. The output is always sorted by start and
/// contains no candidate twice.
pub fn spread_select(
    candidates: Vec<Segment>,
    max_samples: usize,
    audio_duration: f64,
    mode: SpreadMode,
) -> Vec<Segment> {
    if candidates.is_empty() || max_samples == 0 || audio_duration <= 0.0 {
        return Vec::new();
    }

    if candidates.len() <= max_samples {
        let mut all = candidates;
        sort_by_start(&mut all);
        return all;
    }

    #[allow(clippy::cast_precision_loss)]
    let window_width = audio_duration / max_samples as f64;
    let midpoints: Vec<f64> = candidates.iter().map(Segment::midpoint).collect();
    let mut used = vec![false; candidates.len()];
    let mut picked: Vec<usize> = Vec::with_capacity(max_samples);

    match mode {
        SpreadMode::Strict => {
            for win in 0..max_samples {
                #[allow(clippy::cast_precision_loss)]
                let lo = win as f64 * window_width;
                let hi = lo + window_width;
                let best = (0..candidates.len())
                    .filter(|&i| !used[i] && midpoints[i] >= lo && midpoints[i] < hi)
                    .max_by(|&a, &b| {
                        candidates[a]
                            .score
                            .partial_cmp(&candidates[b].score)
                            .unwrap_or(std::cmp::Ordering::Equal)
                    });
                if let Some(i) = best {
                    used[i] = true;
                    picked.push(i);
                }
            }
        }
        SpreadMode::Closest => {
            let target = max_samples.min(candidates.len());
            let mut unfilled: Vec<usize> = Vec::new();

            // First pass: each window claims the in-window candidate whose
            // midpoint is nearest the window center.
            for win in 0..max_samples {
                #[allow(clippy::cast_precision_loss)]
                let lo = win as f64 * window_width;
                let hi = lo + window_width;
                let center = lo + window_width / 2.0;
                let best = (0..candidates.len())
                    .filter(|&i| !used[i] && midpoints[i] >= lo && midpoints[i] < hi)
                    .min_by(|&a, &b| {
                        (midpoints[a] - center)
                            .abs()
                            .partial_cmp(&(midpoints[b] - center).abs())
                            .unwrap_or(std::cmp::Ordering::Equal)
                            .then(a.cmp(&b))
                    });
                match best {
                    Some(i) => {
                        used[i] = true;
                        picked.push(i);
                    }
                    None => unfilled.push(win),
                }
            }

            // Second pass: empty windows draw from the globally nearest
            // remaining candidate. Ties break on the lower original index
            // to keep the result deterministic.
            for win in unfilled {
                if picked.len() >= target {
                    break;
                }
                #[allow(clippy::cast_precision_loss)]
                let center = win as f64 * window_width + window_width / 2.0;
                let best = (0..candidates.len()).filter(|&i| !used[i]).min_by(|&a, &b| {
                    (midpoints[a] - center)
                        .abs()
                        .partial_cmp(&(midpoints[b] - center).abs())
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then(a.cmp(&b))
                });
                if let Some(i) = best {
                    used[i] = true;
                    picked.push(i);
                }
            }
        }
    }

    let mut keep_flags = vec![false; candidates.len()];
    for i in picked {
        keep_flags[i] = true;
    }
    let mut selected: Vec<Segment> = candidates
        .into_iter()
        .zip(keep_flags)
        .filter_map(|(seg, keep)| keep.then_some(seg))
        .collect();
    sort_by_start(&mut selected);
    selected
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64, score: f64) -> Segment {
        Segment::new(start, end, "energy", score)
    }

    /// Nine evenly spaced one-second segments across 100 seconds.
    fn evenly_spaced() -> Vec<Segment> {
        (0..9)
            .map(|i| {
                let start = f64::from(i) * 11.0 + 1.0;
                seg(start, start + 1.0, f64::from(i) * 0.1)
            })
            .collect()
    }

    #[test]
    fn test_guard_clauses() {
        assert!(spread_select(Vec::new(), 5, 100.0, SpreadMode::Strict).is_empty());
        assert!(spread_select(evenly_spaced(), 0, 100.0, SpreadMode::Strict).is_empty());
        assert!(spread_select(evenly_spaced(), 5, 0.0, SpreadMode::Closest).is_empty());
    }

    #[test]
    fn test_under_cap_returns_all_sorted() {
        let mut candidates = evenly_spaced();
        candidates.reverse();
        let out = spread_select(candidates, 20, 100.0, SpreadMode::Strict);
        assert_eq!(out.len(), 9);
        assert!(out.windows(2).all(|w| w[0].start <= w[1].start));
    }

    #[test]
    fn test_strict_one_per_window() {
        let out = spread_select(evenly_spaced(), 5, 100.0, SpreadMode::Strict);
        assert_eq!(out.len(), 5);
        assert!(out.windows(2).all(|w| w[0].start < w[1].start));
        // One midpoint per 20s window.
        for (i, s) in out.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let lo = i as f64 * 20.0;
            assert!(s.midpoint() >= lo && s.midpoint() < lo + 20.0);
        }
    }

    #[test]
    fn test_strict_picks_highest_score_in_window() {
        let candidates = vec![
            seg(1.0, 2.0, 0.2),
            seg(3.0, 4.0, 0.9),
            seg(6.0, 7.0, 0.5),
            seg(52.0, 53.0, 0.1),
            seg(55.0, 56.0, 0.3),
        ];
        let out = spread_select(candidates, 2, 100.0, SpreadMode::Strict);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].score, 0.9);
        assert_eq!(out[1].score, 0.3);
    }

    #[test]
    fn test_strict_empty_windows_contribute_nothing() {
        // Everything clustered in the first 10 seconds; 5 windows of 20s.
        let candidates: Vec<Segment> = (0..6)
            .map(|i| seg(f64::from(i), f64::from(i) + 0.5, 0.5))
            .collect();
        let out = spread_select(candidates, 5, 100.0, SpreadMode::Strict);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_closest_returns_exact_count_with_clustered_input() {
        // Eight candidates crowded into [0, 50), three sparse beyond.
        let mut candidates: Vec<Segment> = (0..8)
            .map(|i| seg(f64::from(i) * 6.0, f64::from(i) * 6.0 + 1.0, 0.5))
            .collect();
        candidates.push(seg(60.0, 61.0, 0.5));
        candidates.push(seg(75.0, 76.0, 0.5));
        candidates.push(seg(90.0, 91.0, 0.5));
        let out = spread_select(candidates, 5, 100.0, SpreadMode::Closest);
        assert_eq!(out.len(), 5);
        assert!(out.windows(2).all(|w| w[0].start < w[1].start));
    }

    #[test]
    fn test_closest_never_selects_twice() {
        let candidates = vec![
            seg(10.0, 11.0, 0.5),
            seg(12.0, 13.0, 0.5),
            seg(14.0, 15.0, 0.5),
            seg(16.0, 17.0, 0.5),
            seg(18.0, 19.0, 0.5),
            seg(20.0, 21.0, 0.5),
        ];
        let out = spread_select(candidates, 4, 100.0, SpreadMode::Closest);
        assert_eq!(out.len(), 4);
        for pair in out.windows(2) {
            assert!(pair[0].start != pair[1].start);
        }
    }

    #[test]
    fn test_bounds_stay_within_audio() {
        let out = spread_select(evenly_spaced(), 5, 100.0, SpreadMode::Closest);
        assert!(out.iter().all(|s| s.start >= 0.0 && s.end <= 100.0));
    }
}
