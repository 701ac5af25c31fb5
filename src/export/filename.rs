//! Deterministic, cross-platform sample filenames.

use crate::constants::export;
use crate::segment::Segment;
use std::collections::BTreeSet;

const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const WINDOWS_RESERVED: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Build the filename (without extension) for one exported sample.
///
/// Format: `{base}_sample_{index:04}_{start}s-{end}s_detector-{label}`.
/// Times under one second keep two decimals so very short samples stay
/// distinguishable.
#[must_use]
pub fn build_sample_filename(base_name: &str, index: usize, segment: &Segment) -> String {
    let name = format!(
        "{base_name}_sample_{index:0digits$}_{}s-{}s_detector-{}",
        round_time(segment.start),
        round_time(segment.end),
        detector_label(segment),
        digits = export::INDEX_DIGITS,
    );
    sanitize_filename(&name, export::MAX_FILENAME_LEN)
}

fn round_time(secs: f64) -> String {
    if secs >= 1.0 {
        format!("{secs:.1}")
    } else {
        format!("{secs:.2}")
    }
}

/// Collapse a segment's detector labels into a short filename fragment.
fn detector_label(segment: &Segment) -> String {
    if let Some(primary) = &segment.attrs.primary_detector {
        return primary.clone();
    }
    let unique: BTreeSet<&str> = segment
        .detector
        .split('+')
        .filter(|p| !p.is_empty())
        .collect();
    match unique.len() {
        0 => "unknown".to_string(),
        1 | 2 => unique.into_iter().collect::<Vec<_>>().join("+"),
        _ => "multi".to_string(),
    }
}

/// Sanitize a filename for cross-platform filesystem compatibility.
///
/// Replaces reserved and control characters with underscores, collapses
/// `..` runs, avoids Windows device names, and truncates to `max_length`.
#[must_use]
pub fn sanitize_filename(name: &str, max_length: usize) -> String {
    let mut candidate: String = name
        .chars()
        .map(|c| {
            if INVALID_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    while candidate.contains("..") {
        candidate = candidate.replace("..", ".");
    }

    let mut stem: String = candidate.trim().trim_end_matches([' ', '.']).to_string();
    if stem.is_empty() {
        stem = "untitled".to_string();
    }
    if stem.len() > max_length {
        stem.truncate(floor_char_boundary(&stem, max_length));
        stem = stem.trim_end_matches([' ', '.']).to_string();
        if stem.is_empty() {
            stem = "u".to_string();
        }
    }

    if WINDOWS_RESERVED.contains(&stem.to_uppercase().as_str()) {
        if stem.len() < max_length {
            stem.push('_');
        } else {
            stem = format!("{}_", &stem[..stem.len() - 1]);
        }
    }

    stem
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    let mut i = index.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
