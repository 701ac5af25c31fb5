//! Event detectors.
//!
//! Four independent detectors share one contract: given a mono analysis
//! signal at the detector's declared sample rate, return raw [`Segment`]s.
//! They share no state and may run in any order; the merge pass imposes
//! ordering afterwards. A signal shorter than a detector's analysis frame
//! yields an empty result rather than an error.

mod energy;
mod flux;
mod spectral;
mod vad;

pub use energy::EnergyDetector;
pub use flux::TransientFluxDetector;
pub use spectral::SpectralInterestDetector;
pub use vad::VoiceActivityDetector;

use crate::config::{DetectionConfig, DetectionMode};
use crate::constants::SCORE_LOOKBACK_FRAMES;
use crate::segment::Segment;

/// The closed set of detector variants.
pub enum Detector {
    /// Non-silence detection over the RMS envelope.
    Energy(EnergyDetector),
    /// Transient detection over spectral flux.
    Transient(TransientFluxDetector),
    /// Spectral interestingness over a weighted feature combination.
    Spectral(SpectralInterestDetector),
    /// Voice activity via the WebRTC VAD.
    Voice(VoiceActivityDetector),
}

impl Detector {
    /// Label attached to segments this detector produces.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Energy(_) => energy::LABEL,
            Self::Transient(_) => flux::LABEL,
            Self::Spectral(_) => spectral::LABEL,
            Self::Voice(_) => vad::LABEL,
        }
    }

    /// Run detection over a mono signal at the detector's sample rate.
    pub fn detect(&self, audio: &[f32]) -> Vec<Segment> {
        match self {
            Self::Energy(d) => d.detect(audio),
            Self::Transient(d) => d.detect(audio),
            Self::Spectral(d) => d.detect(audio),
            Self::Voice(d) => d.detect(audio),
        }
    }
}

/// Instantiate the detectors active for a mode, applying config overrides.
pub fn build_detectors(sample_rate: u32, config: &DetectionConfig) -> Vec<Detector> {
    let mode = config.mode;
    let mut detectors = Vec::new();

    if matches!(mode, DetectionMode::Auto | DetectionMode::Voice) {
        let mut det = VoiceActivityDetector::new(sample_rate);
        det.aggressiveness = config.vad_aggressiveness;
        detectors.push(Detector::Voice(det));
    }
    if matches!(mode, DetectionMode::Auto | DetectionMode::Transient) {
        let mut det = TransientFluxDetector::new(sample_rate);
        if let Some(pct) = config.threshold_percentile {
            det.threshold_percentile = pct;
        }
        // Cap transient runs to the configured merge ceiling so a noisy
        // recording cannot surface a single minute-long onset.
        det.max_duration_ms = config.max_duration_ms;
        detectors.push(Detector::Transient(det));
    }
    if matches!(mode, DetectionMode::Auto | DetectionMode::Energy) {
        detectors.push(Detector::Energy(EnergyDetector::new(sample_rate)));
    }
    if matches!(mode, DetectionMode::Auto | DetectionMode::Spectral) {
        let mut det = SpectralInterestDetector::new(sample_rate);
        if let Some(pct) = config.threshold_percentile {
            det.threshold_percentile = pct;
        }
        detectors.push(Detector::Spectral(det));
    }

    detectors
}

/// Convert contiguous on-runs of a frame mask into segments.
///
/// A run ending at frame `i` is scored with the maximum of `scores` over a
/// small trailing window around the falling edge; a run reaching the end
/// of the mask takes the global maximum. Runs shorter than
/// `min_duration_ms`, or longer than `max_duration_ms` when given, are
/// discarded.
pub(crate) fn mask_to_segments(
    mask: &[bool],
    scores: &[f32],
    frame_secs: f64,
    label: &str,
    min_duration_ms: f64,
    max_duration_ms: Option<f64>,
) -> Vec<Segment> {
    let keep = |start: f64, end: f64| {
        let dur_ms = (end - start) * 1000.0;
        dur_ms >= min_duration_ms && max_duration_ms.is_none_or(|max| dur_ms <= max)
    };

    let mut segments = Vec::new();
    let mut in_seg = false;
    let mut seg_start = 0.0;

    for (i, &on) in mask.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let t = i as f64 * frame_secs;
        if on && !in_seg {
            in_seg = true;
            seg_start = t;
        } else if !on && in_seg {
            in_seg = false;
            if keep(seg_start, t) {
                let lo = i.saturating_sub(SCORE_LOOKBACK_FRAMES);
                let score = max_of(&scores[lo..=i.min(scores.len() - 1)]);
                segments.push(Segment::new(seg_start, t, label, score));
            }
        }
    }

    if in_seg {
        #[allow(clippy::cast_precision_loss)]
        let end = mask.len() as f64 * frame_secs;
        if keep(seg_start, end) {
            segments.push(Segment::new(seg_start, end, label, max_of(scores)));
        }
    }

    segments
}

fn max_of(values: &[f32]) -> f64 {
    f64::from(values.iter().copied().fold(f32::NEG_INFINITY, f32::max))
}
