//! Transient detector: onsets via spectral flux.

use crate::constants::transient;
use crate::dsp::{self, Stft};
use crate::segment::Segment;

use super::mask_to_segments;

pub(super) const LABEL: &str = "transient";

/// Flags short percussive events where the z-scored spectral flux exceeds
/// a high percentile threshold.
pub struct TransientFluxDetector {
    /// Sample rate of the analysis signal.
    pub sample_rate: u32,
    /// FFT size for the short-time spectrum.
    pub fft_size: usize,
    /// Hop size between analysis frames in samples.
    pub hop_size: usize,
    /// Adaptive threshold percentile over the z-scored flux track.
    pub threshold_percentile: f32,
    /// Multiplier on the threshold for the hysteresis fall edge.
    pub fall_factor: f32,
    /// Minimum segment duration in milliseconds.
    pub min_duration_ms: f64,
    /// Maximum segment duration in milliseconds.
    pub max_duration_ms: f64,
}

impl TransientFluxDetector {
    /// Default transient tuning for the given sample rate.
    #[must_use]
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            fft_size: transient::FFT_SIZE,
            hop_size: transient::HOP_SIZE,
            threshold_percentile: transient::THRESHOLD_PERCENTILE,
            fall_factor: transient::FALL_FACTOR,
            min_duration_ms: transient::MIN_DURATION_MS,
            max_duration_ms: transient::MAX_DURATION_MS,
        }
    }

    /// Detect onset bursts from the z-scored spectral flux track.
    pub fn detect(&self, audio: &[f32]) -> Vec<Segment> {
        let stft = Stft::new(self.fft_size, self.hop_size);
        let frames = stft.magnitudes(audio);
        if frames.len() < 2 {
            return Vec::new();
        }

        let flux = dsp::spectral_flux(&frames);
        let z = dsp::z_score(&flux);
        let rise = dsp::percentile(&z, self.threshold_percentile);
        let mask = dsp::hysteresis(&z, rise, rise * self.fall_factor);

        let frame_secs = stft.frame_secs(self.sample_rate);
        mask_to_segments(
            &mask,
            &z,
            frame_secs,
            LABEL,
            self.min_duration_ms,
            Some(self.max_duration_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_click_in_noise_floor() {
        let sr = 16_000;
        let mut audio = vec![0.001; sr as usize * 4];
        // A 100ms burst at t=2s, well above the floor.
        let burst_start = sr as usize * 2;
        for i in 0..(sr as usize / 10) {
            let t = i as f32 / sr as f32;
            audio[burst_start + i] = 0.9 * (2.0 * std::f32::consts::PI * 3000.0 * t).sin();
        }
        let det = TransientFluxDetector::new(sr);
        let segs = det.detect(&audio);
        assert!(!segs.is_empty());
        assert!(segs.iter().any(|s| s.start > 1.7 && s.start < 2.3));
        for seg in &segs {
            assert_eq!(seg.detector, "transient");
        }
    }

    #[test]
    fn test_short_input_is_empty() {
        let det = TransientFluxDetector::new(16_000);
        assert!(det.detect(&[0.0; 512]).is_empty());
    }
}
