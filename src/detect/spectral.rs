//! Spectral interestingness detector.
//!
//! Combines several frame-wise spectral features into a single weighted
//! interestingness track. Tonal, moving, bright content scores high; broadband
//! stationary noise scores low because flatness enters with a negative weight.

use crate::constants::spectral;
use crate::dsp::{self, Stft};
use crate::segment::Segment;

use super::mask_to_segments;

pub(super) const LABEL: &str = "spectral";

/// Flags regions where a weighted blend of spectral features stands out
/// against the rest of the recording.
pub struct SpectralInterestDetector {
    /// Sample rate of the analysis signal.
    pub sample_rate: u32,
    /// FFT size for the short-time spectrum.
    pub fft_size: usize,
    /// Hop size between analysis frames in samples.
    pub hop_size: usize,
    /// Gate percentile over the combined interestingness track.
    pub threshold_percentile: f32,
    /// Minimum segment duration in milliseconds.
    pub min_duration_ms: f64,
}

impl SpectralInterestDetector {
    /// Default interestingness tuning for the given sample rate.
    #[must_use]
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            fft_size: spectral::FFT_SIZE,
            hop_size: spectral::HOP_SIZE,
            threshold_percentile: spectral::THRESHOLD_PERCENTILE,
            min_duration_ms: spectral::MIN_DURATION_MS,
        }
    }

    /// Detect frames whose combined feature score clears the percentile gate.
    pub fn detect(&self, audio: &[f32]) -> Vec<Segment> {
        let stft = Stft::new(self.fft_size, self.hop_size);
        let frames = stft.magnitudes(audio);
        if frames.len() < 2 {
            return Vec::new();
        }
        let freqs = stft.bin_frequencies(self.sample_rate);

        let flux = dsp::spectral_flux(&frames);
        let centroid: Vec<f32> = frames
            .iter()
            .map(|m| dsp::spectral_centroid(&freqs, m))
            .collect();
        let rolloff: Vec<f32> = frames
            .iter()
            .map(|m| dsp::spectral_rolloff(&freqs, m, spectral::ROLLOFF_PERCENT))
            .collect();
        let flatness: Vec<f32> = frames.iter().map(|m| dsp::spectral_flatness(m)).collect();
        // Frame RMS over the same framing as the spectra.
        let rms = dsp::rms_envelope(audio, self.fft_size, self.hop_size);
        debug_assert_eq!(rms.len(), frames.len());

        let combined = combine_features(&flux, &centroid, &rolloff, &flatness, &rms);
        let track = dsp::z_score(&combined);

        // Plain gate, no hysteresis. Frames at or above the percentile pass.
        let threshold = dsp::percentile(&track, self.threshold_percentile);
        let mask: Vec<bool> = track.iter().map(|&v| v >= threshold).collect();

        let frame_secs = stft.frame_secs(self.sample_rate);
        mask_to_segments(&mask, &track, frame_secs, LABEL, self.min_duration_ms, None)
    }
}

/// Weighted sum of the z-scored feature tracks. Flatness is negated so that
/// noise-like frames pull the combined track down.
fn combine_features(
    flux: &[f32],
    centroid: &[f32],
    rolloff: &[f32],
    flatness: &[f32],
    rms: &[f32],
) -> Vec<f32> {
    let z_flux = dsp::z_score(flux);
    let z_cent = dsp::z_score(centroid);
    let z_roll = dsp::z_score(rolloff);
    let z_flat = dsp::z_score(flatness);
    let z_rms = dsp::z_score(rms);

    let n = flux
        .len()
        .min(centroid.len())
        .min(rolloff.len())
        .min(flatness.len())
        .min(rms.len());
    (0..n)
        .map(|i| {
            spectral::FLUX_WEIGHT * z_flux[i]
                + spectral::CENTROID_WEIGHT * z_cent[i]
                + spectral::ROLLOFF_WEIGHT * z_roll[i]
                - spectral::FLATNESS_WEIGHT * z_flat[i]
                + spectral::RMS_WEIGHT * z_rms[i]
        })
        .collect()
}
