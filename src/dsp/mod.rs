//! DSP primitives: envelopes, normalization, gating, spectral features.
//!
//! Everything here is a pure function over slices; detectors compose these
//! into feature tracks.

mod spectrum;

pub use spectrum::Stft;

use crate::constants::{FLATNESS_EPSILON, FLUX_EPSILON, RMS_EPSILON};

/// Frame-wise RMS envelope.
///
/// Returns one value per full window; the tail that does not fill a window
/// is ignored. Empty when the signal is shorter than one window or the
/// window/hop is zero. A tiny epsilon inside the square root keeps
/// downstream log/ratio math finite.
pub fn rms_envelope(signal: &[f32], window_size: usize, hop_size: usize) -> Vec<f32> {
    if window_size == 0 || hop_size == 0 || signal.len() < window_size {
        return Vec::new();
    }
    let n_frames = 1 + (signal.len() - window_size) / hop_size;
    let mut env = Vec::with_capacity(n_frames);
    for i in 0..n_frames {
        let frame = &signal[i * hop_size..i * hop_size + window_size];
        #[allow(clippy::cast_precision_loss)]
        let mean_sq = frame.iter().map(|s| s * s).sum::<f32>() / window_size as f32;
        env.push((mean_sq + RMS_EPSILON).sqrt());
    }
    env
}

/// Z-score normalization: `(x - mean) / std`.
///
/// Constant input yields all zeros instead of dividing by zero.
pub fn z_score(values: &[f32]) -> Vec<f32> {
    if values.is_empty() {
        return Vec::new();
    }
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f32;
    let mean = values.iter().sum::<f32>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / n;
    let std = variance.sqrt();
    if std == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - mean) / std).collect()
}

/// Value at percentile `p` (0-100) with linear interpolation between ranks.
pub fn percentile(values: &[f32], p: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    #[allow(clippy::cast_precision_loss)]
    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let frac = rank - rank.floor();
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Two-threshold gate over a feature track.
///
/// Starts off; turns on once a sample reaches `rise`, turns off once a
/// sample drops below `fall`. A `fall` below `rise` prevents chatter at a
/// single cutoff.
pub fn hysteresis(values: &[f32], rise: f32, fall: f32) -> Vec<bool> {
    let mut state = false;
    values
        .iter()
        .map(|&v| {
            if state {
                if v < fall {
                    state = false;
                }
            } else if v >= rise {
                state = true;
            }
            state
        })
        .collect()
}

/// Spectral flux per frame: the positive first differences of each frame's
/// power-normalized magnitude spectrum, summed over bins. Frame 0 is zero.
pub fn spectral_flux(frames: &[Vec<f32>]) -> Vec<f32> {
    if frames.len() < 2 {
        return vec![0.0; frames.len()];
    }
    let normalize = |frame: &[f32]| -> Vec<f32> {
        let total: f32 = frame.iter().sum();
        frame.iter().map(|m| m / (total + FLUX_EPSILON)).collect()
    };
    let mut flux = Vec::with_capacity(frames.len());
    flux.push(0.0);
    let mut prev = normalize(&frames[0]);
    for frame in &frames[1..] {
        let cur = normalize(frame);
        flux.push(
            cur.iter()
                .zip(&prev)
                .map(|(c, p)| (c - p).max(0.0))
                .sum::<f32>(),
        );
        prev = cur;
    }
    flux
}

/// Power-weighted mean frequency of one magnitude spectrum.
pub fn spectral_centroid(frequencies: &[f32], magnitudes: &[f32]) -> f32 {
    let total: f32 = magnitudes.iter().sum();
    if total == 0.0 {
        return 0.0;
    }
    let weighted: f32 = frequencies
        .iter()
        .zip(magnitudes)
        .map(|(f, m)| f * m)
        .sum();
    weighted / total
}

/// Frequency below which `rolloff_percent` of the cumulative magnitude lies.
pub fn spectral_rolloff(frequencies: &[f32], magnitudes: &[f32], rolloff_percent: f32) -> f32 {
    let total: f32 = magnitudes.iter().sum();
    if total == 0.0 || frequencies.is_empty() {
        return 0.0;
    }
    let threshold = total * rolloff_percent;
    let mut cumsum = 0.0;
    for (i, m) in magnitudes.iter().enumerate() {
        cumsum += m;
        if cumsum >= threshold {
            return frequencies[i.min(frequencies.len() - 1)];
        }
    }
    frequencies[frequencies.len() - 1]
}

/// Geometric-to-arithmetic mean ratio of one magnitude spectrum.
///
/// Near 0 for tonal content, near 1 for noise. A floor epsilon keeps
/// `log(0)` out of the geometric mean.
pub fn spectral_flatness(magnitudes: &[f32]) -> f32 {
    if magnitudes.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = magnitudes.len() as f32;
    let log_sum: f32 = magnitudes.iter().map(|m| (m + FLATNESS_EPSILON).ln()).sum();
    let geometric = (log_sum / n).exp();
    let arithmetic = magnitudes.iter().map(|m| m + FLATNESS_EPSILON).sum::<f32>() / n;
    if arithmetic == 0.0 {
        0.0
    } else {
        geometric / arithmetic
    }
}
