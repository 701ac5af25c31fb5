//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "samplepacker";

/// Sample rate of the mono analysis copy fed to the detectors.
pub const DEFAULT_ANALYSIS_SAMPLE_RATE: u32 = 16_000;

/// Number of feature frames looked back from a falling edge when scoring
/// a detected segment.
pub const SCORE_LOOKBACK_FRAMES: usize = 4;

/// Epsilon added inside the RMS square root to keep downstream log/ratio
/// math away from -inf.
pub const RMS_EPSILON: f32 = 1e-12;

/// Epsilon used when power-normalizing spectra for flux.
pub const FLUX_EPSILON: f32 = 1e-9;

/// Floor epsilon for spectral flatness to avoid log(0).
pub const FLATNESS_EPSILON: f32 = 1e-10;

/// Energy (non-silence) detector defaults.
pub mod energy {
    /// Adaptive threshold percentile over the z-scored envelope.
    pub const THRESHOLD_PERCENTILE: f32 = 75.0;
    /// Multiplier applied to the threshold for the hysteresis rise edge.
    pub const RISE_FACTOR: f32 = 1.0;
    /// Multiplier applied to the threshold for the hysteresis fall edge.
    pub const FALL_FACTOR: f32 = 0.8;
    /// Minimum segment duration in milliseconds.
    pub const MIN_DURATION_MS: f64 = 400.0;
    /// RMS analysis window in milliseconds.
    pub const WINDOW_MS: f64 = 100.0;
    /// RMS hop in milliseconds.
    pub const HOP_MS: f64 = 50.0;
}

/// Transient (spectral flux) detector defaults.
pub mod transient {
    /// Adaptive threshold percentile over the z-scored flux track.
    pub const THRESHOLD_PERCENTILE: f32 = 85.0;
    /// Multiplier applied to the threshold for the hysteresis fall edge.
    pub const FALL_FACTOR: f32 = 0.7;
    /// Minimum segment duration in milliseconds. Impacts are short.
    pub const MIN_DURATION_MS: f64 = 50.0;
    /// Maximum segment duration in milliseconds.
    pub const MAX_DURATION_MS: f64 = 60_000.0;
    /// FFT size for the short-time spectrum.
    pub const FFT_SIZE: usize = 2048;
    /// Hop size between analysis frames in samples.
    pub const HOP_SIZE: usize = 512;
}

/// Spectral interestingness detector defaults.
pub mod spectral {
    /// Gate percentile: frames at or above this percentile are kept.
    pub const THRESHOLD_PERCENTILE: f32 = 85.0;
    /// Minimum segment duration in milliseconds.
    pub const MIN_DURATION_MS: f64 = 400.0;
    /// FFT size for the short-time spectrum.
    pub const FFT_SIZE: usize = 2048;
    /// Hop size between analysis frames in samples.
    pub const HOP_SIZE: usize = 512;
    /// Weight of the z-scored spectral flux track.
    pub const FLUX_WEIGHT: f32 = 0.25;
    /// Weight of the z-scored spectral centroid track.
    pub const CENTROID_WEIGHT: f32 = 0.2;
    /// Weight of the z-scored spectral rolloff track.
    pub const ROLLOFF_WEIGHT: f32 = 0.2;
    /// Weight of the negated z-scored flatness track.
    pub const FLATNESS_WEIGHT: f32 = 0.15;
    /// Weight of the z-scored frame RMS track.
    pub const RMS_WEIGHT: f32 = 0.2;
    /// Cumulative magnitude fraction for the rolloff frequency.
    pub const ROLLOFF_PERCENT: f32 = 0.85;
}

/// Voice activity detector defaults.
pub mod voice {
    /// WebRTC VAD frame duration in milliseconds (10, 20, or 30).
    pub const FRAME_MS: u32 = 30;
    /// Default VAD aggressiveness (0-3, higher is stricter).
    pub const AGGRESSIVENESS: u8 = 3;
    /// Minimum segment duration in milliseconds.
    pub const MIN_DURATION_MS: f64 = 400.0;
}

/// Merge pass defaults.
pub mod merge {
    /// Gap tolerance between raw detections in milliseconds.
    pub const DEFAULT_GAP_MS: f64 = 0.0;
    /// Minimum merged segment duration in milliseconds.
    pub const MIN_DURATION_MS: f64 = 100.0;
    /// Maximum merged segment duration in milliseconds.
    pub const MAX_DURATION_MS: f64 = 60_000.0;
}

/// Padding and deduplication defaults.
pub mod padding {
    /// Detection pre-padding in milliseconds.
    pub const PRE_MS: f64 = 0.0;
    /// Detection post-padding in milliseconds.
    pub const POST_MS: f64 = 0.0;
    /// Minimum gap between padded samples in milliseconds.
    pub const MIN_GAP_MS: f64 = 100.0;
    /// Raw-interval IoU at or above which a candidate is a duplicate.
    pub const RAW_IOU_THRESHOLD: f64 = 0.5;
}

/// Overlap resolution defaults.
pub mod overlap {
    /// IoU threshold at or above which the lower-scoring segment is pruned.
    pub const DEFAULT_IOU: f64 = 0.2;
}

/// Sample selection defaults.
pub mod selection {
    /// Maximum number of exported samples.
    pub const MAX_SAMPLES: usize = 256;
}

/// Output file and directory names inside a run's output folder.
pub mod output_files {
    /// Timestamp CSV filename.
    pub const TIMESTAMPS_CSV: &str = "timestamps.csv";
    /// Audacity labels filename.
    pub const AUDACITY_LABELS: &str = "audacity_labels.txt";
    /// Reaper regions CSV filename.
    pub const REAPER_REGIONS: &str = "reaper_regions.csv";
    /// Run summary JSON filename.
    pub const SUMMARY_JSON: &str = "summary.json";
    /// Subdirectory for exported sample WAVs.
    pub const SAMPLES_DIR: &str = "samples";
    /// Subdirectory for marker exports.
    pub const MARKERS_DIR: &str = "markers";
    /// Subdirectory for machine-readable run data.
    pub const DATA_DIR: &str = "data";
}

/// Sample export defaults.
pub mod export {
    /// Export pre-padding in milliseconds.
    pub const PRE_MS: f64 = 0.0;
    /// Export post-padding in milliseconds.
    pub const POST_MS: f64 = 0.0;
    /// Digits used to zero-pad sample indices in filenames.
    pub const INDEX_DIGITS: usize = 4;
    /// Maximum length of a generated sample filename.
    pub const MAX_FILENAME_LEN: usize = 200;
}

/// Audio file extensions considered as input.
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "flac", "mp3", "m4a", "aac"];
