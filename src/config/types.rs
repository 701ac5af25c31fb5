//! Configuration type definitions.

use crate::constants::{export, merge, overlap, padding, selection, voice};
use crate::segment::SpreadMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Detection settings.
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Padding and deduplication settings.
    #[serde(default)]
    pub padding: PaddingConfig,

    /// Overlap resolution settings.
    #[serde(default)]
    pub overlap: OverlapConfig,

    /// Sample selection settings.
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Sample export settings.
    #[serde(default)]
    pub export: ExportConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Which detectors to run.
    pub mode: DetectionMode,

    /// Override for the adaptive threshold percentile of the energy-style
    /// detectors. `None` keeps each detector's own default.
    pub threshold_percentile: Option<f32>,

    /// WebRTC VAD aggressiveness (0-3, higher is stricter).
    pub vad_aggressiveness: u8,

    /// Gap tolerance when merging raw detections, in milliseconds.
    pub merge_gap_ms: f64,

    /// Minimum merged segment duration in milliseconds.
    pub min_duration_ms: f64,

    /// Maximum merged segment duration in milliseconds.
    pub max_duration_ms: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            mode: DetectionMode::Auto,
            threshold_percentile: None,
            vad_aggressiveness: voice::AGGRESSIVENESS,
            merge_gap_ms: merge::DEFAULT_GAP_MS,
            min_duration_ms: merge::MIN_DURATION_MS,
            max_duration_ms: merge::MAX_DURATION_MS,
        }
    }
}

/// Padding and deduplication settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddingConfig {
    /// Padding added before each detection, in milliseconds.
    pub pre_pad_ms: f64,

    /// Padding added after each detection, in milliseconds.
    pub post_pad_ms: f64,

    /// Minimum gap between padded samples in milliseconds.
    pub min_gap_ms: f64,

    /// Merge overlapping padded samples into longer chains instead of
    /// deduplicating on the underlying detections.
    pub chain_merge: bool,
}

impl Default for PaddingConfig {
    fn default() -> Self {
        Self {
            pre_pad_ms: padding::PRE_MS,
            post_pad_ms: padding::POST_MS,
            min_gap_ms: padding::MIN_GAP_MS,
            chain_merge: false,
        }
    }
}

/// Overlap resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlapConfig {
    /// Whether and how to resolve remaining overlaps.
    pub policy: OverlapPolicy,

    /// IoU at or above which two samples are considered in conflict.
    pub iou_threshold: f64,
}

impl Default for OverlapConfig {
    fn default() -> Self {
        Self {
            policy: OverlapPolicy::Off,
            iou_threshold: overlap::DEFAULT_IOU,
        }
    }
}

/// Sample selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Maximum number of samples kept per recording.
    pub max_samples: usize,

    /// How to distribute kept samples across the recording.
    pub spread: SpreadMode,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_samples: selection::MAX_SAMPLES,
            spread: SpreadMode::Strict,
        }
    }
}

/// Sample export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Extra context written before each sample, in milliseconds.
    pub pre_ms: f64,

    /// Extra context written after each sample, in milliseconds.
    pub post_ms: f64,

    /// Whether to write WAV slices at all.
    pub write_samples: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pre_ms: export::PRE_MS,
            post_ms: export::POST_MS,
            write_samples: true,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Marker formats to write.
    pub formats: Vec<MarkerFormat>,

    /// Base directory for run outputs. Defaults to the input file's parent.
    pub output_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            formats: vec![
                MarkerFormat::Csv,
                MarkerFormat::Audacity,
                MarkerFormat::Reaper,
            ],
            output_dir: None,
        }
    }
}

/// Which detectors run during analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMode {
    /// Run every detector and merge their output.
    #[default]
    Auto,
    /// Non-silence detection only.
    Energy,
    /// Transient detection only.
    Transient,
    /// Spectral interestingness only.
    Spectral,
    /// Voice activity only.
    Voice,
}

impl std::fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Energy => write!(f, "energy"),
            Self::Transient => write!(f, "transient"),
            Self::Spectral => write!(f, "spectral"),
            Self::Voice => write!(f, "voice"),
        }
    }
}

/// How overlapping samples are handled after deduplication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    /// Keep overlapping samples as they are.
    #[default]
    Off,
    /// Greedily keep the highest-scoring sample of each conflicting group.
    KeepHighest,
}

/// Supported marker export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerFormat {
    /// Timestamp CSV.
    Csv,
    /// Audacity label track.
    Audacity,
    /// Reaper region import CSV.
    Reaper,
}

impl std::fmt::Display for MarkerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Audacity => write!(f, "audacity"),
            Self::Reaper => write!(f, "reaper"),
        }
    }
}

impl std::str::FromStr for MarkerFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "audacity" | "labels" => Ok(Self::Audacity),
            "reaper" | "regions" => Ok(Self::Reaper),
            other => Err(format!("unknown marker format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_format_from_str() {
        assert_eq!("csv".parse::<MarkerFormat>().ok(), Some(MarkerFormat::Csv));
        assert_eq!(
            "labels".parse::<MarkerFormat>().ok(),
            Some(MarkerFormat::Audacity)
        );
        assert_eq!(
            "regions".parse::<MarkerFormat>().ok(),
            Some(MarkerFormat::Reaper)
        );
        assert!("midi".parse::<MarkerFormat>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.detection.mode, DetectionMode::Auto);
        assert_eq!(config.overlap.policy, OverlapPolicy::Off);
        assert_eq!(config.selection.max_samples, 256);
        assert!(config.export.write_samples);
        assert_eq!(config.output.formats.len(), 3);
    }

    #[test]
    fn test_detection_mode_display() {
        assert_eq!(DetectionMode::Auto.to_string(), "auto");
        assert_eq!(DetectionMode::Transient.to_string(), "transient");
    }
}
