//! CLI argument definitions.

use crate::config::{Config, DetectionMode, MarkerFormat, OverlapPolicy};
use crate::segment::SpreadMode;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Turn long field recordings into curated short audio samples.
#[derive(Debug, Parser)]
#[command(name = "samplepacker")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Input files or directories to analyze.
    pub inputs: Vec<PathBuf>,

    /// Common options for analysis.
    #[command(flatten)]
    pub analyze: AnalyzeArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for the analyze command.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnalyzeArgs {
    /// Which detectors to run.
    #[arg(short, long, value_enum, env = "SAMPLEPACKER_MODE")]
    pub mode: Option<DetectionMode>,

    /// Adaptive threshold percentile override (0-100).
    #[arg(long, value_parser = parse_percentile, env = "SAMPLEPACKER_PERCENTILE")]
    pub percentile: Option<f32>,

    /// WebRTC VAD aggressiveness (0-3).
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=3))]
    pub vad_aggressiveness: Option<u8>,

    /// Gap tolerance when merging detections, in milliseconds.
    #[arg(long, value_parser = parse_millis, env = "SAMPLEPACKER_MERGE_GAP_MS")]
    pub merge_gap_ms: Option<f64>,

    /// Minimum sample duration in milliseconds.
    #[arg(long, value_parser = parse_millis)]
    pub min_duration_ms: Option<f64>,

    /// Maximum sample duration in milliseconds.
    #[arg(long, value_parser = parse_millis)]
    pub max_duration_ms: Option<f64>,

    /// Padding before each detection, in milliseconds.
    #[arg(long, value_parser = parse_millis, env = "SAMPLEPACKER_PRE_PAD_MS")]
    pub pre_pad_ms: Option<f64>,

    /// Padding after each detection, in milliseconds.
    #[arg(long, value_parser = parse_millis, env = "SAMPLEPACKER_POST_PAD_MS")]
    pub post_pad_ms: Option<f64>,

    /// Minimum gap between padded samples, in milliseconds.
    #[arg(long, value_parser = parse_millis)]
    pub min_gap_ms: Option<f64>,

    /// Merge overlapping padded samples into chains instead of
    /// deduplicating them.
    #[arg(long)]
    pub chain_merge: bool,

    /// How to handle overlapping samples after deduplication.
    #[arg(long, value_enum)]
    pub overlap: Option<OverlapPolicy>,

    /// IoU at or above which overlapping samples conflict (0.0-1.0).
    #[arg(long, value_parser = parse_iou)]
    pub overlap_iou: Option<f64>,

    /// Maximum number of exported samples per recording.
    #[arg(short = 'n', long, env = "SAMPLEPACKER_MAX_SAMPLES")]
    pub max_samples: Option<usize>,

    /// How to distribute kept samples across the recording.
    #[arg(long, value_enum)]
    pub spread: Option<SpreadMode>,

    /// Marker formats (comma-separated: csv,audacity,reaper).
    #[arg(short, long, value_delimiter = ',', env = "SAMPLEPACKER_FORMAT")]
    pub format: Option<Vec<MarkerFormat>>,

    /// Output directory (default: next to the input file).
    #[arg(short, long, env = "SAMPLEPACKER_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write markers only, skip WAV sample slices.
    #[arg(long)]
    pub no_samples: bool,

    /// Extra context before each exported slice, in milliseconds.
    #[arg(long, value_parser = parse_millis)]
    pub export_pre_ms: Option<f64>,

    /// Extra context after each exported slice, in milliseconds.
    #[arg(long, value_parser = parse_millis)]
    pub export_post_ms: Option<f64>,

    /// Reprocess files even if output exists.
    #[arg(long)]
    pub force: bool,

    /// Stop on first error.
    #[arg(long)]
    pub fail_fast: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl AnalyzeArgs {
    /// Fold command-line overrides into a loaded configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(mode) = self.mode {
            config.detection.mode = mode;
        }
        if self.percentile.is_some() {
            config.detection.threshold_percentile = self.percentile;
        }
        if let Some(v) = self.vad_aggressiveness {
            config.detection.vad_aggressiveness = v;
        }
        if let Some(v) = self.merge_gap_ms {
            config.detection.merge_gap_ms = v;
        }
        if let Some(v) = self.min_duration_ms {
            config.detection.min_duration_ms = v;
        }
        if let Some(v) = self.max_duration_ms {
            config.detection.max_duration_ms = v;
        }
        if let Some(v) = self.pre_pad_ms {
            config.padding.pre_pad_ms = v;
        }
        if let Some(v) = self.post_pad_ms {
            config.padding.post_pad_ms = v;
        }
        if let Some(v) = self.min_gap_ms {
            config.padding.min_gap_ms = v;
        }
        if self.chain_merge {
            config.padding.chain_merge = true;
        }
        if let Some(policy) = self.overlap {
            config.overlap.policy = policy;
        }
        if let Some(iou) = self.overlap_iou {
            config.overlap.iou_threshold = iou;
        }
        if let Some(n) = self.max_samples {
            config.selection.max_samples = n;
        }
        if let Some(spread) = self.spread {
            config.selection.spread = spread;
        }
        if let Some(formats) = &self.format {
            config.output.formats = formats.clone();
        }
        if self.output_dir.is_some() {
            config.output.output_dir = self.output_dir.clone();
        }
        if self.no_samples {
            config.export.write_samples = false;
        }
        if let Some(v) = self.export_pre_ms {
            config.export.pre_ms = v;
        }
        if let Some(v) = self.export_post_ms {
            config.export.post_ms = v;
        }
    }
}

/// Parse and validate a percentile value.
fn parse_percentile(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(0.0..=100.0).contains(&value) {
        return Err(format!("percentile must be between 0 and 100, got {value}"));
    }

    Ok(value)
}

/// Parse and validate a millisecond duration.
fn parse_millis(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !value.is_finite() || value < 0.0 {
        return Err(format!(
            "duration must be a non-negative number of milliseconds, got {value}"
        ));
    }

    Ok(value)
}

/// Parse and validate an IoU threshold.
fn parse_iou(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(0.0..=1.0).contains(&value) {
        return Err(format!("IoU must be between 0.0 and 1.0, got {value}"));
    }

    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percentile_valid() {
        assert_eq!(parse_percentile("85").ok(), Some(85.0));
        assert_eq!(parse_percentile("0").ok(), Some(0.0));
        assert_eq!(parse_percentile("100").ok(), Some(100.0));
    }

    #[test]
    fn test_parse_percentile_invalid() {
        assert!(parse_percentile("101").is_err());
        assert!(parse_percentile("-1").is_err());
        assert!(parse_percentile("abc").is_err());
    }

    #[test]
    fn test_parse_millis_rejects_negative() {
        assert!(parse_millis("-5").is_err());
        assert_eq!(parse_millis("250").ok(), Some(250.0));
    }

    #[test]
    fn test_cli_parse_simple() {
        let cli = Cli::try_parse_from(["samplepacker", "field.wav"]).unwrap();
        assert_eq!(cli.inputs.len(), 1);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_with_options() {
        let cli = Cli::try_parse_from([
            "samplepacker",
            "field.wav",
            "-m",
            "transient",
            "--pre-pad-ms",
            "500",
            "-n",
            "32",
            "-q",
        ])
        .unwrap();
        assert_eq!(cli.analyze.mode, Some(DetectionMode::Transient));
        assert_eq!(cli.analyze.pre_pad_ms, Some(500.0));
        assert_eq!(cli.analyze.max_samples, Some(32));
        assert!(cli.analyze.quiet);
    }

    #[test]
    fn test_cli_parse_config_subcommand() {
        let cli = Cli::try_parse_from(["samplepacker", "config", "show"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_parse_formats() {
        let cli =
            Cli::try_parse_from(["samplepacker", "field.wav", "-f", "csv,reaper"]).unwrap();
        assert_eq!(
            cli.analyze.format,
            Some(vec![MarkerFormat::Csv, MarkerFormat::Reaper])
        );
    }

    #[test]
    fn test_apply_to_overrides_config() {
        let cli = Cli::try_parse_from([
            "samplepacker",
            "field.wav",
            "--overlap",
            "keep-highest",
            "--overlap-iou",
            "0.4",
            "--chain-merge",
            "--no-samples",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.analyze.apply_to(&mut config);
        assert_eq!(config.overlap.policy, OverlapPolicy::KeepHighest);
        assert_eq!(config.overlap.iou_threshold, 0.4);
        assert!(config.padding.chain_merge);
        assert!(!config.export.write_samples);
    }

    #[test]
    fn test_cli_rejects_bad_vad_aggressiveness() {
        let cli = Cli::try_parse_from(["samplepacker", "a.wav", "--vad-aggressiveness", "7"]);
        assert!(cli.is_err());
    }
}
