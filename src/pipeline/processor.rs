//! Single file processing pipeline.

use crate::audio::{Recording, decode_audio_file, resample};
use crate::config::{Config, MarkerFormat, OverlapPolicy};
use crate::constants::{DEFAULT_ANALYSIS_SAMPLE_RATE, output_files};
use crate::detect::build_detectors;
use crate::error::{Error, Result};
use crate::export::{build_sample_filename, sanitize_filename, write_sample_wav};
use crate::output::{
    AudacityWriter, MarkerWriter, ReaperWriter, RunSummary, TimestampCsvWriter, write_summary,
};
use crate::segment::{
    Segment, merge_segments, pad_and_deduplicate, resolve_overlaps, spread_select,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Result of processing a single file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Raw detections across all detectors, before merging.
    pub detections: usize,
    /// Samples exported after all passes.
    pub samples: usize,
    /// Processing duration in seconds.
    pub duration_secs: f64,
    /// Audio duration in seconds.
    pub audio_duration_secs: f64,
}

/// Process a single recording: detect events, refine them into samples,
/// and write samples, markers and the run summary under `run_dir`.
pub fn process_file(input_path: &Path, run_dir: &Path, config: &Config) -> Result<ProcessResult> {
    let start_time = Instant::now();

    info!("Processing: {}", input_path.display());

    let recording = decode_audio_file(input_path)?;
    let audio_duration = recording.duration_secs();
    info!(
        "Decoded {:.1}s of audio at {} Hz",
        audio_duration, recording.sample_rate
    );

    let analysis = analysis_signal(&recording)?;

    let (raw_segments, detector_counts) = run_detectors(&analysis, config);
    let raw_count = raw_segments.len();
    debug!("Raw detections: {raw_count}");

    let samples = refine(raw_segments, audio_duration, config);
    info!("Selected {} samples", samples.len());

    write_outputs(input_path, run_dir, config, &recording, &samples, detector_counts)?;

    Ok(ProcessResult {
        detections: raw_count,
        samples: samples.len(),
        duration_secs: start_time.elapsed().as_secs_f64(),
        audio_duration_secs: audio_duration,
    })
}

/// Mono analysis copy at the fixed detector rate.
fn analysis_signal(recording: &Recording) -> Result<Vec<f32>> {
    if recording.sample_rate == DEFAULT_ANALYSIS_SAMPLE_RATE {
        return Ok(recording.samples.clone());
    }
    debug!(
        "Resampling {} Hz -> {} Hz for analysis",
        recording.sample_rate, DEFAULT_ANALYSIS_SAMPLE_RATE
    );
    resample(
        recording.samples.clone(),
        recording.sample_rate,
        DEFAULT_ANALYSIS_SAMPLE_RATE,
    )
}

/// Run every active detector over the analysis signal.
fn run_detectors(analysis: &[f32], config: &Config) -> (Vec<Segment>, BTreeMap<String, usize>) {
    let mut segments = Vec::new();
    let mut counts = BTreeMap::new();

    for detector in build_detectors(DEFAULT_ANALYSIS_SAMPLE_RATE, &config.detection) {
        let found = detector.detect(analysis);
        debug!("{}: {} raw detections", detector.label(), found.len());
        counts.insert(detector.label().to_string(), found.len());
        segments.extend(found);
    }

    (segments, counts)
}

/// Apply the refinement passes in order: merge, pad/dedup, optional
/// overlap resolution, spread selection.
fn refine(raw: Vec<Segment>, audio_duration: f64, config: &Config) -> Vec<Segment> {
    let detection = &config.detection;
    let merged = merge_segments(
        raw,
        detection.merge_gap_ms,
        detection.min_duration_ms,
        detection.max_duration_ms,
        audio_duration,
    );
    debug!("After merge: {}", merged.len());

    let padding = &config.padding;
    let padded = pad_and_deduplicate(
        merged,
        padding.pre_pad_ms,
        padding.post_pad_ms,
        audio_duration,
        padding.min_gap_ms,
        padding.chain_merge,
    );
    debug!("After padding/dedup: {}", padded.len());

    let resolved = match config.overlap.policy {
        OverlapPolicy::Off => padded,
        OverlapPolicy::KeepHighest => {
            let kept = resolve_overlaps(padded, config.overlap.iou_threshold, padding.min_gap_ms);
            debug!("After overlap resolution: {}", kept.len());
            kept
        }
    };

    spread_select(
        resolved,
        config.selection.max_samples,
        audio_duration,
        config.selection.spread,
    )
}

/// Write WAV slices, markers and the summary for the final samples.
fn write_outputs(
    input_path: &Path,
    run_dir: &Path,
    config: &Config,
    recording: &Recording,
    samples: &[Segment],
    detector_counts: BTreeMap<String, usize>,
) -> Result<()> {
    let markers_dir = run_dir.join(output_files::MARKERS_DIR);
    let data_dir = run_dir.join(output_files::DATA_DIR);
    for dir in [run_dir, &markers_dir, &data_dir] {
        std::fs::create_dir_all(dir).map_err(|e| Error::OutputDirCreate {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }

    if config.export.write_samples {
        let samples_dir = run_dir.join(output_files::SAMPLES_DIR);
        std::fs::create_dir_all(&samples_dir).map_err(|e| Error::OutputDirCreate {
            path: samples_dir.clone(),
            source: e,
        })?;

        let stem = input_path
            .file_stem()
            .map_or_else(|| std::borrow::Cow::Borrowed("output"), |s| s.to_string_lossy());
        let base_name = sanitize_filename(&stem, 100);

        for (i, segment) in samples.iter().enumerate() {
            let filename = build_sample_filename(&base_name, i, segment);
            let path = samples_dir.join(format!("{filename}.wav"));
            write_sample_wav(
                recording,
                segment,
                config.export.pre_ms,
                config.export.post_ms,
                &path,
            )?;
        }
        debug!("Wrote {} sample WAVs", samples.len());
    }

    for format in &config.output.formats {
        write_markers(&markers_dir, *format, samples)?;
    }

    let summary = RunSummary::new(
        input_path,
        recording.sample_rate,
        recording.duration_secs(),
        config.detection.mode,
        detector_counts,
        samples.to_vec(),
    );
    write_summary(&summary, &data_dir.join(output_files::SUMMARY_JSON))
}

/// Write one marker file for the final samples.
fn write_markers(markers_dir: &Path, format: MarkerFormat, samples: &[Segment]) -> Result<()> {
    let mut writer: Box<dyn MarkerWriter> = match format {
        MarkerFormat::Csv => Box::new(TimestampCsvWriter::new(
            &markers_dir.join(output_files::TIMESTAMPS_CSV),
        )?),
        MarkerFormat::Audacity => Box::new(AudacityWriter::new(
            &markers_dir.join(output_files::AUDACITY_LABELS),
        )?),
        MarkerFormat::Reaper => Box::new(ReaperWriter::new(
            &markers_dir.join(output_files::REAPER_REGIONS),
        )?),
    };

    writer.write_header()?;
    for (i, segment) in samples.iter().enumerate() {
        writer.write_sample(i, segment)?;
    }
    writer.finalize()
}
