//! Run summary JSON.

use crate::config::DetectionMode;
use crate::error::{Error, Result};
use crate::segment::Segment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Machine-readable record of one processed recording.
///
/// Written to `data/summary.json` inside the run's output directory. Its
/// presence marks a recording as already processed.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunSummary {
    /// Version of the tool that produced this run.
    pub version: String,
    /// Source audio file.
    pub input: PathBuf,
    /// Native sample rate of the source.
    pub sample_rate: u32,
    /// Source duration in seconds.
    pub duration_secs: f64,
    /// Detection mode used.
    pub mode: DetectionMode,
    /// Number of raw detections per detector, before merging.
    pub detector_counts: BTreeMap<String, usize>,
    /// Number of exported samples.
    pub total_samples: usize,
    /// Combined duration of exported samples in seconds.
    pub total_sample_secs: f64,
    /// The exported samples themselves.
    pub samples: Vec<Segment>,
}

impl RunSummary {
    /// Build a summary from the final sample list.
    #[must_use]
    pub fn new(
        input: &Path,
        sample_rate: u32,
        duration_secs: f64,
        mode: DetectionMode,
        detector_counts: BTreeMap<String, usize>,
        samples: Vec<Segment>,
    ) -> Self {
        let total_sample_secs = samples.iter().map(Segment::duration).sum();
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            input: input.to_path_buf(),
            sample_rate,
            duration_secs,
            mode,
            detector_counts,
            total_samples: samples.len(),
            total_sample_secs,
            samples,
        }
    }
}

/// Write the summary as pretty-printed JSON.
pub fn write_summary(summary: &RunSummary, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), summary).map_err(|e| {
        Error::JsonWrite {
            path: path.to_path_buf(),
            source: e,
        }
    })
}
