//! Reaper region import CSV writer.

use crate::error::{Error, Result};
use crate::output::MarkerWriter;
use crate::output::writer::marker_name;
use crate::segment::Segment;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Writes regions importable via Reaper's Region/Marker Manager.
pub struct ReaperWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl ReaperWriter {
    /// Create a new Reaper region writer.
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: csv::Writer::from_writer(file),
            path: path.to_path_buf(),
        })
    }

    fn wrap(&self, source: csv::Error) -> Error {
        Error::CsvWrite {
            path: self.path.clone(),
            source,
        }
    }
}

impl MarkerWriter for ReaperWriter {
    fn write_header(&mut self) -> Result<()> {
        self.writer
            .write_record(["Name", "Start", "End", "Length"])
            .map_err(|e| self.wrap(e))
    }

    fn write_sample(&mut self, index: usize, segment: &Segment) -> Result<()> {
        self.writer
            .write_record([
                marker_name(index, segment),
                format!("{:.6}", segment.start),
                format!("{:.6}", segment.end),
                format!("{:.6}", segment.duration()),
            ])
            .map_err(|e| self.wrap(e))
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
