//! Timestamp CSV writer.

use crate::error::{Error, Result};
use crate::output::MarkerWriter;
use crate::segment::Segment;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Writes one row per exported sample with second-precision timestamps.
pub struct TimestampCsvWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl TimestampCsvWriter {
    /// Create a new timestamp CSV writer.
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

impl MarkerWriter for TimestampCsvWriter {
    fn write_header(&mut self) -> Result<()> {
        self.writer
            .write_record([
                "id",
                "start_sec",
                "end_sec",
                "duration_sec",
                "detector",
                "score",
            ])
            .map_err(|e| self.wrap(e))
    }

    fn write_sample(&mut self, index: usize, segment: &Segment) -> Result<()> {
        self.writer
            .write_record([
                index.to_string(),
                format!("{:.3}", segment.start),
                format!("{:.3}", segment.end),
                format!("{:.3}", segment.duration()),
                segment.detector.clone(),
                format!("{:.3}", segment.score),
            ])
            .map_err(|e| self.wrap(e))
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_timestamp_csv_rows() {
        let file = NamedTempFile::new().unwrap();
        let mut writer = TimestampCsvWriter::new(file.path()).unwrap();

        writer.write_header().unwrap();
        writer
            .write_sample(0, &Segment::new(1.25, 3.5, "energy", 2.125))
            .unwrap();
        writer
            .write_sample(1, &Segment::new(10.0, 10.4, "voice", 1.0))
            .unwrap();
        writer.finalize().unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,start_sec,end_sec,duration_sec,detector,score"
        );
        assert_eq!(lines.next().unwrap(), "0,1.250,3.500,2.250,energy,2.125");
        assert_eq!(lines.next().unwrap(), "1,10.000,10.400,0.400,voice,1.000");
    }
}
