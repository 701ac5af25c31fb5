//! Audacity label track writer.

use crate::error::Result;
use crate::output::MarkerWriter;
use crate::output::writer::marker_name;
use crate::segment::Segment;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Audacity label track writer.
///
/// One tab-separated line per sample, importable via
/// File > Import > Labels.
pub struct AudacityWriter {
    writer: BufWriter<File>,
}

impl AudacityWriter {
    /// Create a new Audacity writer.
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl MarkerWriter for AudacityWriter {
    fn write_header(&mut self) -> Result<()> {
        // Audacity label files have no header
        Ok(())
    }

    fn write_sample(&mut self, index: usize, segment: &Segment) -> Result<()> {
        writeln!(
            self.writer,
            "{:.3}\t{:.3}\t{}",
            segment.start,
            segment.end,
            marker_name(index, segment),
        )?;
        Ok(())
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
    fn test_audacity_labels() {
        let file = NamedTempFile::new().unwrap();
        let mut writer = AudacityWriter::new(file.path()).unwrap();

        writer.write_header().unwrap();
        writer
            .write_sample(0, &Segment::new(0.5, 2.0, "transient", 3.1))
            .unwrap();
        writer
            .write_sample(1, &Segment::new(4.25, 6.0, "energy", 1.2))
            .unwrap();
        writer.finalize().unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(
            contents,
            "0.500\t2.000\tsample_000 transient\n4.250\t6.000\tsample_001 energy\n"
        );
    }
}
