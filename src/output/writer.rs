//! Marker writer trait definition.

use crate::error::Result;
use crate::segment::Segment;

/// Trait for writing selected samples as markers.
pub trait MarkerWriter {
    /// Write the file header (if applicable).
    fn write_header(&mut self) -> Result<()>;

    /// Write a single sample with its 0-based index.
    fn write_sample(&mut self, index: usize, segment: &Segment) -> Result<()>;

    /// Finalize the output (flush, close, etc.).
    fn finalize(&mut self) -> Result<()>;
}

/// Marker name shared by the label-style formats.
pub(super) fn marker_name(index: usize, segment: &Segment) -> String {
    format!("sample_{index:03} {}", segment.detector)
}
