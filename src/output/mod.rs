//! Marker and report writers.

mod audacity;
mod csv;
mod progress;
mod reaper;
mod summary;
mod writer;

pub use audacity::AudacityWriter;
pub use csv::TimestampCsvWriter;
pub use progress::{create_file_progress, finish_progress, inc_progress};
pub use reaper::ReaperWriter;
pub use summary::{RunSummary, write_summary};
pub use writer::MarkerWriter;
