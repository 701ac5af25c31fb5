//! Processing pipeline components.

mod coordinator;
mod processor;

pub use coordinator::{
    ProcessCheck, collect_input_files, output_base_for, run_dir_for, should_process,
};
pub use processor::{ProcessResult, process_file};
