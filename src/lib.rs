//! Samplepacker - turn long field recordings into curated short samples.
//!
//! Four event detectors scan a mono analysis copy of the recording; their
//! raw detections are merged, padded, deduplicated and spread-selected into
//! a bounded set of samples, which are exported as WAV slices plus marker
//! files for common editors.

#![warn(missing_docs)]
#![allow(clippy::print_stdout)]

pub mod audio;
pub mod cli;
pub mod config;
pub mod constants;
pub mod detect;
pub mod dsp;
pub mod error;
pub mod export;
pub mod output;
pub mod pipeline;
pub mod segment;

use clap::Parser;
use cli::{AnalyzeArgs, Cli, Command, ConfigAction};
use config::{
    Config, config_file_path, load_default_config, save_default_config, validate_config,
};
use output::{create_file_progress, finish_progress, inc_progress};
use pipeline::{
    ProcessCheck, collect_input_files, output_base_for, process_file, run_dir_for, should_process,
};
use std::path::PathBuf;
use tracing::{error, info, warn};

pub use error::{Error, Result};

/// Main entry point for the samplepacker CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.analyze.verbose, cli.analyze.quiet);

    if let Some(command) = cli.command {
        return handle_command(command);
    }

    if cli.inputs.is_empty() {
        return Err(Error::NoValidAudioFiles);
    }

    let mut config = load_default_config()?;
    cli.analyze.apply_to(&mut config);
    validate_config(&config)?;

    analyze_files(&cli.inputs, &cli.analyze, &config)
}

/// Analyze input files with the given options.
fn analyze_files(inputs: &[PathBuf], args: &AnalyzeArgs, config: &Config) -> Result<()> {
    use std::time::Instant;

    let total_start = Instant::now();

    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        return Err(Error::NoValidAudioFiles);
    }

    info!("Found {} audio file(s) to process", files.len());

    let progress_enabled = !args.quiet;
    let file_progress = create_file_progress(files.len(), progress_enabled);

    let mut processed = 0;
    let mut skipped = 0;
    let mut errors = 0;
    let mut total_detections = 0;
    let mut total_samples = 0;

    for file in &files {
        let base_dir = output_base_for(file, config.output.output_dir.as_deref());
        let run_dir = run_dir_for(file, &base_dir, config.detection.mode);

        if should_process(&run_dir, args.force) == ProcessCheck::SkipExists {
            info!("Skipping (output exists): {}", file.display());
            skipped += 1;
            inc_progress(file_progress.as_ref());
            continue;
        }

        match process_file(file, &run_dir, config) {
            Ok(result) => {
                processed += 1;
                total_detections += result.detections;
                total_samples += result.samples;
            }
            Err(e) => {
                error!("Failed to process {}: {}", file.display(), e);
                errors += 1;
                if args.fail_fast {
                    finish_progress(file_progress, "Failed");
                    return Err(e);
                }
            }
        }
        inc_progress(file_progress.as_ref());
    }

    finish_progress(file_progress, "Complete");

    let total_duration = total_start.elapsed().as_secs_f64();
    info!(
        "Complete: {} processed, {} skipped, {} errors, {} detections, {} samples in {:.2}s",
        processed, skipped, errors, total_detections, total_samples, total_duration
    );

    if errors > 0 && !args.fail_fast {
        warn!("{} file(s) had errors", errors);
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).init();
}

fn handle_command(command: Command) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action),
    }
}

fn handle_config_command(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let saved_path = save_default_config(&Config::default())?;
                println!("Created configuration file: {}", saved_path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
