//! Pipeline coordination for file processing.

use crate::config::DetectionMode;
use crate::constants::{AUDIO_EXTENSIONS, output_files};
use crate::error::Result;
use crate::export::sanitize_filename;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Result of checking whether a file should be processed.
#[derive(Debug, PartialEq, Eq)]
pub enum ProcessCheck {
    /// File should be processed.
    Process,
    /// Skip, a completed run already exists.
    SkipExists,
}

/// Determine the base output directory for a file.
pub fn output_base_for(input: &Path, explicit_output_dir: Option<&Path>) -> PathBuf {
    explicit_output_dir.map_or_else(
        || {
            input
                .parent()
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        },
        Path::to_path_buf,
    )
}

/// Directory holding one run's samples, markers and data.
///
/// A recording `field.wav` analyzed in auto mode lands in
/// `{base}/field_auto/`.
pub fn run_dir_for(input: &Path, base_dir: &Path, mode: DetectionMode) -> PathBuf {
    // to_string_lossy keeps non-UTF-8 filenames usable, replacement
    // characters are then sanitized away
    let stem = input
        .file_stem()
        .map_or_else(|| std::borrow::Cow::Borrowed("output"), |s| s.to_string_lossy());
    let name = sanitize_filename(&format!("{stem}_{mode}"), 200);
    base_dir.join(name)
}

/// Check whether a run directory already holds a completed run.
///
/// A run counts as complete once its summary JSON exists.
pub fn should_process(run_dir: &Path, force: bool) -> ProcessCheck {
    if !force
        && run_dir
            .join(output_files::DATA_DIR)
            .join(output_files::SUMMARY_JSON)
            .exists()
    {
        return ProcessCheck::SkipExists;
    }
    ProcessCheck::Process
}

/// Collect input files from paths (files and directories).
pub fn collect_input_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_audio_file(path) {
                files.push(path.clone());
            }
        } else if path.is_dir() {
            collect_audio_files_recursive(path, &mut files)?;
        } else {
            warn!("Skipping non-existent path: {}", path.display());
        }
    }

    Ok(files)
}

/// Recursively collect audio files from a directory.
fn collect_audio_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            collect_audio_files_recursive(&path, files)?;
        } else if is_audio_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

/// Check if a file is a supported audio format.
fn is_audio_file(path: &Path) -> bool {
    use std::ffi::OsStr;

    path.extension().is_some_and(|ext| {
        AUDIO_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(OsStr::new(known)))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_output_base_for_with_explicit() {
        let input = Path::new("/data/field.wav");
        let output = output_base_for(input, Some(Path::new("/results")));
        assert_eq!(output, PathBuf::from("/results"));
    }

    #[test]
    fn test_output_base_for_without_explicit() {
        let input = Path::new("/data/field.wav");
        assert_eq!(output_base_for(input, None), PathBuf::from("/data"));
    }

    #[test]
    fn test_run_dir_for_includes_mode() {
        let dir = run_dir_for(
            Path::new("/data/field.wav"),
            Path::new("/data"),
            DetectionMode::Transient,
        );
        assert_eq!(dir, PathBuf::from("/data/field_transient"));
    }

    #[test]
    fn test_should_process_skips_completed_run() {
        let dir = tempfile::tempdir().unwrap();
        let run_dir = dir.path().join("field_auto");
        assert_eq!(should_process(&run_dir, false), ProcessCheck::Process);

        let data_dir = run_dir.join("data");
        std::fs::create_dir_all(&data_dir).unwrap();
        std::fs::write(data_dir.join("summary.json"), "{}").unwrap();
        assert_eq!(should_process(&run_dir, false), ProcessCheck::SkipExists);
        assert_eq!(should_process(&run_dir, true), ProcessCheck::Process);
    }

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file(Path::new("test.wav")));
        assert!(is_audio_file(Path::new("test.FLAC")));
        assert!(is_audio_file(Path::new("test.mp3")));
        assert!(!is_audio_file(Path::new("test.txt")));
    }

    #[test]
    fn test_collect_input_files_recurses() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("nested");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(dir.path().join("a.wav"), b"").unwrap();
        std::fs::write(sub.join("b.flac"), b"").unwrap();
        std::fs::write(sub.join("notes.txt"), b"").unwrap();

        let files = collect_input_files(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(files.len(), 2);
    }
}
