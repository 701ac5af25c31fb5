//! Integration tests for the command-line interface.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::f32::consts::PI;
use std::path::Path;

/// Write a 5s mono WAV: 2s silence, 1s 880Hz tone, 2s silence.
fn write_test_wav(path: &Path) {
    let sample_rate = 16_000;
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..sample_rate * 5 {
        let t = i as f32 / sample_rate as f32;
        let amp = if (2.0..3.0).contains(&t) {
            (2.0 * PI * 880.0 * t).sin() * 0.8
        } else {
            0.0
        };
        writer
            .write_sample((amp * f32::from(i16::MAX)) as i16)
            .unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn test_help_lists_analysis_options() {
    let mut cmd = cargo_bin_cmd!("samplepacker");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("curates short audio samples"))
        .stdout(predicate::str::contains("--max-samples"))
        .stdout(predicate::str::contains("--spread"));
}

#[test]
fn test_no_inputs_fails() {
    let mut cmd = cargo_bin_cmd!("samplepacker");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no valid audio files"));
}

#[test]
fn test_nonexistent_input_fails() {
    let mut cmd = cargo_bin_cmd!("samplepacker");
    cmd.arg("/nonexistent/recording.wav");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no valid audio files"));
}

#[test]
fn test_rejects_out_of_range_vad_aggressiveness() {
    let mut cmd = cargo_bin_cmd!("samplepacker");
    cmd.arg("--vad-aggressiveness").arg("5").arg("test.wav");

    cmd.assert().failure();
}

#[test]
fn test_rejects_negative_padding() {
    let mut cmd = cargo_bin_cmd!("samplepacker");
    cmd.arg("--pre-pad-ms").arg("-100").arg("test.wav");

    cmd.assert().failure();
}

#[test]
fn test_config_path_prints_toml_location() {
    let config_home = tempfile::tempdir().unwrap();

    let mut cmd = cargo_bin_cmd!("samplepacker");
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .arg("config")
        .arg("path");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("samplepacker"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file() {
    let config_home = tempfile::tempdir().unwrap();

    let mut cmd = cargo_bin_cmd!("samplepacker");
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .arg("config")
        .arg("init");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    let config_path = config_home.path().join("samplepacker").join("config.toml");
    assert!(config_path.exists());
}

#[test]
fn test_analyze_produces_output_tree() {
    let config_home = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let input = work.path().join("field.wav");
    write_test_wav(&input);
    let out_dir = work.path().join("out");

    let mut cmd = cargo_bin_cmd!("samplepacker");
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .arg("-q")
        .arg("-m")
        .arg("energy")
        .arg("-o")
        .arg(&out_dir)
        .arg(&input);

    cmd.assert().success();

    let run_dir = out_dir.join("field_energy");
    assert!(run_dir.join("markers").join("timestamps.csv").exists());
    assert!(run_dir.join("markers").join("audacity_labels.txt").exists());
    assert!(run_dir.join("markers").join("reaper_regions.csv").exists());
    assert!(run_dir.join("data").join("summary.json").exists());

    let sample_count = std::fs::read_dir(run_dir.join("samples"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "wav"))
        .count();
    assert!(sample_count >= 1);

    // A second run without --force skips the completed output.
    let mut rerun = cargo_bin_cmd!("samplepacker");
    rerun
        .env("XDG_CONFIG_HOME", config_home.path())
        .arg("-m")
        .arg("energy")
        .arg("-o")
        .arg(&out_dir)
        .arg(&input);

    rerun
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipping"));
}

#[test]
fn test_no_samples_writes_markers_only() {
    let config_home = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let input = work.path().join("field.wav");
    write_test_wav(&input);
    let out_dir = work.path().join("out");

    let mut cmd = cargo_bin_cmd!("samplepacker");
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .arg("-q")
        .arg("-m")
        .arg("energy")
        .arg("--no-samples")
        .arg("-o")
        .arg(&out_dir)
        .arg(&input);

    cmd.assert().success();

    let run_dir = out_dir.join("field_energy");
    assert!(run_dir.join("markers").join("timestamps.csv").exists());
    assert!(run_dir.join("data").join("summary.json").exists());
    assert!(!run_dir.join("samples").exists());
}
