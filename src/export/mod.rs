//! Sample export: naming and WAV cutting.

mod filename;

pub use filename::{build_sample_filename, sanitize_filename};

use crate::audio::Recording;
use crate::error::{Error, Result};
use crate::segment::Segment;
use std::path::Path;
use tracing::debug;

/// Write one padded sample slice as a 16-bit mono WAV at the recording's
/// native rate.
///
/// Padding is clamped to the recording, and a slice that collapses to
/// nothing after clamping is an error.
pub fn write_sample_wav(
    recording: &Recording,
    segment: &Segment,
    pre_pad_ms: f64,
    post_pad_ms: f64,
    path: &Path,
) -> Result<()> {
    let start = (segment.start - pre_pad_ms / 1000.0).max(0.0);
    let end = (segment.end + post_pad_ms / 1000.0).min(recording.duration_secs());

    let samples = recording.slice(start, end);
    if samples.is_empty() {
        return Err(Error::EmptySample { start, end });
    }

    debug!(
        start_sec = format!("{start:.3}"),
        end_sec = format!("{end:.3}"),
        path = %path.display(),
        "writing sample"
    );

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: recording.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let wrap = |source: hound::Error| Error::WavWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(wrap)?;
    for &sample in samples {
        #[allow(clippy::cast_possible_truncation)]
        let value = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        writer.write_sample(value).map_err(wrap)?;
    }
    writer.finalize().map_err(wrap)?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn recording(secs: f64) -> Recording {
        let sample_rate = 8_000;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = (secs * f64::from(sample_rate)) as usize;
        let samples = (0..n)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                0.5 * (2.0 * std::f32::consts::PI * 220.0 * t).sin()
            })
            .collect();
        Recording {
            samples,
            sample_rate,
        }
    }

    #[test]
    fn test_write_slice_with_padding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.wav");
        let rec = recording(5.0);
        let seg = Segment::new(2.0, 3.0, "energy", 1.0);

        write_sample_wav(&rec, &seg, 500.0, 500.0, &path).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 8_000);
        // 1s segment plus 0.5s padding each side.
        assert_eq!(reader.len(), 16_000);
    }

    #[test]
    fn test_padding_clamped_at_edges() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edge.wav");
        let rec = recording(2.0);
        let seg = Segment::new(0.0, 0.5, "energy", 1.0);

        write_sample_wav(&rec, &seg, 10_000.0, 0.0, &path).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.len(), 4_000);
    }

    #[test]
    fn test_empty_slice_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        let rec = recording(2.0);
        let seg = Segment::new(5.0, 6.0, "energy", 1.0);

        let err = write_sample_wav(&rec, &seg, 0.0, 0.0, &path);
        assert!(matches!(err, Err(Error::EmptySample { .. })));
    }
}
