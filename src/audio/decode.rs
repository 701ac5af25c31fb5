//! Audio decoding using symphonia.

use crate::error::{Error, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// A fully decoded recording as mono f32 samples in [-1.0, 1.0] at the
/// file's native sample rate.
#[derive(Debug, Clone)]
pub struct Recording {
    /// Mono samples in [-1.0, 1.0].
    pub samples: Vec<f32>,
    /// Native sample rate in Hz.
    pub sample_rate: u32,
}

impl Recording {
    /// Total duration in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let n = self.samples.len() as f64;
        n / f64::from(self.sample_rate)
    }

    /// Slice a time range as sample indices, clamped to the recording.
    #[must_use]
    pub fn slice(&self, start_secs: f64, end_secs: f64) -> &[f32] {
        let rate = f64::from(self.sample_rate);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let start = ((start_secs.max(0.0) * rate) as usize).min(self.samples.len());
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let end = ((end_secs.max(0.0) * rate) as usize).min(self.samples.len());
        &self.samples[start..end.max(start)]
    }
}

/// Decode an audio file to mono f32 samples.
///
/// Multi-channel input is averaged down to mono. Supports WAV, FLAC, MP3,
/// and AAC containers.
pub fn decode_audio_file(path: &Path) -> Result<Recording> {
    let file = File::open(path).map_err(|e| Error::AudioOpen {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::AudioOpen {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::NoAudioTracks {
            path: path.to_path_buf(),
        })?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| Error::AudioDecode {
            path: path.to_path_buf(),
            source: "missing sample rate".into(),
        })?;
    let channels = track
        .codec_params
        .channels
        .map_or(1, symphonia::core::audio::Channels::count);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| Error::AudioDecode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(Error::AudioDecode {
                    path: path.to_path_buf(),
                    source: Box::new(e),
                });
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder.decode(&packet).map_err(|e| Error::AudioDecode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        downmix(&decoded, channels, &mut samples);
    }

    Ok(Recording {
        samples,
        sample_rate,
    })
}

/// Append a decoded buffer to `output` as mono, averaging channels.
fn downmix(buffer: &AudioBufferRef, channels: usize, output: &mut Vec<f32>) {
    match buffer {
        AudioBufferRef::F32(buf) => mix_channels(channels, buf.frames(), output, |ch, i| {
            buf.chan(ch)[i]
        }),
        AudioBufferRef::S16(buf) => mix_channels(channels, buf.frames(), output, |ch, i| {
            f32::from(buf.chan(ch)[i]) / 32768.0
        }),
        AudioBufferRef::S32(buf) => mix_channels(channels, buf.frames(), output, |ch, i| {
            #[allow(clippy::cast_precision_loss)]
            let s = buf.chan(ch)[i] as f32;
            s / 2_147_483_648.0
        }),
        _ => {
            // Other sample formats are not produced by the enabled codecs.
        }
    }
}

fn mix_channels<F>(channels: usize, frames: usize, output: &mut Vec<f32>, sample: F)
where
    F: Fn(usize, usize) -> f32,
{
    output.reserve(frames);
    #[allow(clippy::cast_precision_loss)]
    let norm = 1.0 / channels.max(1) as f32;
    for i in 0..frames {
        let sum: f32 = (0..channels).map(|ch| sample(ch, i)).sum();
        output.push(sum * norm);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn write_test_wav(path: &Path, sample_rate: u32, secs: f32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        let n = (sample_rate as f32 * secs) as usize;
        for i in 0..n {
            let t = i as f32 / sample_rate as f32;
            let s = (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5;
            writer.write_sample((s * 32767.0) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_decode_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_test_wav(&path, 16_000, 1.0);

        let rec = decode_audio_file(&path).unwrap();
        assert_eq!(rec.sample_rate, 16_000);
        assert!((rec.duration_secs() - 1.0).abs() < 0.01);
        assert!(rec.samples.iter().any(|&s| s.abs() > 0.3));
    }

    #[test]
    fn test_slice_clamps_to_bounds() {
        let rec = Recording {
            samples: vec![0.0; 1000],
            sample_rate: 100,
        };
        assert_eq!(rec.slice(2.0, 5.0).len(), 300);
        assert_eq!(rec.slice(-1.0, 1.0).len(), 100);
        assert_eq!(rec.slice(9.0, 20.0).len(), 100);
        assert!(rec.slice(20.0, 30.0).is_empty());
        assert!(rec.slice(5.0, 2.0).is_empty());
    }

    #[test]
    fn test_decode_missing_file_fails() {
        let err = decode_audio_file(Path::new("/nonexistent/never.wav"));
        assert!(err.is_err());
    }
}
