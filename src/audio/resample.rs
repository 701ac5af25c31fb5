//! Resampling to the analysis rate using rubato.

use crate::error::{Error, Result};
use audioadapter_buffers::direct::SequentialSlice;
use rubato::{Fft, FixedSync, Resampler};

const CHUNK_SIZE: usize = 1024;

/// Resample mono audio to the target rate.
///
/// Returns the input unchanged when no conversion is needed.
pub fn resample(samples: Vec<f32>, from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate {
        return Ok(samples);
    }

    let mut resampler = Fft::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        CHUNK_SIZE,
        1,
        1,
        FixedSync::Both,
    )
    .map_err(|e| Error::Resample {
        reason: e.to_string(),
    })?;

    let frames_in = resampler.input_frames_next();
    let ratio = f64::from(to_rate) / f64::from(from_rate);
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let mut output = Vec::with_capacity((samples.len() as f64 * ratio).ceil() as usize + CHUNK_SIZE);

    let mut run = |chunk: &[f32]| -> Result<Vec<f32>> {
        let adapter =
            SequentialSlice::new(chunk, 1, frames_in).map_err(|e| Error::Resample {
                reason: format!("failed to create input adapter: {e}"),
            })?;
        let resampled = resampler
            .process(&adapter, 0, None)
            .map_err(|e| Error::Resample {
                reason: e.to_string(),
            })?;
        Ok(resampled.take_data())
    };

    let mut chunks = samples.chunks_exact(frames_in);
    for chunk in chunks.by_ref() {
        output.extend_from_slice(&run(chunk)?);
    }

    // Pad the tail chunk, then keep only the frames that correspond to
    // real input.
    let tail = chunks.remainder();
    if !tail.is_empty() {
        let mut padded = tail.to_vec();
        padded.resize(frames_in, 0.0);
        let resampled = run(&padded)?;
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let wanted = (tail.len() as f64 * ratio).ceil() as usize;
        output.extend_from_slice(&resampled[..wanted.min(resampled.len())]);
    }

    Ok(output)
}
