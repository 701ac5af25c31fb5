//! Voice activity detector backed by the WebRTC VAD.

use tracing::warn;
use webrtc_vad::{SampleRate, Vad, VadMode};

use crate::constants::voice;
use crate::segment::Segment;

use super::mask_to_segments;

pub(super) const LABEL: &str = "voice";

/// Runs the WebRTC VAD over fixed 30ms frames. The VAD is a hard classifier,
/// so every voiced segment carries a constant score of 1.0 and competes on
/// recall rather than ranking.
pub struct VoiceActivityDetector {
    /// Sample rate of the analysis signal. Must be one the VAD supports.
    pub sample_rate: u32,
    /// VAD aggressiveness (0-3, higher is stricter).
    pub aggressiveness: u8,
    /// Minimum segment duration in milliseconds.
    pub min_duration_ms: f64,
}

impl VoiceActivityDetector {
    /// VAD with the default aggressiveness for the given sample rate.
    #[must_use]
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            aggressiveness: voice::AGGRESSIVENESS,
            min_duration_ms: voice::MIN_DURATION_MS,
        }
    }

    /// Classify 30ms frames and return contiguous voiced runs.
    pub fn detect(&self, audio: &[f32]) -> Vec<Segment> {
        let Some(rate) = vad_sample_rate(self.sample_rate) else {
            warn!(
                sample_rate = self.sample_rate,
                "voice detection skipped, unsupported VAD sample rate"
            );
            return Vec::new();
        };

        let frame_len = (self.sample_rate / 1000 * voice::FRAME_MS) as usize;
        if frame_len == 0 || audio.len() < frame_len {
            return Vec::new();
        }

        let mut vad = Vad::new_with_rate_and_mode(rate, vad_mode(self.aggressiveness));
        let pcm: Vec<i16> = audio
            .iter()
            .map(|&s| {
                #[allow(clippy::cast_possible_truncation)]
                let v = (s.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
                v
            })
            .collect();

        let mask: Vec<bool> = pcm
            .chunks_exact(frame_len)
            .map(|frame| vad.is_voice_segment(frame).unwrap_or(false))
            .collect();
        let scores = vec![1.0_f32; mask.len()];

        let frame_secs = f64::from(voice::FRAME_MS) / 1000.0;
        mask_to_segments(
            &mask,
            &scores,
            frame_secs,
            LABEL,
            self.min_duration_ms,
            None,
        )
    }
}

fn vad_sample_rate(rate: u32) -> Option<SampleRate> {
    match rate {
        8_000 => Some(SampleRate::Rate8kHz),
        16_000 => Some(SampleRate::Rate16kHz),
        32_000 => Some(SampleRate::Rate32kHz),
        48_000 => Some(SampleRate::Rate48kHz),
        _ => None,
    }
}

fn vad_mode(aggressiveness: u8) -> VadMode {
    match aggressiveness {
        0 => VadMode::Quality,
        1 => VadMode::LowBitrate,
        2 => VadMode::Aggressive,
        _ => VadMode::VeryAggressive,
    }
}
