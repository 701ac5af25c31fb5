//! Short-time magnitude spectra via rustfft.

use std::sync::Arc;

use rustfft::{Fft, FftPlanner, num_complex::Complex};

/// Hann-windowed short-time Fourier transform producing magnitude frames.
pub struct Stft {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    fft_size: usize,
    hop_size: usize,
}

impl Stft {
    /// Plan an STFT with the given FFT size and hop.
    pub fn new(fft_size: usize, hop_size: usize) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(fft_size);
        #[allow(clippy::cast_precision_loss)]
        let window = (0..fft_size)
            .map(|i| {
                0.5 * (1.0
                    - ((2.0 * std::f32::consts::PI * i as f32) / (fft_size as f32 - 1.0)).cos())
            })
            .collect();
        Self {
            fft,
            window,
            fft_size,
            hop_size,
        }
    }

    /// Number of frequency bins per frame (`fft_size / 2 + 1`).
    pub fn bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Center frequency of each bin in Hz.
    pub fn bin_frequencies(&self, sample_rate: u32) -> Vec<f32> {
        #[allow(clippy::cast_precision_loss)]
        let bin_width = sample_rate as f32 / self.fft_size as f32;
        #[allow(clippy::cast_precision_loss)]
        (0..self.bins()).map(|i| i as f32 * bin_width).collect()
    }

    /// Seconds spanned by one hop at the given sample rate.
    pub fn frame_secs(&self, sample_rate: u32) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let secs = self.hop_size as f64 / f64::from(sample_rate);
        secs
    }

    /// Magnitude spectrum per frame.
    ///
    /// Only full frames are analyzed; a signal shorter than one FFT window
    /// yields no frames.
    pub fn magnitudes(&self, signal: &[f32]) -> Vec<Vec<f32>> {
        if signal.len() < self.fft_size {
            return Vec::new();
        }
        let n_frames = 1 + (signal.len() - self.fft_size) / self.hop_size;
        let mut frames = Vec::with_capacity(n_frames);
        let mut buffer: Vec<Complex<f32>> = vec![Complex::default(); self.fft_size];
        for i in 0..n_frames {
            let start = i * self.hop_size;
            for (j, slot) in buffer.iter_mut().enumerate() {
                *slot = Complex::new(signal[start + j] * self.window[j], 0.0);
            }
            self.fft.process(&mut buffer);
            frames.push(buffer[..self.bins()].iter().map(|c| c.norm()).collect());
        }
        frames
    }
}
