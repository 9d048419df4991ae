use rustfft::{num_complex::Complex, FftPlanner};
use std::sync::Arc;

/// Short-time magnitude spectrum support shared by tempo estimation and
/// band energy extraction.
pub struct Stft {
    fft: Arc<dyn rustfft::Fft<f32>>,
    window: Vec<f32>,
    fft_size: usize,
    hop_length: usize,
}

impl Stft {
    pub fn new(fft_size: usize, hop_length: usize) -> Self {
        // the window denominator is fft_size - 1
        assert!(fft_size > 1 && hop_length > 0);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let window = Self::hann_window(fft_size);

        Self {
            fft,
            window,
            fft_size,
            hop_length,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    /// Number of full analysis frames available in a signal of `len` samples.
    pub fn frame_count(&self, len: usize) -> usize {
        if len < self.fft_size {
            0
        } else {
            1 + (len - self.fft_size) / self.hop_length
        }
    }

    /// Center frequency of each positive-frequency bin, DC through Nyquist.
    pub fn bin_frequencies(&self, sample_rate: u32) -> Vec<f32> {
        let bin_width = sample_rate as f32 / self.fft_size as f32;
        (0..=self.fft_size / 2).map(|k| k as f32 * bin_width).collect()
    }

    /// Hann-windowed magnitude spectrum per frame (fft_size/2 + 1 bins each).
    pub fn magnitude_frames(&self, samples: &[f32]) -> Vec<Vec<f32>> {
        let mut frames = Vec::with_capacity(self.frame_count(samples.len()));
        let mut start = 0;

        while start + self.fft_size <= samples.len() {
            let mut buffer: Vec<Complex<f32>> = samples[start..start + self.fft_size]
                .iter()
                .zip(&self.window)
                .map(|(&s, &w)| Complex::new(s * w, 0.0))
                .collect();

            self.fft.process(&mut buffer);

            frames.push(
                buffer[..self.fft_size / 2 + 1]
                    .iter()
                    .map(|c| c.norm())
                    .collect(),
            );
            start += self.hop_length;
        }

        frames
    }

    fn hann_window(size: usize) -> Vec<f32> {
        (0..size)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32;
                0.5 * (1.0 - phase.cos())
            })
            .collect()
    }
}
