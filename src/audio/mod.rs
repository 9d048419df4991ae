pub mod artifact;
pub mod bands;
pub mod loader;
pub mod stft;
pub mod tempo;

pub use artifact::FreqData;
pub use bands::{extract_band_energy, BandPreset, EnergySeries, FrequencyBand};
pub use loader::load_waveform;
pub use tempo::estimate_tempo;

/// A decoded mono recording. Immutable once loaded; discarded after analysis.
#[derive(Debug, Clone)]
pub struct Waveform {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}
