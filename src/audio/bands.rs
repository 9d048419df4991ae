use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::stft::Stft;
use super::Waveform;

const FFT_SIZE: usize = 2048;

/// Hop length governing the time resolution of band energy analysis.
pub const DEFAULT_HOP_LENGTH: usize = 512;

/// A named contiguous frequency range. Bounds are inclusive when matching
/// FFT bin center frequencies and must satisfy `min_hz < max_hz`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyBand {
    pub name: &'static str,
    pub min_hz: f32,
    pub max_hz: f32,
}

impl FrequencyBand {
    pub fn contains(&self, hz: f32) -> bool {
        hz >= self.min_hz && hz <= self.max_hz
    }
}

/// Percussion-focused registry: the authoritative default band set.
pub const PERCUSSIVE_BANDS: &[FrequencyBand] = &[
    FrequencyBand { name: "kick", min_hz: 40.0, max_hz: 100.0 },
    FrequencyBand { name: "bass", min_hz: 100.0, max_hz: 200.0 },
    FrequencyBand { name: "snare", min_hz: 400.0, max_hz: 1000.0 },
    FrequencyBand { name: "hihat", min_hz: 6000.0, max_hz: 10000.0 },
];

/// Full-spectrum registry covering sub-bass through presence.
pub const BROADBAND_BANDS: &[FrequencyBand] = &[
    FrequencyBand { name: "sub_bass", min_hz: 0.0, max_hz: 60.0 },
    FrequencyBand { name: "bass", min_hz: 60.0, max_hz: 250.0 },
    FrequencyBand { name: "mid", min_hz: 250.0, max_hz: 2000.0 },
    FrequencyBand { name: "treble", min_hz: 2000.0, max_hz: 8000.0 },
    FrequencyBand { name: "presence", min_hz: 8000.0, max_hz: 16000.0 },
];

/// The two fixed band registries. They are alternative configurations and
/// are never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BandPreset {
    #[default]
    Percussive,
    Broadband,
}

impl BandPreset {
    pub fn bands(self) -> &'static [FrequencyBand] {
        match self {
            BandPreset::Percussive => PERCUSSIVE_BANDS,
            BandPreset::Broadband => BROADBAND_BANDS,
        }
    }
}

/// Per-band energy time series plus the timing parameters needed to map
/// frame indices back to seconds. Every series has the same length; frame
/// `i` of every band sits at `i * hop_length / sample_rate` seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergySeries {
    pub energy: BTreeMap<String, Vec<f32>>,
    pub duration: f32,
    pub sample_rate: u32,
    pub hop_length: usize,
}

impl EnergySeries {
    /// Analysis frames per second.
    pub fn fps(&self) -> f32 {
        self.sample_rate as f32 / self.hop_length as f32
    }

    pub fn band(&self, name: &str) -> Option<&[f32]> {
        self.energy.get(name).map(Vec::as_slice)
    }

    pub fn frame_count(&self) -> usize {
        self.energy.values().next().map_or(0, Vec::len)
    }
}

/// Average short-time spectral magnitude per band over the whole waveform.
///
/// Bands whose range holds no FFT bins produce an all-zero series rather
/// than an error.
pub fn extract_band_energy(
    waveform: &Waveform,
    bands: &[FrequencyBand],
    hop_length: usize,
) -> EnergySeries {
    let stft = Stft::new(FFT_SIZE, hop_length);
    let frames = stft.magnitude_frames(&waveform.samples);
    let freqs = stft.bin_frequencies(waveform.sample_rate);

    let mut energy = BTreeMap::new();
    for band in bands {
        let bins: Vec<usize> = freqs
            .iter()
            .enumerate()
            .filter(|(_, &hz)| band.contains(hz))
            .map(|(i, _)| i)
            .collect();

        let series: Vec<f32> = if bins.is_empty() {
            debug!("band '{}' has no FFT bins in range, emitting zeros", band.name);
            vec![0.0; frames.len()]
        } else {
            frames
                .iter()
                .map(|frame| bins.iter().map(|&i| frame[i]).sum::<f32>() / bins.len() as f32)
                .collect()
        };
        energy.insert(band.name.to_string(), series);
    }

    debug!(
        "extracted {} bands over {} frames ({:.2} analysis fps)",
        energy.len(),
        frames.len(),
        waveform.sample_rate as f32 / hop_length as f32
    );

    EnergySeries {
        energy,
        duration: waveform.duration(),
        sample_rate: waveform.sample_rate,
        hop_length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_waveform(hz: f32, sample_rate: u32, seconds: f32) -> Waveform {
        let samples: Vec<f32> = (0..(sample_rate as f32 * seconds) as usize)
            .map(|i| (2.0 * std::f32::consts::PI * hz * i as f32 / sample_rate as f32).sin())
            .collect();
        Waveform::new(samples, sample_rate)
    }

    #[test]
    fn registries_are_well_formed() {
        for band in PERCUSSIVE_BANDS.iter().chain(BROADBAND_BANDS) {
            assert!(band.min_hz < band.max_hz, "band '{}' inverted", band.name);
        }
        assert_eq!(BandPreset::Percussive.bands().len(), 4);
        assert_eq!(BandPreset::Broadband.bands().len(), 5);
    }

    #[test]
    fn all_series_share_one_length_and_are_non_negative() {
        let waveform = sine_waveform(440.0, 22050, 2.0);
        let series = extract_band_energy(&waveform, PERCUSSIVE_BANDS, DEFAULT_HOP_LENGTH);

        let frame_count = series.frame_count();
        assert!(frame_count > 0);
        for (name, values) in &series.energy {
            assert_eq!(values.len(), frame_count, "band '{name}' length differs");
            assert!(values.iter().all(|&v| v >= 0.0), "band '{name}' negative");
        }
        assert!((series.fps() - 22050.0 / 512.0).abs() < 1e-3);
        assert!((series.duration - 2.0).abs() < 1e-3);
    }

    #[test]
    fn energy_lands_in_the_matching_band() {
        // 80 Hz sine sits inside "kick" (40-100) and outside "snare".
        let waveform = sine_waveform(80.0, 22050, 2.0);
        let series = extract_band_energy(&waveform, PERCUSSIVE_BANDS, DEFAULT_HOP_LENGTH);

        let kick: f32 = series.band("kick").unwrap().iter().sum();
        let snare: f32 = series.band("snare").unwrap().iter().sum();
        assert!(kick > snare * 10.0, "kick {kick} vs snare {snare}");
    }

    #[test]
    fn band_above_nyquist_yields_zeros() {
        let waveform = sine_waveform(440.0, 8000, 1.0);
        let ultrasonic = [FrequencyBand { name: "ultra", min_hz: 12000.0, max_hz: 16000.0 }];
        let series = extract_band_energy(&waveform, &ultrasonic, DEFAULT_HOP_LENGTH);

        let values = series.band("ultra").unwrap();
        assert_eq!(values.len(), series.frame_count());
        assert!(values.iter().all(|&v| v == 0.0));
    }
}
