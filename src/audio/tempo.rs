use log::{debug, warn};

use super::stft::Stft;
use super::Waveform;

const FFT_SIZE: usize = 2048;
const HOP_LENGTH: usize = 512;
const MIN_BPM: f32 = 60.0;
const MAX_BPM: f32 = 200.0;
// Autocorrelation needs a few bars of material before the lag peak is trustworthy.
const MIN_DURATION_SECS: f32 = 4.0;

/// Estimate the dominant tempo of a waveform as a whole number of BPM.
///
/// Builds an onset-strength envelope (half-wave-rectified spectral flux)
/// and finds the strongest periodicity via normalized autocorrelation over
/// the 60-200 BPM lag range, with octave disambiguation.
///
/// Returns `None` when no tempo can be found. Detection failure is an
/// expected outcome, never an error: silence, degenerate input, and
/// non-finite intermediate values all degrade to `None`.
pub fn estimate_tempo(waveform: &Waveform) -> Option<u32> {
    if waveform.sample_rate == 0 {
        warn!("waveform has zero sample rate, no tempo");
        return None;
    }
    if waveform.duration() < MIN_DURATION_SECS {
        debug!(
            "waveform too short for tempo estimation ({:.2}s < {:.1}s)",
            waveform.duration(),
            MIN_DURATION_SECS
        );
        return None;
    }

    let stft = Stft::new(FFT_SIZE, HOP_LENGTH);
    let onset = onset_envelope(&stft, &waveform.samples);
    let frames_per_second = waveform.sample_rate as f32 / HOP_LENGTH as f32;

    let (raw_bpm, correlation) = dominant_tempo(&onset, frames_per_second)?;
    let bpm = disambiguate_octave(&onset, raw_bpm, frames_per_second);

    if !bpm.is_finite() || bpm < 1.0 {
        warn!("degenerate tempo estimate ({bpm}), reporting no tempo");
        return None;
    }

    debug!("tempo estimate {bpm:.1} BPM (correlation {correlation:.3})");
    Some(bpm.round() as u32)
}

/// Onset-strength envelope: per-frame half-wave-rectified spectral flux,
/// normalized to a 0..1 peak. Transients show up as sharp positive spikes.
fn onset_envelope(stft: &Stft, samples: &[f32]) -> Vec<f32> {
    let frames = stft.magnitude_frames(samples);
    let mut onset = Vec::with_capacity(frames.len().saturating_sub(1));

    for pair in frames.windows(2) {
        let flux: f32 = pair[1]
            .iter()
            .zip(pair[0].iter())
            .map(|(&curr, &prev)| (curr - prev).max(0.0))
            .sum();
        onset.push(flux);
    }

    let max = onset.iter().cloned().fold(0.0f32, f32::max);
    if max > 0.0 {
        for v in &mut onset {
            *v /= max;
        }
    }
    onset
}

/// Pick the lag with the strongest normalized autocorrelation in the
/// supported BPM range. Returns (bpm, correlation).
fn dominant_tempo(onset: &[f32], frames_per_second: f32) -> Option<(f32, f32)> {
    let min_lag = (frames_per_second * 60.0 / MAX_BPM) as usize;
    let max_lag = (frames_per_second * 60.0 / MIN_BPM) as usize;
    if min_lag == 0 || onset.len() < max_lag * 2 {
        debug!("onset envelope too short ({} frames) for lag search", onset.len());
        return None;
    }

    let mut best_lag = 0;
    let mut best_correlation = 0.0f32;
    for lag in min_lag..=max_lag {
        let correlation = correlation_at_lag(onset, lag);
        if correlation > best_correlation {
            best_correlation = correlation;
            best_lag = lag;
        }
    }

    // Flat or silent material never crosses this floor.
    if best_lag == 0 || best_correlation < 0.01 {
        return None;
    }

    let seconds_per_beat = best_lag as f32 / frames_per_second;
    Some((60.0 / seconds_per_beat, best_correlation))
}

/// Normalized autocorrelation of the onset envelope at one lag.
fn correlation_at_lag(onset: &[f32], lag: usize) -> f32 {
    if lag == 0 || lag >= onset.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for i in 0..onset.len() - lag {
        dot += onset[i] * onset[i + lag];
        norm_a += onset[i] * onset[i];
        norm_b += onset[i + lag] * onset[i + lag];
    }

    let norm = (norm_a * norm_b).sqrt();
    if norm > 0.0 {
        dot / norm
    } else {
        0.0
    }
}

/// Resolve tempo-octave ambiguity (e.g. 75 vs 150 BPM).
///
/// Below 65 the double is almost always the perceptual tempo; in the
/// 65-95 range the double wins when its correlation holds up and lands in
/// the common 120-180 range.
fn disambiguate_octave(onset: &[f32], raw_bpm: f32, frames_per_second: f32) -> f32 {
    if raw_bpm < 65.0 {
        return raw_bpm * 2.0;
    }

    if (65.0..=95.0).contains(&raw_bpm) {
        let doubled = raw_bpm * 2.0;
        if (120.0..=180.0).contains(&doubled) {
            let base_lag = (frames_per_second * 60.0 / raw_bpm) as usize;
            let doubled_lag = (frames_per_second * 60.0 / doubled) as usize;
            let base_corr = correlation_at_lag(onset, base_lag);
            let doubled_corr = correlation_at_lag(onset, doubled_lag);
            if doubled_corr > base_corr * 0.7 {
                return doubled;
            }
        }
    }

    raw_bpm
}
