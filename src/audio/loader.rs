use anyhow::{bail, Context, Result};
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::Waveform;

/// Decode an audio file into a mono waveform at its native sample rate.
///
/// WAV goes through hound; MP3 through rodio's symphonia decoders.
/// Missing files and unsupported extensions fail before any decoding starts.
pub fn load_waveform<P: AsRef<Path>>(path: P) -> Result<Waveform> {
    let path = path.as_ref();
    if !path.is_file() {
        bail!("audio file not found: {}", path.display());
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let waveform = match ext.as_deref() {
        Some("wav") => load_wav(path)?,
        Some("mp3") => load_mp3(path)?,
        _ => bail!(
            "unsupported audio format (expected .wav or .mp3): {}",
            path.display()
        ),
    };

    info!(
        "Loaded {} samples ({:.2}s) at {} Hz from {}",
        waveform.samples.len(),
        waveform.duration(),
        waveform.sample_rate,
        path.display()
    );
    Ok(waveform)
}

fn load_wav(path: &Path) -> Result<Waveform> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("failed to open WAV file {}", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .context("corrupt WAV sample data")?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()
                .context("corrupt WAV sample data")?
        }
    };

    Ok(Waveform::new(downmix(&samples, channels), spec.sample_rate))
}

fn load_mp3(path: &Path) -> Result<Waveform> {
    use rodio::{Decoder, Source};

    let file = BufReader::new(
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
    );
    let source = Decoder::new(file)
        .with_context(|| format!("failed to decode {}", path.display()))?;

    let channels = source.channels() as usize;
    let sample_rate = source.sample_rate();
    let samples: Vec<i16> = source.convert_samples().collect();
    let samples: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();

    Ok(Waveform::new(downmix(&samples, channels), sample_rate))
}

/// Average interleaved frames down to a single channel.
fn downmix(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
