use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::bands::EnergySeries;

/// Suffix appended to the source file's stem for the analysis artifact.
pub const ARTIFACT_SUFFIX: &str = "_freq_data.json";

/// On-disk frequency analysis artifact, written beside the source audio.
///
/// `fps` is the analysis frame rate (sample_rate / hop_length), letting a
/// later synthesis pass map frame indices to host time without the audio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreqData {
    pub energy: BTreeMap<String, Vec<f32>>,
    pub fps: f32,
    pub duration: f32,
}

impl From<&EnergySeries> for FreqData {
    fn from(series: &EnergySeries) -> Self {
        Self {
            energy: series.energy.clone(),
            fps: series.fps(),
            duration: series.duration,
        }
    }
}

impl FreqData {
    pub fn band(&self, name: &str) -> Option<&[f32]> {
        self.energy.get(name).map(Vec::as_slice)
    }
}

/// `<path minus extension>_freq_data.json`, beside the input file.
pub fn artifact_path(audio_path: &Path) -> PathBuf {
    let mut name = audio_path.with_extension("").into_os_string();
    name.push(ARTIFACT_SUFFIX);
    PathBuf::from(name)
}

pub fn save_freq_data<P: AsRef<Path>>(data: &FreqData, output_path: P) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(&output_path, json)
        .with_context(|| format!("failed to write {}", output_path.as_ref().display()))?;
    info!("Frequency data saved to {}", output_path.as_ref().display());
    Ok(())
}

pub fn load_freq_data<P: AsRef<Path>>(input_path: P) -> Result<FreqData> {
    let json = std::fs::read_to_string(&input_path)
        .with_context(|| format!("failed to read {}", input_path.as_ref().display()))?;
    let data: FreqData = serde_json::from_str(&json)
        .with_context(|| format!("invalid frequency data in {}", input_path.as_ref().display()))?;
    Ok(data)
}
