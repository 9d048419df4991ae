use anyhow::{anyhow, Result};
use log::debug;

use crate::audio::artifact::FreqData;
use crate::audio::bands::EnergySeries;
use crate::sink::{AnimationSink, HandleSmoothing};
use super::{AnimatableProperty, Axis, KeyframeSample};

/// Map one band's energy series onto host animation frames.
///
/// The series is normalized by its own maximum before scaling by
/// `amplitude`, so pre-scaling the input by any positive constant leaves
/// the output unchanged. An all-zero series normalizes against 1 and stays
/// at rest. Frame for index `i` is `i * host_fps / series_fps`.
pub fn band_keyframes(
    series: &EnergySeries,
    band: &str,
    host_fps: f32,
    amplitude: f32,
    property: AnimatableProperty,
) -> Result<Vec<KeyframeSample>> {
    let values = lookup_band(series.band(band), band)?;
    Ok(map_series(values, series.fps(), host_fps, amplitude, property))
}

/// Same as [`band_keyframes`], but from a previously saved analysis
/// artifact instead of a live extraction.
pub fn artifact_band_keyframes(
    data: &FreqData,
    band: &str,
    host_fps: f32,
    amplitude: f32,
    property: AnimatableProperty,
) -> Result<Vec<KeyframeSample>> {
    let values = lookup_band(data.band(band), band)?;
    Ok(map_series(values, data.fps, host_fps, amplitude, property))
}

fn lookup_band<'a>(values: Option<&'a [f32]>, band: &str) -> Result<&'a [f32]> {
    values
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow!("no data for band '{band}'"))
}

fn map_series(
    values: &[f32],
    series_fps: f32,
    host_fps: f32,
    amplitude: f32,
    property: AnimatableProperty,
) -> Vec<KeyframeSample> {
    let mut max = values.iter().cloned().fold(0.0f32, f32::max);
    if max == 0.0 {
        max = 1.0;
    }
    let frame_step = host_fps / series_fps;

    let samples: Vec<KeyframeSample> = values
        .iter()
        .enumerate()
        .map(|(i, &raw)| KeyframeSample {
            frame: i as f32 * frame_step,
            value: property.map_value(raw / max * amplitude),
        })
        .collect();

    debug!(
        "energy curve: {} samples, {:.3} host frames per analysis frame",
        samples.len(),
        frame_step
    );
    samples
}

/// Drive a single channel of the sink from a band-energy series, then ask
/// the host to smooth the handles, matching what a hand-drawn curve would
/// get in the curve editor.
pub fn apply_energy_curve(
    sink: &mut dyn AnimationSink,
    target: &str,
    property: AnimatableProperty,
    axis: Axis,
    series: &EnergySeries,
    band: &str,
    host_fps: f32,
    amplitude: f32,
) -> Result<usize> {
    let samples = band_keyframes(series, band, host_fps, amplitude, property)?;
    Ok(write_channel(sink, target, property, axis, &samples))
}

/// [`apply_energy_curve`] for a previously saved analysis artifact. Drives
/// the sink identically, including the handle smoothing pass.
pub fn apply_artifact_energy_curve(
    sink: &mut dyn AnimationSink,
    target: &str,
    property: AnimatableProperty,
    axis: Axis,
    data: &FreqData,
    band: &str,
    host_fps: f32,
    amplitude: f32,
) -> Result<usize> {
    let samples = artifact_band_keyframes(data, band, host_fps, amplitude, property)?;
    Ok(write_channel(sink, target, property, axis, &samples))
}

fn write_channel(
    sink: &mut dyn AnimationSink,
    target: &str,
    property: AnimatableProperty,
    axis: Axis,
    samples: &[KeyframeSample],
) -> usize {
    let channel = sink.create_channel(target, property, axis);
    for sample in samples {
        sink.insert_sample(channel, sample.frame, sample.value);
    }
    sink.set_handle_smoothing(channel, HandleSmoothing::AutoClamped);
    samples.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use std::collections::BTreeMap;

    fn series_with(band: &str, values: Vec<f32>) -> EnergySeries {
        let frames = values.len();
        let mut energy = BTreeMap::new();
        energy.insert(band.to_string(), values);
        EnergySeries {
            energy,
            duration: frames as f32 * 512.0 / 22050.0,
            sample_rate: 22050,
            hop_length: 512,
        }
    }

    #[test]
    fn one_sample_per_series_element_in_frame_order() {
        let series = series_with("kick", vec![0.2, 0.8, 0.4, 0.0]);
        let samples =
            band_keyframes(&series, "kick", 24.0, 1.0, AnimatableProperty::Location).unwrap();
        assert_eq!(samples.len(), 4);
        for pair in samples.windows(2) {
            assert!(pair[1].frame > pair[0].frame);
        }
        // peak element normalizes to the full amplitude
        assert!((samples[1].value - 1.0).abs() < 1e-6);
    }

    #[test]
    fn frame_mapping_matches_fps_ratio() {
        let series = series_with("kick", vec![0.5; 100]);
        let samples =
            band_keyframes(&series, "kick", 24.0, 1.0, AnimatableProperty::Location).unwrap();
        let expected = 99.0 * (24.0 / (22050.0 / 512.0));
        assert!((samples[99].frame - expected).abs() < 1e-3);
    }

    #[test]
    fn normalization_removes_input_scale() {
        let raw = vec![0.1, 0.7, 0.3, 0.9, 0.2];
        let scaled: Vec<f32> = raw.iter().map(|v| v * 37.5).collect();

        let a = band_keyframes(&series_with("kick", raw), "kick", 24.0, 2.0, AnimatableProperty::Location)
            .unwrap();
        let b = band_keyframes(&series_with("kick", scaled), "kick", 24.0, 2.0, AnimatableProperty::Location)
            .unwrap();

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.frame, y.frame);
            assert!((x.value - y.value).abs() < 1e-5);
        }
    }

    #[test]
    fn all_zero_series_stays_at_rest() {
        let series = series_with("kick", vec![0.0; 10]);
        let samples =
            band_keyframes(&series, "kick", 24.0, 3.0, AnimatableProperty::Location).unwrap();
        assert!(samples.iter().all(|s| s.value == 0.0));
    }

    #[test]
    fn scale_channels_rest_at_identity() {
        let series = series_with("kick", vec![0.0, 1.0]);
        let samples =
            band_keyframes(&series, "kick", 24.0, 0.5, AnimatableProperty::Scale).unwrap();
        assert_eq!(samples[0].value, 1.0);
        assert_eq!(samples[1].value, 1.5);
    }

    #[test]
    fn missing_band_is_an_error() {
        let series = series_with("kick", vec![0.1, 0.2]);
        let err = band_keyframes(&series, "snare", 24.0, 1.0, AnimatableProperty::Location)
            .unwrap_err();
        assert!(err.to_string().contains("no data for band 'snare'"));
    }

    #[test]
    fn empty_band_is_an_error() {
        let series = series_with("kick", vec![]);
        assert!(band_keyframes(&series, "kick", 24.0, 1.0, AnimatableProperty::Location).is_err());
    }

    #[test]
    fn artifact_and_live_series_agree() {
        let series = series_with("kick", vec![0.3, 0.6, 0.9]);
        let data = FreqData::from(&series);

        let live =
            band_keyframes(&series, "kick", 24.0, 1.0, AnimatableProperty::Location).unwrap();
        let cached =
            artifact_band_keyframes(&data, "kick", 24.0, 1.0, AnimatableProperty::Location).unwrap();
        assert_eq!(live, cached);
    }

    #[test]
    fn applied_curve_gets_smoothed_handles() {
        let series = series_with("kick", vec![0.1, 0.5, 0.3]);
        let mut sink = MemorySink::new();
        let count = apply_energy_curve(
            &mut sink,
            "cube",
            AnimatableProperty::Location,
            Axis::Z,
            &series,
            "kick",
            24.0,
            1.0,
        )
        .unwrap();

        assert_eq!(count, 3);
        assert_eq!(sink.channels.len(), 1);
        assert_eq!(sink.channels[0].smoothing, Some(HandleSmoothing::AutoClamped));
    }

    #[test]
    fn artifact_curve_gets_smoothed_handles() {
        let series = series_with("kick", vec![0.2, 0.6, 0.4]);
        let data = FreqData::from(&series);

        let mut live_sink = MemorySink::new();
        apply_energy_curve(
            &mut live_sink,
            "cube",
            AnimatableProperty::Location,
            Axis::Z,
            &series,
            "kick",
            24.0,
            1.0,
        )
        .unwrap();

        let mut cached_sink = MemorySink::new();
        let count = apply_artifact_energy_curve(
            &mut cached_sink,
            "cube",
            AnimatableProperty::Location,
            Axis::Z,
            &data,
            "kick",
            24.0,
            1.0,
        )
        .unwrap();

        assert_eq!(count, 3);
        assert_eq!(
            cached_sink.channels[0].smoothing,
            Some(HandleSmoothing::AutoClamped)
        );
        assert_eq!(cached_sink.channels[0].samples, live_sink.channels[0].samples);
    }

    #[test]
    fn failed_lookup_writes_nothing_to_the_sink() {
        let series = series_with("kick", vec![0.1]);
        let mut sink = MemorySink::new();
        let result = apply_energy_curve(
            &mut sink,
            "cube",
            AnimatableProperty::Location,
            Axis::Z,
            &series,
            "hihat",
            24.0,
            1.0,
        );
        assert!(result.is_err());
        assert_eq!(sink.sample_count(), 0);
    }
}
