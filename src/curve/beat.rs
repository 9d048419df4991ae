use anyhow::{bail, Result};
use log::debug;

use crate::sink::AnimationSink;
use crate::state::BpmState;
use super::{AnimatableProperty, Axis, FrameRange, ImpulseShape, KeyframeSample};

/// Near-instant attack offset used by the default impulse shape.
const IMPULSE_ATTACK: f32 = 0.015;

/// Subdivisions per beat for the sinus shape (6 samples).
const SINUS_STEPS: usize = 5;

/// Generate one channel's worth of beat-synchronized keyframes.
///
/// Beat positions step from `range.start` by `frames_per_beat` for as long
/// as `frame + 1 <= range.end`; that exact condition matches the host's
/// beat-boundary semantics. Preconditions are validated before the first
/// sample is produced, so a failure never leaves a partial curve behind.
pub fn beat_keyframes(
    state: &BpmState,
    range: FrameRange,
    amplitude: f32,
    shape: ImpulseShape,
) -> Result<Vec<KeyframeSample>> {
    if state.bpm == 0 || state.frames_per_beat == 0 {
        bail!(
            "invalid tempo state: bpm={}, frames_per_beat={}",
            state.bpm,
            state.frames_per_beat
        );
    }

    let frames_per_beat = state.frames_per_beat as i64;
    let mut samples = Vec::new();
    let mut frame = range.start;
    while frame + 1 <= range.end {
        emit_beat(&mut samples, frame as f32, frames_per_beat as f32, amplitude, shape);
        frame += frames_per_beat;
    }

    debug!(
        "beat curve: {} samples over [{}, {}] at {} frames/beat",
        samples.len(),
        range.start,
        range.end,
        frames_per_beat
    );
    Ok(samples)
}

fn emit_beat(
    samples: &mut Vec<KeyframeSample>,
    frame: f32,
    frames_per_beat: f32,
    amplitude: f32,
    shape: ImpulseShape,
) {
    match shape {
        ImpulseShape::Impulse => {
            samples.push(KeyframeSample { frame, value: 0.0 });
            samples.push(KeyframeSample {
                frame: frame + IMPULSE_ATTACK,
                value: amplitude,
            });
        }
        ImpulseShape::Sinus => {
            for i in 0..=SINUS_STEPS {
                let t = i as f32 / SINUS_STEPS as f32;
                samples.push(KeyframeSample {
                    frame: frame + t * frames_per_beat,
                    value: (t * std::f32::consts::PI).sin() * amplitude,
                });
            }
        }
        ImpulseShape::Bounce => {
            let values = [amplitude, -amplitude * 0.5, amplitude * 0.25, 0.0];
            let step = frames_per_beat / values.len() as f32;
            for (i, value) in values.into_iter().enumerate() {
                samples.push(KeyframeSample {
                    frame: frame + i as f32 * step,
                    value,
                });
            }
        }
        ImpulseShape::Ease => {
            samples.push(KeyframeSample { frame, value: 0.0 });
            samples.push(KeyframeSample {
                frame: frame + frames_per_beat,
                value: amplitude,
            });
        }
    }
}

/// Emit the same beat curve on every selected axis of the target.
/// Returns the total number of samples handed to the sink.
pub fn apply_beat_curve(
    sink: &mut dyn AnimationSink,
    target: &str,
    property: AnimatableProperty,
    axes: &[Axis],
    state: &BpmState,
    range: FrameRange,
    amplitude: f32,
    shape: ImpulseShape,
) -> Result<usize> {
    let samples = beat_keyframes(state, range, amplitude, shape)?;
    for &axis in axes {
        let channel = sink.create_channel(target, property, axis);
        for sample in &samples {
            sink.insert_sample(channel, sample.frame, sample.value);
        }
    }
    Ok(samples.len() * axes.len())
}
