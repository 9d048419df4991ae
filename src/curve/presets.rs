use crate::sink::AnimationSink;
use super::{AnimatableProperty, Axis, FrameRange};

/// Canned motion generators, pure functions of the frame range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionPreset {
    /// Sign-alternating X offset every 2 frames.
    ShakeX,
    /// Opposed sign-alternating Y/Z offsets every 3 frames.
    ShakeYz,
    /// Uniform scale pulse to 1.3 every 8 frames, back to 1.0 two frames on.
    PulseScale,
    /// Sign-alternating Z rotation every 5 frames.
    Wobble,
}

const SHAKE_OFFSET: f32 = 0.1;
const WOBBLE_ANGLE: f32 = 0.1;
const PULSE_SCALE: f32 = 1.3;

fn alternating(frame: i64) -> f32 {
    if frame.rem_euclid(2) == 0 {
        1.0
    } else {
        -1.0
    }
}

/// Write one preset's keyframes to the sink. Returns the number of samples
/// inserted across all channels.
pub fn apply_motion_preset(
    sink: &mut dyn AnimationSink,
    target: &str,
    preset: MotionPreset,
    range: FrameRange,
) -> usize {
    let mut count = 0;

    match preset {
        MotionPreset::ShakeX => {
            let x = sink.create_channel(target, AnimatableProperty::Location, Axis::X);
            let mut frame = range.start;
            while frame <= range.end {
                sink.insert_sample(x, frame as f32, alternating(frame) * SHAKE_OFFSET);
                count += 1;
                frame += 2;
            }
        }
        MotionPreset::ShakeYz => {
            let y = sink.create_channel(target, AnimatableProperty::Location, Axis::Y);
            let z = sink.create_channel(target, AnimatableProperty::Location, Axis::Z);
            let mut frame = range.start;
            while frame <= range.end {
                sink.insert_sample(y, frame as f32, alternating(frame) * SHAKE_OFFSET);
                sink.insert_sample(z, frame as f32, alternating(frame + 1) * SHAKE_OFFSET);
                count += 2;
                frame += 3;
            }
        }
        MotionPreset::PulseScale => {
            let channels: Vec<_> = [Axis::X, Axis::Y, Axis::Z]
                .into_iter()
                .map(|axis| sink.create_channel(target, AnimatableProperty::Scale, axis))
                .collect();
            let mut frame = range.start;
            while frame <= range.end {
                for &channel in &channels {
                    sink.insert_sample(channel, frame as f32, PULSE_SCALE);
                    sink.insert_sample(channel, (frame + 2) as f32, 1.0);
                    count += 2;
                }
                frame += 8;
            }
        }
        MotionPreset::Wobble => {
            let z = sink.create_channel(target, AnimatableProperty::RotationEuler, Axis::Z);
            let mut frame = range.start;
            while frame <= range.end {
                sink.insert_sample(z, frame as f32, alternating(frame) * WOBBLE_ANGLE);
                count += 1;
                frame += 5;
            }
        }
    }

    count
}
