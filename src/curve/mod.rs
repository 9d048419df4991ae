pub mod beat;
pub mod energy;
pub mod presets;

pub use beat::{apply_beat_curve, beat_keyframes};
pub use energy::{apply_artifact_energy_curve, apply_energy_curve, band_keyframes};
pub use presets::{apply_motion_preset, MotionPreset};

use serde::Serialize;

/// One (frame, value) pair destined for a single animation channel.
/// Frames within a channel's generated sequence never decrease.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeyframeSample {
    pub frame: f32,
    pub value: f32,
}

/// Inclusive host frame range for synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    pub start: i64,
    pub end: i64,
}

impl FrameRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }
}

/// Which transform of the target is animated. Resolved once per synthesis
/// call, never re-dispatched per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimatableProperty {
    Location,
    RotationEuler,
    Scale,
}

impl AnimatableProperty {
    /// Value mapping for energy-driven curves: scale channels rest at 1.0,
    /// so the control value rides on top of the identity scale.
    pub fn map_value(self, value: f32) -> f32 {
        match self {
            AnimatableProperty::Scale => 1.0 + value,
            AnimatableProperty::Location | AnimatableProperty::RotationEuler => value,
        }
    }
}

/// Transform axis of an animation channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// How each beat is rendered as animation samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImpulseShape {
    /// Sharp spike: rest at the beat, full amplitude 0.015 frames later.
    #[default]
    Impulse,
    /// Smooth half-sine rise and fall across the whole beat.
    Sinus,
    /// Decaying oscillation caricature in four steps.
    Bounce,
    /// Full-beat linear ramp from rest to amplitude.
    Ease,
}
