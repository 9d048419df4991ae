//! Audio-driven animation curves.
//!
//! Estimates tempo (BPM) and per-band spectral energy envelopes from a
//! finite audio recording, then turns either signal into keyframe samples
//! for a host 3D tool's animation channels.

pub mod audio;
pub mod curve;
pub mod sink;
pub mod state;

pub use audio::{
    estimate_tempo, extract_band_energy, load_waveform, BandPreset, EnergySeries, FrequencyBand,
    Waveform,
};
pub use curve::{AnimatableProperty, Axis, FrameRange, ImpulseShape, KeyframeSample, MotionPreset};
pub use sink::{AnimationSink, ChannelId, HandleSmoothing, MemorySink};
pub use state::BpmState;
