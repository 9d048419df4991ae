use serde::Serialize;

use crate::curve::{AnimatableProperty, Axis};

/// Handle returned by [`AnimationSink::create_channel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ChannelId(pub usize);

/// Interpolation handle mode forwarded to the host's curve editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleSmoothing {
    AutoClamped,
}

/// Keyframe destination provided by the host application.
///
/// The core calls `insert_sample` in frame order per channel and never
/// touches a channel it did not create.
pub trait AnimationSink {
    fn create_channel(
        &mut self,
        target: &str,
        property: AnimatableProperty,
        axis: Axis,
    ) -> ChannelId;

    fn insert_sample(&mut self, channel: ChannelId, frame: f32, value: f32);

    fn set_handle_smoothing(&mut self, _channel: ChannelId, _mode: HandleSmoothing) {}
}

/// One recorded channel of a [`MemorySink`].
#[derive(Debug, Clone, Serialize)]
pub struct RecordedChannel {
    pub target: String,
    pub property: AnimatableProperty,
    pub axis: Axis,
    pub samples: Vec<(f32, f32)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothing: Option<HandleSmoothing>,
}

/// Sink that records every call. Used by the CLI for JSON export and by
/// tests to observe exactly what a host would receive.
#[derive(Debug, Default, Serialize)]
pub struct MemorySink {
    pub channels: Vec<RecordedChannel>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample_count(&self) -> usize {
        self.channels.iter().map(|c| c.samples.len()).sum()
    }
}

impl AnimationSink for MemorySink {
    fn create_channel(
        &mut self,
        target: &str,
        property: AnimatableProperty,
        axis: Axis,
    ) -> ChannelId {
        self.channels.push(RecordedChannel {
            target: target.to_string(),
            property,
            axis,
            samples: Vec::new(),
            smoothing: None,
        });
        ChannelId(self.channels.len() - 1)
    }

    fn insert_sample(&mut self, channel: ChannelId, frame: f32, value: f32) {
        self.channels[channel.0].samples.push((frame, value));
    }

    fn set_handle_smoothing(&mut self, channel: ChannelId, mode: HandleSmoothing) {
        self.channels[channel.0].smoothing = Some(mode);
    }
}
