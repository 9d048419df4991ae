use log::info;

/// Caller-owned tempo state driving beat-synchronized synthesis.
///
/// `frames_per_beat` is recomputed on every BPM change; after a successful
/// detection the BPM never drops below 1. A failed detection clears the
/// state entirely, which makes later synthesis fail its precondition check
/// instead of looping on a zero step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BpmState {
    pub bpm: u32,
    pub original_bpm: u32,
    pub frames_per_beat: u32,
    pub scene_fps: u32,
}

impl BpmState {
    pub fn new(scene_fps: u32) -> Self {
        Self {
            bpm: 0,
            original_bpm: 0,
            frames_per_beat: 0,
            scene_fps,
        }
    }

    /// Build a usable state directly from a known tempo.
    pub fn with_bpm(bpm: u32, scene_fps: u32) -> Self {
        let mut state = Self::new(scene_fps);
        state.apply_detection(Some(bpm));
        state
    }

    /// Record a fresh analysis result. `None` clears the state.
    pub fn apply_detection(&mut self, detected: Option<u32>) {
        match detected {
            Some(bpm) => {
                self.bpm = bpm.max(1);
                self.original_bpm = self.bpm;
                self.recompute();
                info!(
                    "BPM: {} -> approx. {} frames per beat",
                    self.bpm, self.frames_per_beat
                );
            }
            None => {
                self.bpm = 0;
                self.original_bpm = 0;
                self.frames_per_beat = 0;
                info!("No BPM detected");
            }
        }
    }

    /// Halve the tempo for slower beat syncing. No-op at or below 1 BPM.
    pub fn halve(&mut self) {
        if self.bpm > 1 {
            self.bpm = (self.bpm / 2).max(1);
            self.recompute();
        }
    }

    /// Double the tempo for faster beat syncing. No-op on a cleared state.
    pub fn double(&mut self) {
        if self.bpm > 0 {
            self.bpm *= 2;
            self.recompute();
        }
    }

    /// Restore the originally detected tempo.
    pub fn reset(&mut self) {
        if self.original_bpm > 0 {
            self.bpm = self.original_bpm;
            self.recompute();
        }
    }

    /// Manual override, clamped to at least 1 BPM.
    pub fn set_bpm(&mut self, bpm: u32) {
        self.bpm = bpm.max(1);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.frames_per_beat =
            ((60.0 / self.bpm as f64) * self.scene_fps as f64).round() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_sets_frames_per_beat() {
        let state = BpmState::with_bpm(120, 24);
        assert_eq!(state.bpm, 120);
        assert_eq!(state.original_bpm, 120);
        assert_eq!(state.frames_per_beat, 12);
    }

    #[test]
    fn failed_detection_clears_state() {
        let mut state = BpmState::with_bpm(120, 24);
        state.apply_detection(None);
        assert_eq!(state.bpm, 0);
        assert_eq!(state.frames_per_beat, 0);
    }

    #[test]
    fn halve_then_double_round_trips() {
        let mut state = BpmState::with_bpm(120, 24);
        state.halve();
        assert_eq!(state.bpm, 60);
        assert_eq!(state.frames_per_beat, 24);
        state.double();
        assert_eq!(state.bpm, 120);
        assert_eq!(state.frames_per_beat, 12);
    }

    #[test]
    fn halve_floors_at_one() {
        let mut state = BpmState::with_bpm(3, 24);
        state.halve();
        assert_eq!(state.bpm, 1);
        state.halve();
        assert_eq!(state.bpm, 1);
    }

    #[test]
    fn reset_restores_original() {
        let mut state = BpmState::with_bpm(128, 30);
        state.double();
        state.double();
        state.reset();
        assert_eq!(state.bpm, 128);
        assert_eq!(state.frames_per_beat, (60.0f64 / 128.0 * 30.0).round() as u32);
    }

    #[test]
    fn double_on_cleared_state_is_a_no_op() {
        let mut state = BpmState::new(24);
        state.double();
        assert_eq!(state.bpm, 0);
        assert_eq!(state.frames_per_beat, 0);
    }

    #[test]
    fn odd_bpm_round_trip_within_rounding() {
        let mut state = BpmState::with_bpm(127, 24);
        state.halve(); // 63
        state.double(); // 126
        assert!((state.bpm as i64 - 127).abs() <= 1);
        state.reset();
        assert_eq!(state.bpm, 127);
    }
}
