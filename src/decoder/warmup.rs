//! Vocoder warmup gate and sliding feature window.
//!
//! The frame-autoregressive vocoder must never see malformed state: it is
//! withheld until [`WARMUP_FRAMES`] full feature frames have accumulated,
//! then fed a sliding fixed-size window, one new frame per call. Loss of
//! sync upstream resets the machine and warmup restarts.

use crate::model::{NB_TOTAL_FEATURES, WARMUP_FRAMES};

const WINDOW_LEN: usize = WARMUP_FRAMES * NB_TOTAL_FEATURES;

/// Accumulation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmupState {
    Empty,
    Accumulating,
    Ready,
}

/// Flat 5-frame feature buffer with a frame count and a readiness flag.
pub struct FeatureWindow {
    buf: [f32; WINDOW_LEN],
    frames: usize,
    ready: bool,
}

impl FeatureWindow {
    pub fn new() -> Self {
        Self {
            buf: [0.0; WINDOW_LEN],
            frames: 0,
            ready: false,
        }
    }

    pub fn state(&self) -> WarmupState {
        if self.ready {
            WarmupState::Ready
        } else if self.frames > 0 {
            WarmupState::Accumulating
        } else {
            WarmupState::Empty
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn frames_accumulated(&self) -> usize {
        self.frames
    }

    /// Push one decoded feature frame. Returns the primed window (oldest
    /// frame first) when the vocoder should be invoked: the first time on
    /// the Accumulating -> Ready transition, then once per frame.
    pub fn push(&mut self, frame: &[f32; NB_TOTAL_FEATURES]) -> Option<&[f32]> {
        if self.ready {
            // Slide the window one frame and append the newest.
            self.buf.copy_within(NB_TOTAL_FEATURES.., 0);
            self.buf[WINDOW_LEN - NB_TOTAL_FEATURES..].copy_from_slice(frame);
            return Some(&self.buf);
        }

        let at = self.frames * NB_TOTAL_FEATURES;
        self.buf[at..at + NB_TOTAL_FEATURES].copy_from_slice(frame);
        self.frames += 1;
        if self.frames == WARMUP_FRAMES {
            self.ready = true;
            Some(&self.buf)
        } else {
            None
        }
    }

    /// Restart warmup from scratch. Recoverable loss-of-sync path.
    pub fn reset(&mut self) {
        self.buf = [0.0; WINDOW_LEN];
        self.frames = 0;
        self.ready = false;
    }
}

impl Default for FeatureWindow {
    fn default() -> Self {
        Self::new()
    }
}
