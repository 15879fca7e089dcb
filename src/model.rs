//! Contracts for the two opaque neural components.
//!
//! The trained receiver and vocoder are external collaborators; the
//! pipeline depends only on these fixed-arity call contracts, which also
//! lets tests substitute doubles for the real models.

use anyhow::Result;

/// Sample rate of the analytic signal fed to the receiver (the modem rate).
pub const MODEM_SAMPLE_RATE: u32 = 8_000;
/// Sample rate of the PCM audio produced by the vocoder.
pub const VOCODER_SAMPLE_RATE: u32 = 16_000;
/// Complex samples per receiver call: one modem frame, 120 ms at 8 kHz.
pub const MODEM_FRAME_SAMPLES: usize = 960;
/// Width of one decoded feature frame.
pub const NB_TOTAL_FEATURES: usize = 36;
/// Feature frames that must accumulate before the first vocoder call.
pub const WARMUP_FRAMES: usize = 5;
/// PCM samples per vocoder call, at [`VOCODER_SAMPLE_RATE`].
pub const VOCODER_FRAME_SAMPLES: usize = 1_920;

/// One analytic-signal sample: original (delayed) real part plus its
/// Hilbert transform.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IqSample {
    pub re: f32,
    pub im: f32,
}

/// Link estimates attached to a successfully decoded feature frame.
#[derive(Debug, Clone)]
pub struct RxEstimate {
    /// Decoded speech features for one frame
    pub features: [f32; NB_TOTAL_FEATURES],
    /// Signal-to-noise ratio estimate in dB (display only)
    pub snr_db: f32,
    /// Carrier frequency offset estimate in Hz (display only)
    pub freq_offset_hz: f32,
}

/// Outcome of one receiver call.
#[derive(Debug, Clone)]
pub enum RxOutput {
    /// Receiver is synchronized and decoded one feature frame.
    Synced(RxEstimate),
    /// Receiver has not (or no longer) acquired sync. Not an error: the
    /// pipeline keeps feeding input in hope of resynchronizing.
    NoSync,
}

/// The opaque neural receiver: consumes one modem frame of analytic
/// samples ([`MODEM_FRAME_SAMPLES`] of them) per call.
pub trait Receiver: Send {
    fn process(&mut self, frame: &[IqSample]) -> Result<RxOutput>;
}

/// The opaque neural vocoder: consumes one primed feature window
/// ([`WARMUP_FRAMES`] × [`NB_TOTAL_FEATURES`] values, oldest frame first)
/// and returns one PCM frame at [`VOCODER_SAMPLE_RATE`].
pub trait Vocoder: Send {
    fn synthesize(&mut self, feature_window: &[f32]) -> Result<Vec<f32>>;
}
