//! radae-rx - Real-time speech-over-radio decoder pipeline
//!
//! Pulls baseband audio from an ALSA capture device, reconstructs its
//! analytic (complex) representation with a 127-tap Hilbert FIR, feeds it
//! to an opaque neural receiver, vocodes the recovered speech features and
//! plays the result back, all on one dedicated worker thread:
//!
//! ALSA capture → resample → Hilbert → receiver → warmup gate → vocoder
//! → resample → ALSA playback
//!
//! Status (sync, SNR, frequency offset, output level) is published through
//! lock-free atomics after every iteration. The neural receiver and
//! vocoder are external collaborators behind the [`model::Receiver`] and
//! [`model::Vocoder`] traits.

pub mod audio;
pub mod config;
pub mod decoder;
pub mod dsp;
pub mod model;

pub use config::DecoderConfig;
pub use decoder::{Decoder, DecoderStatus};
