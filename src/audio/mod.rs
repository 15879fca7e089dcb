//! Audio capture/playback collaborators.
//!
//! The pipeline depends on the [`CaptureSource`] and [`PlaybackSink`]
//! contracts, not on ALSA, so tests can substitute doubles for hardware.

mod alsa_device;

pub use alsa_device::{
    list_capture_devices, list_playback_devices, AlsaCapture, AlsaPlayback, AudioDeviceInfo,
};

use anyhow::Result;

/// A blocking source of mono i16 sample blocks at a negotiated rate.
pub trait CaptureSource: Send {
    /// Sample rate actually negotiated with the hardware.
    fn sample_rate(&self) -> u32;

    /// Samples delivered by one blocking read.
    fn period_size(&self) -> usize;

    /// Read one block into `buf`, returning the number of samples.
    ///
    /// `Ok(0)` means a transient error was recovered locally and there is
    /// no data this iteration; an `Err` is unrecoverable and ends the
    /// stream.
    fn read_block(&mut self, buf: &mut [i16]) -> Result<usize>;

    /// Discard in-flight data so any pending blocking read returns
    /// promptly. Called when the pipeline is shutting down.
    fn unblock(&mut self);
}

/// A blocking sink for mono i16 sample blocks at a negotiated rate.
pub trait PlaybackSink: Send {
    /// Sample rate actually negotiated with the hardware.
    fn sample_rate(&self) -> u32;

    /// Write one block, retrying short writes; backpressure from the
    /// audio subsystem is the pipeline's flow control.
    fn write_block(&mut self, pcm: &[i16]) -> Result<()>;
}
