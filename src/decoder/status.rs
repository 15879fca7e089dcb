//! Lock-free decoder status publication.
//!
//! Each field is an independent relaxed atomic; a reader may observe a
//! temporally mixed snapshot across fields, which is fine because every
//! field is advisory (UI/logging), never a control input for another
//! thread. Float cells store the f32 bit pattern in an `AtomicU32`.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Shared status cells, updated by the worker thread after every
/// iteration and polled by observers at any cadence.
pub struct DecoderStatus {
    running: AtomicBool,
    synced: AtomicBool,
    snr_db: AtomicU32,
    freq_offset_hz: AtomicU32,
    output_level: AtomicU32,
}

impl DecoderStatus {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            synced: AtomicBool::new(false),
            snr_db: AtomicU32::new(0.0f32.to_bits()),
            freq_offset_hz: AtomicU32::new(0.0f32.to_bits()),
            output_level: AtomicU32::new(0.0f32.to_bits()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn is_synced(&self) -> bool {
        self.synced.load(Ordering::Relaxed)
    }

    /// Receiver SNR estimate in dB.
    pub fn snr_db(&self) -> f32 {
        f32::from_bits(self.snr_db.load(Ordering::Relaxed))
    }

    /// Receiver carrier frequency offset estimate in Hz.
    pub fn freq_offset_hz(&self) -> f32 {
        f32::from_bits(self.freq_offset_hz.load(Ordering::Relaxed))
    }

    /// RMS level of the most recent decoded playback block.
    pub fn output_level(&self) -> f32 {
        f32::from_bits(self.output_level.load(Ordering::Relaxed))
    }

    pub(crate) fn set_running(&self, v: bool) {
        self.running.store(v, Ordering::Relaxed);
    }

    pub(crate) fn set_synced(&self, v: bool) {
        self.synced.store(v, Ordering::Relaxed);
    }

    pub(crate) fn set_snr_db(&self, v: f32) {
        self.snr_db.store(v.to_bits(), Ordering::Relaxed);
    }

    pub(crate) fn set_freq_offset_hz(&self, v: f32) {
        self.freq_offset_hz.store(v.to_bits(), Ordering::Relaxed);
    }

    pub(crate) fn set_output_level(&self, v: f32) {
        self.output_level.store(v.to_bits(), Ordering::Relaxed);
    }

    /// Zero every cell. Used when the pipeline is (re)opened or closed.
    pub(crate) fn reset(&self) {
        self.set_running(false);
        self.set_synced(false);
        self.set_snr_db(0.0);
        self.set_freq_offset_hz(0.0);
        self.set_output_level(0.0);
    }
}

impl Default for DecoderStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_cells_round_trip_through_bit_patterns() {
        let s = DecoderStatus::new();
        s.set_snr_db(-3.25);
        s.set_freq_offset_hz(17.5);
        s.set_output_level(0.707);
        assert_eq!(s.snr_db(), -3.25);
        assert_eq!(s.freq_offset_hz(), 17.5);
        assert_eq!(s.output_level(), 0.707);
    }

    #[test]
    fn reset_zeroes_everything() {
        let s = DecoderStatus::new();
        s.set_running(true);
        s.set_synced(true);
        s.set_snr_db(12.0);
        s.reset();
        assert!(!s.is_running());
        assert!(!s.is_synced());
        assert_eq!(s.snr_db(), 0.0);
        assert_eq!(s.output_level(), 0.0);
    }
}
