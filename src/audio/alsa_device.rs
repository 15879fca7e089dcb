//! ALSA PCM device wrappers for decoder capture and playback.

use alsa::device_name::HintIter;
use alsa::pcm::{Access, Format, HwParams, PCM};
use alsa::{Direction, ValueOr};
use anyhow::{Context, Result};

use super::{CaptureSource, PlaybackSink};

/// Parameters negotiated with the ALSA hardware.
#[derive(Debug, Clone)]
pub struct AlsaParams {
    /// Actual sample rate after negotiation
    pub sample_rate: u32,
    /// Period size in frames (one blocking read/write per period)
    pub period_size: usize,
}

/// One entry from the ALSA device list.
#[derive(Debug, Clone)]
pub struct AudioDeviceInfo {
    /// Identifier usable as a device name (e.g. "plughw:CARD=Gen,DEV=0")
    pub id: String,
    /// Human-readable description
    pub name: String,
}

/// List capture-capable PCM devices.
pub fn list_capture_devices() -> Result<Vec<AudioDeviceInfo>> {
    list_devices(Direction::Capture)
}

/// List playback-capable PCM devices.
pub fn list_playback_devices() -> Result<Vec<AudioDeviceInfo>> {
    list_devices(Direction::Playback)
}

fn list_devices(direction: Direction) -> Result<Vec<AudioDeviceInfo>> {
    let mut devices = Vec::new();
    let hints = HintIter::new_str(None, "pcm").context("Failed to enumerate PCM devices")?;
    for hint in hints {
        let Some(id) = hint.name else { continue };
        // A hint without a direction serves both.
        if let Some(dir) = hint.direction {
            if dir != direction {
                continue;
            }
        }
        let name = hint
            .desc
            .map(|d| d.replace('\n', " - "))
            .unwrap_or_else(|| id.clone());
        devices.push(AudioDeviceInfo { id, name });
    }
    Ok(devices)
}

fn open_pcm(
    device: &str,
    direction: Direction,
    sample_rate: u32,
    period_size: Option<usize>,
    dir_name: &str,
) -> Result<(PCM, AlsaParams)> {
    let pcm = PCM::new(device, direction, false)
        .with_context(|| format!("Failed to open PCM device '{}' for {}", device, dir_name))?;

    // Configure hardware parameters: mono S16LE, nearest supported rate.
    {
        let hwp = HwParams::any(&pcm).with_context(|| "Failed to initialize HwParams")?;
        hwp.set_access(Access::RWInterleaved)?;
        hwp.set_format(Format::S16LE)?;
        hwp.set_channels(1)?;
        hwp.set_rate_near(sample_rate, ValueOr::Nearest)?;
        if let Some(ps) = period_size {
            hwp.set_period_size_near(ps as alsa::pcm::Frames, ValueOr::Nearest)?;
        }
        pcm.hw_params(&hwp)?;
    }
    pcm.prepare()?;

    // Read back actual negotiated parameters
    let (actual_rate, period_size) = {
        let hwp = pcm.hw_params_current()?;
        (hwp.get_rate()?, hwp.get_period_size()? as usize)
    };

    let params = AlsaParams {
        sample_rate: actual_rate,
        period_size,
    };

    log::info!(
        "ALSA {}: device={}, rate={}, period_size={}",
        dir_name,
        device,
        actual_rate,
        period_size,
    );

    Ok((pcm, params))
}

// ======================== Capture ========================

/// Blocking mono capture stream over an ALSA PCM handle.
pub struct AlsaCapture {
    pcm: PCM,
    params: AlsaParams,
}

impl AlsaCapture {
    /// Open and prepare a capture device. A failure here leaves no stream
    /// behind; the caller's state is unchanged.
    pub fn open(device: &str, sample_rate: u32, period_size: usize) -> Result<Self> {
        let (pcm, params) = open_pcm(
            device,
            Direction::Capture,
            sample_rate,
            Some(period_size),
            "Capture",
        )?;
        Ok(Self { pcm, params })
    }
}

impl CaptureSource for AlsaCapture {
    fn sample_rate(&self) -> u32 {
        self.params.sample_rate
    }

    fn period_size(&self) -> usize {
        self.params.period_size
    }

    fn read_block(&mut self, buf: &mut [i16]) -> Result<usize> {
        let io = self.pcm.io_i16()?;
        match io.readi(buf) {
            Ok(frames) => Ok(frames),
            Err(e) => {
                // Underrun/overrun or interrupted call: recover the PCM
                // and report "no data this iteration".
                log::warn!("ALSA capture error: {}, recovering...", e);
                self.pcm
                    .prepare()
                    .context("Failed to recover PCM capture")?;
                Ok(0)
            }
        }
    }

    fn unblock(&mut self) {
        // snd_pcm_drop: discards pending frames and makes a blocked
        // readi return.
        if let Err(e) = self.pcm.drop() {
            log::warn!("ALSA capture drop failed: {}", e);
        }
    }
}

// ======================== Playback ========================

/// Blocking mono playback stream over an ALSA PCM handle.
pub struct AlsaPlayback {
    pcm: PCM,
    params: AlsaParams,
}

impl AlsaPlayback {
    pub fn open(device: &str, sample_rate: u32, period_size: Option<usize>) -> Result<Self> {
        let (pcm, params) = open_pcm(
            device,
            Direction::Playback,
            sample_rate,
            period_size,
            "Playback",
        )?;
        Ok(Self { pcm, params })
    }
}

impl PlaybackSink for AlsaPlayback {
    fn sample_rate(&self) -> u32 {
        self.params.sample_rate
    }

    fn write_block(&mut self, pcm_data: &[i16]) -> Result<()> {
        let io = self.pcm.io_i16()?;
        // Retry loop handles short writes and XRUN recovery without
        // losing frames.
        let mut written = 0;
        while written < pcm_data.len() {
            match io.writei(&pcm_data[written..]) {
                Ok(frames) => {
                    written += frames;
                }
                Err(e) => {
                    log::warn!("ALSA playback error: {}, recovering...", e);
                    self.pcm
                        .prepare()
                        .context("Failed to recover PCM playback")?;
                }
            }
        }
        Ok(())
    }
}
