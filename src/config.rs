use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Decoder configuration.
///
/// Rates are nominal: the hardware may negotiate something close but not
/// identical, and the pipeline's resamplers are built from the negotiated
/// values, never from these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// ALSA capture device name (e.g. "default", "plughw:0,0")
    pub capture_device: String,
    /// ALSA playback device name
    pub playback_device: String,
    /// Desired ALSA capture sample rate (may be negotiated by hardware)
    pub capture_rate: u32,
    /// Desired ALSA playback sample rate
    pub playback_rate: u32,
    /// Desired capture period size in frames (one blocking read per period)
    pub period_size: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            capture_device: "default".to_string(),
            playback_device: "default".to_string(),
            capture_rate: 48000,
            playback_rate: 48000,
            period_size: 512,
        }
    }
}

impl DecoderConfig {
    /// Load configuration from a JSON file. Missing fields fall back to
    /// their defaults.
    pub fn from_file(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file '{}'", path))
    }
}
