use anyhow::Result;
use tokio::signal;

use radae_rx::model::{
    IqSample, Receiver, RxEstimate, RxOutput, Vocoder, NB_TOTAL_FEATURES, VOCODER_FRAME_SAMPLES,
};
use radae_rx::{audio, Decoder, DecoderConfig};

/// Bring-up doubles standing in for the trained models until the real
/// backends are linked through the library API: the receiver treats any
/// frame with signal energy as synchronized and reports the frame level
/// as its features; the vocoder replays the newest level as a constant
/// block. Enough to exercise the full pipeline against real hardware.
struct LoopbackReceiver;

impl Receiver for LoopbackReceiver {
    fn process(&mut self, frame: &[IqSample]) -> Result<RxOutput> {
        if frame.is_empty() {
            return Ok(RxOutput::NoSync);
        }
        let power: f32 =
            frame.iter().map(|s| s.re * s.re).sum::<f32>() / frame.len() as f32;
        let rms = power.sqrt();
        if rms < 0.01 {
            return Ok(RxOutput::NoSync);
        }
        Ok(RxOutput::Synced(RxEstimate {
            features: [rms; NB_TOTAL_FEATURES],
            snr_db: 20.0 * (rms / 0.01).log10(),
            freq_offset_hz: 0.0,
        }))
    }
}

struct LoopbackVocoder;

impl Vocoder for LoopbackVocoder {
    fn synthesize(&mut self, feature_window: &[f32]) -> Result<Vec<f32>> {
        let newest = &feature_window[feature_window.len() - NB_TOTAL_FEATURES..];
        let level = newest.iter().sum::<f32>() / newest.len() as f32;
        Ok(vec![level; VOCODER_FRAME_SAMPLES])
    }
}

fn list_devices() -> Result<()> {
    println!("Capture devices:");
    for d in audio::list_capture_devices()? {
        println!("  {:<32} {}", d.id, d.name);
    }
    println!("Playback devices:");
    for d in audio::list_playback_devices()? {
        println!("  {:<32} {}", d.id, d.name);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut config_path: Option<String> = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--list" => return list_devices(),
            "--config" => config_path = args.next(),
            other => anyhow::bail!("Unknown argument: {} (try --list or --config FILE)", other),
        }
    }

    let config = match config_path {
        Some(path) => DecoderConfig::from_file(&path)?,
        None => DecoderConfig::default(),
    };

    let mut decoder = Decoder::new(config);
    decoder.open(Box::new(LoopbackReceiver), Box::new(LoopbackVocoder))?;
    decoder.start()?;
    log::info!("Decoder running (loopback models), Ctrl+C to stop");

    let status = decoder.status();
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                log::info!("Received Ctrl+C, shutting down...");
                break;
            }
            _ = ticker.tick() => {
                if !status.is_running() {
                    log::error!("Decoder worker exited unexpectedly");
                    break;
                }
                log::info!(
                    "sync={} snr={:.1} dB freq={:+.1} Hz level={:.3}",
                    status.is_synced(),
                    status.snr_db(),
                    status.freq_offset_hz(),
                    status.output_level(),
                );
            }
        }
    }

    decoder.stop();
    decoder.close();
    Ok(())
}
