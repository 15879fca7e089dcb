//! The decoder pipeline orchestrator.
//!
//! Lifecycle: created unopened -> opened (devices negotiated, buffers
//! zeroed) -> started (worker thread running) -> stopped (thread joined,
//! buffers untouched) -> closed (devices released). Exactly one dedicated
//! worker thread per decoder runs the whole per-frame sequence; the
//! owning thread only issues lifecycle commands and polls the status
//! atomics. Real-time audio stays on std::thread, never on the async
//! runtime.

mod status;
mod warmup;

pub use status::DecoderStatus;
pub use warmup::{FeatureWindow, WarmupState};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};

use crate::audio::{AlsaCapture, AlsaPlayback, CaptureSource, PlaybackSink};
use crate::config::DecoderConfig;
use crate::dsp::{HilbertTransformer, LinearResampler};
use crate::model::{
    IqSample, Receiver, RxOutput, Vocoder, MODEM_FRAME_SAMPLES, MODEM_SAMPLE_RATE,
    VOCODER_SAMPLE_RATE,
};

/// Real-time speech-over-radio decoder:
///
/// capture -> resample -> Hilbert -> receiver -> warmup gate -> vocoder
/// -> resample -> playback
///
/// All processing runs on a dedicated thread; status is exposed via
/// relaxed atomics.
pub struct Decoder {
    config: DecoderConfig,
    /// Opened-but-idle pipeline state; moves into the worker on start and
    /// is reclaimed on stop so the stream can be restarted.
    pipeline: Option<Pipeline>,
    worker: Option<JoinHandle<Pipeline>>,
    running: Arc<AtomicBool>,
    status: Arc<DecoderStatus>,
}

impl Decoder {
    /// Create an unopened decoder. No hardware is touched yet.
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            pipeline: None,
            worker: None,
            running: Arc::new(AtomicBool::new(false)),
            status: Arc::new(DecoderStatus::new()),
        }
    }

    /// Open the configured ALSA devices and take ownership of the two
    /// opaque neural components. An already-open decoder is closed first.
    /// On failure the decoder remains unopened and no thread is started.
    pub fn open(
        &mut self,
        receiver: Box<dyn Receiver>,
        vocoder: Box<dyn Vocoder>,
    ) -> Result<()> {
        self.close();
        let capture = AlsaCapture::open(
            &self.config.capture_device,
            self.config.capture_rate,
            self.config.period_size,
        )?;
        let playback =
            AlsaPlayback::open(&self.config.playback_device, self.config.playback_rate, None)?;
        self.open_with(Box::new(capture), Box::new(playback), receiver, vocoder)
    }

    /// Open over caller-supplied capture/playback collaborators. This is
    /// the seam test doubles come in through.
    pub fn open_with(
        &mut self,
        capture: Box<dyn CaptureSource>,
        playback: Box<dyn PlaybackSink>,
        receiver: Box<dyn Receiver>,
        vocoder: Box<dyn Vocoder>,
    ) -> Result<()> {
        self.close();
        self.pipeline = Some(Pipeline::new(capture, playback, receiver, vocoder));
        log::info!("Decoder opened");
        Ok(())
    }

    /// Launch the worker thread. No-op if already running. A worker that
    /// exited on its own (unrecoverable hardware failure) is joined and
    /// its state reclaimed first, so a plain restart works.
    pub fn start(&mut self) -> Result<()> {
        if let Some(handle) = &self.worker {
            if !handle.is_finished() {
                return Ok(());
            }
            self.stop();
        }
        let mut pipeline = self.pipeline.take().context("Decoder is not open")?;

        self.running.store(true, Ordering::SeqCst);
        self.status.set_running(true);

        let running = self.running.clone();
        let status = self.status.clone();
        let handle = thread::Builder::new()
            .name("radae-decode".into())
            .spawn(move || {
                pipeline.run(&running, &status);
                status.set_running(false);
                status.set_synced(false);
                pipeline
            })?;
        self.worker = Some(handle);
        Ok(())
    }

    /// Signal the worker to stop and join it. Idempotent; guarantees the
    /// thread has fully exited before returning.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            match handle.join() {
                Ok(pipeline) => self.pipeline = Some(pipeline),
                Err(_) => log::error!("Decoder worker panicked"),
            }
            log::info!("Decoder stopped");
        }
        self.status.set_running(false);
        self.status.set_synced(false);
    }

    /// Stop if running, then release devices and model handles.
    /// Idempotent: closing an unopened decoder is a no-op.
    pub fn close(&mut self) {
        self.stop();
        if self.pipeline.take().is_some() {
            log::info!("Decoder closed");
        }
        self.status.reset();
    }

    /// Handle for observers to poll; any cadence is valid.
    pub fn status(&self) -> Arc<DecoderStatus> {
        self.status.clone()
    }

    /// False once the worker has exited, including an unexpected exit on
    /// unrecoverable hardware failure.
    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }

    pub fn is_synced(&self) -> bool {
        self.status.is_synced()
    }

    pub fn snr_db(&self) -> f32 {
        self.status.snr_db()
    }

    pub fn freq_offset_hz(&self) -> f32 {
        self.status.freq_offset_hz()
    }

    pub fn output_level(&self) -> f32 {
        self.status.output_level()
    }
}

impl Drop for Decoder {
    fn drop(&mut self) {
        self.close();
    }
}

// ======================== Worker-side pipeline ========================

/// Everything the worker thread mutates. Exclusively owned: it lives in
/// `Decoder::pipeline` while idle and moves into the thread while running,
/// which is what makes the lock-free status publication safe.
struct Pipeline {
    capture: Box<dyn CaptureSource>,
    playback: Box<dyn PlaybackSink>,
    receiver: Box<dyn Receiver>,
    vocoder: Box<dyn Vocoder>,
    /// Capture rate -> modem rate
    to_modem: LinearResampler,
    /// Vocoder rate -> playback rate
    to_device: LinearResampler,
    hilbert: HilbertTransformer,
    warmup: FeatureWindow,
    /// Samples at the modem rate awaiting a full modem frame
    modem_accum: Vec<f32>,
    /// One analytic-signal frame for the receiver
    iq_frame: Vec<IqSample>,
    /// Interleaved read buffer, one capture period
    read_buf: Vec<i16>,
    /// Scratch for the capture block converted to f32
    block: Vec<f32>,
    /// Scratch for resampled playback audio
    out_buf: Vec<f32>,
    /// Scratch for the i16 block handed to playback
    play_buf: Vec<i16>,
}

impl Pipeline {
    fn new(
        capture: Box<dyn CaptureSource>,
        playback: Box<dyn PlaybackSink>,
        receiver: Box<dyn Receiver>,
        vocoder: Box<dyn Vocoder>,
    ) -> Self {
        let period = capture.period_size();
        let to_modem = LinearResampler::new(capture.sample_rate(), MODEM_SAMPLE_RATE);
        let to_device = LinearResampler::new(VOCODER_SAMPLE_RATE, playback.sample_rate());
        Self {
            capture,
            playback,
            receiver,
            vocoder,
            to_modem,
            to_device,
            hilbert: HilbertTransformer::new(),
            warmup: FeatureWindow::new(),
            modem_accum: Vec::with_capacity(2 * MODEM_FRAME_SAMPLES),
            iq_frame: Vec::with_capacity(MODEM_FRAME_SAMPLES),
            read_buf: vec![0i16; period],
            block: Vec::with_capacity(period),
            out_buf: Vec::new(),
            play_buf: Vec::new(),
        }
    }

    /// The per-frame sequence, strictly sequential: frame N is fully
    /// produced before frame N+1's input is consumed, because the
    /// resampler cursors and Hilbert rings carry cross-frame state.
    fn run(&mut self, running: &AtomicBool, status: &DecoderStatus) {
        log::info!(
            "Decode loop started: capture_rate={}, playback_rate={}, period={}",
            self.capture.sample_rate(),
            self.playback.sample_rate(),
            self.period(),
        );

        'outer: while running.load(Ordering::Relaxed) {
            // Blocks until the hardware has a period for us; that block is
            // the loop's pacing, there is no busy wait.
            let n = match self.capture.read_block(&mut self.read_buf) {
                Ok(0) => continue, // transient, recovered upstream
                Ok(n) => n,
                Err(e) => {
                    log::error!("Capture failed, stopping decode loop: {:#}", e);
                    break;
                }
            };

            self.block.clear();
            self.block
                .extend(self.read_buf[..n].iter().map(|&s| s as f32 / 32768.0));
            self.to_modem.process(&self.block, &mut self.modem_accum);

            while self.modem_accum.len() >= MODEM_FRAME_SAMPLES {
                if !running.load(Ordering::Relaxed) {
                    break;
                }
                if let Err(e) = self.decode_one_frame(status) {
                    log::error!("Decode frame failed, stopping decode loop: {:#}", e);
                    break 'outer;
                }
            }
        }

        self.capture.unblock();
        log::info!("Decode loop exited");
    }

    fn decode_one_frame(&mut self, status: &DecoderStatus) -> Result<()> {
        // Analytic signal: delayed real + Hilbert imaginary, time-aligned.
        self.iq_frame.clear();
        for &s in &self.modem_accum[..MODEM_FRAME_SAMPLES] {
            let (re, im) = self.hilbert.push(s);
            self.iq_frame.push(IqSample { re, im });
        }
        self.modem_accum.drain(..MODEM_FRAME_SAMPLES);

        match self.receiver.process(&self.iq_frame)? {
            RxOutput::Synced(est) => {
                status.set_synced(true);
                status.set_snr_db(est.snr_db);
                status.set_freq_offset_hz(est.freq_offset_hz);

                if let Some(window) = self.warmup.push(&est.features) {
                    let pcm = self.vocoder.synthesize(window)?;
                    self.write_out(&pcm, status)?;
                }
            }
            RxOutput::NoSync => {
                // Normal state transition, not an error: restart warmup
                // and keep feeding input in hope of resynchronizing.
                if self.warmup.state() != WarmupState::Empty {
                    log::info!("Receiver lost sync, warmup restarts");
                }
                self.warmup.reset();
                status.set_synced(false);
                status.set_output_level(0.0);
            }
        }
        Ok(())
    }

    /// Resample one vocoder frame to the device rate, publish its RMS and
    /// hand it to playback (which may block; that backpressure is the
    /// output-side flow control).
    fn write_out(&mut self, pcm: &[f32], status: &DecoderStatus) -> Result<()> {
        self.out_buf.clear();
        self.to_device.process(pcm, &mut self.out_buf);
        if self.out_buf.is_empty() {
            return Ok(());
        }

        let sum_sq: f64 = self.out_buf.iter().map(|&s| (s as f64) * (s as f64)).sum();
        status.set_output_level((sum_sq / self.out_buf.len() as f64).sqrt() as f32);

        // The worker loop stays allocation-free after the scratch
        // buffers have grown once.
        self.play_buf.clear();
        self.play_buf.extend(
            self.out_buf
                .iter()
                .map(|&s| (s * 32767.0).clamp(-32768.0, 32767.0) as i16),
        );
        self.playback.write_block(&self.play_buf)
    }

    fn period(&self) -> usize {
        self.read_buf.len()
    }
}
