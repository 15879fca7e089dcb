//! Linear-interpolation fractional resampler.
//!
//! One stateful instance per stream direction. The fractional read cursor
//! is `f64` so phase drift stays bounded over multi-hour sessions, and the
//! last consumed sample is carried across block boundaries so the output
//! stream has no seams at call boundaries.

/// Converts a sample stream from one fixed rate to another by linear
/// interpolation between the two bracketing input samples.
pub struct LinearResampler {
    /// Input samples consumed per output sample produced (R_in / R_out)
    step: f64,
    /// Fractional read position relative to the start of the current
    /// block; -1.0 addresses the carried `prev` sample
    pos: f64,
    /// Last sample of the previous block, for interpolation across calls
    prev: f32,
    /// Fast path when the negotiated rates happen to be equal
    identity: bool,
}

impl LinearResampler {
    pub fn new(in_rate: u32, out_rate: u32) -> Self {
        Self {
            step: in_rate as f64 / out_rate as f64,
            pos: 0.0,
            prev: 0.0,
            identity: in_rate == out_rate,
        }
    }

    /// Consume `input` and append the resampled stream to `out`.
    ///
    /// Output instants that fall between the last sample of this block
    /// and the first sample of the next are deferred until that next
    /// block arrives; the cursor never resets mid-stream.
    pub fn process(&mut self, input: &[f32], out: &mut Vec<f32>) {
        if input.is_empty() {
            return;
        }
        if self.identity {
            // Avoids needless floating-point drift when rates match.
            out.extend_from_slice(input);
            self.prev = input[input.len() - 1];
            return;
        }

        let n = input.len();
        while self.pos <= n as f64 - 1.0 {
            let idx = self.pos.floor() as isize;
            let frac = (self.pos - idx as f64) as f32;
            let s0 = if idx < 0 { self.prev } else { input[idx as usize] };
            // Hold the last known sample on underrun rather than
            // substituting zero, which would click.
            let s1 = if idx + 1 < n as isize {
                input[(idx + 1) as usize]
            } else {
                s0
            };
            out.push(s0 + (s1 - s0) * frac);
            self.pos += self.step;
        }

        self.pos -= n as f64;
        self.prev = input[n - 1];
    }

    /// Return the cursor to the stream-open state. Only valid when the
    /// stream itself is reopened.
    pub fn reset(&mut self) {
        self.pos = 0.0;
        self.prev = 0.0;
    }
}
