//! 127-tap FIR Hilbert transformer with matched real-part delay.
//!
//! Consumes one real sample at a time and produces the analytic-signal
//! pair: the imaginary output is the FIR convolution of the last
//! [`NTAPS`] samples with a fixed odd-symmetric coefficient set, the real
//! output is the input delayed by the filter's 63-sample group delay so
//! both components stay time-aligned.

/// FIR length. Odd, so the group delay lands on a whole sample.
pub const NTAPS: usize = 127;
/// Group delay in samples: (NTAPS - 1) / 2.
pub const GROUP_DELAY: usize = 63;

/// Hilbert FIR coefficients, designed offline: ideal response
/// 2/(pi*m) at odd offsets m from center (zero elsewhere), shaped with a
/// Hamming window.
#[rustfmt::skip]
const COEFFS: [f32; NTAPS] = [
    -8.0840606015e-04, 0.0000000000e+00, -8.5876712871e-04, 0.0000000000e+00,
    -9.6162663517e-04, 0.0000000000e+00, -1.1217520651e-03, 0.0000000000e+00,
    -1.3440888728e-03, 0.0000000000e+00, -1.6338074857e-03, 0.0000000000e+00,
    -1.9963667546e-03, 0.0000000000e+00, -2.4375983497e-03, 0.0000000000e+00,
    -2.9638180756e-03, 0.0000000000e+00, -3.5819721476e-03, 0.0000000000e+00,
    -4.2998294125e-03, 0.0000000000e+00, -5.1262347233e-03, 0.0000000000e+00,
    -6.0714448714e-03, 0.0000000000e+00, -7.1475776859e-03, 0.0000000000e+00,
    -8.3692188555e-03, 0.0000000000e+00, -9.7542525970e-03, 0.0000000000e+00,
    -1.1325016383e-02, 0.0000000000e+00, -1.3109935211e-02, 0.0000000000e+00,
    -1.5145883007e-02, 0.0000000000e+00, -1.7481677221e-02, 0.0000000000e+00,
    -2.0183395130e-02, 0.0000000000e+00, -2.3342724987e-02, 0.0000000000e+00,
    -2.7090586758e-02, 0.0000000000e+00, -3.1620360544e-02, 0.0000000000e+00,
    -3.7229688156e-02, 0.0000000000e+00, -4.4400847855e-02, 0.0000000000e+00,
    -5.3968793329e-02, 0.0000000000e+00, -6.7513221228e-02, 0.0000000000e+00,
    -8.8422721736e-02, 0.0000000000e+00, -1.2551284146e-01, 0.0000000000e+00,
    -2.1111631154e-01, 0.0000000000e+00, -6.3625574284e-01, 0.0000000000e+00,
    6.3625574284e-01, 0.0000000000e+00, 2.1111631154e-01, 0.0000000000e+00,
    1.2551284146e-01, 0.0000000000e+00, 8.8422721736e-02, 0.0000000000e+00,
    6.7513221228e-02, 0.0000000000e+00, 5.3968793329e-02, 0.0000000000e+00,
    4.4400847855e-02, 0.0000000000e+00, 3.7229688156e-02, 0.0000000000e+00,
    3.1620360544e-02, 0.0000000000e+00, 2.7090586758e-02, 0.0000000000e+00,
    2.3342724987e-02, 0.0000000000e+00, 2.0183395130e-02, 0.0000000000e+00,
    1.7481677221e-02, 0.0000000000e+00, 1.5145883007e-02, 0.0000000000e+00,
    1.3109935211e-02, 0.0000000000e+00, 1.1325016383e-02, 0.0000000000e+00,
    9.7542525970e-03, 0.0000000000e+00, 8.3692188555e-03, 0.0000000000e+00,
    7.1475776859e-03, 0.0000000000e+00, 6.0714448714e-03, 0.0000000000e+00,
    5.1262347233e-03, 0.0000000000e+00, 4.2998294125e-03, 0.0000000000e+00,
    3.5819721476e-03, 0.0000000000e+00, 2.9638180756e-03, 0.0000000000e+00,
    2.4375983497e-03, 0.0000000000e+00, 1.9963667546e-03, 0.0000000000e+00,
    1.6338074857e-03, 0.0000000000e+00, 1.3440888728e-03, 0.0000000000e+00,
    1.1217520651e-03, 0.0000000000e+00, 9.6162663517e-04, 0.0000000000e+00,
    8.5876712871e-04, 0.0000000000e+00, 8.0840606015e-04,
];

/// Streaming analytic-signal builder. Fixed-capacity rings, no allocation
/// after construction.
pub struct HilbertTransformer {
    /// FIR history of the last NTAPS input samples
    hist: [f32; NTAPS],
    /// Matched delay line for the real component
    delay: [f32; NTAPS],
    /// Shared write cursor, advances modulo NTAPS
    pos: usize,
}

impl HilbertTransformer {
    pub fn new() -> Self {
        Self {
            hist: [0.0; NTAPS],
            delay: [0.0; NTAPS],
            pos: 0,
        }
    }

    /// Push one real sample, get the (delayed real, imaginary) pair.
    ///
    /// The first [`GROUP_DELAY`] outputs after (re)initialization are the
    /// filter's startup transient against the pre-zeroed rings.
    pub fn push(&mut self, sample: f32) -> (f32, f32) {
        self.hist[self.pos] = sample;
        self.delay[self.pos] = sample;

        // y[n] = sum_k h[k] * x[n - k]
        let mut im = 0.0f32;
        for k in 0..NTAPS {
            im += COEFFS[k] * self.hist[(self.pos + NTAPS - k) % NTAPS];
        }

        // The sample from GROUP_DELAY steps ago.
        let re = self.delay[(self.pos + NTAPS - GROUP_DELAY) % NTAPS];

        self.pos = (self.pos + 1) % NTAPS;
        (re, im)
    }

    /// Zero both rings, restarting the filter transient.
    pub fn reset(&mut self) {
        self.hist = [0.0; NTAPS];
        self.delay = [0.0; NTAPS];
        self.pos = 0;
    }
}

impl Default for HilbertTransformer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coefficients_are_odd_symmetric_with_zero_even_taps() {
        for k in 0..NTAPS {
            let m = k as isize - GROUP_DELAY as isize;
            if m % 2 == 0 {
                assert_eq!(COEFFS[k], 0.0, "tap {} should be zero", k);
            }
            assert_eq!(COEFFS[k], -COEFFS[NTAPS - 1 - k], "taps {} / {}", k, NTAPS - 1 - k);
        }
        assert_eq!(COEFFS[GROUP_DELAY], 0.0);
    }

    #[test]
    fn impulse_real_part_is_delayed_exactly_63_samples() {
        let mut h = HilbertTransformer::new();
        let mut real = Vec::new();
        for n in 0..(2 * NTAPS) {
            let x = if n == 0 { 1.0 } else { 0.0 };
            let (re, _) = h.push(x);
            real.push(re);
        }
        for (n, &re) in real.iter().enumerate() {
            let expected = if n == GROUP_DELAY { 1.0 } else { 0.0 };
            assert_eq!(re, expected, "real output at index {}", n);
        }
    }

    #[test]
    fn impulse_imag_response_replays_the_coefficient_table() {
        let mut h = HilbertTransformer::new();
        for n in 0..NTAPS {
            let x = if n == 0 { 1.0 } else { 0.0 };
            let (_, im) = h.push(x);
            assert_eq!(im, COEFFS[n], "imag output at index {}", n);
        }
        // Once the impulse has left the history ring the output is zero.
        let (_, im) = h.push(0.0);
        assert_eq!(im, 0.0);
    }

    #[test]
    fn imag_response_is_antisymmetric_about_the_group_delay() {
        // Together with the 63-sample real delay this is the alignment
        // property: both components are centered on the same instant.
        for j in 1..=GROUP_DELAY {
            assert_eq!(COEFFS[GROUP_DELAY - j], -COEFFS[GROUP_DELAY + j]);
        }
    }

    #[test]
    fn reset_restarts_the_transient() {
        let mut h = HilbertTransformer::new();
        for i in 0..300 {
            h.push((i as f32 * 0.1).sin());
        }
        h.reset();
        let (re, im) = h.push(1.0);
        assert_eq!(re, 0.0); // delay ring freshly zeroed
        assert_eq!(im, COEFFS[0]);
    }
}
