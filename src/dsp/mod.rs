//! Signal conditioning: sample-rate conversion and analytic-signal
//! construction.

pub mod hilbert;
pub mod resampler;

pub use hilbert::HilbertTransformer;
pub use resampler::LinearResampler;
