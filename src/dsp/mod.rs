//! Sample Processing
//!
//! The stages applied to a cropped selection before it is quantized.

mod chain;
mod fade;
mod normalize;
mod processor;
mod quantize;

pub use chain::{ProcessingChain, ProcessingFlags};
pub use fade::{apply_fade, fade_samples, Fade, FADE_SECS};
pub use normalize::{normalize_peak, PeakNormalize};
pub use processor::{Processor, ProcessorPosition};
pub use quantize::{quantize, quantize_sample, I8_SCALE};
