//! Processor trait definition
//!
//! Base trait for the sample stages applied between cropping and
//! quantization.

/// Order priority of each stage in a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProcessorPosition {
    Fade = 0,
    Normalize = 1,
}

/// A stage that rewrites a mono sample buffer in place
///
/// Processors hold no per-run state, so one instance can serve any number of
/// exports, including concurrent ones.
pub trait Processor: Send + Sync {
    /// Process the samples in place
    fn process(&self, samples: &mut [f32], sample_rate: u32);

    /// Get the processor type identifier
    fn processor_type(&self) -> &'static str;

    /// Where this stage runs relative to the others
    fn position(&self) -> ProcessorPosition;

    /// Get human-readable display name
    fn display_name(&self) -> &str;
}
