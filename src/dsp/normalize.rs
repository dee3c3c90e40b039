//! Peak Normalization
//!
//! Scales a buffer so its largest absolute sample is 1.0. A buffer whose peak
//! is zero (silence, or empty) is written out as all zeros instead of being
//! divided by zero.

use log::debug;

use crate::dsp::processor::{Processor, ProcessorPosition};
use crate::engine::buffer::peak;

/// Normalize in place to a peak of 1.0
///
/// Returns the gain that was applied, `0.0` for a silent buffer.
pub fn normalize_peak(samples: &mut [f32]) -> f32 {
    let max_abs = peak(samples);

    if max_abs > 0.0 {
        let scale = 1.0 / max_abs;
        for sample in samples.iter_mut() {
            *sample *= scale;
        }
        debug!("Normalized peak {:.4} with gain {:.4}", max_abs, scale);
        scale
    } else {
        samples.fill(0.0);
        debug!("Normalize skipped: {} silent samples", samples.len());
        0.0
    }
}

/// Peak normalization stage for a processing chain
#[derive(Debug, Clone, Copy, Default)]
pub struct PeakNormalize;

impl Processor for PeakNormalize {
    fn process(&self, samples: &mut [f32], _sample_rate: u32) {
        normalize_peak(samples);
    }

    fn processor_type(&self) -> &'static str {
        "normalize"
    }

    fn position(&self) -> ProcessorPosition {
        ProcessorPosition::Normalize
    }

    fn display_name(&self) -> &str {
        "Peak Normalize"
    }
}
