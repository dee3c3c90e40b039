//! Edge Fade
//!
//! Linear fade-in and fade-out over a fixed 20ms window at each end of the
//! selected region.
//!
//! For a window of `n` samples, the gain at offset `i` from either edge is
//! `i / n`: exactly zero on the outermost sample, approaching but never
//! reaching one. Buffers shorter than `2 * n` get overlapping fades, which
//! simply multiply; buffers shorter than `n` are faded over their own length.

use crate::dsp::processor::{Processor, ProcessorPosition};

/// Fade window length in seconds (20ms)
pub const FADE_SECS: f64 = 0.020;

/// Number of samples in the fade window at `sample_rate`
#[inline]
pub fn fade_samples(sample_rate: u32) -> usize {
    (sample_rate as f64 * FADE_SECS).floor() as usize
}

/// Apply the fade-in and fade-out in place
pub fn apply_fade(samples: &mut [f32], sample_rate: u32) {
    let window = fade_samples(sample_rate);
    let len = samples.len();
    if window == 0 || len == 0 {
        return;
    }

    for i in 0..window.min(len) {
        let gain = i as f32 / window as f32;
        samples[i] *= gain;
        samples[len - 1 - i] *= gain;
    }
}

/// Fade stage for a processing chain
#[derive(Debug, Clone, Copy, Default)]
pub struct Fade;

impl Processor for Fade {
    fn process(&self, samples: &mut [f32], sample_rate: u32) {
        apply_fade(samples, sample_rate);
    }

    fn processor_type(&self) -> &'static str {
        "fade"
    }

    fn position(&self) -> ProcessorPosition {
        ProcessorPosition::Fade
    }

    fn display_name(&self) -> &str {
        "Fade In/Out"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fade_samples() {
        assert_eq!(fade_samples(48000), 960);
        assert_eq!(fade_samples(44100), 882);
        assert_eq!(fade_samples(10), 0);
    }

    #[test]
    fn test_edges_are_silent() {
        let mut samples = vec![1.0; 48000];
        apply_fade(&mut samples, 48000);

        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[47999], 0.0);
    }

    #[test]
    fn test_linear_ramp() {
        let mut samples = vec![1.0; 48000];
        apply_fade(&mut samples, 48000);

        assert_relative_eq!(samples[480], 0.5);
        assert_relative_eq!(samples[959], 959.0 / 960.0);
        assert_relative_eq!(samples[47999 - 480], 0.5);
        // Middle untouched
        assert_eq!(samples[960], 1.0);
        assert_eq!(samples[24000], 1.0);
        assert_eq!(samples[47999 - 960], 1.0);
    }

    #[test]
    fn test_overlapping_fades_multiply() {
        // 1000 samples < 2 * 960: both ramps cover the middle
        let mut samples = vec![1.0; 1000];
        apply_fade(&mut samples, 48000);

        let i = 500;
        let expected = (i as f32 / 960.0) * ((999 - i) as f32 / 960.0);
        assert_relative_eq!(samples[i], expected);
        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[999], 0.0);
    }

    #[test]
    fn test_buffer_shorter_than_window() {
        let mut samples = vec![1.0; 10];
        apply_fade(&mut samples, 48000);

        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[9], 0.0);
        assert_relative_eq!(samples[3], (3.0 / 960.0) * (6.0 / 960.0));
    }

    #[test]
    fn test_empty_and_single() {
        let mut empty: Vec<f32> = Vec::new();
        apply_fade(&mut empty, 48000);
        assert!(empty.is_empty());

        let mut single = vec![0.8];
        apply_fade(&mut single, 48000);
        assert_eq!(single, vec![0.0]);
    }

    #[test]
    fn test_processor_interface() {
        let fade = Fade;
        let mut samples = vec![0.5; 4000];
        fade.process(&mut samples, 48000);

        assert_eq!(fade.processor_type(), "fade");
        assert_eq!(samples[0], 0.0);
    }
}
