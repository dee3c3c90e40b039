//! 8-bit Quantization
//!
//! Straight scalar conversion of float samples to signed 8-bit PCM: scale by
//! 127, round to nearest with ties away from zero, then saturate to
//! `[-128, 127]`. No dither, no noise shaping.

/// Full-scale multiplier for signed 8-bit output
pub const I8_SCALE: f32 = 127.0;

/// Quantize one sample
///
/// Rounds first, clamps second. NaN maps to 0.
#[inline]
pub fn quantize_sample(sample: f32) -> i8 {
    let v = (sample * I8_SCALE).round();
    // NaN passes through the clamp and `as` maps it to 0
    v.clamp(i8::MIN as f32, i8::MAX as f32) as i8
}

/// Quantize a buffer to signed 8-bit samples of the same length
pub fn quantize(samples: &[f32]) -> Vec<i8> {
    samples.iter().map(|&s| quantize_sample(s)).collect()
}
