//! Resampling and mono mixdown
//!
//! Turns decoded planar audio at any rate into a [`PreviewBuffer`] at the
//! fixed target rate and length. Short sources are zero-padded, long sources
//! are truncated; neither is an error.
//!
//! Sample rate conversion uses linear interpolation.

use log::debug;

use crate::engine::buffer::{seconds_to_samples, PreviewBuffer};
use crate::engine::decode::DecodedAudio;

/// Mix any number of planar channels down to one by averaging
///
/// A channel shorter than the others counts as silence past its end.
/// No channels at all yields an empty buffer.
pub fn mixdown(channels: &[Vec<f32>]) -> Vec<f32> {
    match channels {
        [] => Vec::new(),
        [mono] => mono.clone(),
        _ => {
            let frames = channels.iter().map(Vec::len).max().unwrap_or(0);
            let scale = 1.0 / channels.len() as f32;
            (0..frames)
                .map(|i| {
                    channels
                        .iter()
                        .filter_map(|channel| channel.get(i))
                        .sum::<f32>()
                        * scale
                })
                .collect()
        }
    }
}

/// Resample mono samples to exactly `target_len` samples
///
/// Output sample `i` reads source position `i * source_rate / target_rate`.
/// Positions past the last source sample are zero.
pub fn resample_linear(
    samples: &[f32],
    source_rate: u32,
    target_rate: u32,
    target_len: usize,
) -> Vec<f32> {
    if samples.is_empty() || source_rate == 0 || target_rate == 0 {
        return vec![0.0; target_len];
    }

    if source_rate == target_rate {
        let mut output: Vec<f32> = samples.iter().take(target_len).copied().collect();
        output.resize(target_len, 0.0);
        return output;
    }

    let step = source_rate as f64 / target_rate as f64;
    let source_len = samples.len();

    (0..target_len)
        .map(|i| {
            let src_pos = i as f64 * step;
            let src_idx = src_pos.floor() as usize;
            let frac = (src_pos - src_idx as f64) as f32;

            if src_idx + 1 < source_len {
                samples[src_idx] * (1.0 - frac) + samples[src_idx + 1] * frac
            } else if src_idx < source_len {
                samples[src_idx]
            } else {
                0.0
            }
        })
        .collect()
}

/// Build the preview buffer for a decoded file
///
/// The result is mono, at `target_rate`, and exactly
/// `floor(target_rate * duration_secs)` samples long.
pub fn resample(decoded: &DecodedAudio, target_rate: u32, duration_secs: f64) -> PreviewBuffer {
    let target_len = seconds_to_samples(duration_secs, target_rate);
    let mono = mixdown(&decoded.channels);

    debug!(
        "Resampling {} frames x {} channels from {}Hz to {} samples at {}Hz",
        mono.len(),
        decoded.channels.len(),
        decoded.sample_rate,
        target_len,
        target_rate
    );

    let samples = resample_linear(&mono, decoded.sample_rate, target_rate, target_len);
    PreviewBuffer::new(samples, target_rate, duration_secs)
}
