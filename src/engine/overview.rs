//! Waveform overview
//!
//! Decimated view of a preview buffer plus the horizontal positions of the
//! selection markers, for front ends that draw the waveform. Rendering itself
//! happens elsewhere.

use serde::Serialize;

use crate::engine::buffer::PreviewBuffer;
use crate::engine::selection::{seconds_to_x, Selection};

/// One point per horizontal unit, plus selection marker positions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveformOverview {
    /// Sample value drawn at each x in `0..width`
    pub points: Vec<f32>,
    /// x of the selection start marker
    pub start_x: f64,
    /// x of the selection end marker
    pub end_x: f64,
}

/// Decimate `buffer` to `width` points
///
/// Point `i` is the sample at `i * floor(len / width)`, or 0 past the end.
pub fn overview(buffer: &PreviewBuffer, selection: &Selection, width: usize) -> WaveformOverview {
    let samples = buffer.samples();
    let step = if width == 0 { 0 } else { samples.len() / width };

    let points = (0..width)
        .map(|i| samples.get(i * step).copied().unwrap_or(0.0))
        .collect();

    let max_duration = buffer.duration_secs();
    WaveformOverview {
        points,
        start_x: seconds_to_x(selection.start(), width as f64, max_duration),
        end_x: seconds_to_x(selection.end(), width as f64, max_duration),
    }
}
