//! Preview Buffer
//!
//! The mono, fixed-rate, fixed-length buffer produced once per loaded file.
//! Selections and exports always re-derive from it; it is never mutated.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::engine::selection::Selection;

// ============================================================================
// Constants
// ============================================================================

/// Sample rate of every preview and exported clip (48kHz)
pub const TARGET_SAMPLE_RATE: u32 = 48000;

/// Default total preview duration in seconds
pub const DEFAULT_DURATION_SECS: f64 = 3.0;

/// Longest preview duration accepted, in seconds (10 minutes)
pub const MAX_DURATION_SECS: f64 = 600.0;

// ============================================================================
// Helper Functions
// ============================================================================

/// Number of whole samples covering `secs` at `sample_rate`
///
/// This is the single place where time is turned into a sample index, so that
/// buffer lengths and crop boundaries agree exactly.
#[inline]
pub fn seconds_to_samples(secs: f64, sample_rate: u32) -> usize {
    let samples = (secs * sample_rate as f64).floor();
    if samples.is_finite() && samples > 0.0 {
        samples as usize
    } else {
        0
    }
}

/// Largest absolute sample value, 0.0 for an empty slice
///
/// NaN samples are ignored.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
}

/// Convert linear amplitude to decibels
///
/// Returns -f32::INFINITY for zero input.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

// ============================================================================
// Preview Buffer
// ============================================================================

/// Mono preview of a loaded file at [`TARGET_SAMPLE_RATE`]
///
/// Cloning is cheap: the samples are shared and immutable, so a clone taken
/// for an export stays valid after the session loads another file.
#[derive(Debug, Clone)]
pub struct PreviewBuffer {
    id: Uuid,
    samples: Arc<[f32]>,
    sample_rate: u32,
    duration_secs: f64,
    created_at: DateTime<Utc>,
}

impl PreviewBuffer {
    /// Wrap resampled samples
    ///
    /// `samples.len()` must equal `floor(sample_rate * duration_secs)`; the
    /// resampler guarantees this.
    pub fn new(samples: Vec<f32>, sample_rate: u32, duration_secs: f64) -> Self {
        debug_assert_eq!(
            samples.len(),
            seconds_to_samples(duration_secs, sample_rate)
        );
        Self {
            id: Uuid::new_v4(),
            samples: samples.into(),
            sample_rate,
            duration_secs,
            created_at: Utc::now(),
        }
    }

    /// Unique id of the load that produced this buffer
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Total preview duration in seconds (the selection's `maxDuration`)
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Sample index range `[floor(start*R), floor(end*R))` for a selection
    pub fn index_range(&self, selection: &Selection) -> std::ops::Range<usize> {
        let len = self.samples.len();
        let start = seconds_to_samples(selection.start(), self.sample_rate).min(len);
        let end = seconds_to_samples(selection.end(), self.sample_rate).clamp(start, len);
        start..end
    }

    /// Samples covered by a selection
    pub fn samples_for_range(&self, selection: &Selection) -> &[f32] {
        &self.samples[self.index_range(selection)]
    }

    /// Peak level in dB
    pub fn peak_db(&self) -> f32 {
        linear_to_db(peak(&self.samples))
    }
}

impl PartialEq for PreviewBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
