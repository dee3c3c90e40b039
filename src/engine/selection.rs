//! Selection Model
//!
//! Holds the `[start, end)` window, in seconds, that gets cropped out of the
//! preview buffer. Updates are pure: the same raw inputs always produce the
//! same selection.
//!
//! Enforcement order for an update:
//! 1. clamp both raw endpoints into `[0, max_duration]`
//! 2. order them so `start <= end`
//! 3. push `end` out to honour the minimum span
//! 4. pull `end` in to honour the maximum span, if one is configured
//! 5. re-clamp into `[0, max_duration]`, pulling `start` back when the
//!    re-clamp shortened the span below the minimum
//!
//! Span limits hold up to [`SPAN_TOLERANCE_SECS`]: `start + MIN_SPAN_SECS`
//! can round one ulp short of the minimum. The crop length in samples is
//! unaffected.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

/// Minimum selection span in seconds (50ms)
pub const MIN_SPAN_SECS: f64 = 0.05;

/// Float slack allowed on the span limits
pub const SPAN_TOLERANCE_SECS: f64 = 1e-9;

/// Span cap used by deployments that limit clip length
pub const CAPPED_MAX_SPAN_SECS: f64 = 3.0;

/// Span limits applied on every selection update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    /// Smallest allowed `end - start`
    pub min_span_secs: f64,
    /// Largest allowed `end - start`; `None` leaves the span uncapped
    pub max_span_secs: Option<f64>,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            min_span_secs: MIN_SPAN_SECS,
            max_span_secs: None,
        }
    }
}

impl SelectionPolicy {
    /// Policy that additionally caps the span at [`CAPPED_MAX_SPAN_SECS`]
    pub fn capped() -> Self {
        Self {
            max_span_secs: Some(CAPPED_MAX_SPAN_SECS),
            ..Self::default()
        }
    }

    /// Set the span cap; non-positive or non-finite values disable it
    pub fn with_max_span(mut self, max_span_secs: Option<f64>) -> Self {
        self.max_span_secs = max_span_secs.filter(|m| m.is_finite() && *m > 0.0);
        self
    }
}

/// Selected time window in seconds
///
/// Always satisfies `0 <= start <= end <= max_duration`. Whenever
/// `max_duration >= min_span`, `end - start >= min_span` as well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    start: f64,
    end: f64,
}

impl Selection {
    /// Build a selection without applying any policy
    pub(crate) fn new_unchecked(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Initial selection for a freshly loaded preview: everything, subject to
    /// the span cap
    pub fn full(max_duration: f64, policy: &SelectionPolicy) -> Self {
        update_selection(0.0, max_duration, max_duration, policy)
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// Start label, two decimals
    pub fn start_label(&self) -> String {
        format!("{:.2}", self.start)
    }

    /// End label, two decimals
    pub fn end_label(&self) -> String {
        format!("{:.2}", self.end)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s - {}s", self.start_label(), self.end_label())
    }
}

/// Compute a selection from two raw time values
///
/// The raw values may come in either order and may lie outside
/// `[0, max_duration]`. Non-finite values are treated as 0.
pub fn update_selection(
    raw_start: f64,
    raw_end: f64,
    max_duration: f64,
    policy: &SelectionPolicy,
) -> Selection {
    let max_duration = finite_or_zero(max_duration).max(0.0);
    let clamp = |t: f64| finite_or_zero(t).clamp(0.0, max_duration);

    let a = clamp(raw_start);
    let b = clamp(raw_end);
    let mut start = a.min(b);
    let mut end = a.max(b);

    let min_span = policy.min_span_secs.max(0.0);
    if end - start < min_span {
        end = start + min_span;
    }

    if let Some(max_span) = policy.max_span_secs.map(|m| m.max(min_span)) {
        if end - start > max_span {
            end = start + max_span;
        }
    }

    if end > max_duration {
        end = max_duration;
        if end - start < min_span {
            start = (end - min_span).max(0.0);
        }
    }

    if (start, end) != (a.min(b), a.max(b)) {
        debug!(
            "Selection adjusted from [{:.3}, {:.3}] to [{:.3}, {:.3}] (max {:.3}s)",
            raw_start, raw_end, start, end, max_duration
        );
    }

    Selection { start, end }
}

/// Map a horizontal position on a waveform axis of `width` units to seconds
///
/// The axis represents `[0, max_duration]` linearly. A zero width maps
/// everything to 0.
pub fn x_to_seconds(x: f64, width: f64, max_duration: f64) -> f64 {
    if width <= 0.0 || !width.is_finite() {
        return 0.0;
    }
    (x / width) * max_duration
}

/// Inverse of [`x_to_seconds`]
pub fn seconds_to_x(secs: f64, width: f64, max_duration: f64) -> f64 {
    if max_duration <= 0.0 || !max_duration.is_finite() {
        return 0.0;
    }
    (secs / max_duration) * width
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
