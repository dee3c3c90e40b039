//! Export options
//!
//! The recognized configuration surface: fade, normalize, the total preview
//! duration and an optional selection span cap. Options come from a JSON file,
//! from command-line flags, or both (flags win).
//!
//! A bad duration is never fatal. It is reported as `InvalidConfiguration` by
//! the strict parser and replaced with the 3.0s default everywhere else.

use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::dsp::ProcessingFlags;
use crate::engine::buffer::{DEFAULT_DURATION_SECS, MAX_DURATION_SECS};
use crate::engine::selection::SelectionPolicy;
use crate::error::{RawclipError, Result};

/// Options applied to every export from one load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Apply a 20ms linear fade-in/out
    pub fade: bool,
    /// Peak-normalize before quantization
    pub normalize: bool,
    /// Total previewed/resampled duration in seconds
    pub duration_secs: f64,
    /// Cap on the selection span; `None` for no cap
    pub max_span_secs: Option<f64>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            fade: false,
            normalize: false,
            duration_secs: DEFAULT_DURATION_SECS,
            max_span_secs: None,
        }
    }
}

impl ExportOptions {
    /// Load options from a JSON file
    ///
    /// Missing fields take their defaults and an invalid duration is replaced
    /// with the default.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RawclipError::FileNotFound {
                path: path.display().to_string(),
                source: None,
            });
        }

        let text = fs::read_to_string(path)?;
        let options: ExportOptions = serde_json::from_str(&text)?;
        Ok(options.sanitized())
    }

    /// Replace an invalid duration with the default
    pub fn sanitized(mut self) -> Self {
        self.duration_secs = match validate_duration(self.duration_secs) {
            Ok(secs) => secs,
            Err(e) => {
                warn!("{}; using {}s", e, DEFAULT_DURATION_SECS);
                DEFAULT_DURATION_SECS
            }
        };
        self
    }

    /// Set the duration from user-entered text, falling back to the default
    pub fn with_duration_text(mut self, text: &str) -> Self {
        self.duration_secs = duration_or_default(text);
        self
    }

    pub fn flags(&self) -> ProcessingFlags {
        ProcessingFlags::new(self.fade, self.normalize)
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy::default().with_max_span(self.max_span_secs)
    }
}

/// Check that a duration is a positive number of seconds no larger than
/// [`MAX_DURATION_SECS`]
pub fn validate_duration(secs: f64) -> Result<f64> {
    if !(secs.is_finite() && secs > 0.0) {
        return Err(RawclipError::InvalidConfiguration {
            reason: format!("duration must be a positive number of seconds, got {}", secs),
        });
    }
    if secs > MAX_DURATION_SECS {
        return Err(RawclipError::InvalidConfiguration {
            reason: format!("duration {}s exceeds the {}s limit", secs, MAX_DURATION_SECS),
        });
    }
    Ok(secs)
}

/// Parse a duration strictly
pub fn parse_duration(text: &str) -> Result<f64> {
    let secs: f64 = text
        .trim()
        .parse()
        .map_err(|_| RawclipError::InvalidConfiguration {
            reason: format!("duration '{}' is not a number", text),
        })?;
    validate_duration(secs)
}

/// Parse a duration, falling back to [`DEFAULT_DURATION_SECS`]
pub fn duration_or_default(text: &str) -> f64 {
    match parse_duration(text) {
        Ok(secs) => secs,
        Err(e) => {
            warn!("{}; using {}s", e, DEFAULT_DURATION_SECS);
            DEFAULT_DURATION_SECS
        }
    }
}
