//! Clip Session
//!
//! Owns everything one user works on: the current preview buffer, the
//! selection over it and the processing flags captured at load time.
//!
//! Loading is the only step that decodes or resamples. Selection updates and
//! exports are plain computations over the resident preview. An export works
//! on an [`ExportJob`] snapshot, so a load that lands while a job is still
//! rendering cannot change the job's output.

use std::path::Path;

use log::info;
use uuid::Uuid;

use crate::config::ExportOptions;
use crate::dsp::{quantize, ProcessingChain, ProcessingFlags};
use crate::engine::buffer::{PreviewBuffer, TARGET_SAMPLE_RATE};
use crate::engine::decode::{decode_file, DecodedAudio};
use crate::engine::export::{output_file_name, ExportedClip};
use crate::engine::overview::{overview, WaveformOverview};
use crate::engine::resample::resample;
use crate::engine::selection::{update_selection, x_to_seconds, Selection, SelectionPolicy};
use crate::error::{RawclipError, Result};

/// Crop, process and quantize one selection of a preview
///
/// Pure: identical inputs give identical output.
pub fn render_clip(preview: &PreviewBuffer, selection: &Selection, flags: ProcessingFlags) -> Vec<i8> {
    let samples = export_buffer(preview, selection, flags);
    quantize(&samples)
}

/// Crop and process one selection of a preview, before quantization
///
/// The result has `floor(end*R) - floor(start*R)` samples.
pub fn export_buffer(
    preview: &PreviewBuffer,
    selection: &Selection,
    flags: ProcessingFlags,
) -> Vec<f32> {
    let mut samples = preview.samples_for_range(selection).to_vec();
    ProcessingChain::from_flags(flags).process(&mut samples, preview.sample_rate());
    samples
}

/// Everything an export needs, captured at one instant
#[derive(Debug, Clone)]
pub struct ExportJob {
    preview: PreviewBuffer,
    selection: Selection,
    flags: ProcessingFlags,
}

impl ExportJob {
    pub fn new(preview: PreviewBuffer, selection: Selection, flags: ProcessingFlags) -> Self {
        Self {
            preview,
            selection,
            flags,
        }
    }

    /// Id of the preview this job was taken from
    pub fn preview_id(&self) -> Uuid {
        self.preview.id()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn flags(&self) -> ProcessingFlags {
        self.flags
    }

    /// Processed float samples for the selection
    pub fn export_buffer(&self) -> Vec<f32> {
        export_buffer(&self.preview, &self.selection, self.flags)
    }

    /// Quantized samples for the selection
    pub fn render(&self) -> Vec<i8> {
        render_clip(&self.preview, &self.selection, self.flags)
    }

    /// Render and encode into a clip named after `input`
    pub fn export(&self, input: &Path) -> ExportedClip {
        let clip = ExportedClip::new(output_file_name(input), &self.render());
        info!(
            "Exported {} samples for {} as {}",
            clip.len(),
            self.selection,
            clip.file_name
        );
        clip
    }
}

/// Session state for one user
#[derive(Debug, Clone, Default)]
pub struct Session {
    preview: Option<PreviewBuffer>,
    selection: Option<Selection>,
    flags: ProcessingFlags,
    policy: SelectionPolicy,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the preview for decoded audio and make it current
    ///
    /// Replaces any previous preview. The flags and span cap from `options`
    /// apply to every export until the next load. An existing selection is
    /// kept and re-clamped to the new duration; otherwise everything is
    /// selected.
    pub fn load(&mut self, decoded: &DecodedAudio, options: &ExportOptions) -> &PreviewBuffer {
        let options = options.clone().sanitized();
        let preview = resample(decoded, TARGET_SAMPLE_RATE, options.duration_secs);
        let max_duration = preview.duration_secs();

        self.flags = options.flags();
        self.policy = options.selection_policy();
        self.selection = Some(match self.selection {
            Some(current) => update_selection(current.start(), current.end(), max_duration, &self.policy),
            None => Selection::full(max_duration, &self.policy),
        });

        info!(
            "Loaded preview {} ({} samples, {:.2}s, fade={}, normalize={})",
            preview.id(),
            preview.len(),
            max_duration,
            self.flags.fade,
            self.flags.normalize
        );

        self.preview.insert(preview)
    }

    /// Decode a file and load it
    pub fn load_file(&mut self, path: &Path, options: &ExportOptions) -> Result<&PreviewBuffer> {
        let decoded = decode_file(path)?;
        Ok(self.load(&decoded, options))
    }

    pub fn preview(&self) -> Option<&PreviewBuffer> {
        self.preview.as_ref()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn flags(&self) -> ProcessingFlags {
        self.flags
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    fn require_preview(&self, operation: &str) -> Result<&PreviewBuffer> {
        self.preview.as_ref().ok_or_else(|| RawclipError::NoPreview {
            operation: operation.to_string(),
        })
    }

    /// Move the selection to two raw times in seconds
    pub fn update_selection(&mut self, raw_start: f64, raw_end: f64) -> Result<Selection> {
        let max_duration = self.require_preview("selection")?.duration_secs();
        let selection = update_selection(raw_start, raw_end, max_duration, &self.policy);
        self.selection = Some(selection);
        Ok(selection)
    }

    /// Move the selection from a drag between two positions on an axis of
    /// `width` units spanning the whole preview
    pub fn select_on_axis(&mut self, from_x: f64, to_x: f64, width: f64) -> Result<Selection> {
        let max_duration = self.require_preview("selection")?.duration_secs();
        self.update_selection(
            x_to_seconds(from_x, width, max_duration),
            x_to_seconds(to_x, width, max_duration),
        )
    }

    /// Samples under the current selection
    pub fn samples_for_selection(&self) -> Result<&[f32]> {
        let preview = self.require_preview("range query")?;
        Ok(self.selection.map_or(&[][..], |s| preview.samples_for_range(&s)))
    }

    /// Waveform overview of the current preview
    pub fn overview(&self, width: usize) -> Result<WaveformOverview> {
        let preview = self.require_preview("overview")?;
        let selection = self
            .selection
            .unwrap_or_else(|| Selection::full(preview.duration_secs(), &self.policy));
        Ok(overview(preview, &selection, width))
    }

    /// Capture preview, selection and flags for an export
    pub fn snapshot(&self) -> Result<ExportJob> {
        let preview = self.require_preview("export")?;
        let selection = self
            .selection
            .unwrap_or_else(|| Selection::full(preview.duration_secs(), &self.policy));
        Ok(ExportJob::new(preview.clone(), selection, self.flags))
    }

    /// Whether a job was taken from the preview that is still current
    pub fn is_current(&self, job: &ExportJob) -> bool {
        self.preview
            .as_ref()
            .is_some_and(|p| p.id() == job.preview_id())
    }

    /// Snapshot and export in one step
    pub fn export(&self, input: &Path) -> Result<ExportedClip> {
        Ok(self.snapshot()?.export(input))
    }
}
