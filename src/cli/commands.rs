//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::{duration_or_default, ExportOptions};
use crate::engine::export::write_clip;
use crate::engine::{Selection, Session, WaveformOverview};
use crate::error::{RawclipError, Result};

/// Extensions picked up when an input is a directory
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "wav", "mp3", "flac", "ogg", "oga", "m4a", "mp4", "aac", "caf", "aif", "aiff",
];

/// Outcome of one input in a batch
#[derive(Debug)]
pub struct ConvertOutcome {
    pub input: PathBuf,
    pub result: Result<PathBuf>,
}

/// Merge an options file with command-line overrides
pub fn build_options(
    config: Option<&Path>,
    duration: Option<&str>,
    fade: bool,
    normalize: bool,
    max_span: Option<f64>,
) -> Result<ExportOptions> {
    let mut options = match config {
        Some(path) => ExportOptions::load(path)?,
        None => ExportOptions::default(),
    };

    options.fade |= fade;
    options.normalize |= normalize;
    if let Some(text) = duration {
        options.duration_secs = duration_or_default(text);
    }
    if max_span.is_some() {
        options.max_span_secs = max_span;
    }

    Ok(options)
}

/// Expand directories into the audio files they contain, sorted
///
/// Plain file paths are kept as given, whatever their extension, so the
/// decoder gets to decide whether they are audio.
pub fn collect_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = WalkDir::new(input)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", input.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && has_audio_extension(entry.path()))
            .map(|entry| entry.into_path())
            .collect();
        found.sort();
        files.extend(found);
    }

    files
}

fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            AUDIO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Load one file into the session, apply the selection and write its clip
///
/// `written` maps each output already produced in this batch to its input.
/// A clip that would land on one of those paths is refused instead of
/// overwriting it.
pub fn convert_one(
    session: &mut Session,
    input: &Path,
    start: Option<f64>,
    end: Option<f64>,
    options: &ExportOptions,
    output_dir: Option<&Path>,
    written: &mut HashMap<PathBuf, PathBuf>,
) -> Result<PathBuf> {
    let duration = session.load_file(input, options)?.duration_secs();

    if start.is_some() || end.is_some() {
        session.update_selection(start.unwrap_or(0.0), end.unwrap_or(duration))?;
    }

    let clip = session.export(input)?;
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let target = dir.join(&clip.file_name);
    if let Some(previous) = written.get(&target) {
        return Err(RawclipError::OutputCollision {
            path: target.display().to_string(),
            previous: previous.display().to_string(),
        });
    }

    let path = write_clip(&dir, &clip)?;
    written.insert(path.clone(), input.to_path_buf());
    Ok(path)
}

/// Convert every input, continuing past failures
///
/// One session serves the whole batch, so a selection carries over from one
/// file to the next (re-clamped to each preview).
pub fn convert(
    inputs: &[PathBuf],
    start: Option<f64>,
    end: Option<f64>,
    options: &ExportOptions,
    output_dir: Option<&Path>,
) -> Vec<ConvertOutcome> {
    let files = collect_inputs(inputs);
    info!("Converting {} file(s)", files.len());

    let mut session = Session::new();
    let mut written = HashMap::new();
    files
        .into_iter()
        .map(|input| {
            let result = convert_one(
                &mut session,
                &input,
                start,
                end,
                options,
                output_dir,
                &mut written,
            );
            match &result {
                Ok(path) => println!("{} -> {}", input.display(), path.display()),
                Err(e) => {
                    error!("{} [{}]: {}", input.display(), e.error_code(), e);
                    eprintln!("{}: {}", input.display(), e.friendly_message());
                }
            }
            ConvertOutcome { input, result }
        })
        .collect()
}

/// JSON summary printed by `inspect`
#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub input: PathBuf,
    pub preview_id: String,
    pub loaded_at: String,
    pub sample_rate: u32,
    pub samples: usize,
    pub duration_secs: f64,
    pub peak_db: Option<f32>,
    pub selection: Selection,
    pub overview: WaveformOverview,
}

/// Build the report for one file
pub fn inspect_report(input: &Path, duration: Option<&str>, width: usize) -> Result<InspectReport> {
    let options = match duration {
        Some(text) => ExportOptions::default().with_duration_text(text),
        None => ExportOptions::default(),
    };

    let mut session = Session::new();
    let preview = session.load_file(input, &options)?.clone();
    let overview = session.overview(width)?;
    let selection = session
        .selection()
        .unwrap_or_else(|| Selection::full(preview.duration_secs(), &session.policy()));
    let peak_db = preview.peak_db();

    Ok(InspectReport {
        input: input.to_path_buf(),
        preview_id: preview.id().to_string(),
        loaded_at: preview.created_at().to_rfc3339(),
        sample_rate: preview.sample_rate(),
        samples: preview.len(),
        duration_secs: preview.duration_secs(),
        peak_db: peak_db.is_finite().then_some(peak_db),
        selection,
        overview,
    })
}

/// Print the preview summary for one file
pub fn inspect(input: &Path, duration: Option<&str>, width: usize) -> Result<()> {
    let report = inspect_report(input, duration, width)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
