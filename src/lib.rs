//! Rawclip - Short 8-bit PCM clips from any audio file
//!
//! Rawclip cuts a short window out of a recording and turns it into signed
//! 8-bit mono PCM at 48kHz, the format memory-constrained sound chips expect.
//!
//! # Pipeline
//!
//! decoded audio → resample/mixdown (preview buffer) → selection crop →
//! fade → normalize → quantize → raw byte stream
//!
//! The preview buffer is built once per file; selections and exports are
//! recomputed from it on demand.

pub mod cli;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;

pub use config::ExportOptions;
pub use engine::{PreviewBuffer, Selection, Session};
pub use error::{RawclipError, Result};
