//! Raw clip export
//!
//! Serializes quantized samples as a flat byte stream: one two's-complement
//! byte per sample, no header, no metadata. Files are named after the input
//! with a fixed `.raw12b` extension.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Extension of every exported clip
pub const RAW_EXTENSION: &str = "raw12b";

/// Encode signed 8-bit samples, one byte each
pub fn encode(quantized: &[i8]) -> Vec<u8> {
    quantized.iter().map(|&v| v as u8).collect()
}

/// Output file name for an input path: last extension replaced by `.raw12b`
///
/// `song.mp3` becomes `song.raw12b`, `a.b.wav` becomes `a.b.raw12b` and a
/// name without extension just gains one. A dotfile such as `.hidden` is all
/// extension, so it becomes `.raw12b`.
pub fn output_file_name(input: &Path) -> String {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let base = match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() => &name[..dot],
        _ => name.as_str(),
    };

    format!("{}.{}", base, RAW_EXTENSION)
}

/// Hex SHA-256 of a byte stream
pub fn checksum(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// A finished clip ready for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedClip {
    pub file_name: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// SHA-256 of `bytes`; equal inputs always give equal checksums
    pub checksum: String,
}

impl ExportedClip {
    pub fn new(file_name: String, quantized: &[i8]) -> Self {
        let bytes = encode(quantized);
        let checksum = checksum(&bytes);
        Self {
            file_name,
            bytes,
            checksum,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Write a clip into `dir`, returning the full path
pub fn write_clip(dir: &Path, clip: &ExportedClip) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&clip.file_name);
    fs::write(&path, &clip.bytes)?;
    info!(
        "Wrote {} ({} bytes, sha256 {})",
        path.display(),
        clip.len(),
        clip.checksum.get(..12).unwrap_or(&clip.checksum)
    );
    Ok(path)
}
