//! Clip Engine
//!
//! Everything between a decoded file and an exported clip:
//! - Decoding and the preview buffer
//! - Resampling and mono mixdown
//! - Selection model and waveform overview
//! - Session state and raw export

pub mod buffer;
pub mod decode;
pub mod export;
pub mod overview;
pub mod resample;
pub mod selection;
pub mod session;

pub use buffer::{PreviewBuffer, DEFAULT_DURATION_SECS, MAX_DURATION_SECS, TARGET_SAMPLE_RATE};
pub use decode::{decode_file, decoder_for_path, AudioDecoder, DecodedAudio, SymphoniaDecoder, WavDecoder};
pub use export::{encode, output_file_name, write_clip, ExportedClip, RAW_EXTENSION};
pub use overview::{overview, WaveformOverview};
pub use resample::{mixdown, resample, resample_linear};
pub use selection::{update_selection, x_to_seconds, Selection, SelectionPolicy, MIN_SPAN_SECS};
pub use session::{export_buffer, render_clip, ExportJob, Session};
