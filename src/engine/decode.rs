//! Audio decoding
//!
//! Turns an encoded file into planar float samples plus its sample rate.
//! Decoding is delegated to `hound` for WAV and to `symphonia` for every
//! other container; this module only adapts their output and errors.

use std::fs::File;
use std::path::Path;

use hound::{SampleFormat, WavReader};
use log::{debug, info};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{RawclipError, Result};

/// Decoded audio, one `Vec` per channel
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub channels: Vec<Vec<f32>>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        Self {
            channels,
            sample_rate,
        }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Frames in the longest channel
    pub fn num_frames(&self) -> usize {
        self.channels.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.num_frames() as f64 / self.sample_rate as f64
    }
}

/// Anything that can turn a file into [`DecodedAudio`]
pub trait AudioDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<DecodedAudio>;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Decoder to retry with when this one rejects a file's encoding
    fn fallback(&self) -> Option<Box<dyn AudioDecoder>> {
        None
    }
}

/// Pick a decoder for a path: `hound` for `.wav`, `symphonia` otherwise
pub fn decoder_for_path(path: &Path) -> Box<dyn AudioDecoder> {
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"));

    if is_wav {
        Box::new(WavDecoder)
    } else {
        Box::new(SymphoniaDecoder)
    }
}

/// Decode a file with the decoder matching its extension
pub fn decode_file(path: &Path) -> Result<DecodedAudio> {
    let decoder = decoder_for_path(path);
    info!("Decoding {} with {}", path.display(), decoder.name());
    let decoded = match (decoder.decode(path), decoder.fallback()) {
        (Err(e), Some(fallback)) if rejects_encoding(&e) => {
            info!(
                "{} could not read {} ({}); retrying with {}",
                decoder.name(),
                path.display(),
                e,
                fallback.name()
            );
            fallback.decode(path).map_err(|_| e)?
        }
        (result, _) => result?,
    };
    info!(
        "Decoded {} channel(s), {} frames at {}Hz ({:.2}s)",
        decoded.num_channels(),
        decoded.num_frames(),
        decoded.sample_rate,
        decoded.duration_secs()
    );
    Ok(decoded)
}

fn rejects_encoding(e: &RawclipError) -> bool {
    matches!(
        e,
        RawclipError::InvalidFileType { .. } | RawclipError::UnsupportedFormat { .. }
    )
}

fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(RawclipError::FileNotFound {
            path: path.display().to_string(),
            source: None,
        });
    }
    Ok(())
}

// ============================================================================
// WAV (hound)
// ============================================================================

/// WAV decoder backed by `hound`
#[derive(Debug, Clone, Copy, Default)]
pub struct WavDecoder;

impl AudioDecoder for WavDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedAudio> {
        ensure_exists(path)?;

        let reader = WavReader::open(path).map_err(map_hound_error)?;
        let spec = reader.spec();
        let channels = spec.channels as usize;
        if channels == 0 {
            return Err(RawclipError::UnsupportedFormat {
                format: "WAV with zero channels".to_string(),
            });
        }

        let interleaved = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;
        Ok(DecodedAudio::new(
            deinterleave(&interleaved, channels),
            spec.sample_rate,
        ))
    }

    fn name(&self) -> &'static str {
        "hound"
    }

    /// Companded and other non-PCM WAV encodings go through symphonia
    fn fallback(&self) -> Option<Box<dyn AudioDecoder>> {
        Some(Box::new(SymphoniaDecoder))
    }
}

fn map_hound_error(e: hound::Error) -> RawclipError {
    match e {
        hound::Error::IoError(io) => RawclipError::Decode {
            reason: io.to_string(),
            source: Some(Box::new(io)),
        },
        other => RawclipError::InvalidFileType {
            reason: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}

/// Read samples from WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    let scale = match (sample_format, bits_per_sample) {
        (SampleFormat::Float, 32) => {
            return reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(map_hound_error);
        }
        (SampleFormat::Int, 8) => 128.0,
        (SampleFormat::Int, 16) => 32768.0,
        (SampleFormat::Int, 24) => 8388608.0,
        (SampleFormat::Int, 32) => 2147483648.0,
        (format, bits) => {
            return Err(RawclipError::UnsupportedFormat {
                format: format!("{}-bit {:?} WAV", bits, format),
            })
        }
    };

    // hound widens every integer depth into i32
    reader
        .samples::<i32>()
        .map(|s| s.map(|v| v as f32 / scale))
        .collect::<std::result::Result<Vec<f32>, _>>()
        .map_err(map_hound_error)
}

/// De-interleave samples from [L,R,L,R,...] to [[L,L,...], [R,R,...]]
fn deinterleave(samples: &[f32], channels: usize) -> Vec<Vec<f32>> {
    let frames = samples.len() / channels;
    let mut result = vec![Vec::with_capacity(frames); channels];

    for frame in samples.chunks_exact(channels) {
        for (channel, sample) in result.iter_mut().zip(frame) {
            channel.push(*sample);
        }
    }

    result
}

// ============================================================================
// Everything else (symphonia)
// ============================================================================

/// General-purpose decoder backed by `symphonia`
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaDecoder;

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedAudio> {
        ensure_exists(path)?;

        let file = File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(map_symphonia_error)?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| RawclipError::InvalidFileType {
                reason: "no audio track found".to_string(),
                source: None,
            })?;
        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(map_symphonia_error)?;

        let mut channels: Vec<Vec<f32>> = Vec::new();
        let mut sample_buf: Option<SampleBuffer<f32>> = None;
        let mut skipped_packets = 0usize;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break
                }
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(map_symphonia_error(e)),
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(reason)) => {
                    debug!("Skipping corrupt packet: {}", reason);
                    skipped_packets += 1;
                    continue;
                }
                Err(e) => return Err(map_symphonia_error(e)),
            };

            let spec = *decoded.spec();
            let num_channels = spec.channels.count();
            if channels.is_empty() {
                channels = vec![Vec::new(); num_channels];
                sample_rate = sample_rate.or(Some(spec.rate));
            }

            let needed = decoded.capacity() as u64;
            if sample_buf
                .as_ref()
                .map_or(true, |buf| (buf.capacity() as u64) < needed * num_channels as u64)
            {
                sample_buf = Some(SampleBuffer::new(needed, spec));
            }

            if let Some(buf) = sample_buf.as_mut() {
                buf.copy_interleaved_ref(decoded);
                for frame in buf.samples().chunks_exact(num_channels.max(1)) {
                    for (channel, sample) in channels.iter_mut().zip(frame) {
                        channel.push(*sample);
                    }
                }
            }
        }

        if channels.iter().all(Vec::is_empty) && skipped_packets > 0 {
            return Err(RawclipError::InvalidFileType {
                reason: format!("decoding failed for all {} packets", skipped_packets),
                source: None,
            });
        }

        let sample_rate = sample_rate.ok_or_else(|| RawclipError::InvalidFileType {
            reason: "unknown sample rate".to_string(),
            source: None,
        })?;

        Ok(DecodedAudio::new(channels, sample_rate))
    }

    fn name(&self) -> &'static str {
        "symphonia"
    }
}

/// Unrecognized containers and undecodable streams become `InvalidFileType`;
/// everything else keeps its own message.
fn map_symphonia_error(e: SymphoniaError) -> RawclipError {
    match e {
        SymphoniaError::Unsupported(_) | SymphoniaError::DecodeError(_) => {
            RawclipError::InvalidFileType {
                reason: e.to_string(),
                source: Some(Box::new(e)),
            }
        }
        SymphoniaError::IoError(io) => RawclipError::Decode {
            reason: io.to_string(),
            source: Some(Box::new(io)),
        },
        other => RawclipError::Decode {
            reason: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}

// ============================================================================
// Test signals
// ============================================================================

/// Generate a mono sine wave at full scale
pub fn generate_test_tone(frequency: f32, duration_secs: f32, sample_rate: u32) -> DecodedAudio {
    let num_samples = (duration_secs * sample_rate as f32) as usize;
    let angular_freq = 2.0 * std::f32::consts::PI * frequency / sample_rate as f32;

    let samples = (0..num_samples)
        .map(|i| (angular_freq * i as f32).sin())
        .collect();

    DecodedAudio::new(vec![samples], sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write_wav(dir: &Path, name: &str, channels: u16, rate: u32, frames: &[i16]) -> PathBuf {
        let path = dir.join(name);
        let spec = hound::WavSpec {
            channels,
            sample_rate: rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for &s in frames {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        path
    }

    #[test]
    fn test_generate_test_tone() {
        let tone = generate_test_tone(440.0, 1.0, 48000);

        assert_eq!(tone.num_channels(), 1);
        assert_eq!(tone.num_frames(), 48000);
        assert!((tone.duration_secs() - 1.0).abs() < 1e-9);

        // Half a cycle in, the signal is back near zero
        let half_cycle = (48000.0 / 440.0 / 2.0) as usize;
        assert!(tone.channels[0][half_cycle].abs() < 0.1);
    }

    #[test]
    fn test_deinterleave() {
        let interleaved = vec![1.0, 5.0, 2.0, 6.0, 3.0, 7.0];
        let planar = deinterleave(&interleaved, 2);
        assert_eq!(planar, vec![vec![1.0, 2.0, 3.0], vec![5.0, 6.0, 7.0]]);
    }

    #[test]
    fn test_decoder_for_path() {
        assert_eq!(decoder_for_path(Path::new("a.wav")).name(), "hound");
        assert_eq!(decoder_for_path(Path::new("a.WAV")).name(), "hound");
        assert_eq!(decoder_for_path(Path::new("a.mp3")).name(), "symphonia");
        assert_eq!(decoder_for_path(Path::new("noext")).name(), "symphonia");
    }

    #[test]
    fn test_wav_decoder_stereo() {
        let dir = tempdir().unwrap();
        let path = write_wav(dir.path(), "stereo.wav", 2, 44100, &[16384, -16384, 0, 32767]);

        let decoded = WavDecoder.decode(&path).unwrap();

        assert_eq!(decoded.sample_rate, 44100);
        assert_eq!(decoded.num_channels(), 2);
        assert_eq!(decoded.channels[0], vec![0.5, 0.0]);
        assert_eq!(decoded.channels[1][0], -0.5);
    }

    #[test]
    fn test_symphonia_decodes_wav() {
        let dir = tempdir().unwrap();
        let frames: Vec<i16> = (0..4410).map(|i| ((i % 100) * 100) as i16).collect();
        let path = write_wav(dir.path(), "mono.wav", 1, 44100, &frames);

        let decoded = SymphoniaDecoder.decode(&path).unwrap();

        assert_eq!(decoded.sample_rate, 44100);
        assert_eq!(decoded.num_channels(), 1);
        assert_eq!(decoded.num_frames(), 4410);
        assert!((decoded.channels[0][1] - 100.0 / 32768.0).abs() < 1e-6);
    }

    /// 8kHz mono mu-law WAV, a format hound does not read
    fn write_mulaw_wav(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(4 + 8 + 18 + 8 + data.len() as u32).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&18u32.to_le_bytes());
        bytes.extend_from_slice(&7u16.to_le_bytes()); // WAVE_FORMAT_MULAW
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&8000u32.to_le_bytes());
        bytes.extend_from_slice(&8000u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&8u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&(data.len() as u32).to_le_bytes());
        bytes.extend_from_slice(data);

        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_mulaw_wav_falls_back_to_symphonia() {
        let dir = tempdir().unwrap();
        let data: Vec<u8> = (0..8000).map(|i| if i % 2 == 0 { 0x80 } else { 0x00 }).collect();
        let path = write_mulaw_wav(dir.path(), "phone.wav", &data);

        assert!(WavDecoder.decode(&path).is_err());

        let decoded = decode_file(&path).unwrap();
        assert_eq!(decoded.sample_rate, 8000);
        assert_eq!(decoded.num_channels(), 1);
        assert_eq!(decoded.num_frames(), 8000);
        assert!(decoded.channels[0].iter().any(|s| s.abs() > 0.5));
    }

    #[test]
    fn test_missing_file() {
        for decoder in [decoder_for_path(Path::new("x.wav")), decoder_for_path(Path::new("x.ogg"))] {
            match decoder.decode(Path::new("/nonexistent/path/audio.wav")) {
                Err(RawclipError::FileNotFound { path, .. }) => assert!(path.contains("nonexistent")),
                other => panic!("Expected FileNotFound error, got: {:?}", other),
            }
        }
    }

    #[test]
    fn test_garbage_is_invalid_file_type() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"this is definitely not audio data, just some text")
            .unwrap();

        let err = decode_file(&path).unwrap_err();
        assert_eq!(err.friendly_message(), "Invalid file type");

        let wav_path = dir.path().join("fake.wav");
        std::fs::write(&wav_path, b"RIFX nonsense").unwrap();
        let err = decode_file(&wav_path).unwrap_err();
        assert_eq!(err.friendly_message(), "Invalid file type");
    }
}
