//! CLI Command Tests
//!
//! Drives the command implementations directly against files in a temp dir.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use rawclip::cli::commands::{build_options, collect_inputs, convert, inspect_report};
use rawclip::cli::{Cli, Commands};

fn write_tone(dir: &Path, name: &str, rate: u32, secs: f64) -> PathBuf {
    let path = dir.join(name);
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for i in 0..(rate as f64 * secs) as usize {
        let s = ((i as f64 * 0.05).sin() * 20000.0) as i16;
        writer.write_sample(s).unwrap();
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
    path
}

fn write_constant(dir: &Path, name: &str, value: i16) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 48000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for _ in 0..4800 {
        writer.write_sample(value).unwrap();
    }
    writer.finalize().unwrap();
    path
}

#[test]
fn test_parse_convert_args() {
    let cli = Cli::parse_from([
        "rawclip",
        "convert",
        "a.wav",
        "b.mp3",
        "--start",
        "0.5",
        "--end",
        "1.5",
        "--duration",
        "abc",
        "--fade",
        "--normalize",
    ]);

    match cli.command {
        Some(Commands::Convert {
            inputs,
            start,
            end,
            duration,
            fade,
            normalize,
            ..
        }) => {
            assert_eq!(inputs, vec![PathBuf::from("a.wav"), PathBuf::from("b.mp3")]);
            assert_eq!(start, Some(0.5));
            assert_eq!(end, Some(1.5));
            assert_eq!(duration.as_deref(), Some("abc"));
            assert!(fade && normalize);
        }
        other => panic!("Expected convert command, got: {:?}", other),
    }
}

#[test]
fn test_build_options_overrides_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("options.json");
    fs::write(&config, r#"{ "normalize": true, "duration_secs": 2.0 }"#).unwrap();

    let options = build_options(Some(&config), Some("abc"), true, false, Some(1.0)).unwrap();

    assert!(options.fade);
    assert!(options.normalize);
    assert_eq!(options.duration_secs, 3.0);
    assert_eq!(options.max_span_secs, Some(1.0));

    let from_file = build_options(Some(&config), None, false, false, None).unwrap();
    assert_eq!(from_file.duration_secs, 2.0);
    assert!(!from_file.fade);
}

#[test]
fn test_collect_inputs_walks_directories() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("kit").join("drums");
    fs::create_dir_all(&nested).unwrap();
    write_tone(&nested, "snare.wav", 8000, 0.1);
    write_tone(dir.path(), "kick.wav", 8000, 0.1);
    fs::write(dir.path().join("notes.txt"), "not audio").unwrap();

    let files = collect_inputs(&[dir.path().to_path_buf()]);

    assert_eq!(files.len(), 2);
    assert!(files.iter().any(|f| f.ends_with("kick.wav")));
    assert!(files.iter().any(|f| f.ends_with("snare.wav")));

    // Explicit files are kept even without an audio extension
    let explicit = collect_inputs(&[dir.path().join("notes.txt")]);
    assert_eq!(explicit.len(), 1);
}

#[test]
fn test_convert_batch_continues_past_failures() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let good = write_tone(dir.path(), "blip.wav", 44100, 2.0);
    let bad = dir.path().join("broken.wav");
    fs::write(&bad, b"not a wav file").unwrap();

    let options = build_options(None, Some("2"), true, true, None).unwrap();
    let outcomes = convert(
        &[bad.clone(), good.clone()],
        Some(0.5),
        Some(1.0),
        &options,
        Some(&out),
    );

    assert_eq!(outcomes.len(), 2);
    let failure = outcomes[0].result.as_ref().unwrap_err();
    assert_eq!(failure.friendly_message(), "Invalid file type");

    let written = outcomes[1].result.as_ref().unwrap();
    assert_eq!(written, &out.join("blip.raw12b"));
    let bytes = fs::read(written).unwrap();
    assert_eq!(bytes.len(), 24000);
    assert_eq!(bytes[0], 0);
}

#[test]
fn test_convert_defaults_to_input_directory() {
    let dir = tempdir().unwrap();
    let input = write_tone(dir.path(), "zap.wav", 48000, 1.0);

    let options = build_options(None, None, false, false, None).unwrap();
    let outcomes = convert(&[input], None, None, &options, None);

    let written = outcomes[0].result.as_ref().unwrap();
    assert_eq!(written, &dir.path().join("zap.raw12b"));
    // Whole 3s preview, zero-padded after the 1s source
    let bytes = fs::read(written).unwrap();
    assert_eq!(bytes.len(), 144000);
    assert!(bytes[48000..].iter().all(|&b| b == 0));
}

#[test]
fn test_convert_refuses_to_overwrite_within_batch() {
    let dir = tempdir().unwrap();
    let samples = dir.path().join("samples");
    let out = dir.path().join("out");
    write_constant(&samples.join("a"), "kick.wav", 16000);
    write_constant(&samples.join("b"), "kick.wav", -16000);

    let options = build_options(None, Some("0.1"), false, false, None).unwrap();
    let outcomes = convert(&[samples], None, None, &options, Some(&out));

    assert_eq!(outcomes.len(), 2);
    let written = outcomes[0].result.as_ref().unwrap();
    assert_eq!(written, &out.join("kick.raw12b"));

    let collision = outcomes[1].result.as_ref().unwrap_err();
    assert_eq!(collision.error_code(), "OUTPUT_COLLISION");
    assert!(collision.is_recoverable());

    // The first clip is left as written
    assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
    let bytes = fs::read(written).unwrap();
    assert_eq!(bytes.len(), 4800);
    assert_eq!(bytes[100], 62);
}

#[test]
fn test_inspect_report() {
    let dir = tempdir().unwrap();
    let input = write_tone(dir.path(), "probe.wav", 22050, 1.0);

    let report = inspect_report(&input, Some("1.5"), 30).unwrap();

    assert_eq!(report.sample_rate, 48000);
    assert_eq!(report.samples, 72000);
    assert_eq!(report.duration_secs, 1.5);
    assert_eq!(report.overview.points.len(), 30);
    assert_eq!(report.overview.end_x, 30.0);
    assert!(report.peak_db.is_some());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["samples"], 72000);
    assert_eq!(json["selection"]["start"], 0.0);
}
