//! Integration tests for the `howl` binary.

use std::path::Path;
use std::process::Command;

use howl_config::Preset;
use howl_io::{WavSpec, read_wav, write_wav};
use tempfile::TempDir;

fn howl_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_howl"))
}

/// Half a second of a 220 Hz sine at 44.1 kHz.
fn write_tone(path: &Path) {
    let tone: Vec<f32> = (0..22050)
        .map(|n| 0.5 * (n as f32 * 2.0 * std::f32::consts::PI * 220.0 / 44100.0).sin())
        .collect();
    write_wav(path, &[tone.as_slice()], WavSpec::default()).unwrap();
}

// ---------------------------------------------------------------------------
// `howl params`
// ---------------------------------------------------------------------------

#[test]
fn params_lists_every_parameter() {
    let output = howl_bin().arg("params").output().expect("failed to run howl params");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for id in ["gain", "filterCutoff", "reverbMix", "arpMode", "chordHold", "BITE"] {
        assert!(stdout.contains(id), "listing should contain '{id}'");
    }
    assert!(stdout.contains("39 parameter(s)"));
}

#[test]
fn params_filters_by_group() {
    let output = howl_bin()
        .args(["params", "--group", "filter"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("filterCutoff"));
    assert!(!stdout.contains("reverbMix"));

    let missing = howl_bin().args(["params", "--group", "nope"]).output().unwrap();
    assert!(!missing.status.success());
}

// ---------------------------------------------------------------------------
// `howl hunt`
// ---------------------------------------------------------------------------

#[test]
fn hunt_prints_parseable_preset() {
    let output = howl_bin()
        .args(["hunt", "--mode", "kill", "--seed", "7"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let preset = Preset::from_toml(&stdout).expect("stdout should be a preset");
    assert_eq!(preset.name, "Kill Hunt");
    assert_eq!(preset.len(), 39);
    assert_eq!(preset.get("gain"), Some(0.8));
}

#[test]
fn hunt_is_reproducible_with_a_seed() {
    let run = || {
        howl_bin()
            .args(["hunt", "--mode", "chase", "--seed", "42"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn hunt_saves_from_a_preset() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("base.toml");
    let output = dir.path().join("out/hunted.toml");
    Preset::new("Base")
        .with_param("arpEnabled", 1.0)
        .with_rhythm([0, -1, 4])
        .save(&input)
        .unwrap();

    let status = howl_bin()
        .args(["hunt", "-m", "stalk", "--seed", "1", "--from"])
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let hunted = Preset::load(&output).unwrap();
    assert_eq!(hunted.name, "Base (Stalk)");
    assert_eq!(hunted.rhythm, [0, -1, 4]);
    assert_eq!(hunted.get("arpEnabled"), Some(1.0));
}

#[test]
fn hunt_rejects_unknown_mode() {
    let output = howl_bin().args(["hunt", "--mode", "sleep"]).output().unwrap();
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// `howl render`
// ---------------------------------------------------------------------------

#[test]
fn render_writes_stereo_wav() {
    let dir = TempDir::new().unwrap();
    let sample = dir.path().join("tone.wav");
    let out = dir.path().join("render.wav");
    write_tone(&sample);

    let output = howl_bin()
        .arg("render")
        .arg(&sample)
        .arg(&out)
        .args(["--notes", "C4,E4", "--length", "0.25", "--tail", "0.25"])
        .args(["--set", "reverbMix=0.3"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "render failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let (planar, spec) = read_wav(&out).unwrap();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(planar[0].len(), 22050);
    assert!(planar[0].iter().any(|s| s.abs() > 1e-3));
    assert!(planar.iter().flatten().all(|s| s.is_finite()));
}

#[test]
fn render_kit_with_preset() {
    let dir = TempDir::new().unwrap();
    let kit = dir.path().join("kit");
    std::fs::create_dir(&kit).unwrap();
    write_tone(&kit.join("01.wav"));
    write_tone(&kit.join("02.wav"));
    let preset = dir.path().join("p.toml");
    Preset::new("Pads").with_param("gain", 0.5).save(&preset).unwrap();
    let out = dir.path().join("kit.wav");

    let status = howl_bin()
        .arg("render")
        .arg(&kit)
        .arg(&out)
        .args(["--notes", "36,37", "--sequence", "--bit-depth", "16"])
        .arg("--preset")
        .arg(&preset)
        .status()
        .unwrap();
    assert!(status.success());

    let (planar, spec) = read_wav(&out).unwrap();
    assert_eq!(spec.bits_per_sample, 16);
    // two one-second notes back to back, then the two-second tail
    assert_eq!(planar[1].len(), 4 * 44100);
}

#[test]
fn render_rejects_bad_input() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("never.wav");

    let missing = howl_bin()
        .arg("render")
        .arg(dir.path().join("missing.wav"))
        .arg(&out)
        .output()
        .unwrap();
    assert!(!missing.status.success());

    let sample = dir.path().join("tone.wav");
    write_tone(&sample);
    let bad_param = howl_bin()
        .arg("render")
        .arg(&sample)
        .arg(&out)
        .args(["--set", "howl=1"])
        .output()
        .unwrap();
    assert!(!bad_param.status.success());
    assert!(!out.exists());
}
