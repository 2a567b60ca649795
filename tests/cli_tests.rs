use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command running in an empty directory so no stray config file is picked up
fn clipsplit(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("clipsplit").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("CLIPSPLIT_CONFIG")
        .env_remove("CLIPSPLIT_STRATEGY")
        .env_remove("CLIPSPLIT_CUTTER_BINARY")
        .env_remove("CLIPSPLIT_CUTTER_PATH");
    cmd
}

#[test]
fn test_check_ranges_lists_parsed_ranges() {
    let dir = tempfile::tempdir().unwrap();
    clipsplit(&dir)
        .args(["check-ranges", "-r", "0:10-0:20", "-r", "90 - 120.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. 00:00:10-00:00:20 (10s)"))
        .stdout(predicate::str::contains("2. 00:01:30-00:02:00.500 (30.5s)"));
}

#[test]
fn test_check_ranges_reports_every_bad_line() {
    let dir = tempfile::tempdir().unwrap();
    clipsplit(&dir)
        .args(["check-ranges", "-r", "0:10-0:20", "-r", "bogus", "-r", "30-20"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("line 2"))
        .stderr(predicate::str::contains("line 3"));
}

#[test]
fn test_check_ranges_from_stdin_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = clipsplit(&dir)
        .args(["check-ranges", "--ranges-file", "-", "--json"])
        .write_stdin("1:00-1:30\n\n2:00 to 2:15\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let ranges = parsed.as_array().unwrap();
    assert_eq!(ranges.len(), 2);
    assert_eq!(ranges[1]["start"], 120.0);
    assert_eq!(ranges[1]["duration"], 15.0);
}

#[test]
fn test_split_missing_input_is_request_error() {
    let dir = tempfile::tempdir().unwrap();
    clipsplit(&dir)
        .args(["split", "--input", "nope.mp4", "-r", "0-5", "--out-dir", "clips"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_invalid_config_is_request_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("clipsplit.toml"),
        "[clipsplit]\nstrategy = \"sideways\"\n",
    )
    .unwrap();

    clipsplit(&dir)
        .args(["check-ranges", "-r", "0-5"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("strategy"));
}

#[test]
fn test_config_sources_are_logged() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("clipsplit.toml"),
        "[clipsplit]\nclip_prefix = \"part\"\n",
    )
    .unwrap();

    clipsplit(&dir)
        .env("CLIPSPLIT_STRATEGY", "auto")
        .args(["--log-level", "info", "check-ranges", "-r", "0-5"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Loaded configuration from"))
        .stderr(predicate::str::contains("CLIPSPLIT_STRATEGY = auto"));
}

#[test]
fn test_tools_falls_back_to_frames_without_cutter() {
    let dir = tempfile::tempdir().unwrap();
    clipsplit(&dir)
        .env("CLIPSPLIT_CUTTER_BINARY", "clipsplit-no-such-cutter")
        .args(["tools"])
        .assert()
        .success()
        .stdout(predicate::str::contains("clipsplit-no-such-cutter: not found"))
        .stdout(predicate::str::contains("strategy: frames"));
}

#[test]
fn test_tools_precise_without_cutter_fails() {
    let dir = tempfile::tempdir().unwrap();
    clipsplit(&dir)
        .env("CLIPSPLIT_CUTTER_BINARY", "clipsplit-no-such-cutter")
        .env("CLIPSPLIT_STRATEGY", "precise")
        .args(["tools", "--json"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"strategy\": null"));
}

#[test]
fn test_split_lists_clips_and_failures() {
    if which::which("ffmpeg").is_err() {
        eprintln!("Skipping test: ffmpeg not found on PATH");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source.mp4");
    let status = std::process::Command::new("ffmpeg")
        .args(["-f", "lavfi", "-i", "testsrc=size=160x120:rate=25", "-t", "4"])
        .args(["-c:v", "mpeg4", "-y"])
        .arg(&source)
        .output()
        .unwrap()
        .status;
    assert!(status.success());

    clipsplit(&dir)
        .args(["split", "--input", "source.mp4", "--out-dir", "clips"])
        .args(["-r", "0-1", "-r", "10-12", "-r", "2-3"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("1. clip_01.mp4 ("))
        .stdout(predicate::str::contains("2. FAILED:"))
        .stdout(predicate::str::contains("3. clip_03.mp4 ("))
        .stdout(predicate::str::contains("2 of 3 clip(s) written"));

    assert!(dir.path().join("clips/clip_01.mp4").is_file());
    assert!(!dir.path().join("clips/clip_02.mp4").exists());
}
