use assert_cmd::Command;
use predicates::str::contains;
use std::error::Error;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn shutoh_cmd() -> Command {
    Command::cargo_bin("shutoh").expect("Failed to find shutoh binary")
}

#[test]
fn test_help_lists_subcommands() {
    shutoh_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("list-scenes"))
        .stdout(contains("split-video"))
        .stdout(contains("save-images"));
}

#[test]
fn test_input_is_required() {
    shutoh_cmd()
        .arg("list-scenes")
        .assert()
        .failure()
        .stderr(contains("--input"));
}

#[test]
fn test_non_existent_input() -> Result<(), Box<dyn Error>> {
    let output_dir = tempdir()?;
    shutoh_cmd()
        .arg("--input")
        .arg("surely/this/does/not/exist/input.mp4")
        .arg("--output")
        .arg(output_dir.path())
        .arg("list-scenes")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Error: No such file"));

    // Nothing is written when detection fails
    assert_eq!(std::fs::read_dir(output_dir.path())?.count(), 0);
    Ok(())
}

#[test]
fn test_unknown_detector_is_rejected() {
    shutoh_cmd()
        .args(["-i", "in.mp4", "--detector", "magic", "list-scenes"])
        .assert()
        .failure()
        .stderr(contains("invalid value 'magic'"));
}

#[test]
fn test_crf_range_is_enforced() {
    shutoh_cmd()
        .args(["-i", "in.mp4", "split-video", "--crf", "52"])
        .assert()
        .failure()
        .stderr(contains("--crf"));
}

#[test]
fn test_invalid_image_format() {
    shutoh_cmd()
        .args(["-i", "in.mp4", "save-images", "--format", "gif"])
        .assert()
        .failure()
        .stderr(contains("gif"));
}

#[test]
fn test_missing_config_file_is_reported() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("clip.mp4");
    std::fs::write(&input, "not really a video")?;

    shutoh_cmd()
        .arg("-i")
        .arg(&input)
        .arg("--config")
        .arg(dir.path().join("missing.json"))
        .arg("list-scenes")
        .assert()
        .failure()
        .stderr(contains("missing.json"));
    Ok(())
}

#[test]
fn test_malformed_config_file_is_reported() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("clip.mp4");
    std::fs::write(&input, "not really a video")?;
    let config = dir.path().join("detector.json");
    std::fs::write(&config, "{ this is not json")?;

    shutoh_cmd()
        .arg("-i")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .arg("list-scenes")
        .assert()
        .failure()
        .stderr(contains("Error: JSON error"));
    Ok(())
}
