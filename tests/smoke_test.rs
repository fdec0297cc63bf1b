/// Smoke tests to verify the binary runs without panicking
use std::path::PathBuf;
use std::process::Command;

fn fractree() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fractree"));
    // Keep a developer's config.toml out of the picture
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("fractree-smoke-config"));
    cmd
}

fn temp_png(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("fractree-{}-{}.png", name, std::process::id()))
}

#[test]
fn binary_shows_help() {
    let output = fractree()
        .arg("--help")
        .output()
        .expect("Failed to run fractree");

    assert!(
        output.status.success(),
        "Binary failed to run --help: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("fractree"), "Help output should mention fractree");
    assert!(stdout.contains("export"), "Help output should list the export command");
}

#[test]
fn binary_shows_version() {
    let output = fractree()
        .arg("--version")
        .output()
        .expect("Failed to run fractree");

    assert!(
        output.status.success(),
        "Binary failed to run --version: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn invalid_subcommand_fails_gracefully() {
    let output = fractree()
        .arg("nonexistent-command")
        .output()
        .expect("Failed to run fractree");

    // Should fail with error, not panic
    assert!(
        !output.status.success(),
        "Invalid subcommand should return error status"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("panicked at"),
        "Invalid subcommand should not cause panic"
    );
}

#[test]
fn export_writes_full_size_png() {
    let out = temp_png("full");
    let output = fractree()
        .args(["export", "--seed", "7", "--depth", "8", "--out"])
        .arg(&out)
        .output()
        .expect("Failed to run fractree");

    assert!(
        output.status.success(),
        "export failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let img = image::open(&out).expect("export should write a readable PNG");
    assert_eq!((img.width(), img.height()), (1000, 650));
    let _ = std::fs::remove_file(&out);
}

#[test]
fn export_mid_growth_snapshot() {
    let out = temp_png("partial");
    let output = fractree()
        .args(["export", "--frames", "3", "--grow-speed", "10", "--preset", "neon", "--theme", "snow"])
        .args(["--width", "320", "--height", "200", "--out"])
        .arg(&out)
        .output()
        .expect("Failed to run fractree");

    assert!(
        output.status.success(),
        "export failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let img = image::open(&out).expect("export should write a readable PNG");
    assert_eq!((img.width(), img.height()), (320, 200));
    let _ = std::fs::remove_file(&out);
}

#[test]
fn export_into_missing_directory_fails_cleanly() {
    let out = std::env::temp_dir().join("fractree-no-such-dir").join("nested").join("tree.png");
    let output = fractree()
        .args(["export", "--out"])
        .arg(&out)
        .output()
        .expect("Failed to run fractree");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("panicked at"));
    assert!(stderr.contains("does not exist"));
}
