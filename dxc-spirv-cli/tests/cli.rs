use std::fs;

use assert_cmd::Command;
use tempfile::tempdir;

#[test]
fn missing_file_fails_with_message() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("RayQuery.compute");

    let output = Command::cargo_bin("dxc-spirv")
        .unwrap()
        .arg(&missing)
        .output()
        .expect("run dxc-spirv");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to open shader file"), "stderr: {}", stderr);
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_file_wins_over_missing_compiler() {
    let tmp = tempdir().unwrap();

    let output = Command::cargo_bin("dxc-spirv")
        .unwrap()
        .arg(tmp.path().join("RayQuery.compute"))
        .args(["--backend", "dxc-exe", "--dxc-path"])
        .arg(tmp.path().join("no-such-dxc"))
        .output()
        .expect("run dxc-spirv");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to open shader file"), "stderr: {}", stderr);
    assert!(!stderr.contains("backend is not available"), "stderr: {}", stderr);
}

#[test]
fn unknown_backend_is_rejected() {
    let output = Command::cargo_bin("dxc-spirv")
        .unwrap()
        .args(["--backend", "fxc"])
        .output()
        .expect("run dxc-spirv");
    assert!(!output.status.success());
}

#[test]
fn missing_dxc_executable_fails() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("RayQuery.compute");
    fs::write(&src, "[numthreads(1,1,1)] void main() {}").unwrap();

    let output = Command::cargo_bin("dxc-spirv")
        .unwrap()
        .arg(&src)
        .args(["--backend", "dxc-exe", "--dxc-path"])
        .arg(tmp.path().join("no-such-dxc"))
        .output()
        .expect("run dxc-spirv");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("dxc-exe backend is not available"), "stderr: {}", stderr);
}

#[test]
fn help_lists_backends() {
    let output = Command::cargo_bin("dxc-spirv")
        .unwrap()
        .arg("--help")
        .output()
        .expect("run dxc-spirv");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("dxc-exe"));
    assert!(stdout.contains("--allow-warnings"));
}
