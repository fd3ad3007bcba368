//! CLI 冒烟测试

use assert_cmd::Command;

#[test]
fn test_help_runs() {
    let output = Command::cargo_bin("morphous")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("morphological"));
    assert!(stdout.contains("--start"));
}

#[test]
fn test_unknown_language_is_rejected() {
    Command::cargo_bin("morphous")
        .unwrap()
        .args(["textus", "klingon"])
        .assert()
        .failure();
}

/// 起始序号在文本末尾之后：不触发任何远端调用，正常退出
#[test]
fn test_start_beyond_input_makes_no_remote_calls() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::cargo_bin("morphous")
        .unwrap()
        .env("MORPHOUS_CACHE_DIR", dir.path())
        .args(["amare est", "la", "--start", "10", "--no-cache-save"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--start was set beyond the end of input"));
}
