use std::fs;

use assert_cmd::Command;

fn quizr(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("quizr").unwrap();
    cmd.env("HOME", home.path()).env("XDG_CONFIG_HOME", home.path().join(".config"));
    cmd
}

#[test]
fn list_prints_bundled_quizzes() {
    let home = tempfile::tempdir().unwrap();
    let out = quizr(&home).arg("--list").assert().success().get_output().stdout.clone();
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("cargo-warmup"));
    assert!(out.contains("ownership"));
    assert!(out.contains("rust-basics"));
}

#[test]
fn malformed_quiz_fails_fast() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("broken.json");
    fs::write(&path, r#"{"id": "broken", "title": "Broken", "questions": []}"#).unwrap();

    let out = quizr(&home).arg(&path).assert().failure().get_output().stderr.clone();
    assert!(String::from_utf8(out).unwrap().contains("quiz unavailable"));
}

#[test]
fn unknown_bundled_quiz_fails_fast() {
    let home = tempfile::tempdir().unwrap();
    let out = quizr(&home)
        .args(["--bundled", "no-such-quiz"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    assert!(String::from_utf8(out).unwrap().contains("quiz unavailable"));
}

#[test]
fn empty_history_prints_notice() {
    let home = tempfile::tempdir().unwrap();
    let out = quizr(&home).arg("--history").assert().success().get_output().stdout.clone();
    assert!(String::from_utf8(out).unwrap().contains("no attempts recorded yet"));
}
