// Drives the compiled binary through a PTY: real event loop, real crossterm
// input handling.
//
// Requires a TTY; ignored by default.
// Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn bundled_quiz_submits_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("quizr");
    let home = tempfile::tempdir()?;
    let cmd = format!(
        "env HOME={} {} --bundled cargo-warmup",
        home.path().display(),
        bin.display()
    );

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(300));

    // answer the first question, submit, confirm
    p.send("2")?;
    p.send("s")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("y")?;
    std::thread::sleep(Duration::from_millis(200));

    // quit from the results screen
    p.send("q")?;
    p.expect(Eof)?;
    Ok(())
}
