// Drives the compiled binary through a PTY to exercise the real event loop
// and crossterm input handling.
//
// Unix-only and ignored by default. Run manually via:
// `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_session_starts_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("overdue");
    let cmd = format!("{} --work-items 2 --seed 3", bin.display());

    let mut p = spawn(cmd)?;

    // Give the app a moment to enter the alternate screen
    std::thread::sleep(Duration::from_millis(200));

    // start, two work items, hand them in
    p.send("    ")?;
    std::thread::sleep(Duration::from_millis(200));

    p.send("\x1b")?; // ESC
    p.expect(Eof)?;
    Ok(())
}
