//! Drives the `simtex-calc` binary through a scripted file-pair session.

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use simtex::channel::{decode_all, encode};
use tempfile::TempDir;

fn write_requests(path: &Path, messages: &[&str]) {
    let mut bytes = Vec::new();
    for message in messages {
        bytes.extend(encode(message).expect("encode request"));
    }
    fs::write(path, bytes).expect("write requests");
}

fn handshake(dir: &TempDir) -> String {
    format!(
        "{}\n{}\n",
        dir.path().join("requests").display(),
        dir.path().join("responses").display()
    )
}

fn responses(dir: &TempDir) -> Vec<String> {
    let written = fs::read(dir.path().join("responses")).expect("read responses");
    decode_all(&written).expect("decode responses")
}

#[test]
fn calculator_answers_until_exit() {
    let dir = TempDir::new().expect("temp dir");
    write_requests(
        &dir.path().join("requests"),
        &["addNumbers", "3 4", "vsum", "1,2,3.5", "vsum", "1,x", "exit", ""],
    );

    let mut command = cargo_bin_cmd!("simtex-calc");
    command
        .env("SIMTEX_LOG_FILTER", "off")
        .write_stdin(handshake(&dir));
    command.assert().success();

    let frames = responses(&dir);
    assert_eq!(frames.len(), 6, "unexpected responses: {frames:?}");
    assert_eq!(
        frames.get(..4),
        Some(
            &[
                String::from("success"),
                String::from("Numbers are: 7"),
                String::from("success"),
                String::from("6.5"),
            ][..]
        )
    );
    assert_eq!(frames.get(4).map(String::as_str), Some("error"));
    assert!(
        frames
            .get(5)
            .is_some_and(|diagnostic| diagnostic.contains("ConversionError"))
    );
}

#[test]
fn stalled_engine_fails_the_run() {
    let dir = TempDir::new().expect("temp dir");
    write_requests(&dir.path().join("requests"), &["addNumbers"]);

    let mut command = cargo_bin_cmd!("simtex-calc");
    command
        .env("SIMTEX_LOG_FILTER", "simtex=error")
        .env("SIMTEX_LOG_FORMAT", "compact")
        .env("SIMTEX_READ_TIMEOUT_SECS", "1")
        .write_stdin(handshake(&dir));
    command
        .assert()
        .failure()
        .stderr(contains("read stalled"));
}

#[test]
fn missing_handshake_fails_the_run() {
    let mut command = cargo_bin_cmd!("simtex-calc");
    command
        .env("SIMTEX_LOG_FILTER", "simtex=error")
        .env("SIMTEX_LOG_FORMAT", "compact")
        .write_stdin("");
    command
        .assert()
        .failure()
        .stderr(contains("handshake"));
}
