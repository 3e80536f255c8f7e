#![allow(deprecated)]
//! Exit codes and output of the `print-memory-stream` binary.

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;

fn memory_stream_cmd() -> Command {
    let mut cmd = Command::cargo_bin("print-memory-stream").expect("binary not found");
    cmd.env_remove("GALACTIC_CONSOLE_BASE_URL")
        .env_remove("GALACTIC_CONSOLE_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_flags() {
    memory_stream_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--base-url"))
        .stdout(predicate::str::contains("--api-key"))
        .stdout(predicate::str::contains("--encoding"));
}

#[test]
fn prints_decoded_stream() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/getSystem");
        then.status(200)
            .json_body(serde_json::json!({"memory_stream": "TWVtb3J5IG9ubGluZQ=="}));
    });

    memory_stream_cmd()
        .arg("--base-url")
        .arg(server.base_url())
        .assert()
        .success()
        .stdout("Memory online\n");
}

#[test]
fn base_url_from_environment() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/getSystem");
        then.status(200)
            .json_body(serde_json::json!({"memory": "plain text stream"}));
    });

    memory_stream_cmd()
        .env("GALACTIC_CONSOLE_BASE_URL", server.base_url())
        .assert()
        .success()
        .stdout("plain text stream\n");
}

#[test]
fn missing_base_url_exits_non_zero() {
    memory_stream_cmd()
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("client unavailable"));
}

#[test]
fn unknown_encoding_exits_non_zero() {
    memory_stream_cmd()
        .args(["--base-url", "http://127.0.0.1:9", "--encoding", "klingon"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("klingon"));
}

#[test]
fn missing_call_exits_non_zero() {
    let server = MockServer::start();

    memory_stream_cmd()
        .arg("--base-url")
        .arg(server.base_url())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("getSystem"));
}

#[test]
fn missing_field_exits_non_zero() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/getSystem");
        then.status(200).json_body(serde_json::json!({"status": "green"}));
    });

    memory_stream_cmd()
        .arg("--base-url")
        .arg(server.base_url())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("memory stream"));
}

#[test]
fn unencodable_text_exits_non_zero() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/getSystem");
        then.status(200).json_body(serde_json::json!({"memory_stream": "Überraum"}));
    });

    memory_stream_cmd()
        .arg("--base-url")
        .arg(server.base_url())
        .args(["--encoding", "ascii"])
        .assert()
        .code(5);
}
