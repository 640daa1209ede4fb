//! Integration tests for the `mpt` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to run the real binary against
//! files in a `tempfile` directory: file-pair conversion, `--view`, stdout
//! conversion, batch mode, format overrides, and the exit status / message
//! contract for usage, read, and decode failures.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use mpt_core::{decode, Format, Value};
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper: path to a file under tests/fixtures.
fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Helper: copy a fixture into `dir` under a new name.
fn stage_fixture(dir: &TempDir, fixture: &str, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::copy(fixture_path(fixture), &path).expect("fixture must exist");
    path
}

/// Helper: write raw bytes into `dir`.
fn stage_bytes(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("temp file must be writable");
    path
}

/// Helper: decode a file with mpt-core for structural comparison.
fn decode_file(path: &Path, format: Format) -> Value {
    let bytes = std::fs::read(path).expect("output file must exist");
    decode(&bytes, format).expect("output must decode")
}

fn mpt() -> Command {
    Command::cargo_bin("mpt").unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// File pair conversion
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn json_to_msgpack_and_back() {
    let dir = TempDir::new().unwrap();
    let input = stage_fixture(&dir, "sample.json", "input.json");
    let packed = dir.path().join("output.msgpack");
    let back = dir.path().join("roundtrip.json");

    mpt().arg(&input).arg(&packed).assert().success().stdout("");
    mpt().arg(&packed).arg(&back).assert().success();

    assert_eq!(
        decode_file(&back, Format::Json),
        decode_file(&input, Format::Json)
    );
    let text = std::fs::read_to_string(&back).unwrap();
    assert!(text.contains("9223372036854775807"), "{text}");
    assert!(text.contains("🦀"), "{text}");
    assert!(text.ends_with("}\n"), "{text:?}");
}

#[test]
fn yaml_to_msgpack_and_back() {
    let dir = TempDir::new().unwrap();
    let input = stage_fixture(&dir, "sample.yaml", "input.yml");
    let packed = dir.path().join("output.mpk");
    let back = dir.path().join("roundtrip.yaml");

    mpt().arg(&input).arg(&packed).assert().success();
    mpt().arg(&packed).arg(&back).assert().success();

    let value = decode_file(&back, Format::Yaml);
    assert_eq!(value, decode_file(&input, Format::Yaml));
    assert_eq!(value.get("replicas"), Some(&Value::Int(3)));
}

#[test]
fn format_overrides_for_unusual_extensions() {
    let dir = TempDir::new().unwrap();
    let input = stage_fixture(&dir, "sample.json", "weird.bin");
    let packed = dir.path().join("weird-output.bin");
    let back = dir.path().join("final.txt");

    mpt()
        .args(["--from", "json", "--to", "msgpack"])
        .arg(&input)
        .arg(&packed)
        .assert()
        .success();
    mpt()
        .args(["--from", "msgpack", "--to", "json"])
        .arg(&packed)
        .arg(&back)
        .assert()
        .success();

    assert_eq!(
        decode_file(&back, Format::Json),
        decode(&std::fs::read(fixture_path("sample.json")).unwrap(), Format::Json).unwrap()
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Stdout modes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn view_renders_msgpack_as_json() {
    let dir = TempDir::new().unwrap();
    // {"a": [1, null]}
    let packed = stage_bytes(&dir, "data.msgpack", &[0x81, 0xa1, b'a', 0x92, 0x01, 0xc0]);

    mpt()
        .arg("--view")
        .arg(&packed)
        .assert()
        .success()
        .stdout("{\n  \"a\": [\n    1,\n    null\n  ]\n}\n");
}

#[test]
fn view_ignores_extension() {
    let dir = TempDir::new().unwrap();
    let packed = stage_bytes(&dir, "data.bin", &[0xa2, b'o', b'k']);

    mpt()
        .arg("-v")
        .arg(&packed)
        .assert()
        .success()
        .stdout("\"ok\"\n");
}

#[test]
fn json_flag_writes_stdout() {
    let dir = TempDir::new().unwrap();
    let input = stage_fixture(&dir, "sample.yaml", "service.yaml");

    let output = mpt().arg(&input).arg("--json").output().unwrap();
    assert!(output.status.success());
    let value = decode(&output.stdout, Format::Json).unwrap();
    assert_eq!(value.get("service"), Some(&Value::from("api")));
    assert_eq!(
        value.get("env").and_then(|env| env.get("TIMEOUT")),
        Some(&Value::Null)
    );
    assert!(output.stdout.ends_with(b"}\n"));
}

#[test]
fn yaml_flag_writes_stdout() {
    let dir = TempDir::new().unwrap();
    let input = stage_bytes(&dir, "small.json", br#"{"name":"Ada","langs":["en","fr"]}"#);

    mpt()
        .arg(&input)
        .arg("--yaml")
        .assert()
        .success()
        .stdout("name: Ada\nlangs:\n- en\n- fr\n");
}

#[test]
fn from_override_applies_to_stdout_mode() {
    let dir = TempDir::new().unwrap();
    let input = stage_bytes(&dir, "payload.dat", &[0x91, 0x2a]);

    mpt()
        .args(["--from", "binary", "--json"])
        .arg(&input)
        .assert()
        .success()
        .stdout("[\n  42\n]\n");
}

// ─────────────────────────────────────────────────────────────────────────────
// Batch mode
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn batch_writes_sibling_files() {
    let dir = TempDir::new().unwrap();
    let first = stage_fixture(&dir, "sample.json", "demo0.json");
    let second = stage_fixture(&dir, "sample.yaml", "demo1.yaml");

    mpt()
        .arg(&first)
        .arg(&second)
        .arg("--to-msgpack")
        .assert()
        .success();

    let packed0 = dir.path().join("demo0.msgpack");
    let packed1 = dir.path().join("demo1.msgpack");
    assert_eq!(
        decode_file(&packed0, Format::Msgpack),
        decode_file(&first, Format::Json)
    );
    assert_eq!(
        decode_file(&packed1, Format::Msgpack),
        decode_file(&second, Format::Yaml)
    );

    mpt()
        .arg(&packed0)
        .arg(&packed1)
        .arg("--to-yaml")
        .assert()
        .success();
    assert_eq!(
        decode_file(&dir.path().join("demo0.yaml"), Format::Yaml),
        decode_file(&first, Format::Json)
    );
}

#[test]
fn batch_stops_at_first_failure() {
    let dir = TempDir::new().unwrap();
    let good = stage_bytes(&dir, "good.json", b"{\"ok\": true}");
    let bad = stage_bytes(&dir, "bad.json", b"not valid json{{{");
    let later = stage_bytes(&dir, "later.json", b"[1, 2]");

    mpt()
        .arg(&good)
        .arg(&bad)
        .arg(&later)
        .arg("--to-msgpack")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "convert json to msgpack: decode json:",
        ));

    assert!(dir.path().join("good.msgpack").exists());
    assert!(!dir.path().join("bad.msgpack").exists());
    assert!(!dir.path().join("later.msgpack").exists());
}

// ─────────────────────────────────────────────────────────────────────────────
// Failures
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_json_is_a_decode_error() {
    let dir = TempDir::new().unwrap();
    let input = stage_bytes(&dir, "empty.json", b"");
    let output = dir.path().join("out.msgpack");

    mpt()
        .arg(&input)
        .arg(&output)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("decode json"));
    assert!(!output.exists());
}

#[test]
fn empty_msgpack_is_a_decode_error() {
    let dir = TempDir::new().unwrap();
    let input = stage_bytes(&dir, "empty.msgpack", b"");

    mpt()
        .arg("--view")
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("decode msgpack: empty input"));
}

#[test]
fn malformed_yaml_is_a_decode_error() {
    let dir = TempDir::new().unwrap();
    let input = stage_bytes(&dir, "broken.yaml", b"not: valid: yaml: [[[");

    mpt()
        .arg(&input)
        .arg("--json")
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with(
            "error: convert yaml to json: decode yaml:",
        ));
}

#[test]
fn missing_input_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.json");
    let output = dir.path().join("out.yaml");

    mpt()
        .arg(&missing)
        .arg(&output)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: read "))
        .stderr(predicate::str::contains("missing.json"));
}

#[test]
fn unwritable_output_is_a_write_error() {
    let dir = TempDir::new().unwrap();
    let input = stage_bytes(&dir, "in.json", b"{}");
    let output = dir.path().join("no-such-dir").join("out.yaml");

    mpt()
        .arg(&input)
        .arg(&output)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: write "));
}

// ─────────────────────────────────────────────────────────────────────────────
// Usage errors (exit status 2)
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn undetectable_extension_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    let input = stage_bytes(&dir, "notes.txt", b"{}");
    let output = dir.path().join("out.json");

    mpt()
        .arg(&input)
        .arg(&output)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unable to infer format"))
        .stderr(predicate::str::contains("Usage:"));
    assert!(!output.exists());
}

#[test]
fn unknown_format_name_is_a_usage_error() {
    mpt()
        .args(["--from", "toml", "a.toml", "b.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn wrong_file_count_is_a_usage_error() {
    mpt()
        .arg("only.json")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("expected input and output files"));

    mpt()
        .args(["--view", "a.msgpack", "b.msgpack"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--view expects exactly one input file"));
}

#[test]
fn conflicting_modes_are_usage_errors() {
    mpt().args(["a.json", "--json", "--yaml"]).assert().code(2);
    mpt().args(["a.json", "--json", "--to-yaml"]).assert().code(2);
    mpt().args(["--view", "a.msgpack", "--yaml"]).assert().code(2);
    mpt()
        .args(["a.json", "--to", "yaml", "--to-msgpack"])
        .assert()
        .code(2);
}

#[test]
fn no_arguments_prints_help() {
    mpt()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn help_lists_every_mode() {
    mpt()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--view"))
        .stdout(predicate::str::contains("--to-msgpack"))
        .stdout(predicate::str::contains("--from <FORMAT>"));
}

#[test]
fn version_flag() {
    mpt()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("mpt "));
}
