use std::path::PathBuf;

use assert_cmd::Command;

fn sample(name: &str) -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let mut path = PathBuf::from(manifest_dir);
    path.push("samples");
    path.push(name);
    path
}

fn luair() -> Command {
    Command::cargo_bin("luair").expect("luair binary is built")
}

#[test]
fn lowers_sample_to_text() {
    let output = luair().arg(sample("assign.lua")).output().expect("failed to spawn luair");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("module {"), "{}", stdout);
    assert!(stdout.contains("func @main()"));
    assert!(stdout.contains("lua.get_or_alloc {var = \"greeting\"}"));
    assert!(stdout.contains("lua.number {value = 2.5 : f64}"));
    assert!(stdout.contains("lua.call("));
    assert!(stdout.contains(" = lua.unpack("));
}

#[test]
fn unsupported_construct_fails_with_report() {
    let output = luair().arg(sample("loop.lua")).output().expect("failed to spawn luair");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("whileloop not implemented"), "{}", stderr);
    assert!(stderr.contains("loop.lua:2:1"), "{}", stderr);
}

#[test]
fn syntax_error_fails_with_location() {
    let dir = tempfile::tempdir().expect("temp dir");
    let script = dir.path().join("broken.lua");
    std::fs::write(&script, "x = (1\n").expect("write script");

    let output = luair().arg(&script).output().expect("failed to spawn luair");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("LUAIR | ERROR |"), "{}", stderr);
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = luair().arg(dir.path().join("absent.lua")).output().expect("failed to spawn luair");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Cannot read script"));
}

#[test]
fn emits_json() {
    let output = luair()
        .arg(sample("assign.lua"))
        .args(["--emit", "json"])
        .output()
        .expect("failed to spawn luair");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(json["functions"][0]["name"], "main");
    assert!(json["ops"].as_array().is_some_and(|ops| !ops.is_empty()));
}

#[test]
fn writes_output_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let target = dir.path().join("out.mlir");

    let output = luair()
        .arg(sample("assign.lua"))
        .arg("-o")
        .arg(&target)
        .output()
        .expect("failed to spawn luair");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let written = std::fs::read_to_string(&target).expect("output file exists");
    assert!(written.starts_with("module {"));
    assert!(written.ends_with('}'));
}

#[test]
fn prints_operation_statistics() {
    let output = luair()
        .arg(sample("assign.lua"))
        .arg("--stats")
        .output()
        .expect("failed to spawn luair");
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("operation"), "{}", stderr);
    assert!(stderr.contains("lua.assign"));
    assert!(stderr.contains("total"));
}

#[test]
fn quiet_and_verbose_conflict() {
    let output = luair()
        .arg(sample("assign.lua"))
        .args(["-q", "-v"])
        .output()
        .expect("failed to spawn luair");
    assert!(!output.status.success());
}

#[test]
fn verbose_flags_enable_debug_logging() {
    let output = luair()
        .env_remove("RUST_LOG")
        .arg(sample("assign.lua"))
        .arg("-vv")
        .output()
        .expect("failed to spawn luair");
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("INFO"), "{}", stderr);
    assert!(stderr.contains("compiling"), "{}", stderr);
    assert!(stderr.contains("DEBUG"), "{}", stderr);
    assert!(stderr.contains("top-level statements"), "{}", stderr);
}

#[test]
fn quiet_flag_silences_logging() {
    let output = luair()
        .env_remove("RUST_LOG")
        .arg(sample("assign.lua"))
        .arg("-q")
        .output()
        .expect("failed to spawn luair");
    assert!(output.status.success());
    assert!(output.stderr.is_empty(), "{}", String::from_utf8_lossy(&output.stderr));
}
