use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn charsniff() -> Command {
    assert_cmd::cargo::cargo_bin_cmd!("charsniff")
}

fn fixture_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bom.csv"), b"\xEF\xBB\xBFid;name\n1;Ana\n").unwrap();
    fs::write(dir.path().join("empty.csv"), b"").unwrap();
    dir
}

#[test]
fn methods_lists_available_backends_in_order() {
    charsniff()
        .arg("methods")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("bom\n"));
}

#[test]
fn methods_all_marks_availability() {
    charsniff()
        .args(["methods", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bom\tavailable"))
        .stdout(predicate::str::contains("utf8\t"))
        .stdout(predicate::str::contains("chardetng\t"));
}

#[test]
fn detect_writes_json_array_to_stdout() {
    let dir = fixture_dir();
    let output = charsniff()
        .args(["detect", "--threads", "1"])
        .arg(dir.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["encoding"], "UTF-8");
    assert_eq!(items[0]["method"], "bom");
    assert!(items[1]["encoding"].is_null());
}

#[test]
fn detect_writes_output_file_and_honours_method() {
    let dir = fixture_dir();
    let out = dir.path().join("out").with_extension("json");
    charsniff()
        .args(["detect", "--method", "no-such-method", "--output"])
        .arg(&out)
        .arg(dir.path().join("bom.csv"))
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert!(json[0]["encoding"].is_null());
}

#[test]
fn detect_rejects_invalid_config() {
    let dir = fixture_dir();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[detect]\nconfidence = \"high\"\n").unwrap();
    charsniff()
        .args(["detect", "--config"])
        .arg(&config)
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("load config"));
}

#[test]
fn detect_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    charsniff()
        .arg("detect")
        .arg(dir.path().join("absent"))
        .assert()
        .failure();
}

fn write_config(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("charsniff.toml");
    fs::write(&path, body).unwrap();
    path
}

fn detect_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn flags_override_config_file() {
    let dir = fixture_dir();
    let config = write_config(dir.path(), "[detect]\nconfidence = 0.99\nmethod = \"chardetng\"\n");
    let json = detect_json(
        charsniff()
            .args(["detect", "--method", "bom", "--config"])
            .arg(&config)
            .arg(dir.path().join("bom.csv")),
    );
    assert_eq!(json[0]["encoding"], "UTF-8");
    assert_eq!(json[0]["method"], "bom");

    // --confidence 同样覆盖文件里的值
    let config = write_config(dir.path(), "[detect]\nconfidence = 1.5\n");
    let json = detect_json(
        charsniff()
            .args(["detect", "--confidence", "0.6", "--config"])
            .arg(&config)
            .arg(dir.path().join("bom.csv")),
    );
    assert_eq!(json[0]["encoding"], "UTF-8");
}

#[test]
fn config_file_applies_without_flags() {
    let dir = fixture_dir();
    // bom 后端置信度为 1.0，达不到文件里的 1.5
    let config = write_config(dir.path(), "[detect]\nconfidence = 1.5\n");
    let json = detect_json(
        charsniff()
            .args(["detect", "--config"])
            .arg(&config)
            .arg(dir.path().join("bom.csv")),
    );
    assert!(json[0]["encoding"].is_null());

    let config = write_config(dir.path(), "[detect]\nconfidence = 0.99\nmethod = \"chardetng\"\n");
    let json = detect_json(
        charsniff()
            .args(["detect", "--config"])
            .arg(&config)
            .arg(dir.path().join("bom.csv")),
    );
    assert!(json[0]["method"].is_null());

    // 无配置、无参数时走默认值
    let json = detect_json(charsniff().arg("detect").arg(dir.path().join("bom.csv")));
    assert_eq!(json[0]["method"], "bom");
}

#[test]
fn invalid_threads_value_warns_and_still_runs() {
    let dir = fixture_dir();
    charsniff()
        .env("RUST_LOG", "warn")
        .args(["detect", "--threads", "zero"])
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("invalid --threads value"));
}
