//! Runs the `dtk` binary against temporary token files

use std::fs;
use std::process::{Command, Output};

fn dtk(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dtk"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn resolve_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let tokens = dir.path().join("tokens.json");
    let out = dir.path().join("resolved.json");
    fs::write(
        &tokens,
        r##"{ "color": { "brand": { "value": "#6366f1" }, "light": { "value": "tint({color.brand}, 80%)" } } }"##,
    )
    .unwrap();

    let output = dtk(&[
        "resolve",
        tokens.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let resolved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(resolved["color"]["light"]["value"], "#dce2ff");
    assert_eq!(resolved["color"]["light"]["original"], "tint({color.brand}, 80%)");
}

#[test]
fn warnings_do_not_fail_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let tokens = dir.path().join("tokens.json");
    fs::write(&tokens, r#"{ "a": { "value": "{missing.path}" } }"#).unwrap();

    let output = dtk(&["resolve", tokens.to_str().unwrap(), "--report"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stderr).contains("W110"));
}

#[test]
fn json_log_format_writes_one_event_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let tokens = dir.path().join("tokens.json");
    fs::write(&tokens, r#"{ "a": { "value": "{missing.path}" } }"#).unwrap();

    let output = dtk(&["resolve", tokens.to_str().unwrap(), "--log-format", "json"]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let line = stderr.lines().find(|l| l.contains("W110")).unwrap();
    let event: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(event["level"], "WARN");
    assert_eq!(event["token_path"], "a");
}

#[test]
fn detailed_report_explains_each_warning() {
    let dir = tempfile::tempdir().unwrap();
    let tokens = dir.path().join("tokens.json");
    fs::write(
        &tokens,
        r#"{ "a": { "value": "tint({b}, 10%)" }, "b": { "value": "shade({a}, 10%)" } }"#,
    )
    .unwrap();

    let output = dtk(&[
        "resolve",
        tokens.to_str().unwrap(),
        "--report",
        "--report-format",
        "detailed",
    ]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    assert!(stderr.contains("W140"));
    assert!(stderr.contains("Recommended action: Break the cycle"));
    assert!(stderr.contains("2 token(s) resolved, 0 changed, 2 with warnings"));

    let resolved: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(resolved["a"]["value"], "tint({b}, 10%)");
}

#[test]
fn invalid_input_exits_with_two() {
    let dir = tempfile::tempdir().unwrap();
    let tokens = dir.path().join("tokens.json");
    fs::write(&tokens, "[1, 2, 3]").unwrap();

    assert_eq!(dtk(&["resolve", tokens.to_str().unwrap()]).status.code(), Some(2));
    assert_eq!(
        dtk(&["resolve", dir.path().join("absent.json").to_str().unwrap()])
            .status
            .code(),
        Some(2)
    );
}

#[test]
fn eval_prints_the_value() {
    let output = dtk(&["eval", "add(1rem, 8px)"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "1.5rem");
}

#[test]
fn eval_uses_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("engine.toml");
    fs::write(&config, "base_font_size = 10\n").unwrap();

    let output = dtk(&["eval", "convert(15px, rem)", "--config", config.to_str().unwrap()]);
    assert_eq!(stdout(&output).trim(), "1.5rem");
}

#[test]
fn functions_listing() {
    let output = dtk(&["functions", "--family", "math", "--json"]);
    assert!(output.status.success());
    let listing: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let names: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 15);
    assert!(names.contains(&"percent"));

    assert_eq!(dtk(&["functions", "--family", "sparkle"]).status.code(), Some(2));
}
