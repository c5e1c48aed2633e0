use assert_cmd::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn fixture(name: &str) -> PathBuf {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn run_json(args: &[&str]) -> Value {
    let exe = assert_cmd::cargo_bin!("chatbubble-cli");
    let output = Command::new(exe).args(args).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).expect("utf-8 stdout");
    serde_json::from_str(&stdout).expect("stdout is JSON")
}

fn lines(v: &Value) -> Vec<&str> {
    v["content"]["layout"]["lines"]
        .as_array()
        .expect("lines array")
        .iter()
        .map(|l| l.as_str().expect("line string"))
        .collect()
}

#[test]
fn layout_with_default_settings() {
    let hello = fixture("hello.txt");
    let v = run_json(&["layout", hello.to_string_lossy().as_ref()]);
    assert_eq!(lines(&v), vec!["Hello"]);
    assert_eq!(v["content"]["layout"]["frame_height"], 13);
    assert_eq!(v["content"]["frame"]["fill_width_px"], 42);
    assert_eq!(v["content"]["text_markup"], "<white>Hello</white>");
    // No glyphs configured: the frame renders empty.
    assert_eq!(v["content"]["frame"]["background"], "");
    assert_eq!(v["subject"], 1);
}

#[test]
fn layout_with_config_renders_frame_and_tail() {
    let hello = fixture("hello.txt");
    let config = fixture("bubble.yaml");
    let v = run_json(&[
        "layout",
        "--config",
        config.to_string_lossy().as_ref(),
        hello.to_string_lossy().as_ref(),
    ]);
    assert_eq!(v["content"]["frame"]["background"], "(--------)");
    assert_eq!(v["content"]["frame"]["tail"], "--V---");
}

#[test]
fn long_message_is_capped_with_an_ellipsis() {
    let long = fixture("long.txt");
    let config = fixture("bubble.yaml");
    let v = run_json(&[
        "--config",
        config.to_string_lossy().as_ref(),
        long.to_string_lossy().as_ref(),
    ]);
    assert_eq!(lines(&v), vec!["The quick ", "brown f..."]);
    assert_eq!(v["content"]["layout"]["frame_height"], 23);
    assert_eq!(v["content"]["frame"]["fill_width_px"], 66);
    assert_eq!(v["content"]["frame"]["tile_repeat"], 12);
}

#[test]
fn layout_reads_stdin() {
    let exe = assert_cmd::cargo_bin!("chatbubble-cli");
    let output = assert_cmd::Command::new(exe)
        .args(["layout", "-"])
        .write_stdin("a <b>\n")
        .assert()
        .success();
    let v: Value = serde_json::from_slice(&output.get_output().stdout).expect("JSON");
    assert_eq!(v["content"]["text_markup"], "<white>a &lt;b&gt;</white>");
}

#[test]
fn animate_runs_until_the_bubble_finishes() {
    let hello = fixture("hello.txt");
    let config = fixture("bubble.yaml");
    let v = run_json(&[
        "animate",
        "--config",
        config.to_string_lossy().as_ref(),
        hello.to_string_lossy().as_ref(),
    ]);
    let frames = v["frames"].as_array().expect("frames");
    // lifetime 10: 5 enter + 2 hold + 5 exit.
    assert_eq!(frames.len(), 12);
    assert_eq!(frames[0]["phase"], "entering");
    assert_eq!(frames[5]["phase"], "holding");
    assert_eq!(frames[11]["phase"], "exiting");
    assert_eq!(frames[11]["opacity"], 0);
    assert_eq!(v["finished"], true);
}

#[test]
fn animate_respects_the_tick_limit() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("msg.txt");
    fs::write(&input, "hi there").expect("write input");

    let v = run_json(&["animate", "--ticks", "3", input.to_string_lossy().as_ref()]);
    assert_eq!(v["frames"].as_array().expect("frames").len(), 3);
    assert_eq!(v["finished"], false);
}

#[test]
fn json_config_can_disable_bubbles() {
    let hello = fixture("hello.txt");
    let config = fixture("disabled.json");
    let exe = assert_cmd::cargo_bin!("chatbubble-cli");
    Command::new(exe)
        .args([
            "layout",
            "--config",
            config.to_string_lossy().as_ref(),
            hello.to_string_lossy().as_ref(),
        ])
        .assert()
        .code(3);
}

#[test]
fn bad_arguments_print_usage() {
    let exe = assert_cmd::cargo_bin!("chatbubble-cli");
    Command::new(exe).args(["--ticks", "0"]).assert().code(2);

    let exe = assert_cmd::cargo_bin!("chatbubble-cli");
    Command::new(exe).args(["--bogus"]).assert().code(2);
}

#[test]
fn malformed_config_fails() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("broken.yaml");
    fs::write(&config, "bubble: [unclosed").expect("write config");
    let hello = fixture("hello.txt");

    let exe = assert_cmd::cargo_bin!("chatbubble-cli");
    Command::new(exe)
        .args([
            "layout",
            "--config",
            config.to_string_lossy().as_ref(),
            hello.to_string_lossy().as_ref(),
        ])
        .assert()
        .code(1);
}
