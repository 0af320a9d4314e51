use std::path::Path;
use std::process::Output;

use pretty_assertions::assert_eq;

fn panefold(dir: &Path, args: &[&str]) -> Output {
    test_bin::get_test_bin("panefold")
        .arg("--config")
        .arg(dir.join("config.toml"))
        .arg("--state")
        .arg(dir.join("window.ron"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run panefold")
}

fn stdout(output: &Output) -> String { String::from_utf8_lossy(&output.stdout).into_owned() }

#[test]
fn fresh_window_has_one_pane() {
    let dir = tempfile::tempdir().unwrap();
    let output = panefold(dir.path(), &["show"]);
    assert!(output.status.success());
    let tree = stdout(&output);
    assert!(tree.contains("☒ pane 0"), "{tree}");
    assert!(!tree.contains("pane 1"), "{tree}");
}

#[test]
fn commands_persist_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    assert!(panefold(dir.path(), &["open", "main.rs"]).status.success());
    let output = panefold(dir.path(), &[
        "exec",
        r#"{"create_pane_with_file":{"direction":"right"}}"#,
    ]);
    assert!(output.status.success());

    let tree = stdout(&panefold(dir.path(), &["show"]));
    assert!(tree.contains("☒ pane 1"), "{tree}");
    assert!(tree.contains("main.rs"), "{tree}");

    let tree = stdout(&panefold(dir.path(), &["reset"]));
    assert!(!tree.contains("pane 1"), "{tree}");
}

#[test]
fn saved_layouts_are_written_to_the_config() {
    let dir = tempfile::tempdir().unwrap();
    let output = panefold(dir.path(), &["exec", r#"{"create_pane":{"direction":"down"}}"#]);
    assert!(output.status.success());
    let output = panefold(dir.path(), &["exec", r#"{"save_layout":{"name":"stacked"}}"#]);
    assert!(output.status.success());

    let output = panefold(dir.path(), &["layouts"]);
    assert_eq!(stdout(&output), "stacked\n");
    assert!(panefold(dir.path(), &["--validate"]).status.success());
}

#[test]
fn failing_command_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let output = panefold(dir.path(), &["exec", r#""unzoom""#]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not zoomed"));

    let output = panefold(dir.path(), &["exec", "not json"]);
    assert!(!output.status.success());
}

#[test]
fn validate_reports_bad_settings() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[settings]\ndefault_zoom_fraction = 2.0\n")
        .unwrap();
    let output = panefold(dir.path(), &["--validate"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("default_zoom_fraction"));
}
