//! Runs the `sfc-jest` binary against temporary projects.

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;

const SCRIPT_ONLY: &str = "<script>\nexport default { name: 'Plain' }\n</script>\n";
const WITH_TEMPLATE: &str =
    "<template><div>hi</div></template>\n<script>\nexport default { name: 'Hi' }\n</script>\n";

fn project(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, contents) in files {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
    dir
}

fn sfc_jest(dir: &tempfile::TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sfc-jest"))
        .arg("--cwd")
        .arg(dir.path())
        .args(args)
        .output()
        .unwrap()
}

fn json_lines(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_script_only_without_node() {
    let dir = project(&[("src/A.vue", SCRIPT_ONLY), ("src/B.vue", SCRIPT_ONLY)]);
    let output = sfc_jest(&dir, &["--node", "/nonexistent/node"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let records = json_lines(&output);
    assert_eq!(records.len(), 2);
    assert!(records[0]["file"].as_str().unwrap().ends_with("A.vue"));
    assert!(records[1]["file"].as_str().unwrap().ends_with("B.vue"));
    assert_eq!(records[0]["map"]["sources"][0], "A.vue");
    assert!(records[0]["code"]
        .as_str()
        .unwrap()
        .contains("exports.default = { name: 'Plain' }"));
}

#[test]
fn test_template_without_node_fails() {
    let dir = project(&[("A.vue", SCRIPT_ONLY), ("B.vue", WITH_TEMPLATE)]);
    let output = sfc_jest(&dir, &["--node", "/nonexistent/node"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("node binary not found"));

    let records = json_lines(&output);
    assert_eq!(records.len(), 1);
    assert!(records[0]["file"].as_str().unwrap().ends_with("A.vue"));
}

#[test]
fn test_transpile_error_still_emits() {
    let dir = project(&[("Broken.vue", "<script>\nexport default {\n</script>\n")]);
    let output = sfc_jest(&dir, &["--node", "/nonexistent/node"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json_lines(&output).len(), 1);
}

#[test]
fn test_out_dir() {
    let dir = project(&[("src/A.vue", SCRIPT_ONLY), ("node_modules/x/Dep.vue", SCRIPT_ONLY)]);
    let output = sfc_jest(&dir, &["--node", "/nonexistent/node", "--out-dir", "build"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());

    let js = fs::read_to_string(dir.path().join("build/src/A.js")).unwrap();
    assert!(js.ends_with("//# sourceMappingURL=A.js.map\n"));
    assert!(dir.path().join("build/src/A.js.map").is_file());
    assert!(!dir.path().join("build/node_modules").exists());
}

#[test]
fn test_stdin() {
    let dir = project(&[]);
    let mut child = Command::new(env!("CARGO_BIN_EXE_sfc-jest"))
        .arg("--cwd")
        .arg(dir.path())
        .args(["--node", "/nonexistent/node", "--stdin-filename", "Piped.vue"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(SCRIPT_ONLY.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let records = json_lines(&output);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["map"]["sources"][0], "Piped.vue");
}

#[test]
fn test_missing_input_is_fatal() {
    let dir = project(&[]);
    let output = sfc_jest(&dir, &["--node", "/nonexistent/node", "Missing.vue"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("input not found"));
}

#[test]
fn test_template_through_node() {
    if which::which("node").is_err() {
        return;
    }
    let compiler = "exports.compile = () => ({ render: 'with(this){return 7}', staticRenderFns: [] });";
    let dir = project(&[
        ("A.vue", WITH_TEMPLATE),
        ("node_modules/vue-template-compiler/index.js", compiler),
    ]);
    let output = sfc_jest(&dir, &[]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let records = json_lines(&output);
    assert_eq!(records.len(), 1);
    assert!(records[0]["code"]
        .as_str()
        .unwrap()
        .contains("__vue__options__.render = function render () {with(this){return 7}}"));
}

#[test]
fn test_template_compiler_errors_are_warnings() {
    if which::which("node").is_err() {
        return;
    }
    let compiler = "exports.compile = () => ({ render: 'with(this){return 7}', staticRenderFns: [], errors: ['Component template should contain exactly one root element.'] });";
    let dir = project(&[
        ("A.vue", WITH_TEMPLATE),
        ("node_modules/vue-template-compiler/index.js", compiler),
    ]);
    let output = sfc_jest(&dir, &[]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stderr).contains("exactly one root element"));

    let records = json_lines(&output);
    assert_eq!(records.len(), 1);
    assert!(records[0]["code"]
        .as_str()
        .unwrap()
        .contains("__vue__options__.render = function render () {with(this){return 7}}"));
}
