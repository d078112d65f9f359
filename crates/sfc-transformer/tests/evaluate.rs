//! Runs transformed modules under `node`. Skipped when `node` is not
//! installed.

use std::process::Command;

use sfc_transformer::{
    BoxError, CompiledTemplate, FixedConfigLoader, NullSink, TemplateCompiler, Transformer,
};

struct ConstantRender;

impl TemplateCompiler for ConstantRender {
    fn compile(&self, _markup: &str, _filename: &str) -> Result<CompiledTemplate, BoxError> {
        Ok(CompiledTemplate {
            render: "return 42".to_string(),
            static_render_fns: vec!["return 'static'".to_string()],
        })
    }
}

const PROBE: &str = r#"
const m = require(process.argv[1]);
const o = typeof m === "function" ? m.options : m;
if (typeof o.render !== "function" || o.render.length !== 0) process.exit(3);
console.log(JSON.stringify({
  name: o.name,
  render: o.render(),
  statics: o.staticRenderFns.map((f) => f()),
  extra: typeof o.probe === "function" ? o.probe() : null,
  kind: typeof m,
  ownRender: typeof m === "function" ? typeof m.render : null,
}));
"#;

/// Transforms `source`, loads it in node and returns what the probe printed.
fn evaluate(source: &str) -> Option<serde_json::Value> {
    let node = which::which("node").ok()?;

    let output = Transformer::new(ConstantRender)
        .with_config(FixedConfigLoader::default())
        .process(source, "Probe.vue", &NullSink)
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let module = dir.path().join("Probe.js");
    std::fs::write(&module, &output.code).unwrap();

    let result = Command::new(node)
        .arg("-e")
        .arg(PROBE)
        .arg(&module)
        .output()
        .unwrap();
    assert!(
        result.status.success(),
        "node failed: {}\n{}",
        String::from_utf8_lossy(&result.stderr),
        output.code
    );
    Some(serde_json::from_slice(&result.stdout).unwrap())
}

#[test]
fn test_plain_component() {
    let Some(value) = evaluate(
        "<template><div/></template>\n<script>\nexport default {\n  name: 'Plain',\n}\n</script>\n",
    ) else {
        return;
    };
    assert_eq!(value["name"], "Plain");
    assert_eq!(value["render"], 42);
    assert_eq!(value["statics"][0], "static");
}

#[test]
fn test_typescript_component() {
    let source = r#"<template><div/></template>
<script lang="ts">
enum Size { Small, Large = 10 }

class Counter {
  constructor(private start: number = 1) {}
  next(): number {
    return this.start + 1
  }
}

interface Probe {
  (): string
}

const counter = new Counter(2)
const probe: Probe = () => `${Size[Size.Large]}:${Size.Large}:${counter.next()}`

export default {
  name: 'Typed' as const,
  probe,
}
</script>
"#;
    let Some(value) = evaluate(source) else {
        return;
    };
    assert_eq!(value["name"], "Typed");
    assert_eq!(value["extra"], "Large:10:3");
}

#[test]
fn test_template_only_component() {
    let Some(value) = evaluate("<template><p>only</p></template>") else {
        return;
    };
    assert_eq!(value["render"], 42);
}

#[test]
fn test_constructor_export_gets_options_render() {
    let source = "<template><div/></template>\n<script>\nfunction Ctor() {}\nCtor.options = { name: 'C' }\nexport default Ctor\n</script>\n";
    let Some(value) = evaluate(source) else {
        return;
    };
    assert_eq!(value["kind"], "function");
    assert_eq!(value["name"], "C");
    assert_eq!(value["render"], 42);
    assert_eq!(value["statics"][0], "static");
    assert_eq!(value["ownRender"], "undefined");
}
