//! node process runner.

use camino::{Utf8Path, Utf8PathBuf};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::process::{Command, Stdio};
use thiserror::Error;

/// Read one JSON request from stdin, answer with one JSON response on stdout.
/// Packages resolve from the working directory, which is the project root.
const NODE_SCRIPT: &str = r#"
const { createRequire } = require('node:module');
const path = require('node:path');

const projectRequire = createRequire(path.join(process.cwd(), 'package.json'));

function handle(req) {
  switch (req.op) {
    case 'compile': {
      const compiler = projectRequire('vue-template-compiler');
      const res = compiler.compile(req.source);
      return {
        render: res.render,
        staticRenderFns: res.staticRenderFns || [],
        errors: (res.errors || []).map((e) => (e && e.msg ? e.msg : String(e))),
      };
    }
    case 'pug':
      return projectRequire('pug').compile(req.source, { filename: req.filename })();
    case 'normalize':
      return projectRequire('vue-template-es2015-compiler')(req.source);
    default:
      throw new Error(`unknown op: ${req.op}`);
  }
}

let input = '';
process.stdin.setEncoding('utf8');
process.stdin.on('data', (chunk) => { input += chunk; });
process.stdin.on('end', () => {
  let response;
  try {
    response = { ok: true, result: handle(JSON.parse(input)) };
  } catch (err) {
    response = { ok: false, error: err && err.message ? err.message : String(err) };
  }
  process.stdout.write(JSON.stringify(response));
});
"#;

/// Error types for the node runner.
#[derive(Debug, Error)]
pub enum NodeError {
    /// node binary not found.
    #[error("node binary not found: {0}")]
    NotFound(String),

    /// Failed to spawn node.
    #[error("failed to spawn node: {0}")]
    SpawnFailed(#[from] std::io::Error),

    /// node exited with error.
    #[error("node exited with code {code}: {stderr}")]
    ProcessFailed { code: i32, stderr: String },

    /// The response could not be read.
    #[error("node runner protocol error: {0}")]
    Protocol(String),

    /// The package call threw.
    #[error("{op} failed: {message}")]
    Operation { op: &'static str, message: String },
}

/// Output of `vue-template-compiler`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCompiledTemplate {
    pub render: String,
    #[serde(default)]
    pub static_render_fns: Vec<String>,
    /// Problems the compiler reported alongside its output.
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
struct NodeRequest<'a> {
    op: &'static str,
    source: &'a str,
    filename: &'a str,
}

#[derive(Debug, Deserialize)]
struct NodeResponse {
    ok: bool,
    #[serde(default)]
    result: serde_json::Value,
    #[serde(default)]
    error: Option<String>,
}

/// Runs the project's template toolchain through `node`, one process per
/// request.
#[derive(Debug, Clone)]
pub struct NodeRunner {
    node_path: Utf8PathBuf,
    project_root: Utf8PathBuf,
}

impl NodeRunner {
    pub fn new(node_path: Utf8PathBuf, project_root: Utf8PathBuf) -> Self {
        Self {
            node_path,
            project_root,
        }
    }

    /// Locates node:
    /// 1. `node_override`, when given
    /// 2. PATH
    pub fn find(
        node_override: Option<&Utf8Path>,
        project_root: impl Into<Utf8PathBuf>,
    ) -> Result<Self, NodeError> {
        let node_path = match node_override {
            Some(path) if path.is_file() => path.to_path_buf(),
            Some(path) => return Err(NodeError::NotFound(path.to_string())),
            None => which::which("node")
                .ok()
                .and_then(|path| Utf8PathBuf::try_from(path).ok())
                .ok_or_else(|| NodeError::NotFound("node is not on PATH".to_string()))?,
        };
        Ok(Self::new(node_path, project_root.into()))
    }

    pub fn node_path(&self) -> &Utf8Path {
        &self.node_path
    }

    pub fn project_root(&self) -> &Utf8Path {
        &self.project_root
    }

    /// Compiles HTML markup with `vue-template-compiler`. Compiler errors
    /// come back in [`NodeCompiledTemplate::errors`]; only a throwing
    /// compiler fails the call.
    pub fn compile_template(
        &self,
        markup: &str,
        filename: &str,
    ) -> Result<NodeCompiledTemplate, NodeError> {
        self.request("compile", markup, filename)
    }

    /// Renders pug markup to HTML.
    pub fn render_pug(&self, source: &str, filename: &str) -> Result<String, NodeError> {
        self.request("pug", source, filename)
    }

    /// Runs a function literal through `vue-template-es2015-compiler`.
    pub fn normalize(&self, function: &str) -> Result<String, NodeError> {
        self.request("normalize", function, "")
    }

    fn request<T: DeserializeOwned>(
        &self,
        op: &'static str,
        source: &str,
        filename: &str,
    ) -> Result<T, NodeError> {
        let request = serde_json::to_vec(&NodeRequest {
            op,
            source,
            filename,
        })
        .map_err(|e| NodeError::Protocol(format!("failed to encode request: {e}")))?;

        let mut child = Command::new(&self.node_path)
            .arg("-e")
            .arg(NODE_SCRIPT)
            .current_dir(&self.project_root)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| NodeError::Protocol("node stdin unavailable".to_string()))?;
        stdin.write_all(&request)?;
        drop(stdin);

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(NodeError::ProcessFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        decode_response(op, &output.stdout)
    }
}

fn decode_response<T: DeserializeOwned>(op: &'static str, stdout: &[u8]) -> Result<T, NodeError> {
    let response: NodeResponse = serde_json::from_slice(stdout)
        .map_err(|e| NodeError::Protocol(format!("invalid response: {e}")))?;
    if !response.ok {
        return Err(NodeError::Operation {
            op,
            message: response.error.unwrap_or_else(|| "unknown error".to_string()),
        });
    }
    serde_json::from_value(response.result)
        .map_err(|e| NodeError::Protocol(format!("unexpected {op} result: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_compiled_template() {
        let compiled: NodeCompiledTemplate = decode_response(
            "compile",
            br#"{"ok":true,"result":{"render":"with(this){}","staticRenderFns":["a","b"]}}"#,
        )
        .unwrap();
        assert_eq!(
            compiled,
            NodeCompiledTemplate {
                render: "with(this){}".to_string(),
                static_render_fns: vec!["a".to_string(), "b".to_string()],
                errors: Vec::new(),
            }
        );
    }

    #[test]
    fn test_decode_compiler_errors() {
        let compiled: NodeCompiledTemplate = decode_response(
            "compile",
            br#"{"ok":true,"result":{"render":"return 1","staticRenderFns":[],"errors":["two roots"]}}"#,
        )
        .unwrap();
        assert_eq!(compiled.render, "return 1");
        assert_eq!(compiled.errors, vec!["two roots".to_string()]);
    }

    #[test]
    fn test_decode_failure() {
        let err = decode_response::<String>("pug", br#"{"ok":false,"error":"Cannot find module 'pug'"}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "pug failed: Cannot find module 'pug'");

        let err = decode_response::<String>("pug", b"not json").unwrap_err();
        assert!(matches!(err, NodeError::Protocol(_)));

        let err = decode_response::<String>("normalize", br#"{"ok":true,"result":1}"#).unwrap_err();
        assert!(matches!(err, NodeError::Protocol(_)));
    }

    #[test]
    fn test_missing_override() {
        let err = NodeRunner::find(Some(Utf8Path::new("/nonexistent/node")), "/tmp").unwrap_err();
        assert!(matches!(err, NodeError::NotFound(path) if path == "/nonexistent/node"));
    }
}
