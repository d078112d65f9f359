//! Single-file component to CommonJS test module transformation.
//!
//! This crate turns a component file into a module a test runner can
//! `require`. It handles:
//! - Transpiling the `<script>` block with a line-preserving rewrite
//! - Compiling the `<template>` block through an injected compiler
//! - Assembling the module and attaching the render functions
//! - Building a line source map back to the component file
//!
//! # Example
//!
//! ```
//! use sfc_transformer::{
//!     BoxError, CompiledTemplate, FixedConfigLoader, NullSink, TemplateCompiler, Transformer,
//! };
//!
//! struct Compiler;
//!
//! impl TemplateCompiler for Compiler {
//!     fn compile(&self, _markup: &str, _filename: &str) -> Result<CompiledTemplate, BoxError> {
//!         Ok(CompiledTemplate {
//!             render: "return null".to_string(),
//!             static_render_fns: Vec::new(),
//!         })
//!     }
//! }
//!
//! let source = "<template><div/></template>\n<script>\nexport default { name: 'Foo' }\n</script>\n";
//!
//! let transformer = Transformer::new(Compiler).with_config(FixedConfigLoader::default());
//! let output = transformer.process(source, "Foo.vue", &NullSink).unwrap();
//! assert!(output.code.contains("exports.default = { name: 'Foo' }"));
//! assert_eq!(output.map.original_line(3), Some(2));
//! ```

mod config;
mod diagnostics;
mod error;
mod map;
mod module;
mod script;
mod stringify;
mod template;
mod transform;

pub use config::{
    BabelConfig, CompilerOptions, ConfigError, ConfigLoader, FixedConfigLoader, FsConfigLoader,
    PluginEntry, TsConfig,
};
pub use diagnostics::{
    CollectingSink, Diagnostic, DiagnosticCode, DiagnosticSink, NullSink, Severity,
};
pub use error::{BoxError, TransformError};
pub use map::generate_map;
pub use module::{AssembledModule, ModuleTemplate, RenderAttachment, COVERAGE_IGNORE};
pub use script::{
    BabelStrategy, ScriptContext, ScriptDialect, ScriptTransform, TranspileFailure,
    TypeScriptStrategy,
};
pub use stringify::{stringify_render, stringify_static_render, FunctionNormalizer, SyntaxNormalizer};
pub use template::{compile_template, CompiledTemplate, MarkupRenderer, TemplateCompiler, TemplateDialect};
pub use transform::{TransformOutput, Transformer};
