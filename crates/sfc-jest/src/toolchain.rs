//! Template toolchain backed by node packages.

use node_runner::NodeRunner;
use sfc_transformer::{
    BoxError, CompiledTemplate, FunctionNormalizer, MarkupRenderer, TemplateCompiler,
};
use tracing::warn;

/// `vue-template-compiler` through node. Compiler errors are logged and the
/// render output is used as is.
#[derive(Debug, Clone)]
pub struct NodeTemplateCompiler(pub NodeRunner);

impl TemplateCompiler for NodeTemplateCompiler {
    fn compile(&self, markup: &str, filename: &str) -> Result<CompiledTemplate, BoxError> {
        let compiled = self.0.compile_template(markup, filename)?;
        for message in &compiled.errors {
            warn!("{filename}: template: {message}");
        }
        Ok(CompiledTemplate {
            render: compiled.render,
            static_render_fns: compiled.static_render_fns,
        })
    }
}

/// `pug` through node.
#[derive(Debug, Clone)]
pub struct NodePugRenderer(pub NodeRunner);

impl MarkupRenderer for NodePugRenderer {
    fn render(&self, source: &str, filename: &str) -> Result<String, BoxError> {
        Ok(self.0.render_pug(source, filename)?)
    }
}

/// `vue-template-es2015-compiler` through node.
#[derive(Debug, Clone)]
pub struct NodeNormalizer(pub NodeRunner);

impl FunctionNormalizer for NodeNormalizer {
    fn normalize(&self, function: &str) -> Result<String, BoxError> {
        Ok(self.0.normalize(function)?)
    }
}

/// Stands in for the node toolchain when node could not be located.
/// Script-only components still transform; anything with a template fails
/// with `reason`.
#[derive(Debug, Clone)]
pub struct Unavailable {
    pub reason: String,
}

impl Unavailable {
    fn error(&self) -> BoxError {
        self.reason.clone().into()
    }
}

impl TemplateCompiler for Unavailable {
    fn compile(&self, _markup: &str, _filename: &str) -> Result<CompiledTemplate, BoxError> {
        Err(self.error())
    }
}

impl MarkupRenderer for Unavailable {
    fn render(&self, _source: &str, _filename: &str) -> Result<String, BoxError> {
        Err(self.error())
    }
}

impl FunctionNormalizer for Unavailable {
    fn normalize(&self, _function: &str) -> Result<String, BoxError> {
        Err(self.error())
    }
}
