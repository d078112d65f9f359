//! The end-to-end component transform.

use camino::Utf8PathBuf;
use serde::Serialize;
use sfc_parser::{parse_with_options, PadOption, ParseOptions};
use source_map::{LineIndex, SourceMap};

use crate::config::{ConfigLoader, FsConfigLoader};
use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use crate::error::TransformError;
use crate::map::generate_map;
use crate::module::{ModuleTemplate, RenderAttachment};
use crate::script::{ScriptContext, ScriptDialect};
use crate::stringify::{stringify_render, stringify_static_render, FunctionNormalizer, SyntaxNormalizer};
use crate::template::{compile_template, MarkupRenderer, TemplateCompiler};

/// A transformed component: CommonJS code and its line map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformOutput {
    pub code: String,
    pub map: SourceMap,
}

/// Transforms component files, one call per file.
///
/// Collaborators are shared by reference across calls, so one
/// `Transformer` can serve many threads.
pub struct Transformer {
    config: Box<dyn ConfigLoader>,
    compiler: Box<dyn TemplateCompiler>,
    renderer: Option<Box<dyn MarkupRenderer>>,
    normalizer: Box<dyn FunctionNormalizer>,
}

impl Transformer {
    /// A transformer reading configuration from the working directory.
    pub fn new(compiler: impl TemplateCompiler + 'static) -> Self {
        let cwd = std::env::current_dir()
            .ok()
            .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
            .unwrap_or_else(|| Utf8PathBuf::from("."));
        Self {
            config: Box::new(FsConfigLoader::new(cwd)),
            compiler: Box::new(compiler),
            renderer: None,
            normalizer: Box::new(SyntaxNormalizer),
        }
    }

    pub fn with_config(mut self, config: impl ConfigLoader + 'static) -> Self {
        self.config = Box::new(config);
        self
    }

    pub fn with_markup_renderer(mut self, renderer: impl MarkupRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn with_normalizer(mut self, normalizer: impl FunctionNormalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    /// Transforms the component `source` read from `path`.
    ///
    /// Recoverable problems go to `sink`; a script that cannot be transpiled
    /// leaves the script portion of the module empty.
    pub fn process(
        &self,
        source: &str,
        path: &str,
        sink: &dyn DiagnosticSink,
    ) -> Result<TransformOutput, TransformError> {
        let parsed = parse_with_options(source, ParseOptions { pad: PadOption::Line });
        if !parsed.errors.is_empty() {
            let index = LineIndex::new(source);
            for error in &parsed.errors {
                sink.report(
                    Diagnostic::new(DiagnosticCode::BlockExtraction, error.to_string())
                        .with_file(path)
                        .with_line(index.line_number(error.span.range().start)),
                );
            }
        }
        let descriptor = parsed.descriptor;

        let original_script = descriptor
            .script
            .as_ref()
            .map_or("", |block| block.content.as_str());
        // Lines of the original script that survive into the module.
        let mut mapped_script = original_script;
        let script = match &descriptor.script {
            Some(block) => {
                let dialect = ScriptDialect::from_lang(block.lang()).ok_or_else(|| {
                    TransformError::UnsupportedDialect {
                        path: path.to_string(),
                        lang: block.lang().unwrap_or_default().to_string(),
                    }
                })?;
                let ctx = ScriptContext {
                    filename: path,
                    config: self.config.as_ref(),
                    sink,
                };
                match dialect.strategy().transform(original_script, &ctx) {
                    Ok(code) => code,
                    Err(failure) => {
                        let mut diagnostic =
                            Diagnostic::new(DiagnosticCode::ScriptTranspile, failure.message)
                                .with_file(path);
                        if let Some(line) = failure.line {
                            diagnostic = diagnostic.with_line(line);
                        }
                        sink.report(diagnostic);
                        mapped_script = "";
                        String::new()
                    }
                }
            }
            None => String::new(),
        };

        let compiled = compile_template(
            descriptor.template.as_ref(),
            path,
            self.compiler.as_ref(),
            self.renderer.as_deref(),
        )?;
        let render = match compiled {
            Some(compiled) => Some(RenderAttachment {
                render: stringify_render(&compiled.render, self.normalizer.as_ref(), path)?,
                static_render_fns: stringify_static_render(
                    &compiled.static_render_fns,
                    self.normalizer.as_ref(),
                    path,
                )?,
            }),
            None => None,
        };

        let module = ModuleTemplate {
            script: &script,
            render,
        }
        .render();
        let map = generate_map(mapped_script, module.script_start_line, path, source);

        Ok(TransformOutput {
            code: module.code,
            map,
        })
    }
}
