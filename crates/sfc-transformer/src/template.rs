//! Template block compilation.

use sfc_parser::SfcBlock;

use crate::error::{BoxError, TransformError};

/// The markup dialects a template block may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateDialect {
    Html,
    Pug,
}

impl TemplateDialect {
    pub fn from_lang(lang: Option<&str>) -> Option<Self> {
        match lang {
            None | Some("html") => Some(TemplateDialect::Html),
            Some("pug" | "jade") => Some(TemplateDialect::Pug),
            Some(_) => None,
        }
    }
}

/// Render code produced by a [`TemplateCompiler`]: function bodies, not
/// complete functions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledTemplate {
    pub render: String,
    pub static_render_fns: Vec<String>,
}

/// Compiles HTML markup to render function bodies.
pub trait TemplateCompiler: Send + Sync {
    fn compile(&self, markup: &str, filename: &str) -> Result<CompiledTemplate, BoxError>;
}

/// Turns an alternative markup dialect into HTML.
pub trait MarkupRenderer: Send + Sync {
    fn render(&self, source: &str, filename: &str) -> Result<String, BoxError>;
}

/// Compiles the template block of `path`, if there is one.
pub fn compile_template(
    block: Option<&SfcBlock>,
    path: &str,
    compiler: &dyn TemplateCompiler,
    renderer: Option<&dyn MarkupRenderer>,
) -> Result<Option<CompiledTemplate>, TransformError> {
    let Some(block) = block else {
        return Ok(None);
    };

    let lang = block.lang();
    let dialect =
        TemplateDialect::from_lang(lang).ok_or_else(|| TransformError::UnknownTemplateDialect {
            path: path.to_string(),
            lang: lang.unwrap_or_default().to_string(),
        })?;

    let markup = match dialect {
        TemplateDialect::Html => block.content.clone(),
        TemplateDialect::Pug => {
            let markup_error = |source: BoxError| TransformError::MarkupRender {
                path: path.to_string(),
                lang: lang.unwrap_or("pug").to_string(),
                source,
            };
            let renderer =
                renderer.ok_or_else(|| markup_error("no markup renderer configured".into()))?;
            renderer.render(&block.content, path).map_err(markup_error)?
        }
    };

    compiler
        .compile(&markup, path)
        .map(Some)
        .map_err(|source| TransformError::TemplateCompile {
            path: path.to_string(),
            source,
        })
}
