//! Fatal transform errors.

use thiserror::Error;

/// Error type returned by the external collaborators behind the
/// [`crate::TemplateCompiler`], [`crate::MarkupRenderer`] and
/// [`crate::FunctionNormalizer`] traits.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A failure that aborts the transform of one file.
///
/// Script transpilation problems are not in here: they are reported as
/// diagnostics and the module gets an empty script.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("{path}: unknown <template lang=\"{lang}\">")]
    UnknownTemplateDialect { path: String, lang: String },

    #[error("{path}: unsupported <script lang=\"{lang}\">")]
    UnsupportedDialect { path: String, lang: String },

    #[error("{path}: failed to compile template: {source}")]
    TemplateCompile {
        path: String,
        #[source]
        source: BoxError,
    },

    #[error("{path}: failed to render <template lang=\"{lang}\">: {source}")]
    MarkupRender {
        path: String,
        lang: String,
        #[source]
        source: BoxError,
    },

    #[error("{path}: invalid render function: {message}")]
    InvalidRenderFunction { path: String, message: String },
}

impl TransformError {
    /// The file the error is about.
    pub fn path(&self) -> &str {
        match self {
            TransformError::UnknownTemplateDialect { path, .. }
            | TransformError::UnsupportedDialect { path, .. }
            | TransformError::TemplateCompile { path, .. }
            | TransformError::MarkupRender { path, .. }
            | TransformError::InvalidRenderFunction { path, .. } => path,
        }
    }
}
