//! Errors that stop a run before or while emitting output.

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum RunError {
    #[error("invalid ignore pattern `{pattern}`: {message}")]
    #[diagnostic(code(sfc_jest::invalid_glob))]
    InvalidGlob { pattern: String, message: String },

    #[error("input not found: {0}")]
    #[diagnostic(
        code(sfc_jest::missing_input),
        help("relative inputs are resolved against --cwd")
    )]
    MissingInput(Utf8PathBuf),

    #[error("working directory is not valid UTF-8")]
    #[diagnostic(code(sfc_jest::cwd))]
    NonUtf8Cwd,

    #[error("failed to read stdin: {0}")]
    #[diagnostic(code(sfc_jest::stdin))]
    Stdin(#[source] std::io::Error),

    #[error("failed to write {path}: {source}")]
    #[diagnostic(code(sfc_jest::write))]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}
