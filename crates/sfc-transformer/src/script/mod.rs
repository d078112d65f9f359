//! Script block transpilation.
//!
//! A script is turned into CommonJS by one of two strategies picked from the
//! block's `lang`. Both rewrite the source in place so its lines keep their
//! numbers.

mod babel;
mod edits;
mod helpers;
mod references;
mod rewrite;
mod strip;
mod typescript;

use std::fmt;

use source_map::LineIndex;

use crate::config::{ConfigError, ConfigLoader};
use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};

pub use babel::BabelStrategy;
pub use typescript::TypeScriptStrategy;

use rewrite::{rewrite, RewriteError, RewriteOptions};

/// The script dialects the transformer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptDialect {
    Babel,
    TypeScript,
}

impl ScriptDialect {
    /// Maps a `lang` attribute to a dialect; `None` for unsupported ones.
    pub fn from_lang(lang: Option<&str>) -> Option<Self> {
        match lang {
            None | Some("babel" | "js" | "javascript") => Some(ScriptDialect::Babel),
            Some("ts" | "typescript") => Some(ScriptDialect::TypeScript),
            Some(_) => None,
        }
    }

    pub fn strategy(self) -> &'static dyn ScriptTransform {
        match self {
            ScriptDialect::Babel => &BabelStrategy,
            ScriptDialect::TypeScript => &TypeScriptStrategy,
        }
    }
}

/// What a strategy gets to see besides the source.
pub struct ScriptContext<'a> {
    /// Path of the component, for diagnostics.
    pub filename: &'a str,
    pub config: &'a dyn ConfigLoader,
    pub sink: &'a dyn DiagnosticSink,
}

impl ScriptContext<'_> {
    fn config_warning(&self, error: &ConfigError) {
        self.sink.report(
            Diagnostic::new(DiagnosticCode::InvalidConfig, error.to_string())
                .with_file(error.path().as_str()),
        );
    }
}

/// Why a script could not be transpiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranspileFailure {
    pub message: String,
    /// 1-based line in the script text.
    pub line: Option<u32>,
}

impl fmt::Display for TranspileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TranspileFailure {}

pub trait ScriptTransform: Send + Sync {
    /// Transpiles `source` to a CommonJS script with the same line count.
    fn transform(&self, source: &str, ctx: &ScriptContext<'_>)
        -> Result<String, TranspileFailure>;
}

fn run(source: &str, options: &RewriteOptions) -> Result<String, TranspileFailure> {
    rewrite(source, options).map_err(|error| {
        let (message, offset) = match error {
            RewriteError::Syntax { message, offset } => (message, offset),
            RewriteError::Unsupported { construct, offset } => {
                (format!("{construct} is not supported"), offset)
            }
        };
        TranspileFailure {
            message,
            line: Some(LineIndex::new(source).line_number(offset)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FixedConfigLoader;
    use crate::diagnostics::NullSink;

    #[test]
    fn test_dialect_from_lang() {
        assert_eq!(ScriptDialect::from_lang(None), Some(ScriptDialect::Babel));
        assert_eq!(ScriptDialect::from_lang(Some("js")), Some(ScriptDialect::Babel));
        assert_eq!(
            ScriptDialect::from_lang(Some("typescript")),
            Some(ScriptDialect::TypeScript)
        );
        assert_eq!(ScriptDialect::from_lang(Some("coffee")), None);
    }

    #[test]
    fn test_failure_carries_line() {
        let ctx = ScriptContext {
            filename: "Foo.vue",
            config: &FixedConfigLoader::default(),
            sink: &NullSink,
        };
        let failure = ScriptDialect::TypeScript
            .strategy()
            .transform("\nlet a = 1\nnamespace N { export const x = 1 }\n", &ctx)
            .unwrap_err();
        assert_eq!(failure.message, "namespace is not supported");
        assert_eq!(failure.line, Some(3));
    }
}
