//! stderr logging and the diagnostic sink that feeds it.

use std::sync::atomic::{AtomicUsize, Ordering};

use sfc_transformer::{Diagnostic, DiagnosticSink, Severity};
use tracing::{error, warn, Level};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` directives are honored on top
/// of the base level.
pub fn init(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Logs diagnostics as they arrive and counts the errors.
#[derive(Debug, Default)]
pub struct TracingSink {
    errors: AtomicUsize,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }
}

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => warn!(code = %diagnostic.code, "{diagnostic}"),
            Severity::Error => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                error!(code = %diagnostic.code, "{diagnostic}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfc_transformer::DiagnosticCode;

    #[test]
    fn test_counts_only_errors() {
        let sink = TracingSink::new();
        sink.report(Diagnostic::new(DiagnosticCode::InvalidConfig, "bad tsconfig"));
        sink.report(Diagnostic::new(DiagnosticCode::BlockExtraction, "duplicate"));
        assert_eq!(sink.error_count(), 0);

        sink.report(Diagnostic::new(DiagnosticCode::ScriptTranspile, "oops").with_line(3));
        assert_eq!(sink.error_count(), 1);
    }
}
