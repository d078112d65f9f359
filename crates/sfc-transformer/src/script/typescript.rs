use super::helpers::HelperMode;
use super::rewrite::{ImportInterop, ModuleKind, RewriteOptions};
use super::{run, ScriptContext, ScriptTransform, TranspileFailure};
use crate::config::CompilerOptions;
use crate::diagnostics::{Diagnostic, DiagnosticCode};

/// Strips types the way a transpile-only compile with the project's
/// `tsconfig.json` would.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeScriptStrategy;

impl TypeScriptStrategy {
    fn options(compiler_options: &CompilerOptions, ctx: &ScriptContext<'_>) -> RewriteOptions {
        let module = match compiler_options.module.as_deref().map(str::to_ascii_lowercase) {
            None => ModuleKind::CommonJs,
            Some(module) => match module.as_str() {
                "none" | "commonjs" | "node16" | "node18" | "nodenext" => ModuleKind::CommonJs,
                "preserve" => ModuleKind::Preserve,
                es if es.starts_with("es") => ModuleKind::Preserve,
                other => {
                    ctx.sink.report(
                        Diagnostic::new(
                            DiagnosticCode::InvalidConfig,
                            format!("module \"{other}\" is not supported, using commonjs"),
                        )
                        .with_file("tsconfig.json"),
                    );
                    ModuleKind::CommonJs
                }
            },
        };

        RewriteOptions {
            typescript: true,
            module,
            helpers: HelperMode::Shared,
            interop: if compiler_options.es_module_interop.unwrap_or(false) {
                ImportInterop::Helper
            } else {
                ImportInterop::None
            },
            elide_imports: !compiler_options.verbatim_module_syntax.unwrap_or(false),
        }
    }
}

impl ScriptTransform for TypeScriptStrategy {
    fn transform(
        &self,
        source: &str,
        ctx: &ScriptContext<'_>,
    ) -> Result<String, TranspileFailure> {
        let compiler_options = match ctx.config.ts_config() {
            Ok(Some((_, config))) => config.compiler_options,
            Ok(None) => CompilerOptions::default(),
            Err(error) => {
                ctx.config_warning(&error);
                CompilerOptions::default()
            }
        };
        run(source, &Self::options(&compiler_options, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FixedConfigLoader, TsConfig};
    use crate::diagnostics::{CollectingSink, NullSink};
    use pretty_assertions::assert_eq;

    fn transform_with(compiler_options: Option<CompilerOptions>, source: &str) -> String {
        let loader = FixedConfigLoader {
            babel: None,
            ts: compiler_options.map(|compiler_options| TsConfig {
                extends: None,
                compiler_options,
            }),
        };
        let ctx = ScriptContext {
            filename: "Foo.vue",
            config: &loader,
            sink: &NullSink,
        };
        TypeScriptStrategy.transform(source, &ctx).unwrap()
    }

    #[test]
    fn test_without_tsconfig() {
        assert_eq!(
            transform_with(None, "const x: number = 1\nexport default {}"),
            "\"use strict\";Object.defineProperty(exports, \"__esModule\", { value: true });const x         = 1\nexports.default = {}"
        );
    }

    #[test]
    fn test_default_import_without_interop() {
        let out = transform_with(None, "import Vue from 'vue'\nexport default Vue.extend({})");
        assert!(out.contains("var Vue = require('vue').default;"));
    }

    #[test]
    fn test_es_module_interop() {
        let options = CompilerOptions {
            es_module_interop: Some(true),
            ..Default::default()
        };
        let out = transform_with(Some(options), "import Vue from 'vue'\nexport default Vue.extend({})");
        assert!(out.contains("var Vue = __sfc_interopDefault(require('vue')).default;"));
    }

    #[test]
    fn test_esnext_keeps_modules() {
        let options = CompilerOptions {
            module: Some("ESNext".to_string()),
            ..Default::default()
        };
        assert_eq!(
            transform_with(Some(options), "import { a } from 'a'\nexport const b: number = a"),
            "import { a } from 'a'\nexport const b         = a"
        );
    }

    #[test]
    fn test_unknown_module_warns() {
        let loader = FixedConfigLoader {
            babel: None,
            ts: Some(TsConfig {
                extends: None,
                compiler_options: CompilerOptions {
                    module: Some("amd".to_string()),
                    ..Default::default()
                },
            }),
        };
        let sink = CollectingSink::new();
        let ctx = ScriptContext {
            filename: "Foo.vue",
            config: &loader,
            sink: &sink,
        };
        let out = TypeScriptStrategy.transform("export default {}", &ctx).unwrap();
        assert!(out.contains("exports.default = {}"));
        assert_eq!(sink.take().len(), 1);
    }
}
