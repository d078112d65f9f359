use super::helpers::HelperMode;
use super::rewrite::{ImportInterop, ModuleKind, RewriteOptions};
use super::{run, ScriptContext, ScriptTransform, TranspileFailure};
use crate::config::BabelConfig;

/// Presets that compile modules to CommonJS unless `modules: false`.
const MODULE_PRESETS: &[&str] = &["env", "es2015", "es2016", "es2017", "latest"];

const COMMONJS_PLUGINS: &[&str] = &[
    "transform-modules-commonjs",
    "transform-es2015-modules-commonjs",
];

/// Transpiles plain scripts the way the project's Babel configuration
/// would, or with the built-in default when there is none.
#[derive(Debug, Default, Clone, Copy)]
pub struct BabelStrategy;

impl BabelStrategy {
    fn options(config: &BabelConfig) -> RewriteOptions {
        let typescript = config.preset("typescript").is_some();
        RewriteOptions {
            typescript,
            module: module_kind(config),
            helpers: if config.plugin("transform-runtime").is_some() {
                HelperMode::Shared
            } else {
                HelperMode::Inline
            },
            interop: ImportInterop::Helper,
            elide_imports: typescript,
        }
    }
}

fn module_kind(config: &BabelConfig) -> ModuleKind {
    let module_preset = MODULE_PRESETS
        .iter()
        .find_map(|name| config.preset(name));
    match module_preset {
        Some(preset) => {
            let modules = preset.options().and_then(|options| options.get("modules"));
            match modules {
                Some(serde_json::Value::Bool(false)) => ModuleKind::Preserve,
                _ => ModuleKind::CommonJs,
            }
        }
        None if COMMONJS_PLUGINS
            .iter()
            .any(|name| config.plugin(name).is_some()) =>
        {
            ModuleKind::CommonJs
        }
        None => ModuleKind::Preserve,
    }
}

impl ScriptTransform for BabelStrategy {
    fn transform(
        &self,
        source: &str,
        ctx: &ScriptContext<'_>,
    ) -> Result<String, TranspileFailure> {
        let config = match ctx.config.babel_config() {
            Ok(Some((_, config))) => config,
            Ok(None) => BabelConfig::fallback(),
            Err(error) => {
                ctx.config_warning(&error);
                BabelConfig::fallback()
            }
        };
        run(source, &Self::options(&config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FixedConfigLoader, PluginEntry};
    use crate::diagnostics::{CollectingSink, DiagnosticCode, NullSink};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn transform_with(config: Option<BabelConfig>, source: &str) -> String {
        let loader = FixedConfigLoader {
            babel: config,
            ts: None,
        };
        let ctx = ScriptContext {
            filename: "Foo.vue",
            config: &loader,
            sink: &NullSink,
        };
        BabelStrategy.transform(source, &ctx).unwrap()
    }

    fn preset(name: &str, options: serde_json::Value) -> PluginEntry {
        PluginEntry::Configured(vec![json!(name), options])
    }

    #[test]
    fn test_default_config_compiles_to_commonjs() {
        let out = transform_with(None, "import a from 'a'\nexport default a");
        assert!(out.starts_with("\"use strict\";"));
        assert!(out.contains("function __sfc_interopDefault(m)"));
        assert!(out.ends_with("\nexports.default = a"));
    }

    #[test]
    fn test_modules_false_keeps_esm() {
        let config = BabelConfig {
            presets: vec![preset("@babel/preset-env", json!({ "modules": false }))],
            ..Default::default()
        };
        let source = "import a from 'a'\nexport default a";
        assert_eq!(transform_with(Some(config), source), source);
    }

    #[test]
    fn test_without_runtime_helpers_are_inlined() {
        let config = BabelConfig {
            presets: vec![PluginEntry::Name("es2015".to_string())],
            ..Default::default()
        };
        let out = transform_with(Some(config), "import a from 'a'\nexport default a");
        assert!(!out.contains("function __sfc_interopDefault"));
        assert!(out.contains("var a = (function (m) {"));
    }

    #[test]
    fn test_typescript_preset_strips_types() {
        let config = BabelConfig {
            presets: vec![
                PluginEntry::Name("@babel/preset-env".to_string()),
                PluginEntry::Name("@babel/preset-typescript".to_string()),
            ],
            ..Default::default()
        };
        let out = transform_with(Some(config), "const n: number = 1\nexport default n");
        assert!(out.contains("const n         = 1"));
    }

    #[test]
    fn test_commonjs_plugin_alone() {
        let config = BabelConfig {
            plugins: vec![PluginEntry::Name(
                "@babel/plugin-transform-modules-commonjs".to_string(),
            )],
            ..Default::default()
        };
        let out = transform_with(Some(config), "export const a = 1");
        assert!(out.contains("exports.a = a;"));
    }

    #[test]
    fn test_broken_config_warns_and_falls_back() {
        struct Broken;
        impl crate::config::ConfigLoader for Broken {
            fn babel_config(
                &self,
            ) -> Result<Option<(camino::Utf8PathBuf, BabelConfig)>, crate::config::ConfigError>
            {
                Err(crate::config::ConfigError::Parse {
                    path: ".babelrc".into(),
                    message: "expected value".to_string(),
                })
            }

            fn ts_config(
                &self,
            ) -> Result<
                Option<(camino::Utf8PathBuf, crate::config::TsConfig)>,
                crate::config::ConfigError,
            > {
                Ok(None)
            }
        }

        let sink = CollectingSink::new();
        let ctx = ScriptContext {
            filename: "Foo.vue",
            config: &Broken,
            sink: &sink,
        };
        let out = BabelStrategy.transform("export default {}", &ctx).unwrap();
        assert!(out.contains("exports.default = {}"));
        let diagnostics = sink.take();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::InvalidConfig);
        assert_eq!(diagnostics[0].file.as_deref(), Some(".babelrc"));
    }
}
