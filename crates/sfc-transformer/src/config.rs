//! Project configuration discovery.
//!
//! The script strategies read two kinds of configuration: the transpiler
//! configuration (`.babelrc` and friends) and the type-check configuration
//! (`tsconfig.json`). Discovery goes through [`ConfigLoader`] so hosts and
//! tests can supply configuration without touching the filesystem.

use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use serde_json::Value;
use swc_common::SourceMap;
use swc_ecma_ast::{
    ArrayLit, AssignTarget, Expr, ExprStmt, Lit, MemberProp, ModuleDecl, ModuleItem, ObjectLit,
    Prop, PropName, PropOrSpread, SimpleAssignTarget, Stmt, UnaryOp,
};
use swc_ecma_parser::{parse_file_as_module, EsSyntax, Syntax};
use thiserror::Error;

/// Transpiler configuration file names, checked in order in every directory
/// from the working directory up to the filesystem root.
const BABEL_CONFIG_FILES: &[&str] = &[
    ".babelrc",
    ".babelrc.json",
    ".babelrc.js",
    "babel.config.json",
    "babel.config.js",
];

/// Limit on `extends` chains in `tsconfig.json`.
const MAX_EXTENDS_DEPTH: usize = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: Utf8PathBuf, message: String },

    #[error("{path}: {message}")]
    Unsupported { path: Utf8PathBuf, message: String },
}

impl ConfigError {
    pub fn path(&self) -> &Utf8Path {
        match self {
            ConfigError::Io { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Unsupported { path, .. } => path,
        }
    }
}

/// Supplies project configuration to the script strategies.
///
/// Implementations must be safe to call from many threads at once and must
/// not write anything.
pub trait ConfigLoader: Send + Sync {
    /// The transpiler configuration with its `env` section for the current
    /// environment merged in, and the file it came from.
    fn babel_config(&self) -> Result<Option<(Utf8PathBuf, BabelConfig)>, ConfigError>;

    /// The type-check configuration and the file it came from.
    fn ts_config(&self) -> Result<Option<(Utf8PathBuf, TsConfig)>, ConfigError>;
}

/// Transpiler configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BabelConfig {
    #[serde(default)]
    pub presets: Vec<PluginEntry>,

    #[serde(default)]
    pub plugins: Vec<PluginEntry>,

    /// Per-environment overrides, merged by [`BabelConfig::resolve_env`].
    #[serde(default)]
    pub env: HashMap<String, BabelConfig>,
}

/// A preset or plugin: either a bare name or `[name, options]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PluginEntry {
    Name(String),
    Configured(Vec<Value>),
}

impl PluginEntry {
    pub fn name(&self) -> Option<&str> {
        match self {
            PluginEntry::Name(name) => Some(name),
            PluginEntry::Configured(parts) => parts.first().and_then(Value::as_str),
        }
    }

    pub fn options(&self) -> Option<&Value> {
        match self {
            PluginEntry::Name(_) => None,
            PluginEntry::Configured(parts) => parts.get(1),
        }
    }

    /// The name without its package prefix, so `@babel/preset-env`,
    /// `babel-preset-env` and `env` all read `env`.
    pub fn short_name(&self) -> Option<&str> {
        self.name().map(short_name)
    }
}

fn short_name(name: &str) -> &str {
    const PREFIXES: &[&str] = &[
        "@babel/preset-",
        "@babel/plugin-",
        "babel-preset-",
        "babel-plugin-",
        "@babel/",
    ];
    PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name)
}

impl BabelConfig {
    /// The configuration used when the project has none: the `es2015`
    /// preset and `transform-runtime`.
    pub fn fallback() -> Self {
        Self {
            presets: vec![PluginEntry::Name("es2015".to_string())],
            plugins: vec![PluginEntry::Name("transform-runtime".to_string())],
            env: HashMap::new(),
        }
    }

    /// Appends the presets and plugins of `env.<name>` and drops the `env`
    /// table.
    pub fn resolve_env(&self, name: &str) -> Self {
        let mut resolved = Self {
            presets: self.presets.clone(),
            plugins: self.plugins.clone(),
            env: HashMap::new(),
        };
        if let Some(overrides) = self.env.get(name) {
            let overrides = overrides.resolve_env(name);
            resolved.presets.extend(overrides.presets);
            resolved.plugins.extend(overrides.plugins);
        }
        resolved
    }

    pub fn preset(&self, short: &str) -> Option<&PluginEntry> {
        self.presets.iter().find(|p| p.short_name() == Some(short))
    }

    pub fn plugin(&self, short: &str) -> Option<&PluginEntry> {
        self.plugins.iter().find(|p| p.short_name() == Some(short))
    }

    /// Loads a `.babelrc`-style JSON file or a JS file exporting an object
    /// literal.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = read(path)?;
        if path.extension() == Some("js") {
            let value = js_config_object(path, content)?;
            serde_json::from_value(value).map_err(|e| parse_error(path, e))
        } else {
            serde_json::from_str(&normalize_jsonc(&content)).map_err(|e| parse_error(path, e))
        }
    }

    /// Reads the `babel` key of a `package.json`.
    pub fn from_package_json(path: &Utf8Path) -> Result<Option<Self>, ConfigError> {
        #[derive(Deserialize)]
        struct PackageJson {
            babel: Option<BabelConfig>,
        }

        let content = read(path)?;
        let package: PackageJson =
            serde_json::from_str(&content).map_err(|e| parse_error(path, e))?;
        Ok(package.babel)
    }
}

/// Type-check configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsConfig {
    /// A relative path to a base configuration.
    pub extends: Option<String>,

    #[serde(default)]
    pub compiler_options: CompilerOptions,
}

/// The compiler options that change transpile-only output.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    /// Module system, `commonjs` when absent.
    pub module: Option<String>,

    pub es_module_interop: Option<bool>,

    /// Keeps imports that are only used as types.
    pub verbatim_module_syntax: Option<bool>,
}

impl CompilerOptions {
    /// Fills unset options from `base`.
    fn inherit(&mut self, base: CompilerOptions) {
        self.module = self.module.take().or(base.module);
        self.es_module_interop = self.es_module_interop.or(base.es_module_interop);
        self.verbatim_module_syntax = self.verbatim_module_syntax.or(base.verbatim_module_syntax);
    }
}

impl TsConfig {
    /// Loads a `tsconfig.json`, following relative `extends` paths.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        Self::load_with_depth(path, 0)
    }

    fn load_with_depth(path: &Utf8Path, depth: usize) -> Result<Self, ConfigError> {
        let content = read(path)?;
        let mut config: TsConfig =
            serde_json::from_str(&normalize_jsonc(&content)).map_err(|e| parse_error(path, e))?;

        let base = match config.extends.as_deref() {
            Some(base) if base.starts_with("./") || base.starts_with("../") => base,
            // Package references need module resolution.
            _ => return Ok(config),
        };
        if depth >= MAX_EXTENDS_DEPTH {
            return Err(ConfigError::Unsupported {
                path: path.to_owned(),
                message: "too many nested `extends`".to_string(),
            });
        }

        let mut base_path = path
            .parent()
            .map(|dir| dir.join(base))
            .unwrap_or_else(|| Utf8PathBuf::from(base));
        if base_path.extension() != Some("json") {
            base_path = Utf8PathBuf::from(format!("{base_path}.json"));
        }
        let parent = Self::load_with_depth(&base_path, depth + 1)?;
        config.compiler_options.inherit(parent.compiler_options);
        Ok(config)
    }
}

/// Reads configuration from disk.
#[derive(Debug, Clone)]
pub struct FsConfigLoader {
    cwd: Utf8PathBuf,
    env_name: String,
}

impl FsConfigLoader {
    /// Creates a loader rooted at `cwd`. The transpiler environment comes from
    /// `BABEL_ENV`, then `NODE_ENV`, then `development`.
    pub fn new(cwd: impl Into<Utf8PathBuf>) -> Self {
        let env_name = std::env::var("BABEL_ENV")
            .or_else(|_| std::env::var("NODE_ENV"))
            .unwrap_or_else(|_| "development".to_string());
        Self {
            cwd: cwd.into(),
            env_name,
        }
    }

    pub fn with_env_name(mut self, env_name: impl Into<String>) -> Self {
        self.env_name = env_name.into();
        self
    }

    pub fn cwd(&self) -> &Utf8Path {
        &self.cwd
    }
}

impl ConfigLoader for FsConfigLoader {
    fn babel_config(&self) -> Result<Option<(Utf8PathBuf, BabelConfig)>, ConfigError> {
        for dir in self.cwd.ancestors() {
            for name in BABEL_CONFIG_FILES {
                let path = dir.join(name);
                if path.is_file() {
                    let config = BabelConfig::load(&path)?.resolve_env(&self.env_name);
                    return Ok(Some((path, config)));
                }
            }

            let package = dir.join("package.json");
            if package.is_file() {
                if let Some(config) = BabelConfig::from_package_json(&package)? {
                    return Ok(Some((package, config.resolve_env(&self.env_name))));
                }
            }
        }
        Ok(None)
    }

    fn ts_config(&self) -> Result<Option<(Utf8PathBuf, TsConfig)>, ConfigError> {
        let path = self.cwd.join("tsconfig.json");
        if !path.is_file() {
            return Ok(None);
        }
        TsConfig::load(&path).map(|config| Some((path, config)))
    }
}

/// Hands out fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct FixedConfigLoader {
    pub babel: Option<BabelConfig>,
    pub ts: Option<TsConfig>,
}

impl ConfigLoader for FixedConfigLoader {
    fn babel_config(&self) -> Result<Option<(Utf8PathBuf, BabelConfig)>, ConfigError> {
        Ok(self
            .babel
            .clone()
            .map(|config| (Utf8PathBuf::from(".babelrc"), config)))
    }

    fn ts_config(&self) -> Result<Option<(Utf8PathBuf, TsConfig)>, ConfigError> {
        Ok(self
            .ts
            .clone()
            .map(|config| (Utf8PathBuf::from("tsconfig.json"), config)))
    }
}

fn read(path: &Utf8Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_owned(),
        source,
    })
}

fn parse_error(path: &Utf8Path, error: impl std::fmt::Display) -> ConfigError {
    ConfigError::Parse {
        path: path.to_owned(),
        message: error.to_string(),
    }
}

/// Evaluates the object literal a JS config file exports through
/// `module.exports = {...}` or `export default {...}`.
fn js_config_object(path: &Utf8Path, content: String) -> Result<Value, ConfigError> {
    let cm: Arc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        swc_common::FileName::Custom(path.to_string()).into(),
        content,
    );
    let module = parse_file_as_module(
        &fm,
        Syntax::Es(EsSyntax {
            jsx: false,
            ..Default::default()
        }),
        swc_ecma_ast::EsVersion::Es2022,
        None,
        &mut Vec::new(),
    )
    .map_err(|e| parse_error(path, e.kind().msg()))?;

    let unsupported = |message: &str| ConfigError::Unsupported {
        path: path.to_owned(),
        message: message.to_string(),
    };

    for item in &module.body {
        let exported = match item {
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) => &export.expr,
            ModuleItem::Stmt(Stmt::Expr(ExprStmt { expr, .. })) => match module_exports_value(expr)
            {
                Some(value) => value,
                None => continue,
            },
            _ => continue,
        };
        return match unparen(exported) {
            Expr::Object(obj) => object_to_json(obj)
                .ok_or_else(|| unsupported("configuration must only contain literal values")),
            _ => Err(unsupported(
                "only configuration files exporting an object literal are supported",
            )),
        };
    }

    Err(unsupported("no `module.exports` or `export default` found"))
}

/// The right-hand side of `module.exports = <value>`.
fn module_exports_value(expr: &Expr) -> Option<&Expr> {
    let Expr::Assign(assign) = expr else {
        return None;
    };
    let AssignTarget::Simple(SimpleAssignTarget::Member(member)) = &assign.left else {
        return None;
    };
    let is_module = matches!(member.obj.as_ref(), Expr::Ident(obj) if obj.sym.as_str() == "module");
    let is_exports = matches!(&member.prop, MemberProp::Ident(prop) if prop.sym.as_str() == "exports");
    (is_module && is_exports).then_some(assign.right.as_ref())
}

fn unparen(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unparen(&paren.expr),
        _ => expr,
    }
}

fn object_to_json(obj: &ObjectLit) -> Option<Value> {
    let mut map = serde_json::Map::new();
    for prop in &obj.props {
        let PropOrSpread::Prop(prop) = prop else {
            return None;
        };
        let Prop::KeyValue(kv) = prop.as_ref() else {
            return None;
        };
        let key = match &kv.key {
            PropName::Ident(ident) => ident.sym.as_str().to_string(),
            PropName::Str(s) => s.value.as_str()?.to_string(),
            PropName::Num(n) => n.value.to_string(),
            _ => return None,
        };
        map.insert(key, expr_to_json(&kv.value)?);
    }
    Some(Value::Object(map))
}

fn array_to_json(array: &ArrayLit) -> Option<Value> {
    array
        .elems
        .iter()
        .map(|elem| match elem {
            Some(elem) if elem.spread.is_none() => expr_to_json(&elem.expr),
            Some(_) => None,
            None => Some(Value::Null),
        })
        .collect::<Option<Vec<_>>>()
        .map(Value::Array)
}

fn expr_to_json(expr: &Expr) -> Option<Value> {
    match unparen(expr) {
        Expr::Object(obj) => object_to_json(obj),
        Expr::Array(array) => array_to_json(array),
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(|s| Value::String(s.to_string())),
        Expr::Lit(Lit::Bool(b)) => Some(Value::Bool(b.value)),
        Expr::Lit(Lit::Null(_)) => Some(Value::Null),
        Expr::Lit(Lit::Num(n)) => serde_json::Number::from_f64(n.value).map(Value::Number),
        Expr::Unary(unary) if unary.op == UnaryOp::Minus => match unparen(&unary.arg) {
            Expr::Lit(Lit::Num(n)) => serde_json::Number::from_f64(-n.value).map(Value::Number),
            _ => None,
        },
        Expr::Ident(ident) if ident.sym.as_str() == "undefined" => Some(Value::Null),
        _ => None,
    }
}

/// Strips comments and trailing commas so JSON-with-comments files parse as
/// JSON.
fn normalize_jsonc(text: &str) -> String {
    remove_trailing_commas(&remove_json_comments(text))
}

/// Removes single-line and multi-line comments from JSON.
fn remove_json_comments(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if c == '"' {
                in_string = false;
            } else if c == '\\' {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
        } else if c == '"' {
            result.push(c);
            in_string = true;
        } else if c == '/' && chars.peek() == Some(&'/') {
            while let Some(&next) = chars.peek() {
                if next == '\n' {
                    break;
                }
                chars.next();
            }
        } else if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            while let Some(next) = chars.next() {
                if next == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}

/// Drops commas directly followed (after whitespace) by `}` or `]`.
fn remove_trailing_commas(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for (idx, c) in json.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = json[idx + 1..].trim_start().chars().next();
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        result.push(c);
    }

    result
}
