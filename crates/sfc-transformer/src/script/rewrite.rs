//! Line-preserving script rewriting.
//!
//! The script is parsed with `swc` and rewritten through span edits rather
//! than re-printed, so every original line stays on its line. Type syntax is
//! blanked out (see the `strip` module) and ES module syntax becomes CommonJS
//! when [`ModuleKind::CommonJs`] is requested.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use swc_common::{BytePos, FileName, SourceFile, SourceMap, Span, Spanned};
use swc_ecma_ast::{
    ClassExpr, Decl, DefaultDecl, ExportAll, ExportDecl, ExportDefaultDecl, ExportDefaultExpr,
    ExportSpecifier, FnExpr, ImportDecl, ImportSpecifier, Module, ModuleDecl, ModuleExportName,
    ModuleItem, NamedExport, ObjectPatProp, Pat, Script, Stmt, TsExportAssignment,
    TsImportEqualsDecl, TsModuleRef,
};
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};
use swc_ecma_visit::VisitWith;

use super::edits::Edits;
use super::helpers::{Helper, HelperMode, Helpers};
use super::references::value_references;
use super::strip::is_type_only_decl;

/// Module system of the rewritten script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ModuleKind {
    CommonJs,
    /// Leave `import`/`export` in place.
    Preserve,
}

/// How a default import reads a CommonJS module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ImportInterop {
    /// Through the interop helper: a module without `__esModule` is its own
    /// default export.
    Helper,
    /// Plain `.default` access.
    None,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RewriteOptions {
    /// Parse TypeScript syntax and strip it.
    pub typescript: bool,
    pub module: ModuleKind,
    pub helpers: HelperMode,
    pub interop: ImportInterop,
    /// Drop imports whose bindings are never used as values.
    pub elide_imports: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RewriteError {
    Syntax { message: String, offset: usize },
    Unsupported { construct: &'static str, offset: usize },
}

/// Rewrites `source` according to `options`.
pub(crate) fn rewrite(source: &str, options: &RewriteOptions) -> Result<String, RewriteError> {
    let cm: Arc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        FileName::Custom("script".to_string()).into(),
        source.to_string(),
    );

    let mut rewriter = Rewriter::new(source, fm.start_pos, options);
    match parse(&fm, options)? {
        Program::Module(module) => rewriter.rewrite_module(&module),
        Program::Script(script) => rewriter.rewrite_script(&script),
    }
    rewriter.finish()
}

enum Program {
    Module(Module),
    Script(Script),
}

fn syntax(options: &RewriteOptions) -> Syntax {
    if options.typescript {
        Syntax::Typescript(TsSyntax {
            tsx: false,
            decorators: true,
            ..Default::default()
        })
    } else {
        Syntax::Es(EsSyntax {
            jsx: false,
            decorators: true,
            ..Default::default()
        })
    }
}

/// Parses as a module, falling back to a sloppy-mode script.
fn parse(fm: &SourceFile, options: &RewriteOptions) -> Result<Program, RewriteError> {
    let to_error = |span: Span, message: String| RewriteError::Syntax {
        message,
        offset: span.lo.0.saturating_sub(fm.start_pos.0) as usize,
    };

    let mut parser = Parser::new(syntax(options), StringInput::from(fm), None);
    let module = parser.parse_module();
    let module_error = match (module, parser.take_errors().into_iter().next()) {
        (Ok(module), None) => return Ok(Program::Module(module)),
        (Ok(_), Some(err)) | (Err(err), _) => to_error(err.span(), err.kind().msg().to_string()),
    };

    let mut parser = Parser::new(syntax(options), StringInput::from(fm), None);
    match parser.parse_script() {
        Ok(script) if parser.take_errors().is_empty() => Ok(Program::Script(script)),
        _ => Err(module_error),
    }
}

pub(super) struct Rewriter<'a> {
    pub(super) source: &'a str,
    file_start: BytePos,
    options: &'a RewriteOptions,
    pub(super) edits: Edits<'a>,
    helpers: Helpers,
    /// Names used as values, when imports are elided.
    references: Option<FxHashSet<String>>,
    /// Top-level names that only exist as types.
    type_names: FxHashSet<String>,
    /// `exports.x = x;` assignments emitted after the last statement.
    deferred_exports: String,
    temp_count: usize,
    has_module_syntax: bool,
    has_exports: bool,
    error: Option<RewriteError>,
}

impl<'a> Rewriter<'a> {
    fn new(source: &'a str, file_start: BytePos, options: &'a RewriteOptions) -> Self {
        Self {
            source,
            file_start,
            options,
            edits: Edits::new(source),
            helpers: Helpers::new(options.helpers),
            references: None,
            type_names: FxHashSet::default(),
            deferred_exports: String::new(),
            temp_count: 0,
            has_module_syntax: false,
            has_exports: false,
            error: None,
        }
    }

    fn rewrite_script(&mut self, script: &Script) {
        script.visit_with(self);
    }

    fn rewrite_module(&mut self, module: &Module) {
        if self.options.elide_imports {
            self.references = Some(value_references(module));
        }
        self.type_names = type_names(module);
        self.has_module_syntax = module
            .body
            .iter()
            .any(|item| matches!(item, ModuleItem::ModuleDecl(_)));

        for item in &module.body {
            match item {
                ModuleItem::Stmt(stmt) => stmt.visit_with(self),
                ModuleItem::ModuleDecl(decl) => self.rewrite_module_decl(decl),
            }
        }

        if !self.deferred_exports.is_empty() {
            if let Some(last) = module.body.last() {
                let at = self.hi(last.span());
                let text = format!(";{}", self.deferred_exports);
                self.edits.insert(at, text);
            }
        }
    }

    fn commonjs(&self) -> bool {
        self.options.module == ModuleKind::CommonJs
    }

    fn finish(mut self) -> Result<String, RewriteError> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }

        let mut prologue = String::new();
        if self.commonjs() && self.has_module_syntax {
            prologue.push_str("\"use strict\";");
            if self.has_exports {
                prologue.push_str("Object.defineProperty(exports, \"__esModule\", { value: true });");
            }
        }
        prologue.push_str(&self.helpers.declarations());
        if !prologue.is_empty() {
            self.edits.insert(0, prologue);
        }

        Ok(self.edits.apply())
    }

    // Offsets

    pub(super) fn lo(&self, span: Span) -> usize {
        (span.lo.0.saturating_sub(self.file_start.0) as usize).min(self.source.len())
    }

    pub(super) fn hi(&self, span: Span) -> usize {
        (span.hi.0.saturating_sub(self.file_start.0) as usize).min(self.source.len())
    }

    pub(super) fn text(&self, span: Span) -> &'a str {
        self.source.get(self.lo(span)..self.hi(span)).unwrap_or("")
    }

    pub(super) fn skip_whitespace(&self, mut pos: usize) -> usize {
        let bytes = self.source.as_bytes();
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        pos
    }

    /// Offset after `keyword` and the whitespace following it, when `pos`
    /// starts with the keyword.
    pub(super) fn keyword_end(&self, pos: usize, keyword: &str) -> usize {
        if self.source[pos..].starts_with(keyword) {
            self.skip_whitespace(pos + keyword.len())
        } else {
            pos
        }
    }

    /// Start of `keyword` when it precedes `pos` with only whitespace between.
    pub(super) fn keyword_before(&self, pos: usize, keyword: &str) -> Option<usize> {
        let before = self.source[..pos].trim_end();
        before
            .ends_with(keyword)
            .then(|| before.len() - keyword.len())
    }

    // Edits

    pub(super) fn blank_span(&mut self, span: Span) {
        let range = self.lo(span)..self.hi(span);
        self.edits.blank(range);
    }

    pub(super) fn blank_range(&mut self, start: usize, end: usize) {
        self.edits.blank(start..end);
    }

    pub(super) fn unsupported(&mut self, construct: &'static str, span: Span) {
        if self.error.is_none() {
            self.error = Some(RewriteError::Unsupported {
                construct,
                offset: self.lo(span),
            });
        }
    }

    fn next_temp(&mut self) -> String {
        self.temp_count += 1;
        format!("__sfc_module{}", self.temp_count)
    }

    fn default_of(&mut self, module: &str) -> String {
        match self.options.interop {
            ImportInterop::Helper => {
                format!("{}.default", self.helpers.call(Helper::InteropDefault, module))
            }
            ImportInterop::None => format!("{module}.default"),
        }
    }

    fn member(&self, object: &str, name: &ModuleExportName) -> String {
        match name {
            ModuleExportName::Ident(ident) => format!("{object}.{}", ident.sym),
            ModuleExportName::Str(s) => format!("{object}[{}]", self.text(s.span)),
        }
    }

    fn export_target(&self, name: &ModuleExportName) -> String {
        self.member("exports", name)
    }

    // Module declarations

    fn rewrite_module_decl(&mut self, decl: &ModuleDecl) {
        match decl {
            ModuleDecl::Import(import) => self.rewrite_import(import),
            ModuleDecl::ExportDecl(export) => self.rewrite_export_decl(export),
            ModuleDecl::ExportNamed(export) => self.rewrite_named_export(export),
            ModuleDecl::ExportDefaultDecl(export) => self.rewrite_export_default_decl(export),
            ModuleDecl::ExportDefaultExpr(export) => self.rewrite_export_default_expr(export),
            ModuleDecl::ExportAll(export) => self.rewrite_export_all(export),
            ModuleDecl::TsImportEquals(decl) => self.rewrite_import_equals(decl),
            ModuleDecl::TsExportAssignment(assign) => self.rewrite_export_assignment(assign),
            ModuleDecl::TsNamespaceExport(decl) => self.blank_span(decl.span),
        }
    }

    fn keeps_import(&self, specifier: &ImportSpecifier) -> bool {
        let local = match specifier {
            ImportSpecifier::Named(named) if named.is_type_only => return false,
            ImportSpecifier::Named(named) => &named.local,
            ImportSpecifier::Default(default) => &default.local,
            ImportSpecifier::Namespace(namespace) => &namespace.local,
        };
        self.references
            .as_ref()
            .map_or(true, |names| names.contains(local.sym.as_str()))
    }

    fn rewrite_import(&mut self, import: &ImportDecl) {
        if import.type_only {
            return self.blank_span(import.span);
        }
        let kept: Vec<&ImportSpecifier> = import
            .specifiers
            .iter()
            .filter(|specifier| self.keeps_import(specifier))
            .collect();
        if !import.specifiers.is_empty() && kept.is_empty() {
            return self.blank_span(import.span);
        }

        let src = self.text(import.src.span);
        let range = self.lo(import.span)..self.hi(import.span);
        if self.commonjs() {
            let text = self.import_to_require(&kept, src);
            self.edits.replace(range, text);
        } else if kept.len() != import.specifiers.len() {
            let text = self.import_statement(&kept, src);
            self.edits.replace(range, text);
        }
    }

    fn import_to_require(&mut self, specifiers: &[&ImportSpecifier], src: &str) -> String {
        let required = format!("require({src})");
        match specifiers {
            [] => return format!("{required};"),
            [ImportSpecifier::Default(default)] => {
                return format!("var {} = {};", default.local.sym, self.default_of(&required));
            }
            [ImportSpecifier::Namespace(namespace)] => {
                return format!("var {} = {required};", namespace.local.sym);
            }
            [ImportSpecifier::Named(named)]
                if !named
                    .imported
                    .as_ref()
                    .is_some_and(|imported| export_name_is(imported, "default")) =>
            {
                let value = match &named.imported {
                    Some(imported) => self.member(&required, imported),
                    None => format!("{required}.{}", named.local.sym),
                };
                return format!("var {} = {value};", named.local.sym);
            }
            _ => {}
        }

        let temp = self.next_temp();
        let mut text = format!("var {temp} = {required};");
        for specifier in specifiers {
            let binding = match specifier {
                ImportSpecifier::Default(default) => {
                    format!("var {} = {};", default.local.sym, self.default_of(&temp))
                }
                ImportSpecifier::Namespace(namespace) => {
                    format!("var {} = {temp};", namespace.local.sym)
                }
                ImportSpecifier::Named(named) => {
                    let value = match &named.imported {
                        Some(imported) if export_name_is(imported, "default") => {
                            self.default_of(&temp)
                        }
                        Some(imported) => self.member(&temp, imported),
                        None => format!("{temp}.{}", named.local.sym),
                    };
                    format!("var {} = {value};", named.local.sym)
                }
            };
            text.push_str(&binding);
        }
        text
    }

    /// An `import` statement with only the given specifiers.
    fn import_statement(&self, specifiers: &[&ImportSpecifier], src: &str) -> String {
        let mut clauses = Vec::new();
        let mut named = Vec::new();
        for specifier in specifiers {
            match specifier {
                ImportSpecifier::Default(default) => clauses.push(default.local.sym.to_string()),
                ImportSpecifier::Namespace(namespace) => {
                    clauses.push(format!("* as {}", namespace.local.sym));
                }
                ImportSpecifier::Named(specifier) => named.push(match &specifier.imported {
                    Some(imported) => format!(
                        "{} as {}",
                        self.text(export_name_span(imported)),
                        specifier.local.sym
                    ),
                    None => specifier.local.sym.to_string(),
                }),
            }
        }
        if !named.is_empty() {
            clauses.push(format!("{{ {} }}", named.join(", ")));
        }
        format!("import {} from {src};", clauses.join(", "))
    }

    fn rewrite_export_decl(&mut self, export: &ExportDecl) {
        if is_type_only_decl(&export.decl) {
            return self.blank_span(export.span);
        }

        let start = self.lo(export.span);
        let decl_start = self.keyword_end(start, "export");
        let end = self.hi(export.span);

        if self.commonjs() {
            self.has_exports = true;
            let mut names = Vec::new();
            match &export.decl {
                Decl::Fn(decl) => {
                    let name = &decl.ident.sym;
                    self.edits
                        .replace(start..decl_start, format!("exports.{name} = {name};"));
                }
                Decl::Class(decl) => names.push(decl.ident.sym.to_string()),
                Decl::Var(var) => {
                    for declarator in &var.decls {
                        binding_names(&declarator.name, &mut names);
                    }
                }
                Decl::TsEnum(decl) => names.push(decl.id.sym.to_string()),
                Decl::TsModule(_)
                | Decl::Using(_)
                | Decl::TsInterface(_)
                | Decl::TsTypeAlias(_) => {}
            }
            if !matches!(export.decl, Decl::Fn(_)) {
                self.edits.replace(start..decl_start, "");
            }
            if !names.is_empty() {
                let terminated = matches!(export.decl, Decl::TsEnum(_))
                    || self.source[..end].ends_with(';');
                let separator = if terminated { "" } else { ";" };
                let assignments: String = names
                    .iter()
                    .map(|name| format!("exports.{name} = {name};"))
                    .collect();
                self.edits.insert(end, format!("{separator}{assignments}"));
            }
        }

        match &export.decl {
            Decl::TsEnum(decl) => self.emit_enum(decl),
            Decl::TsModule(decl) => self.unsupported("namespace", decl.span),
            decl => decl.visit_with(self),
        }
    }

    fn rewrite_export_default_decl(&mut self, export: &ExportDefaultDecl) {
        match &export.decl {
            DefaultDecl::TsInterfaceDecl(_) => return self.blank_span(export.span),
            DefaultDecl::Fn(decl) if decl.function.body.is_none() => {
                return self.blank_span(export.span);
            }
            _ => {}
        }

        if self.commonjs() {
            self.has_exports = true;
            let start = self.lo(export.span);
            let decl_start = self.keyword_end(self.keyword_end(start, "export"), "default");
            let end = self.hi(export.span);
            match &export.decl {
                DefaultDecl::Fn(FnExpr {
                    ident: Some(ident), ..
                }) => {
                    self.edits
                        .replace(start..decl_start, format!("exports.default = {};", ident.sym));
                }
                DefaultDecl::Class(ClassExpr {
                    ident: Some(ident), ..
                }) => {
                    self.edits.replace(start..decl_start, "");
                    self.edits
                        .insert(end, format!(";exports.default = {};", ident.sym));
                }
                _ => {
                    self.edits.replace(start..decl_start, "exports.default = ");
                    self.edits.insert(end, ";");
                }
            }
        }

        export.decl.visit_with(self);
    }

    fn rewrite_export_default_expr(&mut self, export: &ExportDefaultExpr) {
        if self.commonjs() {
            self.has_exports = true;
            let start = self.lo(export.span);
            let expr_start = self.lo(export.expr.span());
            self.edits.replace(start..expr_start, "exports.default = ");
        }
        export.expr.visit_with(self);
    }

    fn rewrite_named_export(&mut self, export: &NamedExport) {
        if export.type_only {
            return self.blank_span(export.span);
        }
        let kept: Vec<&ExportSpecifier> = export
            .specifiers
            .iter()
            .filter(|specifier| match specifier {
                ExportSpecifier::Named(named) => {
                    !named.is_type_only
                        && (export.src.is_some()
                            || !matches!(&named.orig, ModuleExportName::Ident(orig)
                                if self.type_names.contains(orig.sym.as_str())))
                }
                _ => true,
            })
            .collect();
        if !export.specifiers.is_empty() && kept.is_empty() {
            return self.blank_span(export.span);
        }
        let range = self.lo(export.span)..self.hi(export.span);

        if !self.commonjs() {
            if kept.len() != export.specifiers.len() {
                let text = self.export_statement(&kept, export);
                self.edits.replace(range, text);
            }
            return;
        }

        self.has_exports = true;
        let Some(src) = &export.src else {
            // Assigned after the last statement, once every local is initialized.
            for specifier in kept {
                if let ExportSpecifier::Named(named) = specifier {
                    let exported = named.exported.as_ref().unwrap_or(&named.orig);
                    let assignment = format!(
                        "{} = {};",
                        self.export_target(exported),
                        self.text(export_name_span(&named.orig))
                    );
                    self.deferred_exports.push_str(&assignment);
                }
            }
            return self.edits.replace(range, "");
        };

        let temp = self.next_temp();
        let mut text = format!("var {temp} = require({});", self.text(src.span));
        for specifier in kept {
            let assignment = match specifier {
                ExportSpecifier::Named(named) => {
                    let exported = named.exported.as_ref().unwrap_or(&named.orig);
                    let value = if export_name_is(&named.orig, "default") {
                        self.default_of(&temp)
                    } else {
                        self.member(&temp, &named.orig)
                    };
                    format!("{} = {value};", self.export_target(exported))
                }
                ExportSpecifier::Namespace(namespace) => {
                    format!("{} = {temp};", self.export_target(&namespace.name))
                }
                ExportSpecifier::Default(default) => {
                    format!("exports.{} = {};", default.exported.sym, self.default_of(&temp))
                }
            };
            text.push_str(&assignment);
        }
        self.edits.replace(range, text);
    }

    /// An `export { ... }` statement with only the given specifiers.
    fn export_statement(&self, specifiers: &[&ExportSpecifier], export: &NamedExport) -> String {
        let names: Vec<&str> = specifiers
            .iter()
            .map(|specifier| match specifier {
                ExportSpecifier::Named(named) => self.text(named.span),
                ExportSpecifier::Namespace(namespace) => self.text(namespace.span),
                ExportSpecifier::Default(default) => self.text(default.exported.span),
            })
            .collect();
        match &export.src {
            Some(src) => format!(
                "export {{ {} }} from {};",
                names.join(", "),
                self.text(src.span)
            ),
            None => format!("export {{ {} }};", names.join(", ")),
        }
    }

    fn rewrite_export_all(&mut self, export: &ExportAll) {
        if export.type_only {
            return self.blank_span(export.span);
        }
        if !self.commonjs() {
            return;
        }
        self.has_exports = true;
        let args = format!("require({}), exports", self.text(export.src.span));
        let text = format!("{};", self.helpers.call(Helper::ExportStar, &args));
        let range = self.lo(export.span)..self.hi(export.span);
        self.edits.replace(range, text);
    }

    fn rewrite_import_equals(&mut self, decl: &TsImportEqualsDecl) {
        let name = decl.id.sym.as_str();
        let unused = !decl.is_export
            && self
                .references
                .as_ref()
                .is_some_and(|names| !names.contains(name));
        if decl.is_type_only || unused {
            return self.blank_span(decl.span);
        }

        let value = match &decl.module_ref {
            TsModuleRef::TsExternalModuleRef(external) => {
                format!("require({})", self.text(external.expr.span))
            }
            TsModuleRef::TsEntityName(entity) => self.text(entity.span()).to_string(),
        };
        let mut text = format!("var {name} = {value};");
        if decl.is_export {
            if self.commonjs() {
                self.has_exports = true;
                text.push_str(&format!("exports.{name} = {name};"));
            } else {
                text.insert_str(0, "export ");
            }
        }
        let range = self.lo(decl.span)..self.hi(decl.span);
        self.edits.replace(range, text);
    }

    fn rewrite_export_assignment(&mut self, assign: &TsExportAssignment) {
        let start = self.lo(assign.span);
        let expr_start = self.lo(assign.expr.span());
        self.edits.replace(start..expr_start, "module.exports = ");
        assign.expr.visit_with(self);
    }
}

fn export_name_is(name: &ModuleExportName, expected: &str) -> bool {
    match name {
        ModuleExportName::Ident(ident) => ident.sym.as_str() == expected,
        ModuleExportName::Str(s) => s.value.as_str() == Some(expected),
    }
}

fn export_name_span(name: &ModuleExportName) -> Span {
    match name {
        ModuleExportName::Ident(ident) => ident.span,
        ModuleExportName::Str(s) => s.span,
    }
}

/// Every name a binding pattern declares.
fn binding_names(pat: &Pat, names: &mut Vec<String>) {
    match pat {
        Pat::Ident(binding) => names.push(binding.id.sym.to_string()),
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                binding_names(elem, names);
            }
        }
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => binding_names(&kv.value, names),
                    ObjectPatProp::Assign(assign) => names.push(assign.key.id.sym.to_string()),
                    ObjectPatProp::Rest(rest) => binding_names(&rest.arg, names),
                }
            }
        }
        Pat::Rest(rest) => binding_names(&rest.arg, names),
        Pat::Assign(assign) => binding_names(&assign.left, names),
        Pat::Invalid(_) | Pat::Expr(_) => {}
    }
}

/// Top-level names declared only as types: interfaces, type aliases and
/// type-only imports.
fn type_names(module: &Module) -> FxHashSet<String> {
    let mut names = FxHashSet::default();
    for item in &module.body {
        let decl = match item {
            ModuleItem::Stmt(Stmt::Decl(decl)) => decl,
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => &export.decl,
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                for specifier in &import.specifiers {
                    match specifier {
                        ImportSpecifier::Named(named) if import.type_only || named.is_type_only => {
                            names.insert(named.local.sym.to_string());
                        }
                        ImportSpecifier::Default(default) if import.type_only => {
                            names.insert(default.local.sym.to_string());
                        }
                        _ => {}
                    }
                }
                continue;
            }
            _ => continue,
        };
        match decl {
            Decl::TsInterface(interface) => {
                names.insert(interface.id.sym.to_string());
            }
            Decl::TsTypeAlias(alias) => {
                names.insert(alias.id.sym.to_string());
            }
            _ => {}
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cjs(typescript: bool) -> RewriteOptions {
        RewriteOptions {
            typescript,
            module: ModuleKind::CommonJs,
            helpers: HelperMode::Shared,
            interop: ImportInterop::Helper,
            elide_imports: typescript,
        }
    }

    fn run(source: &str, options: RewriteOptions) -> String {
        rewrite(source, &options).unwrap()
    }

    const USE_STRICT: &str = "\"use strict\";";
    const ES_MODULE: &str = "Object.defineProperty(exports, \"__esModule\", { value: true });";
    const INTEROP: &str =
        "function __sfc_interopDefault(m) { return m && m.__esModule ? m : { default: m }; }";

    #[test]
    fn test_plain_script_is_untouched() {
        let source = "var a = 1;\nwith (a) { b }\n";
        assert_eq!(run(source, cjs(false)), source);
    }

    #[test]
    fn test_export_default_object() {
        assert_eq!(
            run("export default {\n  name: 'x'\n}\n", cjs(false)),
            format!("{USE_STRICT}{ES_MODULE}exports.default = {{\n  name: 'x'\n}}\n")
        );
    }

    #[test]
    fn test_default_import() {
        assert_eq!(
            run("import Foo from './Foo.vue'\nexport default { components: { Foo } }", cjs(false)),
            format!(
                "{USE_STRICT}{ES_MODULE}{INTEROP}var Foo = __sfc_interopDefault(require('./Foo.vue')).default;\nexports.default = {{ components: {{ Foo }} }}"
            )
        );
    }

    #[test]
    fn test_named_and_namespace_imports() {
        assert_eq!(
            run("import { a, b as c } from 'm'\nimport * as ns from 'n'\nimport 'side'\nuse(a, c, ns)", cjs(false)),
            format!(
                "{USE_STRICT}var __sfc_module1 = require('m');var a = __sfc_module1.a;var c = __sfc_module1.b;\nvar ns = require('n');\nrequire('side');\nuse(a, c, ns)"
            )
        );
    }

    #[test]
    fn test_multiline_import_keeps_lines() {
        let out = run("import {\n  a,\n  b\n} from 'm'\nuse(a, b)", cjs(false));
        assert_eq!(out.lines().count(), 5);
        assert_eq!(out.lines().last(), Some("use(a, b)"));
    }

    #[test]
    fn test_export_declarations() {
        assert_eq!(
            run("export const a = 1, b = 2\nexport function f() {}\nexport class C {}", cjs(false)),
            format!(
                "{USE_STRICT}{ES_MODULE}const a = 1, b = 2;exports.a = a;exports.b = b;\nexports.f = f;function f() {{}}\nclass C {{}};exports.C = C;"
            )
        );
    }

    #[test]
    fn test_local_export_list_is_deferred() {
        assert_eq!(
            run("export { a as b }\nlet a = 1", cjs(false)),
            format!("{USE_STRICT}{ES_MODULE}\nlet a = 1;exports.b = a;")
        );
    }

    #[test]
    fn test_re_exports() {
        assert_eq!(
            run("export { default as Foo, bar } from './foo'\nexport * from './all'", cjs(false)),
            format!(
                "{USE_STRICT}{ES_MODULE}{INTEROP}function __sfc_exportStar(m, e) {{ Object.keys(m).forEach(function (k) {{ if (k !== \"default\" && !Object.prototype.hasOwnProperty.call(e, k)) e[k] = m[k]; }}); return m; }}var __sfc_module1 = require('./foo');exports.Foo = __sfc_interopDefault(__sfc_module1).default;exports.bar = __sfc_module1.bar;\n__sfc_exportStar(require('./all'), exports);"
            )
        );
    }

    #[test]
    fn test_export_default_named_function_and_class() {
        assert_eq!(
            run("export default function setup() {}", cjs(false)),
            format!("{USE_STRICT}{ES_MODULE}exports.default = setup;function setup() {{}}")
        );
        assert_eq!(
            run("export default class Foo {}", cjs(false)),
            format!("{USE_STRICT}{ES_MODULE}class Foo {{}};exports.default = Foo;")
        );
    }

    #[test]
    fn test_preserve_keeps_module_syntax() {
        let options = RewriteOptions {
            module: ModuleKind::Preserve,
            ..cjs(false)
        };
        let source = "import a from 'a'\nexport default a\n";
        assert_eq!(run(source, options), source);
    }

    #[test]
    fn test_type_only_imports_are_elided() {
        assert_eq!(
            run("import { Props, helper } from './types'\nimport type { X } from 'x'\nexport default helper as Props", cjs(true)),
            format!(
                "{USE_STRICT}{ES_MODULE}var helper = require('./types').helper;\n{}\nexports.default = helper{}",
                " ".repeat(26),
                " ".repeat(9)
            )
        );
    }

    #[test]
    fn test_verbatim_imports_are_kept() {
        let options = RewriteOptions {
            elide_imports: false,
            ..cjs(true)
        };
        assert_eq!(
            run("import { T } from './t'\nlet x: T", options),
            format!("{USE_STRICT}var T = require('./t').T;\nlet x   ")
        );
    }

    #[test]
    fn test_exported_interface_names_are_dropped() {
        assert_eq!(
            run("interface Props { a: string }\nconst x = 1\nexport { Props, x }", cjs(true)),
            format!(
                "{USE_STRICT}{ES_MODULE}{}\nconst x = 1\n;exports.x = x;",
                " ".repeat(29)
            )
        );
    }

    #[test]
    fn test_syntax_error_offset() {
        let err = rewrite("let a = 1\nlet = = 2\n", &cjs(false)).unwrap_err();
        assert!(matches!(err, RewriteError::Syntax { offset, .. } if offset >= 10));
    }
}
