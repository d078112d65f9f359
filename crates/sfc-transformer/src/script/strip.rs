//! TypeScript syntax removal.
//!
//! Types are blanked to spaces. The few TypeScript forms that carry runtime
//! meaning (parameter properties and enums) are lowered in place.

use swc_common::Spanned;
use swc_ecma_ast::{
    BindingIdent, CallExpr, Callee, Class, ClassMember, Constructor, Decl, Decorator, Expr,
    ExprStmt, Function, Lit, ModuleDecl, ModuleItem, ParamOrTsParamProp, Pat, Stmt, TsAsExpr,
    TsConstAssertion, TsEnumDecl, TsEnumMemberId, TsExprWithTypeArgs, TsNamespaceBody,
    TsNonNullExpr, TsParamPropParam, TsSatisfiesExpr, TsTypeAnn, TsTypeAssertion,
    TsTypeParamDecl, TsTypeParamInstantiation, UnaryExpr, UnaryOp, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::rewrite::Rewriter;

const TS_MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "readonly",
    "override",
    "declare",
    "abstract",
];

const JS_MODIFIERS: &[&str] = &["static", "async", "get", "set", "accessor"];

/// Whether `decl` has no runtime effect.
pub(super) fn is_type_only_decl(decl: &Decl) -> bool {
    match decl {
        Decl::TsInterface(_) | Decl::TsTypeAlias(_) => true,
        Decl::Var(var) => var.declare,
        Decl::Fn(decl) => decl.declare || decl.function.body.is_none(),
        Decl::Class(decl) => decl.declare,
        Decl::TsEnum(decl) => decl.declare,
        Decl::TsModule(decl) => {
            decl.declare || !decl.body.as_ref().is_some_and(namespace_is_instantiated)
        }
        Decl::Using(_) => false,
    }
}

fn namespace_is_instantiated(body: &TsNamespaceBody) -> bool {
    match body {
        TsNamespaceBody::TsModuleBlock(block) => block.body.iter().any(|item| match item {
            ModuleItem::Stmt(Stmt::Decl(decl)) => !is_type_only_decl(decl),
            ModuleItem::Stmt(Stmt::Empty(_)) => false,
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                !is_type_only_decl(&export.decl)
            }
            _ => true,
        }),
        TsNamespaceBody::TsNamespaceDecl(decl) => namespace_is_instantiated(&decl.body),
    }
}

fn literal_number(expr: &Expr) -> Option<f64> {
    match expr {
        Expr::Lit(Lit::Num(num)) => Some(num.value),
        Expr::Unary(UnaryExpr {
            op: UnaryOp::Minus,
            arg,
            ..
        }) => literal_number(arg).map(|value| -value),
        Expr::Paren(paren) => literal_number(&paren.expr),
        _ => None,
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn quote(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

/// The value of the next enum member without an initializer.
enum AutoValue {
    Number(f64),
    After(String),
}

impl Rewriter<'_> {
    fn is_word_byte(byte: u8) -> bool {
        byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$'
    }

    /// Modifier keywords between `floor` and `key`, nearest first.
    fn modifiers_before(&self, floor: usize, key: usize) -> Vec<(usize, usize, bool)> {
        let bytes = self.source.as_bytes();
        let floor = floor.min(key);
        let mut found = Vec::new();
        let mut pos = key;
        loop {
            let end = floor + self.source[floor..pos].trim_end().len();
            let mut start = end;
            while start > floor && Self::is_word_byte(bytes[start - 1]) {
                start -= 1;
            }
            if start == end {
                if end > floor && bytes[end - 1] == b'*' {
                    pos = end - 1;
                    continue;
                }
                break;
            }
            let word = &self.source[start..end];
            if TS_MODIFIERS.contains(&word) {
                found.push((start, end, true));
            } else if JS_MODIFIERS.contains(&word) {
                found.push((start, end, false));
            } else {
                break;
            }
            pos = start;
        }
        found
    }

    fn blank_modifiers(&mut self, floor: usize, key: usize) {
        for (start, end, typescript) in self.modifiers_before(floor, key) {
            if typescript {
                self.blank_range(start, end);
            }
        }
    }

    /// Blanks a whole class member including its modifiers.
    fn blank_member(&mut self, floor: usize, key: usize, member_lo: usize, member_hi: usize) {
        let start = self
            .modifiers_before(floor, key)
            .last()
            .map_or(member_lo, |(start, _, _)| (*start).min(member_lo));
        self.blank_range(start, member_hi);
    }

    fn blank_marker_after(&mut self, pos: usize, marker: char) {
        let pos = self.skip_whitespace(pos);
        if self.source[pos..].starts_with(marker) {
            self.blank_range(pos, pos + 1);
        }
    }

    /// Start of a declaration, including a leading `declare` or `const`.
    fn decl_start(&self, decl: &Decl) -> usize {
        let lo = self.lo(decl.span());
        let keyword = match decl {
            Decl::Var(var) if var.declare => "declare",
            Decl::Fn(decl) if decl.declare => "declare",
            Decl::Class(decl) if decl.declare => "declare",
            Decl::TsEnum(decl) if decl.declare => "declare",
            Decl::TsEnum(decl) if decl.is_const => "const",
            Decl::TsModule(decl) if decl.declare => "declare",
            _ => return lo,
        };
        self.extend_to_keyword(lo, keyword)
    }

    fn extend_to_keyword(&self, lo: usize, keyword: &str) -> usize {
        if self.source[lo..].starts_with(keyword) {
            lo
        } else {
            self.keyword_before(lo, keyword).unwrap_or(lo)
        }
    }

    fn blank_decl(&mut self, decl: &Decl) {
        let start = self.decl_start(decl);
        let end = self.hi(decl.span());
        self.blank_range(start, end);
    }

    /// Lowers an enum to the object it denotes at runtime.
    pub(super) fn emit_enum(&mut self, decl: &TsEnumDecl) {
        let name = decl.id.sym.as_str();
        let mut body = String::new();
        let mut auto = AutoValue::Number(0.0);

        for member in &decl.members {
            let key = match &member.id {
                TsEnumMemberId::Ident(ident) => quote(ident.sym.as_str()),
                TsEnumMemberId::Str(s) => self.text(s.span).to_string(),
            };
            let reverse = |value: &str| format!("{name}[{name}[{key}] = {value}] = {key}; ");

            match member.init.as_deref() {
                None => {
                    match auto {
                        AutoValue::Number(value) => {
                            body.push_str(&reverse(&format_number(value)));
                            auto = AutoValue::Number(value + 1.0);
                        }
                        AutoValue::After(previous) => {
                            body.push_str(&reverse(&format!("{name}[{previous}] + 1")));
                            auto = AutoValue::After(key);
                        }
                    }
                }
                Some(init) => match literal_number(init) {
                    Some(value) => {
                        body.push_str(&reverse(&format_number(value)));
                        auto = AutoValue::Number(value + 1.0);
                    }
                    None if matches!(init, Expr::Lit(Lit::Str(_)) | Expr::Tpl(_)) => {
                        body.push_str(&format!("{name}[{key}] = {}; ", self.text(init.span())));
                        auto = AutoValue::After(key);
                    }
                    None => {
                        body.push_str(&reverse(self.text(init.span())));
                        auto = AutoValue::After(key);
                    }
                },
            }
        }

        let text = format!(
            "var {name}; (function ({name}) {{ {body}}})({name} || ({name} = {{}}));"
        );
        let lo = self.lo(decl.span);
        let start = if decl.is_const {
            self.extend_to_keyword(lo, "const")
        } else {
            lo
        };
        let end = self.hi(decl.span);
        self.edits.replace(start..end, text);
    }

    fn strip_class_member(&mut self, member: &ClassMember, floor: usize) {
        let member_lo = self.lo(member.span());
        let member_hi = self.hi(member.span());
        match member {
            ClassMember::Constructor(ctor) => self.strip_constructor(ctor, floor),
            ClassMember::Method(method) => {
                let key = self.lo(method.key.span());
                if method.is_abstract || method.function.body.is_none() {
                    return self.blank_member(floor, key, member_lo, member_hi);
                }
                self.blank_modifiers(floor, key);
                if method.is_optional {
                    self.blank_marker_after(self.hi(method.key.span()), '?');
                }
                method.visit_children_with(self);
            }
            ClassMember::PrivateMethod(method) => {
                let key = self.lo(method.key.span);
                if method.is_abstract || method.function.body.is_none() {
                    return self.blank_member(floor, key, member_lo, member_hi);
                }
                self.blank_modifiers(floor, key);
                if method.is_optional {
                    self.blank_marker_after(self.hi(method.key.span), '?');
                }
                method.visit_children_with(self);
            }
            ClassMember::ClassProp(prop) => {
                let key = self.lo(prop.key.span());
                if prop.declare || prop.is_abstract {
                    return self.blank_member(floor, key, member_lo, member_hi);
                }
                self.blank_modifiers(floor, key);
                if prop.is_optional {
                    self.blank_marker_after(self.hi(prop.key.span()), '?');
                }
                if prop.definite {
                    self.blank_marker_after(self.hi(prop.key.span()), '!');
                }
                prop.visit_children_with(self);
            }
            ClassMember::PrivateProp(prop) => {
                let key = self.lo(prop.key.span);
                self.blank_modifiers(floor, key);
                if prop.is_optional {
                    self.blank_marker_after(self.hi(prop.key.span), '?');
                }
                if prop.definite {
                    self.blank_marker_after(self.hi(prop.key.span), '!');
                }
                prop.visit_children_with(self);
            }
            ClassMember::TsIndexSignature(signature) => {
                let start = self.lo(signature.span);
                self.blank_member(floor, start, member_lo, member_hi);
            }
            member => member.visit_children_with(self),
        }
    }

    fn strip_constructor(&mut self, ctor: &Constructor, floor: usize) {
        let member_lo = self.lo(ctor.span);
        let key = self.lo(ctor.key.span());
        let Some(body) = &ctor.body else {
            return self.blank_member(floor, key, member_lo, self.hi(ctor.span));
        };
        self.blank_modifiers(floor, key);

        let mut assignments = String::new();
        let mut param_floor = self.hi(ctor.key.span());
        for param in &ctor.params {
            match param {
                ParamOrTsParamProp::Param(param) => param.visit_with(self),
                ParamOrTsParamProp::TsParamProp(prop) => {
                    prop.decorators.visit_with(self);
                    let binding = match &prop.param {
                        TsParamPropParam::Ident(binding) => Some(binding),
                        TsParamPropParam::Assign(assign) => match &*assign.left {
                            Pat::Ident(binding) => Some(binding),
                            _ => None,
                        },
                    };
                    if let Some(binding) = binding {
                        let name = &binding.id.sym;
                        assignments.push_str(&format!("this.{name} = {name};"));
                    }
                    self.blank_modifiers(param_floor, self.lo(prop.param.span()));
                    prop.param.visit_with(self);
                }
            }
            param_floor = self.hi(param.span());
        }

        body.visit_with(self);

        if assignments.is_empty() {
            return;
        }
        let super_call = body.stmts.iter().find(|stmt| {
            matches!(stmt, Stmt::Expr(ExprStmt { expr, .. })
                if matches!(&**expr, Expr::Call(CallExpr { callee: Callee::Super(_), .. })))
        });
        match super_call {
            Some(stmt) => {
                let at = self.hi(stmt.span());
                if !self.source[..at].ends_with(';') {
                    assignments.insert(0, ';');
                }
                self.edits.insert(at, assignments);
            }
            None => {
                let at = self.lo(body.span) + 1;
                self.edits.insert(at, assignments);
            }
        }
    }
}

impl Visit for Rewriter<'_> {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        if let Stmt::Decl(decl) = stmt {
            if is_type_only_decl(decl) {
                return self.blank_decl(decl);
            }
            match decl {
                Decl::TsEnum(decl) => return self.emit_enum(decl),
                Decl::TsModule(decl) => return self.unsupported("namespace", decl.span),
                _ => {}
            }
        }
        stmt.visit_children_with(self);
    }

    fn visit_ts_type_ann(&mut self, ann: &TsTypeAnn) {
        self.blank_span(ann.span);
    }

    fn visit_ts_type_param_decl(&mut self, params: &TsTypeParamDecl) {
        self.blank_span(params.span);
    }

    fn visit_ts_type_param_instantiation(&mut self, args: &TsTypeParamInstantiation) {
        self.blank_span(args.span);
    }

    // Only reached through `implements`, which `visit_class` blanks whole.
    fn visit_ts_expr_with_type_args(&mut self, _: &TsExprWithTypeArgs) {}

    fn visit_ts_as_expr(&mut self, expr: &TsAsExpr) {
        expr.expr.visit_with(self);
        let start = self.hi(expr.expr.span());
        self.blank_range(start, self.hi(expr.span));
    }

    fn visit_ts_satisfies_expr(&mut self, expr: &TsSatisfiesExpr) {
        expr.expr.visit_with(self);
        let start = self.hi(expr.expr.span());
        self.blank_range(start, self.hi(expr.span));
    }

    fn visit_ts_const_assertion(&mut self, expr: &TsConstAssertion) {
        expr.expr.visit_with(self);
        let start = self.hi(expr.expr.span());
        self.blank_range(start, self.hi(expr.span));
    }

    fn visit_ts_non_null_expr(&mut self, expr: &TsNonNullExpr) {
        expr.expr.visit_with(self);
        let start = self.hi(expr.expr.span());
        self.blank_range(start, self.hi(expr.span));
    }

    fn visit_ts_type_assertion(&mut self, expr: &TsTypeAssertion) {
        let end = self.lo(expr.expr.span());
        self.blank_range(self.lo(expr.span), end);
        expr.expr.visit_with(self);
    }

    fn visit_class(&mut self, class: &Class) {
        class.decorators.visit_with(self);

        if class.is_abstract {
            let lo = self.lo(class.span);
            let start = if self.source[lo..].starts_with("abstract") {
                Some(lo)
            } else {
                self.keyword_before(lo, "abstract")
            };
            if let Some(start) = start {
                self.blank_range(start, start + "abstract".len());
            }
        }

        class.type_params.visit_with(self);
        class.super_class.visit_with(self);
        class.super_type_params.visit_with(self);

        if let (Some(first), Some(last)) = (class.implements.first(), class.implements.last()) {
            let lo = self.lo(first.span);
            let start = self.keyword_before(lo, "implements").unwrap_or(lo);
            self.blank_range(start, self.hi(last.span));
        }

        let mut floor = self.lo(class.span);
        for member in &class.body {
            self.strip_class_member(member, floor);
            floor = self.hi(member.span());
        }
    }

    fn visit_function(&mut self, function: &Function) {
        if let Some(first) = function.params.first() {
            if matches!(&first.pat, Pat::Ident(binding) if binding.id.sym.as_str() == "this") {
                let end = function
                    .params
                    .get(1)
                    .map_or_else(|| self.hi(first.span), |next| self.lo(next.span));
                self.blank_range(self.lo(first.span), end);
            }
        }
        function.visit_children_with(self);
    }

    fn visit_binding_ident(&mut self, binding: &BindingIdent) {
        if binding.id.optional {
            let after_name = self.lo(binding.id.span) + binding.id.sym.len();
            self.blank_marker_after(after_name, '?');
        }
        binding.visit_children_with(self);
    }

    fn visit_var_declarator(&mut self, declarator: &VarDeclarator) {
        if declarator.definite {
            if let Pat::Ident(binding) = &declarator.name {
                let after_name = self.lo(binding.id.span) + binding.id.sym.len();
                self.blank_marker_after(after_name, '!');
            }
        }
        declarator.visit_children_with(self);
    }

    fn visit_decorator(&mut self, decorator: &Decorator) {
        self.unsupported("decorator", decorator.span);
    }
}
