//! Value references, used to elide imports that only feed types.

use rustc_hash::FxHashSet;
use swc_ecma_ast::{
    Ident, ImportDecl, Module, TsEntityName, TsExprWithTypeArgs, TsImportEqualsDecl,
    TsInterfaceDecl, TsModuleRef, TsType, TsTypeAliasDecl, TsTypeAnn, TsTypeParamDecl,
    TsTypeParamInstantiation,
};
use swc_ecma_visit::{Visit, VisitWith};

/// Collects the names of every identifier used in a value position.
///
/// Shadowing is ignored: a name counts as used if any value position
/// mentions it.
#[derive(Default)]
struct ValueReferences {
    names: FxHashSet<String>,
}

pub(crate) fn value_references(module: &Module) -> FxHashSet<String> {
    let mut collector = ValueReferences::default();
    module.visit_with(&mut collector);
    collector.names
}

impl Visit for ValueReferences {
    fn visit_ident(&mut self, ident: &Ident) {
        self.names.insert(ident.sym.to_string());
    }

    fn visit_import_decl(&mut self, _: &ImportDecl) {}

    fn visit_ts_import_equals_decl(&mut self, decl: &TsImportEqualsDecl) {
        if let TsModuleRef::TsEntityName(name) = &decl.module_ref {
            name.visit_with(self);
        }
    }

    fn visit_ts_entity_name(&mut self, name: &TsEntityName) {
        match name {
            TsEntityName::Ident(ident) => self.visit_ident(ident),
            TsEntityName::TsQualifiedName(qualified) => qualified.left.visit_with(self),
        }
    }

    fn visit_ts_type(&mut self, _: &TsType) {}
    fn visit_ts_type_ann(&mut self, _: &TsTypeAnn) {}
    fn visit_ts_type_param_decl(&mut self, _: &TsTypeParamDecl) {}
    fn visit_ts_type_param_instantiation(&mut self, _: &TsTypeParamInstantiation) {}
    fn visit_ts_expr_with_type_args(&mut self, _: &TsExprWithTypeArgs) {}
    fn visit_ts_interface_decl(&mut self, _: &TsInterfaceDecl) {}
    fn visit_ts_type_alias_decl(&mut self, _: &TsTypeAliasDecl) {}
}
