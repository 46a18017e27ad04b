//! Declaration installer - fills the global tables before any body is checked

use std::collections::HashSet;

use super::analyzer::SemanticAnalyzer;
use super::tables::Signature;
use crate::common::{DiagnosticKind, Symbol};
use crate::frontend::ast::{FnDecl, Program, VarDecl};

impl SemanticAnalyzer<'_> {
    /// Record every function signature and global variable of the unit.
    ///
    /// Functions go in first so the `main` check sees the whole unit; globals
    /// follow. Nothing here aborts: every problem is a diagnostic.
    pub(super) fn install_declarations(&mut self, program: &Program) {
        for func in program.functions() {
            self.install_function(func);
        }

        let main = self.interner.main_symbol();
        if !self.tables.has_function(main) {
            self.error(DiagnosticKind::MissingMain, 0, "main is not defined");
        }

        let mut seen = HashSet::new();
        for var in program.globals() {
            self.install_global(var, &mut seen);
        }
    }

    fn install_function(&mut self, func: &FnDecl) {
        let name = self.name(func.name);

        if func.name == self.interner.print_symbol() {
            self.error(
                DiagnosticKind::ReservedName,
                func.line,
                format!("'{}' is reserved and cannot be redefined", name),
            );
        }

        let signature = Signature::new(func.return_type, func.param_types());
        if !self.tables.declare_function(func.name, signature) {
            self.error(
                DiagnosticKind::DuplicateFunction,
                func.line,
                format!("function '{}' has already been defined", name),
            );
        }
    }

    /// `seen` holds every global name met so far, including `Void` ones
    /// that never reach the tables, so a redefinition is always reported.
    fn install_global(&mut self, var: &VarDecl, seen: &mut HashSet<Symbol>) {
        let name = self.name(var.name);
        let first = seen.insert(var.name);

        if !first {
            self.error(
                DiagnosticKind::DuplicateGlobal,
                var.line,
                format!("global variable '{}' has already been defined", name),
            );
        }

        if var.name == self.interner.print_symbol() {
            self.error(
                DiagnosticKind::ReservedName,
                var.line,
                format!("'{}' is reserved and cannot be used as a variable", name),
            );
        }

        if !var.ty.is_value_type() {
            self.error(
                DiagnosticKind::VoidVariable,
                var.line,
                format!("global variable '{}' cannot have type Void", name),
            );
            return;
        }

        if first {
            self.tables.declare_global(var.name, var.ty);
        }
    }
}
