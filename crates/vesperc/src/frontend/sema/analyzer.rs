//! Semantic analyzer - declaration checks, function bodies and statements

use std::ops::{Deref, DerefMut};

use super::control::{guarantees_return, misplaced_jumps, Jump};
use super::scope::ScopeStack;
use super::tables::GlobalTables;
use crate::common::{CompileError, CompileResult, DiagnosticKind, Diagnostics, Interner, Symbol};
use crate::frontend::ast::*;
use crate::types::Type;

/// Checking context for one compilation unit
///
/// Owns the global tables, the scope stack and the collected diagnostics.
/// A fresh analyzer is needed per unit.
pub struct SemanticAnalyzer<'i> {
    pub(super) interner: &'i Interner,
    pub(super) tables: GlobalTables,
    pub(super) scopes: ScopeStack,
    pub(super) diagnostics: Diagnostics,
}

/// Open scope frame, popped when the guard is dropped
///
/// Derefs to the analyzer so checking continues through the guard while
/// the frame is open.
pub(super) struct ScopeGuard<'s, 'i> {
    analyzer: &'s mut SemanticAnalyzer<'i>,
}

impl<'i> Deref for ScopeGuard<'_, 'i> {
    type Target = SemanticAnalyzer<'i>;

    fn deref(&self) -> &Self::Target {
        self.analyzer
    }
}

impl DerefMut for ScopeGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.analyzer
    }
}

impl Drop for ScopeGuard<'_, '_> {
    fn drop(&mut self) {
        self.analyzer.scopes.exit();
    }
}

impl<'i> SemanticAnalyzer<'i> {
    pub fn new(interner: &'i Interner) -> Self {
        Self {
            interner,
            tables: GlobalTables::new(),
            scopes: ScopeStack::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Check a whole program, annotating its expressions with types.
    ///
    /// Returns [`CompileError::Semantic`] when any diagnostic was reported;
    /// the individual diagnostics stay available through
    /// [`diagnostics`](Self::diagnostics).
    pub fn analyze(&mut self, program: &mut Program) -> CompileResult<()> {
        self.install_declarations(program);
        log::debug!(
            "installed {} function(s) and {} global(s)",
            self.tables.function_count(),
            self.tables.global_count()
        );

        self.check_bodies(program);

        let count = self.diagnostics.error_count();
        if count > 0 {
            log::info!("semantic analysis found {} error(s)", count);
            return Err(CompileError::semantic(count));
        }
        Ok(())
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    pub fn tables(&self) -> &GlobalTables {
        &self.tables
    }

    pub(super) fn error(&mut self, kind: DiagnosticKind, line: usize, message: impl Into<String>) {
        self.diagnostics.error(kind, line, message);
    }

    pub(super) fn name(&self, symbol: Symbol) -> &'i str {
        let interner: &'i Interner = self.interner;
        interner.resolve(symbol)
    }

    pub(super) fn enter_scope(&mut self) -> ScopeGuard<'_, 'i> {
        self.scopes.enter();
        ScopeGuard { analyzer: self }
    }

    // =========================================================================
    // Function bodies
    // =========================================================================

    fn check_bodies(&mut self, program: &mut Program) {
        // Globals live in the outermost frame so locals can shadow them
        let mut globals = self.enter_scope();
        let bindings: Vec<(Symbol, Type)> = globals.tables.globals().collect();
        for (name, ty) in bindings {
            let _ = globals.scopes.bind(name, ty);
        }

        for decl in &mut program.decls {
            if let DeclKind::Function(func) = &mut decl.kind {
                globals.check_function(func);
            }
        }
    }

    fn check_function(&mut self, func: &mut FnDecl) {
        log::debug!("checking function '{}'", self.name(func.name));

        // Parameters and the body's top-level locals share this frame
        let mut scope = self.enter_scope();

        for param in &func.params {
            scope.declare_param(func.name, param);
        }

        if func.name == scope.interner.main_symbol() {
            if !func.params.is_empty() {
                scope.error(
                    DiagnosticKind::InvalidMainSignature,
                    func.line,
                    "main function must not have parameters",
                );
            }
            if func.return_type != Type::Void {
                scope.error(
                    DiagnosticKind::InvalidMainSignature,
                    func.line,
                    format!("main function must return Void, not {}", func.return_type),
                );
            }
        }

        scope.check_block(&mut func.body, func.return_type);

        if !guarantees_return(&func.body) {
            let message = format!(
                "function '{}' must have an overall return statement",
                scope.name(func.name)
            );
            scope.error(DiagnosticKind::MissingReturn, func.line, message);
        }

        for jump in misplaced_jumps(&func.body) {
            match jump {
                Jump::Break { line } => scope.error(
                    DiagnosticKind::BreakOutsideLoop,
                    line,
                    "break must be used inside a loop",
                ),
                Jump::Continue { line } => scope.error(
                    DiagnosticKind::ContinueOutsideLoop,
                    line,
                    "continue must be used inside a loop",
                ),
            }
        }
    }

    fn declare_param(&mut self, func_name: Symbol, param: &Param) {
        if !param.ty.is_value_type() {
            let message = format!("parameter '{}' cannot have type Void", self.name(param.name));
            self.error(DiagnosticKind::VoidVariable, param.line, message);
        }
        if self.scopes.bind(param.name, param.ty).is_some() {
            let message = format!(
                "function '{}' has a duplicate parameter '{}'",
                self.name(func_name),
                self.name(param.name)
            );
            self.error(DiagnosticKind::DuplicateBinding, param.line, message);
        }
    }

    fn declare_local(&mut self, var: &VarDecl) {
        if !var.ty.is_value_type() {
            let message = format!("variable '{}' cannot have type Void", self.name(var.name));
            self.error(DiagnosticKind::VoidVariable, var.line, message);
        }
        if self.scopes.bind(var.name, var.ty).is_some() {
            let message = format!("'{}' is already declared in this scope", self.name(var.name));
            self.error(DiagnosticKind::DuplicateBinding, var.line, message);
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Bind the block's locals into the current frame, then check its statements
    fn check_block(&mut self, block: &mut Block, expected: Type) {
        for var in &block.locals {
            self.declare_local(var);
        }
        for stmt in &mut block.stmts {
            self.check_stmt(stmt, expected);
        }
    }

    /// Check a block in a frame of its own
    fn check_scoped_block(&mut self, block: &mut Block, expected: Type) {
        let mut scope = self.enter_scope();
        scope.check_block(block, expected);
    }

    fn check_stmt(&mut self, stmt: &mut Stmt, expected: Type) {
        let line = stmt.line;

        match &mut stmt.kind {
            StmtKind::Block(block) => self.check_scoped_block(block, expected),

            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.check_condition(condition, "if");
                self.check_scoped_block(then_branch, expected);
                self.check_scoped_block(else_branch, expected);
            }

            StmtKind::While { condition, body } => {
                self.check_condition(condition, "while");
                self.check_scoped_block(body, expected);
            }

            StmtKind::For {
                init,
                condition,
                update,
                body,
            } => {
                self.check_expr(init);
                self.check_condition(condition, "for");
                self.check_expr(update);
                self.check_scoped_block(body, expected);
            }

            StmtKind::Return(value) => {
                let found = self.check_expr(value);
                if value.is_empty() {
                    if expected != Type::Void {
                        self.error(
                            DiagnosticKind::ReturnMismatch,
                            line,
                            format!("returns Void, but the function returns {}", expected),
                        );
                    }
                } else if found != expected {
                    self.error(
                        DiagnosticKind::ReturnMismatch,
                        line,
                        format!("returns {}, but the function returns {}", found, expected),
                    );
                }
            }

            // Loop context is checked by the separate jump walk
            StmtKind::Break | StmtKind::Continue => {}

            StmtKind::Expr(expr) => {
                self.check_expr(expr);
            }
        }
    }

    fn check_condition(&mut self, condition: &mut Expr, construct: &str) {
        let ty = self.check_expr(condition);
        if ty != Type::Bool {
            self.error(
                DiagnosticKind::NonBoolCondition,
                condition.line,
                format!("{} condition must be Bool, not {}", construct, ty),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::sema::testing::{check, check_program};
    use DiagnosticKind::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_program() {
        let source = r#"
var total: Int;

fn sum(a: Int, b: Int): Int {
    return a + b;
}

fn main(): Void {
    var i: Int;
    total = 0;
    for (i = 0; i < 10; i = i + 1) {
        total = sum(total, i);
    }
    printf("total = %d\n", total);
    return;
}
"#;
        let diagnostics = check(source);
        assert!(diagnostics.kinds().is_empty());
    }

    #[test]
    fn test_forward_and_mutual_calls() {
        let source = r#"
fn main(): Void { var b: Bool; b = even(4); return; }
fn even(n: Int): Bool { if (n == 0) { return true; } else { return odd(n - 1); } }
fn odd(n: Int): Bool { if (n == 0) { return false; } return even(n - 1); }
"#;
        assert_eq!(check(source).error_count(), 0);
    }

    #[test]
    fn test_analyze_reports_count() {
        let mut interner = Interner::new();
        let mut program = crate::frontend::parser::Parser::new("fn f(): Int { return true; }", &mut interner)
            .unwrap()
            .parse()
            .unwrap();
        let mut analyzer = SemanticAnalyzer::new(&interner);

        match analyzer.analyze(&mut program) {
            Err(CompileError::Semantic { count }) => assert_eq!(count, 2),
            other => panic!("expected semantic error, got {:?}", other),
        }
        assert_eq!(analyzer.diagnostics().kinds(), vec![MissingMain, ReturnMismatch]);
    }

    #[test]
    fn test_main_signature() {
        let diagnostics = check("fn main(x: Int): Int { return x; }");
        assert_eq!(diagnostics.kinds(), vec![InvalidMainSignature, InvalidMainSignature]);

        let diagnostics = check("fn main(): Void { return; }");
        assert_eq!(diagnostics.error_count(), 0);
    }

    #[test]
    fn test_duplicate_parameter_still_binds() {
        let source = r#"
fn f(a: Int, a: Float): Float { return a; }
fn main(): Void { return; }
"#;
        // The second binding of `a` wins, so returning it is a Float
        assert_eq!(check(source).kinds(), vec![DuplicateBinding]);
    }

    #[test]
    fn test_void_parameter_and_local() {
        let source = r#"
fn f(a: Void): Int { var b: Void; return 1; }
fn main(): Void { return; }
"#;
        assert_eq!(check(source).kinds(), vec![VoidVariable, VoidVariable]);
    }

    #[test]
    fn test_local_collides_with_parameter() {
        let source = r#"
fn f(a: Int): Int { var a: Int; return a; }
fn main(): Void { return; }
"#;
        assert_eq!(check(source).kinds(), vec![DuplicateBinding]);
    }

    #[test]
    fn test_nested_block_may_shadow() {
        let source = r#"
fn f(a: Int): Int { { var a: String; a = "s"; } return a; }
fn main(): Void { return; }
"#;
        assert_eq!(check(source).error_count(), 0);
    }

    #[test]
    fn test_local_shadows_global() {
        let source = r#"
var x: String;
fn f(): Int { var x: Int; x = 1; return x; }
fn g(): String { x = "global"; return x; }
fn main(): Void { return; }
"#;
        let (program, interner, diagnostics) = check_program(source);
        assert!(diagnostics.kinds().is_empty());

        let x = interner.get("x").unwrap();
        let object_types: Vec<Type> = program
            .functions()
            .filter(|f| f.name != interner.main_symbol())
            .map(|f| match &f.body.stmts.last().unwrap().kind {
                StmtKind::Return(value) => {
                    assert_eq!(value.kind, ExprKind::Object(x));
                    value.ty.unwrap()
                }
                other => panic!("expected return, got {:?}", other),
            })
            .collect();
        assert_eq!(object_types, vec![Type::Int, Type::String]);
    }

    #[test]
    fn test_scope_does_not_leak_between_functions() {
        let source = r#"
fn f(): Int { var tmp: Int; tmp = 1; return tmp; }
fn g(): Int { return tmp; }
fn main(): Void { return; }
"#;
        assert_eq!(check(source).kinds(), vec![UndefinedIdentifier, ReturnMismatch]);
    }

    #[test]
    fn test_block_locals_are_dropped_after_block() {
        let source = r#"
fn main(): Void {
    if (true) { var inner: Int; inner = 2; }
    inner = 3;
    return;
}
"#;
        assert_eq!(check(source).kinds(), vec![UndefinedAssignTarget]);
    }

    #[test]
    fn test_conditions_must_be_bool() {
        let source = r#"
fn main(): Void {
    var i: Int;
    if (1) { return; }
    while (i) { i = i - 1; }
    for (i = 0; i; i = i + 1) { }
    for (;;) { break; }
    return;
}
"#;
        assert_eq!(check(source).kinds(), vec![
            NonBoolCondition,
            NonBoolCondition,
            NonBoolCondition,
            NonBoolCondition,
        ]);
    }

    #[test]
    fn test_error_in_condition_is_reported_once_per_node() {
        let source = r#"
fn main(): Void {
    if (undefined_flag) { return; }
    return;
}
"#;
        // The unknown name degrades to Void, which then fails the Bool check
        assert_eq!(check(source).kinds(), vec![UndefinedIdentifier, NonBoolCondition]);
    }

    #[test]
    fn test_return_types() {
        let source = r#"
fn a(): Int { return; }
fn b(): Void { return 1; }
fn c(): Float { return 1; }
fn d(): Float { return 1.5; }
fn e(): Void { return printf("done"); }
fn main(): Void { return; }
"#;
        assert_eq!(check(source).kinds(), vec![ReturnMismatch, ReturnMismatch, ReturnMismatch]);
    }

    #[test]
    fn test_missing_return() {
        let source = r#"
fn f(flag: Bool): Int {
    if (flag) { return 1; }
    while (flag) { return 2; }
}
fn g(flag: Bool): Int {
    if (flag) { return 1; } else { return 2; }
}
fn main(): Void { }
"#;
        let diagnostics = check(source);
        assert_eq!(diagnostics.kinds(), vec![MissingReturn, MissingReturn]);
        let lines: Vec<usize> = diagnostics.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![2, 9]);
    }

    #[test]
    fn test_break_continue_inside_while() {
        let source = r#"
fn main(): Void {
    while (true) {
        break;
        continue;
    }
    return;
}
"#;
        assert_eq!(check(source).error_count(), 0);
    }

    #[test]
    fn test_break_continue_outside_loop() {
        let source = r#"
fn main(): Void {
    break;
    if (true) { continue; }
    return;
}
"#;
        let diagnostics = check(source);
        assert_eq!(diagnostics.kinds(), vec![BreakOutsideLoop, ContinueOutsideLoop]);
        let lines: Vec<usize> = diagnostics.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![3, 4]);
    }

    #[test]
    fn test_break_in_if_inside_for() {
        let source = r#"
fn main(): Void {
    var i: Int;
    for (i = 0; i < 3; i = i + 1) {
        if (i == 1) { break; } else { continue; }
    }
    return;
}
"#;
        assert_eq!(check(source).error_count(), 0);
    }

    #[test]
    fn test_checking_continues_after_errors() {
        let source = r#"
fn f(): Int {
    var s: String;
    s = 1;
    s = s + 1;
    return s;
}
fn main(): Void { return; }
"#;
        // `s + 1` degrades to Float, which then fails the String assignment
        assert_eq!(check(source).kinds(), vec![
            AssignMismatch,
            OperandMismatch,
            AssignMismatch,
            ReturnMismatch,
        ]);
    }

    #[test]
    fn test_scope_stack_is_balanced() {
        let source = r#"
fn f(): Int { { { break; } } if (x) { } else { { } } return 1; }
fn main(): Void { return; }
"#;
        let mut interner = Interner::new();
        let mut program = crate::frontend::parser::Parser::new(source, &mut interner)
            .unwrap()
            .parse()
            .unwrap();
        let mut analyzer = SemanticAnalyzer::new(&interner);
        assert!(analyzer.analyze(&mut program).is_err());
        assert_eq!(analyzer.scopes.depth(), 0);
    }
}
