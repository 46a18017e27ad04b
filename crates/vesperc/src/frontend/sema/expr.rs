//! Expression type resolution
//!
//! Every node gets exactly one type. A rule violation reports one diagnostic
//! for the node and substitutes a type so the enclosing expression can still
//! be checked.

use super::analyzer::SemanticAnalyzer;
use crate::common::{DiagnosticKind, Symbol};
use crate::frontend::ast::{BinaryOp, Expr, ExprKind, OpClass, UnaryOp};
use crate::types::Type;

impl SemanticAnalyzer<'_> {
    /// Resolve `expr` bottom-up and record the result on the node
    pub(super) fn check_expr(&mut self, expr: &mut Expr) -> Type {
        let ty = self.resolve(&mut expr.kind, expr.line);
        expr.ty = Some(ty);
        ty
    }

    fn resolve(&mut self, kind: &mut ExprKind, line: usize) -> Type {
        match kind {
            ExprKind::Const(constant) => constant.ty(),

            ExprKind::Object(name) => {
                let name = *name;
                if let Some(ty) = self.scopes.lookup(name) {
                    ty
                } else {
                    let message = format!("'{}' has not been defined", self.name(name));
                    self.error(DiagnosticKind::UndefinedIdentifier, line, message);
                    Type::Void
                }
            }

            ExprKind::Assign { target, value } => {
                let target = *target;
                let found = self.check_expr(value);
                self.check_assign(target, found, line);
                found
            }

            ExprKind::Binary { op, left, right } => {
                let op = *op;
                let lhs = self.check_expr(left);
                let rhs = self.check_expr(right);
                self.check_binary(op, lhs, rhs, line)
            }

            ExprKind::Unary { op, operand } => {
                let op = *op;
                let ty = self.check_expr(operand);
                self.check_unary(op, ty, line)
            }

            ExprKind::Call { callee, args } => {
                let callee = *callee;
                let arg_types: Vec<Type> = args.iter_mut().map(|arg| self.check_expr(arg)).collect();
                self.check_call(callee, &arg_types, line)
            }

            ExprKind::Empty => Type::Void,
        }
    }

    fn check_assign(&mut self, target: Symbol, found: Type, line: usize) {
        let declared = self.scopes.lookup(target).or_else(|| self.tables.global(target));
        match declared {
            None => {
                let message = format!("cannot assign to '{}', it has not been defined", self.name(target));
                self.error(DiagnosticKind::UndefinedAssignTarget, line, message);
            }
            Some(declared) if declared != found => {
                let message = format!(
                    "cannot assign {} to '{}' of type {}",
                    found,
                    self.name(target),
                    declared
                );
                self.error(DiagnosticKind::AssignMismatch, line, message);
            }
            Some(_) => {}
        }
    }

    fn check_binary(&mut self, op: BinaryOp, lhs: Type, rhs: Type, line: usize) -> Type {
        let (accepted, result) = match op.class() {
            OpClass::Arithmetic => match Type::numeric_join(lhs, rhs) {
                Some(ty) => (true, ty),
                None => (false, Type::Float),
            },
            OpClass::Relational => (Type::numeric_join(lhs, rhs).is_some(), Type::Bool),
            OpClass::Equality => {
                let both_bool = lhs == Type::Bool && rhs == Type::Bool;
                (both_bool || Type::numeric_join(lhs, rhs).is_some(), Type::Bool)
            }
            OpClass::Logical => (lhs == Type::Bool && rhs == Type::Bool, Type::Bool),
            OpClass::Bitwise => (lhs == Type::Int && rhs == Type::Int, Type::Int),
        };

        if !accepted {
            self.error(
                DiagnosticKind::OperandMismatch,
                line,
                format!("operator '{}' cannot be applied to {} and {}", op, lhs, rhs),
            );
        }
        result
    }

    fn check_unary(&mut self, op: UnaryOp, ty: Type, line: usize) -> Type {
        let (accepted, result) = match op {
            UnaryOp::Neg if ty.is_numeric() => (true, ty),
            UnaryOp::Neg => (false, Type::Float),
            UnaryOp::Not => (ty == Type::Bool, Type::Bool),
            UnaryOp::BitNot => (ty == Type::Int, Type::Int),
        };

        if !accepted {
            self.error(
                DiagnosticKind::OperandMismatch,
                line,
                format!("operator '{}' cannot be applied to {}", op, ty),
            );
        }
        result
    }

    fn check_call(&mut self, callee: Symbol, args: &[Type], line: usize) -> Type {
        if callee == self.interner.print_symbol() {
            match args.first() {
                Some(Type::String) => {}
                Some(first) => {
                    let message = format!(
                        "'{}' expects a String as its first argument, found {}",
                        self.name(callee),
                        first
                    );
                    self.error(DiagnosticKind::InvalidPrintCall, line, message);
                }
                None => {
                    let message = format!("'{}' needs at least one argument", self.name(callee));
                    self.error(DiagnosticKind::InvalidPrintCall, line, message);
                }
            }
            return Type::Void;
        }

        let Some(signature) = self.tables.function(callee).cloned() else {
            let message = format!("function '{}' has not been defined", self.name(callee));
            self.error(DiagnosticKind::UndefinedFunction, line, message);
            return Type::Void;
        };

        if args.len() != signature.params.len() {
            let message = format!(
                "function '{}' takes {} argument(s) but {} were given",
                self.name(callee),
                signature.params.len(),
                args.len()
            );
            self.error(DiagnosticKind::ArgumentCount, line, message);
        }

        for (position, (&found, &expected)) in args.iter().zip(&signature.params).enumerate() {
            if found != expected {
                let message = format!(
                    "argument {} of '{}' should be {}, found {}",
                    position + 1,
                    self.name(callee),
                    expected,
                    found
                );
                self.error(DiagnosticKind::ArgumentType, line, message);
            }
        }

        signature.return_type
    }
}
