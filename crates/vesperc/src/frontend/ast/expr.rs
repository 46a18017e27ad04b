//! Expression AST nodes

use std::fmt;
use crate::common::Symbol;
use crate::types::Type;

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub line: usize,
    /// Type of this expression (filled in during semantic analysis)
    pub ty: Option<Type>,
}

impl Expr {
    pub fn new(kind: ExprKind, line: usize) -> Self {
        Self { kind, line, ty: None }
    }

    /// Placeholder for an omitted expression
    pub fn empty(line: usize) -> Self {
        Self::new(ExprKind::Empty, line)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.kind, ExprKind::Empty)
    }
}

/// Expression kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Literal constant
    Const(Constant),

    /// Variable reference
    Object(Symbol),

    /// name = value
    Assign {
        target: Symbol,
        value: Box<Expr>,
    },

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    /// callee(args...)
    Call {
        callee: Symbol,
        args: Vec<Expr>,
    },

    /// Omitted for-clause or return value
    Empty,
}

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
}

impl Constant {
    pub fn ty(&self) -> Type {
        match self {
            Constant::Int(_) => Type::Int,
            Constant::Float(_) => Type::Float,
            Constant::String(_) => Type::String,
            Constant::Bool(_) => Type::Bool,
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Relational
    Lt,
    Le,
    Gt,
    Ge,
    // Equality
    Eq,
    Ne,
    // Logical
    And,
    Or,
    Xor,
    // Bitwise
    BitAnd,
    BitOr,
}

/// Operator families that share a typing rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpClass {
    Arithmetic,
    Relational,
    Equality,
    Logical,
    Bitwise,
}

impl BinaryOp {
    pub fn class(self) -> OpClass {
        match self {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                OpClass::Arithmetic
            }
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => OpClass::Relational,
            BinaryOp::Eq | BinaryOp::Ne => OpClass::Equality,
            BinaryOp::And | BinaryOp::Or | BinaryOp::Xor => OpClass::Logical,
            BinaryOp::BitAnd | BinaryOp::BitOr => OpClass::Bitwise,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Xor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// -x
    Neg,
    /// !x
    Not,
    /// ~x
    BitNot,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
        })
    }
}
