//! Statement AST nodes

use super::{Expr, VarDecl};

/// Statement node
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub line: usize,
}

impl Stmt {
    pub fn new(kind: StmtKind, line: usize) -> Self {
        Self { kind, line }
    }
}

/// Statement kinds
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Nested block: { ... }
    Block(Block),

    /// if (cond) then else otherwise; a missing else is an empty block
    If {
        condition: Expr,
        then_branch: Block,
        else_branch: Block,
    },

    /// while (cond) body
    While {
        condition: Expr,
        body: Block,
    },

    /// for (init; cond; update) body; omitted clauses are [`ExprKind::Empty`](super::ExprKind::Empty)
    For {
        init: Expr,
        condition: Expr,
        update: Expr,
        body: Block,
    },

    /// return [value]; a bare return carries an empty expression
    Return(Expr),

    Break,

    Continue,

    /// Expression statement: expr;
    Expr(Expr),
}

/// Block: local variable declarations followed by statements
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub locals: Vec<VarDecl>,
    pub stmts: Vec<Stmt>,
    pub line: usize,
}

impl Block {
    pub fn new(locals: Vec<VarDecl>, stmts: Vec<Stmt>, line: usize) -> Self {
        Self { locals, stmts, line }
    }

    pub fn empty(line: usize) -> Self {
        Self::new(Vec::new(), Vec::new(), line)
    }

    pub fn is_empty(&self) -> bool {
        self.locals.is_empty() && self.stmts.is_empty()
    }
}
