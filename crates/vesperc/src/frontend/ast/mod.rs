//! Abstract Syntax Tree definitions
//!
//! Nodes carry the 1-based source line they start on. The checker never
//! changes the shape of the tree; it only fills in [`Expr::ty`].

mod decl;
mod expr;
mod stmt;

pub use decl::*;
pub use expr::*;
pub use stmt::*;

/// A complete compilation unit
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub decls: Vec<Decl>,
}

impl Program {
    pub fn new(decls: Vec<Decl>) -> Self {
        Self { decls }
    }

    pub fn functions(&self) -> impl Iterator<Item = &FnDecl> {
        self.decls.iter().filter_map(|d| match &d.kind {
            DeclKind::Function(f) => Some(f),
            DeclKind::GlobalVariable(_) => None,
        })
    }

    pub fn globals(&self) -> impl Iterator<Item = &VarDecl> {
        self.decls.iter().filter_map(|d| match &d.kind {
            DeclKind::GlobalVariable(v) => Some(v),
            DeclKind::Function(_) => None,
        })
    }
}
