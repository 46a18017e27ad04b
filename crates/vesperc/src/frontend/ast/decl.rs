//! Top-level declaration nodes

use super::Block;
use crate::common::Symbol;
use crate::types::Type;

/// Top-level declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub kind: DeclKind,
    pub line: usize,
}

impl Decl {
    pub fn new(kind: DeclKind, line: usize) -> Self {
        Self { kind, line }
    }

    pub fn global(var: VarDecl) -> Self {
        let line = var.line;
        Self::new(DeclKind::GlobalVariable(var), line)
    }

    pub fn function(func: FnDecl) -> Self {
        let line = func.line;
        Self::new(DeclKind::Function(func), line)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    /// var name: Type;
    GlobalVariable(VarDecl),
    /// fn name(params): Type { body }
    Function(FnDecl),
}

/// Variable declaration, global or local
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: Symbol,
    pub ty: Type,
    pub line: usize,
}

impl VarDecl {
    pub fn new(name: Symbol, ty: Type, line: usize) -> Self {
        Self { name, ty, line }
    }
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Symbol,
    pub ty: Type,
    pub line: usize,
}

impl Param {
    pub fn new(name: Symbol, ty: Type, line: usize) -> Self {
        Self { name, ty, line }
    }
}

/// Function definition
#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub name: Symbol,
    pub return_type: Type,
    pub params: Vec<Param>,
    pub body: Block,
    pub line: usize,
}

impl FnDecl {
    pub fn new(name: Symbol, return_type: Type, params: Vec<Param>, body: Block, line: usize) -> Self {
        Self {
            name,
            return_type,
            params,
            body,
            line,
        }
    }

    /// Declared parameter types in order
    pub fn param_types(&self) -> Vec<Type> {
        self.params.iter().map(|p| p.ty).collect()
    }
}
