//! Global declaration tables

use crate::common::Symbol;
use crate::types::Type;
use std::collections::HashMap;

/// Return type and ordered parameter types of a function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub return_type: Type,
    pub params: Vec<Type>,
}

impl Signature {
    pub fn new(return_type: Type, params: Vec<Type>) -> Self {
        Self { return_type, params }
    }
}

/// Functions and global variables of one compilation unit
///
/// Filled once by the installer; the first declaration of a name wins.
#[derive(Debug, Default)]
pub struct GlobalTables {
    functions: HashMap<Symbol, Signature>,
    globals: HashMap<Symbol, Type>,
}

impl GlobalTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a function signature. Returns `false` if the name was already
    /// taken, in which case the earlier signature is kept.
    pub fn declare_function(&mut self, name: Symbol, signature: Signature) -> bool {
        if self.functions.contains_key(&name) {
            return false;
        }
        self.functions.insert(name, signature);
        true
    }

    /// Record a global variable. Returns `false` if the name was already
    /// taken, in which case the earlier type is kept.
    pub fn declare_global(&mut self, name: Symbol, ty: Type) -> bool {
        if self.globals.contains_key(&name) {
            return false;
        }
        self.globals.insert(name, ty);
        true
    }

    pub fn function(&self, name: Symbol) -> Option<&Signature> {
        self.functions.get(&name)
    }

    pub fn global(&self, name: Symbol) -> Option<Type> {
        self.globals.get(&name).copied()
    }

    pub fn has_function(&self, name: Symbol) -> bool {
        self.functions.contains_key(&name)
    }

    pub fn has_global(&self, name: Symbol) -> bool {
        self.globals.contains_key(&name)
    }

    pub fn globals(&self) -> impl Iterator<Item = (Symbol, Type)> + '_ {
        self.globals.iter().map(|(name, ty)| (*name, *ty))
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn global_count(&self) -> usize {
        self.globals.len()
    }
}
