//! Lexical scope stack

use crate::common::Symbol;
use crate::types::Type;
use std::collections::HashMap;

/// Stack of lexical frames mapping names to declared types
///
/// Frames are never merged: a lookup always sees the innermost binding of
/// a name, and popping a frame restores whatever it shadowed.
#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<HashMap<Symbol, Type>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an empty frame
    pub fn enter(&mut self) {
        self.frames.push(HashMap::new());
        log::trace!("enter scope (depth {})", self.frames.len());
    }

    /// Pop the innermost frame
    ///
    /// # Panics
    ///
    /// Panics when no frame is open; enter/exit pairing is an internal
    /// invariant, not something user input can break.
    pub fn exit(&mut self) {
        assert!(self.frames.pop().is_some(), "exit called on an empty scope stack");
        log::trace!("exit scope (depth {})", self.frames.len());
    }

    /// Bind `name` in the innermost frame.
    ///
    /// Returns the type previously bound to `name` in that same frame, if
    /// any; the new binding replaces it. Bindings in outer frames are
    /// shadowed, not reported.
    ///
    /// # Panics
    ///
    /// Panics when no frame is open.
    #[must_use]
    pub fn bind(&mut self, name: Symbol, ty: Type) -> Option<Type> {
        let frame = self
            .frames
            .last_mut()
            .unwrap_or_else(|| panic!("bind called on an empty scope stack"));
        frame.insert(name, ty)
    }

    /// Type of the innermost binding of `name`
    pub fn lookup(&self, name: Symbol) -> Option<Type> {
        self.frames.iter().rev().find_map(|frame| frame.get(&name).copied())
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Interner;

    #[test]
    fn test_shadowing_is_index_stable() {
        let mut interner = Interner::new();
        let x = interner.intern("x");
        let mut scopes = ScopeStack::new();

        scopes.enter();
        assert_eq!(scopes.bind(x, Type::Int), None);
        scopes.enter();
        assert_eq!(scopes.bind(x, Type::String), None);
        assert_eq!(scopes.lookup(x), Some(Type::String));
        scopes.enter();
        assert_eq!(scopes.lookup(x), Some(Type::String));
        scopes.exit();
        scopes.exit();
        assert_eq!(scopes.lookup(x), Some(Type::Int));
        scopes.exit();
        assert_eq!(scopes.lookup(x), None);
        assert_eq!(scopes.depth(), 0);
    }

    #[test]
    fn test_duplicate_in_same_frame() {
        let mut interner = Interner::new();
        let a = interner.intern("a");
        let mut scopes = ScopeStack::new();

        scopes.enter();
        assert_eq!(scopes.bind(a, Type::Int), None);
        assert_eq!(scopes.bind(a, Type::Float), Some(Type::Int));
        assert_eq!(scopes.lookup(a), Some(Type::Float));
    }

    #[test]
    #[should_panic(expected = "empty scope stack")]
    fn test_exit_without_frame_panics() {
        ScopeStack::new().exit();
    }
}
