//! Identifier interning
//!
//! Every name in the AST is a [`Symbol`]. Two symbols compare equal iff
//! they were interned from the same text, so the checker can key its
//! tables on them without touching strings.

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Interned identifier handle
pub type Symbol = DefaultSymbol;

/// String interner with the language's reserved names pre-registered
#[derive(Debug, Clone)]
pub struct Interner {
    strings: DefaultStringInterner,
    main: Symbol,
    print: Symbol,
}

impl Interner {
    /// Name of the required entry point
    pub const MAIN: &'static str = "main";
    /// Name of the built-in print call
    pub const PRINT: &'static str = "printf";

    pub fn new() -> Self {
        let mut strings = DefaultStringInterner::default();
        let main = strings.get_or_intern_static(Self::MAIN);
        let print = strings.get_or_intern_static(Self::PRINT);
        Self { strings, main, print }
    }

    pub fn intern(&mut self, text: &str) -> Symbol {
        self.strings.get_or_intern(text)
    }

    /// Look up a name without interning it
    pub fn get(&self, text: &str) -> Option<Symbol> {
        self.strings.get(text)
    }

    pub fn resolve(&self, symbol: Symbol) -> &str {
        self.strings.resolve(symbol).unwrap_or("<unknown>")
    }

    pub fn main_symbol(&self) -> Symbol {
        self.main
    }

    pub fn print_symbol(&self) -> Symbol {
        self.print
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}
