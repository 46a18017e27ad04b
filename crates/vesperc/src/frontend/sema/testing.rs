//! Shared helpers for the analyzer tests

use super::SemanticAnalyzer;
use crate::common::{Diagnostics, Interner};
use crate::frontend::ast::Program;
use crate::frontend::parser::Parser;

/// Parse and check `source`, returning the typed program with its diagnostics
pub(super) fn check_program(source: &str) -> (Program, Interner, Diagnostics) {
    let mut interner = Interner::new();
    let mut program = Parser::new(source, &mut interner).unwrap().parse().unwrap();
    let diagnostics = {
        let mut analyzer = SemanticAnalyzer::new(&interner);
        let _ = analyzer.analyze(&mut program);
        analyzer.into_diagnostics()
    };
    (program, interner, diagnostics)
}

pub(super) fn check(source: &str) -> Diagnostics {
    check_program(source).2
}
