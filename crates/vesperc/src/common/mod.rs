//! Common infrastructure shared by the lexer, parser and checker

mod diagnostic;
mod error;
mod intern;
mod span;

pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{CompileError, CompileResult, DiagnosticReporter};
pub use intern::{Interner, Symbol};
pub use span::{LineIndex, Span};
