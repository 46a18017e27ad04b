//! Vesper Compiler - static semantic checker for the Vesper language
//!
//! This library lexes, parses and type-checks Vesper programs, a small
//! imperative language with `Int`, `Float`, `String`, `Bool` and `Void`.
//!
//! ## Architecture
//!
//! The compiler is organized into:
//! - **Frontend** (`frontend/`): Lexing, parsing and semantic analysis
//! - **Driver** (`driver/`): File handling and pipeline orchestration
//! - **Common** (`common/`): Shared infrastructure (errors, diagnostics, spans, interning)
//! - **Types** (`types/`): The primitive type system

pub mod common;
pub mod types;
pub mod frontend;
pub mod driver;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, Diagnostic, DiagnosticKind, DiagnosticReporter, Diagnostics, Span};
pub use frontend::{CheckedUnit, CompileContext, FrontendConfig, SemanticAnalyzer};
pub use driver::Pipeline;
pub use types::Type;
