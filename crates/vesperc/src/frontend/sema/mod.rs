//! Semantic analysis
//!
//! Checking runs in two phases over one compilation unit:
//!
//! 1. [`install`] walks the top-level declarations once and fills the
//!    [`GlobalTables`], so function bodies may call functions declared
//!    later in the file.
//! 2. [`analyzer`] checks every function body against those tables,
//!    annotating each expression with its [`Type`](crate::types::Type).
//!
//! Every rule violation becomes a [`Diagnostic`](crate::common::Diagnostic)
//! and checking continues with a substitute type.

mod analyzer;
mod control;
mod expr;
mod install;
mod scope;
mod tables;

#[cfg(test)]
mod testing;

pub use analyzer::SemanticAnalyzer;
pub use control::{guarantees_return, misplaced_jumps, Jump};
pub use scope::ScopeStack;
pub use tables::{GlobalTables, Signature};
