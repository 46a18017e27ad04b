//! Vesper frontend
//!
//! The frontend is responsible for:
//! 1. Lexing source code into tokens
//! 2. Parsing tokens into an AST
//! 3. Semantic analysis (declarations, scopes, types, control flow)
//!
//! A unit that passes all three is returned typed and ready for later phases.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod sema;

use crate::common::{CompileError, CompileResult, DiagnosticReporter, Diagnostics, Interner};

pub use ast::Program;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use sema::SemanticAnalyzer;

/// Configuration options passed to the frontend
#[derive(Debug, Clone, Default)]
pub struct FrontendConfig {
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub verbose: bool,
}

/// Compilation context providing access to diagnostics and file info
pub struct CompileContext<'a> {
    pub filename: String,
    pub file_id: usize,
    pub reporter: &'a DiagnosticReporter,
}

impl<'a> CompileContext<'a> {
    pub fn new(filename: String, file_id: usize, reporter: &'a DiagnosticReporter) -> Self {
        Self { filename, file_id, reporter }
    }
}

/// A compilation unit that passed semantic analysis
#[derive(Debug)]
pub struct CheckedUnit {
    /// Program with every expression annotated with its type
    pub program: Program,
    pub interner: Interner,
}

/// Failed semantic check, carrying everything that was reported
#[derive(Debug)]
pub struct Rejected {
    pub program: Program,
    pub interner: Interner,
    pub diagnostics: Diagnostics,
}

/// Run lexing, parsing and semantic analysis over one source file.
///
/// Lexer and parser errors stop at the first problem and are rendered
/// through the context's reporter. Semantic errors are all collected and
/// rendered together before the unit is rejected.
pub fn check(source: &str, ctx: &CompileContext, config: &FrontendConfig) -> CompileResult<CheckedUnit> {
    match analyze(source, ctx, config)? {
        Ok(unit) => Ok(unit),
        Err(rejected) => {
            ctx.reporter.report_diagnostics(ctx.file_id, &rejected.diagnostics);
            Err(CompileError::semantic(rejected.diagnostics.error_count()))
        }
    }
}

/// Like [`check`], but hands back the rejected unit and its diagnostics
/// instead of rendering them.
pub fn analyze(
    source: &str,
    ctx: &CompileContext,
    config: &FrontendConfig,
) -> CompileResult<Result<CheckedUnit, Rejected>> {
    // Phase 1: Lexing (optional token dump)
    if config.dump_tokens {
        match Lexer::new(source).tokenize_all() {
            Ok(tokens) => {
                eprintln!("=== Tokens ===");
                for token in &tokens {
                    eprintln!("{:?}", token);
                }
                eprintln!("=== End Tokens ===\n");
            }
            Err(e) => {
                ctx.reporter.report_error(ctx.file_id, &e);
                return Err(e);
            }
        }
    }

    // Phase 2: Parsing
    log::info!("parsing {}", ctx.filename);
    let mut interner = Interner::new();
    let parsed = Parser::new(source, &mut interner).and_then(|mut parser| parser.parse());
    let mut program = match parsed {
        Ok(program) => program,
        Err(e) => {
            ctx.reporter.report_error(ctx.file_id, &e);
            return Err(e);
        }
    };

    // Phase 3: Semantic analysis
    log::info!("checking {}", ctx.filename);
    let diagnostics = {
        let mut analyzer = SemanticAnalyzer::new(&interner);
        // The error only repeats the diagnostic count
        let _ = analyzer.analyze(&mut program);
        analyzer.into_diagnostics()
    };

    if config.dump_ast {
        eprintln!("=== Typed AST ===");
        eprintln!("{:#?}", program);
        eprintln!("=== End AST ===\n");
    }

    if config.verbose {
        eprintln!(
            "{}: {} declaration(s), {} error(s)",
            ctx.filename,
            program.decls.len(),
            diagnostics.error_count()
        );
    }

    if diagnostics.has_errors() {
        return Ok(Err(Rejected {
            program,
            interner,
            diagnostics,
        }));
    }

    Ok(Ok(CheckedUnit { program, interner }))
}
