//! Error types and diagnostic rendering

use codespan_reporting::diagnostic::{Diagnostic as CodespanDiagnostic, Label};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{Buffer, ColorChoice, StandardStream, WriteColor};
use thiserror::Error;
use super::{Diagnostic, Span};

/// Error that stops the pipeline
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Lexer error at {span:?}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span:?}: {message}")]
    Parser { message: String, span: Span },

    #[error("{count} static semantic error(s)")]
    Semantic { count: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn semantic(count: usize) -> Self {
        Self::Semantic { count }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    config: term::Config,
    color: ColorChoice,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self::with_color(ColorChoice::Auto)
    }

    pub fn with_color(color: ColorChoice) -> Self {
        Self {
            files: SimpleFiles::new(),
            config: term::Config::default(),
            color,
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    /// Render a pipeline error to stderr
    pub fn report_error(&self, file_id: usize, error: &CompileError) {
        let diagnostic = self.error_to_codespan(file_id, error);
        self.emit_stderr(&[diagnostic]);
    }

    /// Render all semantic diagnostics to stderr
    pub fn report_diagnostics<'d>(&self, file_id: usize, diagnostics: impl IntoIterator<Item = &'d Diagnostic>) {
        let rendered: Vec<_> = diagnostics
            .into_iter()
            .map(|d| self.diagnostic_to_codespan(file_id, d))
            .collect();
        self.emit_stderr(&rendered);
    }

    /// Render semantic diagnostics into a plain-text string
    pub fn render_diagnostics<'d>(&self, file_id: usize, diagnostics: impl IntoIterator<Item = &'d Diagnostic>) -> String {
        let mut buffer = Buffer::no_color();
        for diagnostic in diagnostics {
            let rendered = self.diagnostic_to_codespan(file_id, diagnostic);
            self.emit(&mut buffer, &rendered);
        }
        String::from_utf8_lossy(buffer.as_slice()).into_owned()
    }

    fn emit_stderr(&self, diagnostics: &[CodespanDiagnostic<usize>]) {
        let writer = StandardStream::stderr(self.color);
        let mut lock = writer.lock();
        for diagnostic in diagnostics {
            self.emit(&mut lock, diagnostic);
        }
    }

    fn emit(&self, writer: &mut dyn WriteColor, diagnostic: &CodespanDiagnostic<usize>) {
        if let Err(e) = term::emit(writer, &self.config, &self.files, diagnostic) {
            log::warn!("failed to render diagnostic: {}", e);
        }
    }

    fn error_to_codespan(&self, file_id: usize, error: &CompileError) -> CodespanDiagnostic<usize> {
        match error {
            CompileError::Lexer { message, span } => CodespanDiagnostic::error()
                .with_message("Lexer error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message)
                ]),

            CompileError::Parser { message, span } => CodespanDiagnostic::error()
                .with_message("Syntax error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message)
                ]),

            CompileError::Semantic { count } => CodespanDiagnostic::error()
                .with_message(format!("{} static semantic error(s)", count)),

            CompileError::Io(err) => {
                CodespanDiagnostic::error().with_message(format!("IO error: {}", err))
            }
        }
    }

    fn diagnostic_to_codespan(&self, file_id: usize, diagnostic: &Diagnostic) -> CodespanDiagnostic<usize> {
        let rendered = CodespanDiagnostic::error()
            .with_message(&diagnostic.message)
            .with_code(diagnostic.kind.code());

        if diagnostic.line == 0 {
            return rendered;
        }

        match self.files.line_range(file_id, diagnostic.line - 1) {
            Ok(range) => {
                // Drop the trailing newline so the label sits on the line itself
                let source = self.files.get(file_id).map(|f| f.source().as_str()).unwrap_or("");
                let text = source.get(range.clone()).unwrap_or("");
                let end = range.start + text.trim_end().len();
                rendered.with_labels(vec![Label::primary(file_id, range.start..end)])
            }
            Err(_) => rendered.with_notes(vec![format!("at line {}", diagnostic.line)]),
        }
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::DiagnosticKind;

    #[test]
    fn test_render_semantic_diagnostic() {
        let mut reporter = DiagnosticReporter::with_color(ColorChoice::Never);
        let file_id = reporter.add_file("demo.vsp", "var x: Void;\nfn main(): Void { return; }\n");

        let diagnostics = vec![Diagnostic {
            kind: DiagnosticKind::VoidVariable,
            line: 1,
            message: "variable 'x' cannot have type Void".to_string(),
        }];

        let text = reporter.render_diagnostics(file_id, &diagnostics);
        assert!(text.contains("E0005"));
        assert!(text.contains("variable 'x' cannot have type Void"));
        assert!(text.contains("demo.vsp:1"));
    }

    #[test]
    fn test_render_unit_level_diagnostic() {
        let mut reporter = DiagnosticReporter::with_color(ColorChoice::Never);
        let file_id = reporter.add_file("demo.vsp", "var x: Int;\n");

        let diagnostics = vec![Diagnostic {
            kind: DiagnosticKind::MissingMain,
            line: 0,
            message: "main is not defined".to_string(),
        }];

        let text = reporter.render_diagnostics(file_id, &diagnostics);
        assert!(text.contains("main is not defined"));
    }

    #[test]
    fn test_semantic_error_message() {
        let err = CompileError::semantic(3);
        assert_eq!(err.to_string(), "3 static semantic error(s)");
    }
}
