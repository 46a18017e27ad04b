//! Semantic diagnostics
//!
//! The checker never stops at the first problem: each rule violation is
//! pushed here and analysis continues. The driver only looks at
//! [`Diagnostics::error_count`] once the whole unit has been checked.

use std::fmt;

/// Category of a semantic error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    // Declarations
    DuplicateFunction,
    DuplicateGlobal,
    ReservedName,
    VoidVariable,
    MissingMain,
    InvalidMainSignature,

    // Scoping
    DuplicateBinding,
    UndefinedIdentifier,
    UndefinedAssignTarget,

    // Types
    NonBoolCondition,
    OperandMismatch,
    AssignMismatch,
    ReturnMismatch,
    ArgumentCount,
    ArgumentType,
    UndefinedFunction,
    InvalidPrintCall,

    // Control flow
    BreakOutsideLoop,
    ContinueOutsideLoop,
    MissingReturn,
}

impl DiagnosticKind {
    /// Short stable code used when rendering
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::DuplicateFunction => "E0001",
            DiagnosticKind::DuplicateGlobal => "E0002",
            DiagnosticKind::ReservedName => "E0003",
            DiagnosticKind::VoidVariable => "E0005",
            DiagnosticKind::MissingMain => "E0006",
            DiagnosticKind::InvalidMainSignature => "E0007",
            DiagnosticKind::DuplicateBinding => "E0101",
            DiagnosticKind::UndefinedIdentifier => "E0102",
            DiagnosticKind::UndefinedAssignTarget => "E0103",
            DiagnosticKind::NonBoolCondition => "E0201",
            DiagnosticKind::OperandMismatch => "E0202",
            DiagnosticKind::AssignMismatch => "E0203",
            DiagnosticKind::ReturnMismatch => "E0204",
            DiagnosticKind::ArgumentCount => "E0205",
            DiagnosticKind::ArgumentType => "E0206",
            DiagnosticKind::UndefinedFunction => "E0207",
            DiagnosticKind::InvalidPrintCall => "E0208",
            DiagnosticKind::BreakOutsideLoop => "E0301",
            DiagnosticKind::ContinueOutsideLoop => "E0302",
            DiagnosticKind::MissingReturn => "E0303",
        }
    }
}

/// One reported semantic error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// 1-based source line, 0 for errors about the whole unit
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.line, self.message)
        }
    }
}

/// Ordered collection of diagnostics for one compilation unit
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, kind: DiagnosticKind, line: usize, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            kind,
            line,
            message: message.into(),
        };
        log::debug!("{} [{}]", diagnostic, kind.code());
        self.errors.push(diagnostic);
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of diagnostics of the given kind
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.errors.iter().filter(|d| d.kind == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter()
    }

    pub fn kinds(&self) -> Vec<DiagnosticKind> {
        self.errors.iter().map(|d| d.kind).collect()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
