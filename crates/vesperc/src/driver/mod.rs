//! Compilation driver and pipeline orchestration

use crate::common::{CompileResult, DiagnosticReporter};
use crate::frontend::{self, CheckedUnit, CompileContext, FrontendConfig};
use std::fs;
use std::path::Path;

/// Message printed once a unit has been rejected by the checker
pub const HALT_MESSAGE: &str = "Compilation halted due to static semantic errors.";

/// Compilation pipeline owning the source files and their diagnostic output
pub struct Pipeline {
    reporter: DiagnosticReporter,
    config: FrontendConfig,
}

impl Pipeline {
    pub fn new(config: FrontendConfig) -> Self {
        Self::with_reporter(DiagnosticReporter::new(), config)
    }

    pub fn with_reporter(reporter: DiagnosticReporter, config: FrontendConfig) -> Self {
        Self { reporter, config }
    }

    pub fn reporter(&self) -> &DiagnosticReporter {
        &self.reporter
    }

    /// Read and check a source file
    pub fn check_file(&mut self, path: &Path) -> CompileResult<CheckedUnit> {
        let source = fs::read_to_string(path)?;
        let filename = path.display().to_string();
        self.check_source(&filename, &source)
    }

    /// Check in-memory source registered under `filename`
    pub fn check_source(&mut self, filename: &str, source: &str) -> CompileResult<CheckedUnit> {
        let file_id = self.reporter.add_file(filename, source);
        let ctx = CompileContext::new(filename.to_string(), file_id, &self.reporter);

        if self.config.verbose {
            eprintln!("Checking {}", filename);
        }

        let unit = frontend::check(source, &ctx, &self.config)?;
        log::info!("{} passed semantic analysis", filename);
        Ok(unit)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(FrontendConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::CompileError;
    use codespan_reporting::term::termcolor::ColorChoice;
    use std::path::PathBuf;

    fn pipeline() -> Pipeline {
        Pipeline::with_reporter(
            DiagnosticReporter::with_color(ColorChoice::Never),
            FrontendConfig::default(),
        )
    }

    #[test]
    fn test_check_source_clean() {
        let source = r#"
var greeting: String;

fn main(): Void {
    greeting = "hello";
    printf("%s\n", greeting);
    return;
}
"#;
        let unit = pipeline().check_source("hello.vsp", source).unwrap();
        assert_eq!(unit.program.globals().count(), 1);
    }

    #[test]
    fn test_check_source_rejected() {
        let source = "fn main(): Void { break; }";
        let err = pipeline().check_source("bad.vsp", source).unwrap_err();
        // break outside a loop, plus no overall return
        assert!(matches!(err, CompileError::Semantic { count: 2 }));
    }

    #[test]
    fn test_several_files_in_one_pipeline() {
        let mut pipeline = pipeline();
        assert!(pipeline.check_source("a.vsp", "fn main(): Void { return; }").is_ok());
        assert!(pipeline.check_source("b.vsp", "fn other(): Int { return 1; }").is_err());
        assert!(pipeline.check_source("c.vsp", "fn main(): Void { return; }").is_ok());
    }

    #[test]
    fn test_check_file_reads_source() {
        let path = std::env::temp_dir().join(format!("vesperc-check-file-{}.vsp", std::process::id()));
        fs::write(&path, "var n: Int;\nfn main(): Void { n = 1; return; }\n").unwrap();

        let result = pipeline().check_file(&path);
        fs::remove_file(&path).unwrap();

        let unit = result.unwrap();
        assert_eq!(unit.program.decls.len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let path = PathBuf::from("definitely/not/here.vsp");
        let err = pipeline().check_file(&path).unwrap_err();
        assert!(matches!(err, CompileError::Io(_)));
    }
}
