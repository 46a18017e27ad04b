//! Vesper Compiler - static semantic checker
//!
//! Usage: vesperc [OPTIONS] <input>

use clap::Parser as ClapParser;
use std::path::PathBuf;
use std::process;
use vesper_compiler::driver::{Pipeline, HALT_MESSAGE};
use vesper_compiler::{CompileError, FrontendConfig};

#[derive(ClapParser, Debug)]
#[command(name = "vesperc")]
#[command(author = "Vesper Team")]
#[command(version = "0.1.0")]
#[command(about = "Static semantic checker for the Vesper language", long_about = None)]
struct Args {
    /// Input source file
    #[arg(required = true)]
    input: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dump AST (for debugging)
    #[arg(long)]
    dump_ast: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    if let Err(e) = run(&args) {
        match e.downcast_ref::<CompileError>() {
            Some(CompileError::Semantic { .. }) => eprintln!("{}", HALT_MESSAGE),
            // Lexer and parser errors were already rendered
            Some(CompileError::Lexer { .. } | CompileError::Parser { .. }) => {}
            _ => eprintln!("error: {:#}", e),
        }
        process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = FrontendConfig {
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
        verbose: args.verbose,
    };

    let mut pipeline = Pipeline::new(config);
    let unit = match pipeline.check_file(&args.input) {
        Err(CompileError::Io(e)) => {
            return Err(anyhow::Error::new(e).context(format!("failed to read {}", args.input.display())));
        }
        result => result?,
    };

    if args.verbose {
        eprintln!(
            "{}: {} declaration(s) checked, no errors",
            args.input.display(),
            unit.program.decls.len()
        );
    }

    Ok(())
}
