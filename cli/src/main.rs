use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
    process,
};

use clap::Parser;
use hol::{ExecutionOptions, Interpreter, render_error};
use miette::{Diagnostic, Result};
use thiserror::Error;
use tracing::debug;

/// HOL - a small dynamically typed scripting language
#[derive(Parser, Debug)]
#[command(name = "hol")]
#[command(about = "Run a HOL program", long_about = None)]
struct Args {
    /// Trace every evaluated grammar rule to stderr
    #[arg(long)]
    trace: bool,

    /// Print the parsed AST before running (for debugging)
    #[arg(long)]
    debug_parse: bool,

    /// Also render errors with source snippets on stderr
    #[arg(long)]
    pretty: bool,

    /// Maximum evaluation depth
    #[arg(long, default_value_t = ExecutionOptions::default().max_depth)]
    max_depth: usize,

    /// Maximum iterations of any single loop
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Source file to run
    file: Option<PathBuf>,
}

#[derive(Debug, Error, Diagnostic)]
enum CliError {
    #[error("cannot read source file {}", path.display())]
    #[diagnostic(code(hol::cli::read_source))]
    ReadSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write to standard output")]
    #[diagnostic(code(hol::cli::output))]
    Output(#[source] io::Error),
}

fn init_logging(trace: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // Use HOL_LOG or RUST_LOG to control the log level, default to WARN.
    // --trace overrides both.
    let filter = if trace {
        EnvFilter::new("trace")
    } else {
        EnvFilter::try_from_env("HOL_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Run `source` and return the process exit code.
fn run(args: &Args, source: &str) -> Result<i32> {
    let interpreter = Interpreter::new(ExecutionOptions {
        max_depth: args.max_depth,
        max_iterations: args.max_iterations,
    });

    let stdout = io::stdout();
    let stdin = io::stdin();

    let program = match interpreter.parse(source) {
        Ok(program) => program,
        Err(e) => return report(args, &e, source),
    };

    if args.debug_parse {
        let mut out = stdout.lock();
        writeln!(out, "=== Parsed AST ===").map_err(CliError::Output)?;
        writeln!(out, "{:#?}", program.exprs).map_err(CliError::Output)?;
        writeln!(out).map_err(CliError::Output)?;
    }

    let result = interpreter.run_program(
        &program,
        source,
        &mut stdout.lock(),
        &mut stdin.lock(),
    );
    match result {
        Ok(outcome) => {
            debug!(?outcome, "program finished");
            Ok(outcome.exit_code())
        }
        Err(e) => report(args, &e, source),
    }
}

/// Print the fatal error line and pick the exit code for it.
fn report(args: &Args, error: &hol::Error, source: &str) -> Result<i32> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", error).map_err(CliError::Output)?;
    out.flush().map_err(CliError::Output)?;
    if args.pretty {
        render_error(error, source);
    }
    Ok(error.exit_code())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.trace);

    let Some(path) = args.file.clone() else {
        println!("You must specify a file in the command line!");
        process::exit(1);
    };

    let source = fs::read_to_string(&path).map_err(|source| CliError::ReadSource {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), bytes = source.len(), "loaded source");

    let code = run(&args, &source)?;
    process::exit(code);
}
