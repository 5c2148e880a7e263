//! The HOL interpreter entry point.

use std::io::{BufRead, Write};

use tracing::debug;

use super::{Error, ExecutionOptions};
use crate::{
    console::Console,
    evaluator::{Evaluator, Outcome},
    parser::{self, Program},
};

/// Parses and runs HOL programs.
///
/// Every run gets a fresh evaluator, so nothing leaks between programs.
///
/// # Example
///
/// ```
/// use hol_core::api::{ExecutionOptions, Interpreter};
///
/// let interpreter = Interpreter::new(ExecutionOptions::default());
///
/// let mut output = Vec::new();
/// let mut input: &[u8] = b"";
/// interpreter
///     .run("print(3 + 4)", &mut output, &mut input)
///     .unwrap();
/// assert_eq!(output, b"7\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    options: ExecutionOptions,
}

impl Interpreter {
    pub fn new(options: ExecutionOptions) -> Self {
        Self { options }
    }

    /// Access the execution options.
    pub fn options(&self) -> &ExecutionOptions {
        &self.options
    }

    /// Parse a program without running it.
    pub fn parse(&self, source: &str) -> Result<Program, Error> {
        parser::parse(source).map_err(|error| Error::Syntax {
            line: error.line,
            error,
        })
    }

    /// Parse and run `source`, reading `read()` input from `input` and
    /// writing program output to `output`.
    pub fn run(
        &self,
        source: &str,
        output: &mut dyn Write,
        input: &mut dyn BufRead,
    ) -> Result<Outcome, Error> {
        let program = self.parse(source)?;
        self.run_program(&program, source, output, input)
    }

    /// Run an already parsed program. `source` is only used to report lines.
    pub fn run_program(
        &self,
        program: &Program,
        source: &str,
        output: &mut dyn Write,
        input: &mut dyn BufRead,
    ) -> Result<Outcome, Error> {
        debug!(expressions = program.exprs.len(), "running program");
        let console = Console::new(output, input);
        Evaluator::new(self.options.clone(), console)
            .run(program)
            .map_err(|e| Error::from_eval(e, source))
    }
}
