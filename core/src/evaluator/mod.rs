//! Tree-walking evaluator for HOL programs.
//!
//! The evaluator walks the parsed AST (`Expr`) and produces runtime values
//! (`Value`), binding names in a `ScopeStack` it owns and writing program
//! output through a `Console`.
//!
//! ## Design Principles
//!
//! - **Never panic**: every ill-typed program ends in a `SemanticError`
//! - **Stack-safe**: depth tracking turns runaway recursion into a resource error,
//!   and the native stack grows on demand so that limit is reached on any thread
//! - **Fail fast**: the first error stops the program
//!
//! ## Example
//!
//! ```
//! use hol_core::{api::ExecutionOptions, console::Console, evaluator::Evaluator, parser};
//!
//! let program = parser::parse("x <- 3 + 4; print(x)").unwrap();
//!
//! let mut output = Vec::new();
//! let mut input: &[u8] = b"";
//! let console = Console::new(&mut output, &mut input);
//! Evaluator::new(ExecutionOptions::default(), console)
//!     .run(&program)
//!     .unwrap();
//!
//! assert_eq!(output, b"7\n");
//! ```

mod error;
mod eval;
mod operators;
mod stack;

#[cfg(test)]
mod eval_test;

pub use error::{EvalError, ResourceExceeded, SemanticError, SemanticErrorKind};
pub use eval::Evaluator;

use crate::values::Value;

/// How a program run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Every expression ran; holds the value of the last one.
    Completed(Value),
    /// The program called `quit()`.
    Quit,
}

impl Outcome {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Completed(_) => 0,
            Outcome::Quit => 1,
        }
    }
}
