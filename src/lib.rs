//! HOL - a small dynamically typed scripting language
//!
//! # Overview
//!
//! HOL programs are sequences of expressions over integers, floats, booleans,
//! strings, lists and functions, with `if`/`while`/`for` control flow and
//! `print`/`cat`/`read` console I/O. A program runs top to bottom; the first
//! error stops it with a `Line <n>: <message>` report.
//!
//! # Quick Start
//!
//! ```
//! use hol::{ExecutionOptions, Interpreter};
//!
//! let source = r#"
//!     fib <- function(n) { if (n < 2) n else fib(n - 1) + fib(n - 2) }
//!     for (i in list(5, 10)) { cat(fib(i)) }
//! "#;
//!
//! let mut output = Vec::new();
//! let mut input: &[u8] = b"";
//! Interpreter::new(ExecutionOptions::default())
//!     .run(source, &mut output, &mut input)
//!     .unwrap();
//! assert_eq!(String::from_utf8(output).unwrap(), "5\n55\n");
//! ```

pub mod error_renderer;

// Re-export public API from hol_core
pub use hol_core::api::{Diagnostic, Error, ExecutionOptions, Interpreter, Severity};

// Re-export commonly used types and values
pub use hol_core::evaluator::Outcome;
pub use hol_core::parser::{self, Program};
pub use hol_core::values::{self, Value};

// Re-export errors
pub use hol_core::evaluator::{EvalError, SemanticError, SemanticErrorKind};

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};
