//! Public API for the HOL interpreter.
//!
//! # Example
//!
//! ```
//! use hol_core::api::{ExecutionOptions, Interpreter};
//!
//! let interpreter = Interpreter::new(ExecutionOptions {
//!     max_depth: 500,
//!     max_iterations: Some(10_000),
//! });
//!
//! let mut output = Vec::new();
//! let mut input: &[u8] = b"5\n";
//! interpreter
//!     .run("n <- read(); print(n * 2)", &mut output, &mut input)
//!     .unwrap();
//! assert_eq!(output, b"10\n");
//! ```

pub mod error;
pub mod interpreter;
pub mod options;

pub use error::{Diagnostic, Error, Severity};
pub use interpreter::Interpreter;
pub use options::ExecutionOptions;
