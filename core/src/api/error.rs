//! Public error types for the HOL API.
//!
//! Parser and evaluator errors are converted to these types at the API
//! boundary, where the source text is available to resolve line numbers.

use core::fmt;

use thiserror::Error;

use crate::{
    evaluator::{EvalError, ResourceExceeded, SemanticError},
    parser::{ParseError, Span},
};

/// Public error type for all HOL operations.
///
/// Displays as the single fatal line the interpreter prints, e.g.
/// `Line 3: Arg 1: must be list`.
#[derive(Debug, Error)]
pub enum Error {
    /// The program failed to parse.
    #[error("Line {line}: {error}")]
    Syntax { line: usize, error: ParseError },

    /// A type or binding violation while running the program.
    #[error("Line {line}: {error}")]
    Semantic {
        line: usize,
        error: SemanticError,
        span: Span,
    },

    /// Resource limits exceeded (e.g., stack overflow, iteration limit).
    #[error("Line {line}: {error}")]
    ResourceExceeded {
        line: usize,
        error: ResourceExceeded,
        span: Span,
    },

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Attach line information from `source` to an evaluation error.
    pub fn from_eval(error: EvalError, source: &str) -> Self {
        match error {
            EvalError::Semantic { error, span } => Error::Semantic {
                line: span.line(source),
                error,
                span,
            },
            EvalError::ResourceExceeded { error, span } => Error::ResourceExceeded {
                line: span.line(source),
                error,
                span,
            },
            EvalError::Io(e) => Error::Io(e),
        }
    }

    /// The 1-based source line the error is reported on.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Syntax { line, .. }
            | Error::Semantic { line, .. }
            | Error::ResourceExceeded { line, .. } => Some(*line),
            Error::Io(_) => None,
        }
    }

    /// Process exit code: 2 for resource exhaustion, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ResourceExceeded { .. } => 2,
            _ => 1,
        }
    }

    /// Structured form of the error for rich rendering.
    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        match self {
            Error::Syntax { error, .. } => Some(Diagnostic {
                severity: Severity::Error,
                message: error.to_string(),
                span: error.span.clone(),
                help: Some(error.detail()),
                code: None,
            }),
            Error::Semantic { error, span, .. } => Some(Diagnostic {
                severity: Severity::Error,
                message: error.to_string(),
                span: span.clone(),
                help: None,
                code: Some(format!("{:?}", error.kind)),
            }),
            Error::ResourceExceeded { error, span, .. } => Some(Diagnostic {
                severity: Severity::Error,
                message: error.to_string(),
                span: span.clone(),
                help: Some(String::from(
                    "raise the limit with --max-depth or --max-iterations",
                )),
                code: None,
            }),
            Error::Io(_) => None,
        }
    }
}

/// A diagnostic message with source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Source location of the primary issue.
    pub span: Span,

    /// Optional help text.
    pub help: Option<String>,

    /// Optional error code (the semantic error kind).
    pub code: Option<String>,
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}
