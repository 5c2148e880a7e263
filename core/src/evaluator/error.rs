//! Evaluation errors.
//!
//! # Error Categories
//!
//! - **Semantic errors**: type and binding violations detected while
//!   evaluating (e.g. `print` of a function, an undefined identifier,
//!   division by zero). The first one ends the program.
//!
//! - **Resource exceeded errors**: evaluation depth or loop iteration limits.
//!
//! - **I/O errors**: the console failed to read or write.

use core::fmt;

use thiserror::Error;

use crate::parser::Span;

/// The kinds of semantic error, each with its canonical message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticErrorKind {
    CannotBeFunctNullListOrStr,
    CannotBeFunct,
    CannotBeFunctOrNull,
    CannotBeFunctOrNullOrList,
    CannotBeList,
    MustBeList,
    MustBeFunct,
    MustBeInteger,
    MustBeIntFloatOrBool,
    TooFewParams,
    TooManyParams,
    NonIntFunctParam,
    MultiplyDefinedIdent,
    UndefinedIdent,
    Error,
    SubOutOfBounds,
    AttemptedDivByZero,
}

impl SemanticErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            Self::CannotBeFunctNullListOrStr => "cannot be function or null or list or string",
            Self::CannotBeFunct => "cannot be function",
            Self::CannotBeFunctOrNull => "cannot be function or null",
            Self::CannotBeFunctOrNullOrList => "cannot be function or null or list",
            Self::CannotBeList => "cannot be list",
            Self::MustBeList => "must be list",
            Self::MustBeFunct => "must be function",
            Self::MustBeInteger => "must be integer",
            Self::MustBeIntFloatOrBool => "must be integer or float or bool",
            Self::TooFewParams => "Too few parameters in function call",
            Self::TooManyParams => "Too many parameters in function call",
            Self::NonIntFunctParam => "Function parameters must be integer",
            Self::MultiplyDefinedIdent => "Multiply defined identifier",
            Self::UndefinedIdent => "Undefined identifier",
            Self::Error => "<undefined error>",
            Self::SubOutOfBounds => "Subscript out of bounds",
            Self::AttemptedDivByZero => "Attempted division by zero",
        }
    }
}

impl fmt::Display for SemanticErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A semantic error, optionally tied to the 1-based position of the
/// offending operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub arg: Option<usize>,
}

impl SemanticError {
    pub fn new(kind: SemanticErrorKind) -> Self {
        Self { kind, arg: None }
    }

    pub fn at_arg(arg: usize, kind: SemanticErrorKind) -> Self {
        Self {
            kind,
            arg: Some(arg),
        }
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arg {
            Some(arg) => write!(f, "Arg {}: {}", arg, self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for SemanticError {}

/// Resource limit exceeded errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceExceeded {
    /// Evaluation recursion depth exceeded.
    #[error("Evaluation stack overflow: depth {depth} exceeds maximum of {max_depth}")]
    StackOverflow { depth: usize, max_depth: usize },

    /// A loop ran more iterations than allowed.
    #[error("Loop iteration limit of {max_iterations} exceeded")]
    IterationLimit { max_iterations: usize },
}

/// Evaluation error.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("{error}")]
    Semantic { error: SemanticError, span: Span },

    #[error("{error}")]
    ResourceExceeded { error: ResourceExceeded, span: Span },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EvalError {
    /// Source range of the expression that failed, if any.
    pub fn span(&self) -> Option<&Span> {
        match self {
            EvalError::Semantic { span, .. } | EvalError::ResourceExceeded { span, .. } => {
                Some(span)
            }
            EvalError::Io(_) => None,
        }
    }

    pub fn semantic(&self) -> Option<&SemanticError> {
        match self {
            EvalError::Semantic { error, .. } => Some(error),
            _ => None,
        }
    }
}
