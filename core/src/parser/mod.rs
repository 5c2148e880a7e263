mod parsed_expr;
#[allow(clippy::module_inception)]
pub mod parser;
mod syntax;
pub mod error;

// Re-export the parser and rule enum for external use
pub use parser::HolParser;
pub use parser::Rule;
pub use parser::parse;

pub use parsed_expr::{Expr, ExprKind, Literal, Program};
pub use syntax::{BinaryOp, BoolOp, ComparisonOp, Span, UnaryOp, line_of};
pub use error::{ParseError, ParseErrorKind};
