pub mod api;
pub mod console;
pub mod evaluator;
pub mod parser;
pub mod scope_stack;
pub mod types;
pub mod values;

pub use api::{Error, ExecutionOptions, Interpreter};
pub use evaluator::Outcome;
