//! Runtime values of the HOL language.

mod value;

pub use value::{Function, List, Value};
