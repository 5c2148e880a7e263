//! Type classes for HOL values.
//!
//! Values carry their runtime type in the `Value` enum; the bit-flag
//! `TypeClass` lattice is only used for compatibility checks and for the
//! metadata stored in the symbol table.

mod type_class;
mod type_info;

pub use type_class::TypeClass;
pub use type_info::TypeInfo;
