use super::TypeClass;

/// Type metadata stored with every symbol-table entry.
///
/// `num_params` and `return_type` only apply to functions; for every other
/// class they are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    pub class: TypeClass,
    pub num_params: Option<usize>,
    pub return_type: Option<TypeClass>,
    /// The binding started life as a function parameter and must stay
    /// integer-compatible.
    pub is_param: bool,
}

impl TypeInfo {
    pub fn new(class: TypeClass) -> Self {
        Self {
            class,
            num_params: None,
            return_type: None,
            is_param: false,
        }
    }

    pub fn function(num_params: usize, return_type: Option<TypeClass>) -> Self {
        Self {
            class: TypeClass::FUNCTION,
            num_params: Some(num_params),
            return_type,
            is_param: false,
        }
    }

    pub fn param() -> Self {
        Self {
            is_param: true,
            ..Self::new(TypeClass::INT)
        }
    }

    pub fn placeholder() -> Self {
        Self::new(TypeClass::UNDEFINED)
    }
}
