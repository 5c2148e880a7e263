use core::fmt;

use bitflags::bitflags;

bitflags! {
    /// Bit-flag lattice of HOL types.
    ///
    /// A single bit names one concrete type; OR-combinations describe the set
    /// of types acceptable in some position. `NULL` is the empty set.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeClass: u8 {
        /// Declared but not yet bound (two-phase assignment placeholder).
        const UNDEFINED = 1 << 0;
        const INT = 1 << 1;
        const STR = 1 << 2;
        const BOOL = 1 << 3;
        const FLOAT = 1 << 4;
        const LIST = 1 << 5;
        const FUNCTION = 1 << 6;

        const INT_OR_STR = Self::INT.bits() | Self::STR.bits();
        const INT_OR_BOOL = Self::INT.bits() | Self::BOOL.bits();
        const STR_OR_BOOL = Self::STR.bits() | Self::BOOL.bits();
        const INT_OR_STR_OR_BOOL = Self::INT.bits() | Self::STR.bits() | Self::BOOL.bits();
        const INT_OR_FLOAT = Self::INT.bits() | Self::FLOAT.bits();
        const INT_OR_FLOAT_OR_BOOL = Self::INT.bits() | Self::FLOAT.bits() | Self::BOOL.bits();
        const INT_OR_STR_OR_FLOAT_OR_BOOL =
            Self::INT.bits() | Self::STR.bits() | Self::FLOAT.bits() | Self::BOOL.bits();
    }
}

impl TypeClass {
    pub const NULL: TypeClass = TypeClass::empty();

    pub fn is_null(self) -> bool {
        self.is_empty()
    }

    pub fn is_bool_compatible(self) -> bool {
        self.contains(TypeClass::BOOL)
    }

    /// Integers accept booleans: `TRUE` widens to 1.
    pub fn is_int_compatible(self) -> bool {
        self.is_bool_compatible() || self.contains(TypeClass::INT)
    }

    pub fn is_float_compatible(self) -> bool {
        self.contains(TypeClass::FLOAT)
    }

    pub fn is_list_compatible(self) -> bool {
        self.contains(TypeClass::LIST)
    }

    pub fn is_int_or_float_or_bool_compatible(self) -> bool {
        self.is_int_compatible() || self.is_float_compatible()
    }

    /// Exactly one of the types no arithmetic or logical operator accepts.
    pub fn is_invalid_operand(self) -> bool {
        self == TypeClass::FUNCTION
            || self == TypeClass::NULL
            || self == TypeClass::LIST
            || self == TypeClass::STR
    }

    /// Result class of `+ - * / %% ^` on operands of the given classes.
    ///
    /// A boolean operand makes the result boolean, two integer-compatible
    /// operands give an integer, anything else widens to float.
    pub fn arithmetic_result(left: TypeClass, right: TypeClass) -> TypeClass {
        if left.is_bool_compatible() || right.is_bool_compatible() {
            TypeClass::BOOL
        } else if left.is_int_compatible() && right.is_int_compatible() {
            TypeClass::INT
        } else {
            TypeClass::FLOAT
        }
    }
}

impl fmt::Display for TypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("null");
        }
        let names = [
            (TypeClass::UNDEFINED, "undefined"),
            (TypeClass::INT, "integer"),
            (TypeClass::STR, "string"),
            (TypeClass::BOOL, "bool"),
            (TypeClass::FLOAT, "float"),
            (TypeClass::LIST, "list"),
            (TypeClass::FUNCTION, "function"),
        ];
        let mut first = true;
        for (class, name) in names {
            if self.contains(class) {
                if !first {
                    f.write_str(" or ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
