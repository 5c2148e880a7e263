use core::{
    cell::{Cell, RefCell},
    fmt,
};
use std::rc::Rc;

use crate::{parser::Expr, types::TypeClass};

/// A runtime HOL value.
///
/// Lists and functions are reference types: cloning a `Value` shares the
/// underlying list or function instead of copying it.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    List(List),
    Function(Rc<Function>),
}

impl Value {
    pub fn int(value: i64) -> Self {
        Value::Int(value)
    }

    pub fn float(value: f64) -> Self {
        Value::Float(value)
    }

    pub fn bool(value: bool) -> Self {
        Value::Bool(value)
    }

    pub fn str(value: impl Into<String>) -> Self {
        Value::Str(value.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(List::new(items))
    }

    /// The single-bit type class of this value.
    pub fn type_class(&self) -> TypeClass {
        match self {
            Value::Null => TypeClass::NULL,
            Value::Int(_) => TypeClass::INT,
            Value::Float(_) => TypeClass::FLOAT,
            Value::Bool(_) => TypeClass::BOOL,
            Value::Str(_) => TypeClass::STR,
            Value::List(_) => TypeClass::LIST,
            Value::Function(_) => TypeClass::FUNCTION,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Rc<Function>> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Integer view of an integer-compatible value (`TRUE` is 1).
    pub fn to_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Float view of a numeric value, widening integers and booleans.
    pub fn to_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Truthiness of a numeric value; `None` for the other types.
    pub fn truthiness(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            Value::Float(f) => Some(*f != 0.0),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:.2}", x),
            Value::Bool(true) => f.write_str("TRUE"),
            Value::Bool(false) => f.write_str("FALSE"),
            Value::Str(s) => f.write_str(s),
            Value::List(list) => write!(f, "{}", list),
            Value::Function(_) => Ok(()),
        }
    }
}

/// A shared, mutable list with 1-based indexing.
#[derive(Debug, Clone, Default)]
pub struct List(Rc<RefCell<Vec<Value>>>);

impl List {
    pub fn new(items: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(items)))
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Element at a 1-based position, or `None` when out of bounds.
    pub fn get(&self, index: i64) -> Option<Value> {
        let slot = Self::slot(index)?;
        self.0.borrow().get(slot).cloned()
    }

    /// Replace the element at a 1-based position.
    ///
    /// Returns false, leaving the list untouched, when out of bounds.
    pub fn set(&self, index: i64, value: Value) -> bool {
        let Some(slot) = Self::slot(index) else {
            return false;
        };
        match self.0.borrow_mut().get_mut(slot) {
            Some(element) => {
                *element = value;
                true
            }
            None => false,
        }
    }

    /// Copy of the current elements.
    pub fn snapshot(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    /// Whether both handles name the same list.
    pub fn ptr_eq(&self, other: &List) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn slot(index: i64) -> Option<usize> {
        usize::try_from(index).ok()?.checked_sub(1)
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.borrow() == *other.0.borrow()
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("( ")?;
        for item in self.0.borrow().iter() {
            write!(f, "{} ", item)?;
        }
        f.write_str(")")
    }
}

/// A user-defined function.
#[derive(Debug)]
pub struct Function {
    pub params: Vec<String>,
    pub body: Rc<Expr>,
    pub num_params: usize,
    /// Number of scopes visible where the function was defined. A call sees
    /// only these plus its own activation scope.
    pub scope_depth: usize,
    /// Type class of the value produced by the most recent call.
    pub return_type: Cell<Option<TypeClass>>,
}

impl Function {
    pub fn new(params: Vec<String>, body: Rc<Expr>, num_params: usize, scope_depth: usize) -> Self {
        Self {
            params,
            body,
            num_params,
            scope_depth,
            return_type: Cell::new(None),
        }
    }
}
