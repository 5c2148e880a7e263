//! Binary and unary operator implementations.
//!
//! Operands are checked here rather than by the caller so that every
//! operator reports bad operands with the same argument positions.

use crate::{
    evaluator::{SemanticError, SemanticErrorKind},
    parser::{BinaryOp, BoolOp, ComparisonOp, UnaryOp},
    types::TypeClass,
    values::Value,
};

/// Reject function, null, list and string operands.
fn check_operand(value: &Value, arg: usize) -> Result<(), SemanticError> {
    if value.type_class().is_invalid_operand() {
        Err(SemanticError::at_arg(
            arg,
            SemanticErrorKind::MustBeIntFloatOrBool,
        ))
    } else {
        Ok(())
    }
}

fn truthiness(value: &Value, arg: usize) -> Result<bool, SemanticError> {
    check_operand(value, arg)?;
    value.truthiness().ok_or(SemanticError::at_arg(
        arg,
        SemanticErrorKind::MustBeIntFloatOrBool,
    ))
}

fn as_int(value: &Value, arg: usize) -> Result<i64, SemanticError> {
    value.to_int().ok_or(SemanticError::at_arg(
        arg,
        SemanticErrorKind::MustBeIntFloatOrBool,
    ))
}

fn as_float(value: &Value, arg: usize) -> Result<f64, SemanticError> {
    value.to_float().ok_or(SemanticError::at_arg(
        arg,
        SemanticErrorKind::MustBeIntFloatOrBool,
    ))
}

fn division_by_zero() -> SemanticError {
    SemanticError::new(SemanticErrorKind::AttemptedDivByZero)
}

/// Evaluate `+ - * / %% ^`.
///
/// The result type follows `TypeClass::arithmetic_result`. On the boolean
/// path the numeric result is computed first and then reduced to its
/// truthiness.
pub(super) fn eval_arithmetic(
    op: BinaryOp,
    left: &Value,
    right: &Value,
) -> Result<Value, SemanticError> {
    check_operand(left, 1)?;
    check_operand(right, 2)?;

    let (left_class, right_class) = (left.type_class(), right.type_class());
    let numeric = if left_class.is_float_compatible() || right_class.is_float_compatible() {
        Value::Float(eval_binary_float(
            op,
            as_float(left, 1)?,
            as_float(right, 2)?,
        )?)
    } else {
        Value::Int(eval_binary_int(op, as_int(left, 1)?, as_int(right, 2)?)?)
    };

    if TypeClass::arithmetic_result(left_class, right_class) == TypeClass::BOOL {
        Ok(Value::Bool(truthiness(&numeric, 1)?))
    } else {
        Ok(numeric)
    }
}

/// Evaluate a binary operation on two integers.
///
/// Uses wrapping arithmetic to prevent panics on overflow.
/// Division by zero returns an error.
pub(super) fn eval_binary_int(op: BinaryOp, left: i64, right: i64) -> Result<i64, SemanticError> {
    match op {
        BinaryOp::Add => Ok(left.wrapping_add(right)),
        BinaryOp::Sub => Ok(left.wrapping_sub(right)),
        BinaryOp::Mul => Ok(left.wrapping_mul(right)),
        BinaryOp::Div | BinaryOp::Mod if right == 0 => Err(division_by_zero()),
        // wrapping_div/rem handle the i64::MIN / -1 case
        BinaryOp::Div => Ok(left.wrapping_div(right)),
        BinaryOp::Mod => Ok(left.wrapping_rem(right)),
        BinaryOp::Pow => match u32::try_from(right) {
            Ok(exp) => Ok(left.wrapping_pow(exp)),
            // Negative or huge exponents go through floating point and
            // truncate back (saturating at the i64 range).
            Err(_) => Ok((left as f64).powf(right as f64) as i64),
        },
    }
}

/// Evaluate a binary operation on two floats.
///
/// Follows IEEE 754 semantics except that dividing by zero is an error.
pub(super) fn eval_binary_float(op: BinaryOp, left: f64, right: f64) -> Result<f64, SemanticError> {
    match op {
        BinaryOp::Add => Ok(left + right),
        BinaryOp::Sub => Ok(left - right),
        BinaryOp::Mul => Ok(left * right),
        BinaryOp::Div | BinaryOp::Mod if right == 0.0 => Err(division_by_zero()),
        BinaryOp::Div => Ok(left / right),
        BinaryOp::Mod => Ok(left % right),
        BinaryOp::Pow => Ok(left.powf(right)),
    }
}

/// Evaluate `&` and `|`. Both operands are always evaluated by the caller.
pub(super) fn eval_boolean(op: BoolOp, left: &Value, right: &Value) -> Result<Value, SemanticError> {
    let l = truthiness(left, 1)?;
    let r = truthiness(right, 2)?;
    Ok(Value::Bool(match op {
        BoolOp::And => l && r,
        BoolOp::Or => l || r,
    }))
}

/// Evaluate a relational operator on the widened numeric operands.
pub(super) fn eval_comparison(
    op: ComparisonOp,
    left: &Value,
    right: &Value,
) -> Result<Value, SemanticError> {
    check_operand(left, 1)?;
    check_operand(right, 2)?;

    let result = if left.type_class().is_float_compatible()
        || right.type_class().is_float_compatible()
    {
        compare(op, as_float(left, 1)?, as_float(right, 2)?)
    } else {
        compare(op, as_int(left, 1)?, as_int(right, 2)?)
    };
    Ok(Value::Bool(result))
}

fn compare<T: PartialOrd>(op: ComparisonOp, l: T, r: T) -> bool {
    match op {
        ComparisonOp::Lt => l < r,
        ComparisonOp::Le => l <= r,
        ComparisonOp::Gt => l > r,
        ComparisonOp::Ge => l >= r,
        ComparisonOp::Eq => l == r,
        ComparisonOp::Ne => l != r,
    }
}

pub(super) fn eval_unary(op: UnaryOp, operand: &Value) -> Result<Value, SemanticError> {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!truthiness(operand, 1)?)),
    }
}
