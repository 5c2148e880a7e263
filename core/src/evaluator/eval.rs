//! Core evaluation logic.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::{
    api::ExecutionOptions,
    console::Console,
    evaluator::{
        EvalError, Outcome, ResourceExceeded, SemanticError,
        SemanticErrorKind::{self, *},
        operators,
        stack::ensure_sufficient_stack,
    },
    parser::{Expr, ExprKind, Literal, Program},
    scope_stack::{ScopeStack, SymbolTableEntry},
    types::{TypeClass, TypeInfo},
    values::{Function, Value},
};

/// Why evaluation of an expression stopped early.
///
/// `Break` and `Next` unwind to the innermost loop, `Quit` to the top level.
#[derive(Debug)]
pub(crate) enum Unwind {
    Error(EvalError),
    Break,
    Next,
    Quit,
}

impl From<EvalError> for Unwind {
    fn from(e: EvalError) -> Self {
        Unwind::Error(e)
    }
}

impl From<std::io::Error> for Unwind {
    fn from(e: std::io::Error) -> Self {
        Unwind::Error(EvalError::Io(e))
    }
}

type EvalResult = Result<Value, Unwind>;

/// Tree-walking evaluator for HOL programs.
///
/// Owns the scope stack; the global scope lives as long as the evaluator.
pub struct Evaluator<'io> {
    options: ExecutionOptions,
    scope_stack: ScopeStack,
    console: Console<'io>,
    depth: usize,
}

impl<'io> Evaluator<'io> {
    /// Create a new evaluator with the given options.
    pub fn new(options: ExecutionOptions, console: Console<'io>) -> Self {
        Self {
            options,
            scope_stack: ScopeStack::new(),
            console,
            depth: 0,
        }
    }

    /// Run every top-level expression in order.
    ///
    /// Stops at `quit()` or at the first error; an error also tears down the
    /// symbol table.
    pub fn run(&mut self, program: &Program) -> Result<Outcome, EvalError> {
        let mut last = Value::Null;
        for expr in &program.exprs {
            match self.eval_expr(expr) {
                Ok(value) => last = value,
                // Stray `break`/`next` end only their own expression.
                Err(Unwind::Break | Unwind::Next) => last = Value::Null,
                Err(Unwind::Quit) => {
                    self.console.flush()?;
                    return Ok(Outcome::Quit);
                }
                Err(Unwind::Error(e)) => {
                    self.scope_stack.clean_up();
                    // The error is what matters; a failed flush is secondary.
                    let _ = self.console.flush();
                    return Err(e);
                }
            }
        }
        self.console.flush()?;
        Ok(Outcome::Completed(last))
    }

    /// Current value bound to `name`, searching every scope.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.scope_stack
            .find_entry_in_any_scope(name)
            .and_then(|entry| entry.value.as_ref())
    }

    fn error(&self, expr: &Expr, error: SemanticError) -> Unwind {
        Unwind::Error(EvalError::Semantic {
            error,
            span: expr.span.clone(),
        })
    }

    fn fail(&self, expr: &Expr, kind: SemanticErrorKind) -> EvalResult {
        Err(self.error(expr, SemanticError::new(kind)))
    }

    fn fail_at(&self, expr: &Expr, arg: usize, kind: SemanticErrorKind) -> EvalResult {
        Err(self.error(expr, SemanticError::at_arg(arg, kind)))
    }

    /// Evaluate an expression node.
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> EvalResult {
        // Check depth before recursing
        if self.depth >= self.options.max_depth {
            return Err(Unwind::Error(EvalError::ResourceExceeded {
                error: ResourceExceeded::StackOverflow {
                    depth: self.depth,
                    max_depth: self.options.max_depth,
                },
                span: expr.span.clone(),
            }));
        }

        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.eval_expr_inner(expr));
        self.depth -= 1;

        result
    }

    /// Inner evaluation logic (no depth tracking).
    fn eval_expr_inner(&mut self, expr: &Expr) -> EvalResult {
        trace!(rule = expr.kind.name(), span = ?expr.span.0, "evaluating");

        match &expr.kind {
            ExprKind::Literal(literal) => Ok(literal_value(literal)),

            ExprKind::Ident(name) => match self.lookup(name) {
                Some(value) => Ok(value.clone()),
                None => self.fail(expr, UndefinedIdent),
            },

            ExprKind::Element { name, index } => {
                let index = self.eval_expr(index)?;
                let Some(entry) = self.scope_stack.find_entry_in_any_scope(name) else {
                    return self.fail(expr, UndefinedIdent);
                };
                let list = match &entry.value {
                    None => return self.fail(expr, UndefinedIdent),
                    Some(Value::List(list)) => list.clone(),
                    Some(_) => return self.fail_at(expr, 1, MustBeList),
                };
                let Some(position) = index.to_int() else {
                    return self.fail(expr, MustBeInteger);
                };
                match list.get(position) {
                    Some(element) => Ok(element),
                    None => self.fail(expr, SubOutOfBounds),
                }
            }

            ExprKind::Binary { op, left, right } => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                operators::eval_arithmetic(*op, &l, &r).map_err(|e| self.error(expr, e))
            }

            ExprKind::Boolean { op, left, right } => {
                // Both sides are always evaluated.
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                operators::eval_boolean(*op, &l, &r).map_err(|e| self.error(expr, e))
            }

            ExprKind::Comparison { op, left, right } => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                operators::eval_comparison(*op, &l, &r).map_err(|e| self.error(expr, e))
            }

            ExprKind::Unary { op, expr: operand } => {
                let value = self.eval_expr(operand)?;
                operators::eval_unary(*op, &value).map_err(|e| self.error(expr, e))
            }

            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let taken = self.eval_condition(expr, cond)?;
                match (taken, else_branch) {
                    (true, _) => {
                        let value = self.eval_expr(then_branch)?;
                        self.reject_function(expr, 2, value)
                    }
                    (false, None) => Ok(Value::Null),
                    (false, Some(else_branch)) => {
                        let value = self.eval_expr(else_branch)?;
                        self.reject_function(expr, 3, value)
                    }
                }
            }

            ExprKind::While { cond, body } => {
                let mut result = Value::Null;
                let mut iterations = 0;
                while self.eval_condition(expr, cond)? {
                    self.count_iteration(expr, &mut iterations)?;
                    match self.eval_expr(body) {
                        Ok(value) => result = value,
                        Err(Unwind::Break) => break,
                        Err(Unwind::Next) => continue,
                        Err(e) => return Err(e),
                    }
                }
                Ok(result)
            }

            ExprKind::For {
                var,
                iterable,
                body,
            } => self.eval_for(expr, var, iterable, body),

            ExprKind::Break => Err(Unwind::Break),
            ExprKind::Next => Err(Unwind::Next),

            ExprKind::Compound(exprs) => {
                let mut result = Value::Null;
                for e in exprs {
                    result = self.eval_expr(e)?;
                }
                Ok(result)
            }

            ExprKind::Assign { name, index, value } => {
                // Two-phase binding: declare first so the right-hand side can
                // already see the name, then fill in the real type and value.
                let declared_here = self.scope_stack.find_entry(name).is_none();
                if declared_here {
                    self.scope_stack
                        .add_entry(SymbolTableEntry::placeholder(name.as_str()));
                }
                let result = self.eval_assignment(expr, name, index.as_deref(), value);
                if declared_here && matches!(result, Err(Unwind::Break | Unwind::Next)) {
                    self.scope_stack.remove_entry(name);
                }
                result
            }

            ExprKind::Function { params, body } => {
                let scope_depth = self.scope_stack.depth();
                self.scope_stack.begin_scope();
                for param in params {
                    let entry = SymbolTableEntry::new(param.as_str(), TypeInfo::param(), None);
                    if !self.scope_stack.add_entry(entry) {
                        self.end_scope(expr)?;
                        return self.fail(expr, MultiplyDefinedIdent);
                    }
                }
                let num_params = self.scope_stack.num_entries();
                self.end_scope(expr)?;

                Ok(Value::Function(Rc::new(Function::new(
                    params.clone(),
                    body.clone(),
                    num_params,
                    scope_depth,
                ))))
            }

            ExprKind::Call { name, args } => self.eval_call(expr, name, args),

            ExprKind::List(items) => Ok(Value::list(items.iter().map(literal_value).collect())),

            ExprKind::Print(operand) => {
                let value = self.eval_printable(expr, operand)?;
                self.console.println(&value.to_string())?;
                Ok(value)
            }

            ExprKind::Cat(operand) => {
                let value = self.eval_printable(expr, operand)?;
                self.console.println(&value.to_string())?;
                Ok(Value::Null)
            }

            ExprKind::Read => {
                let line = self.console.read_line()?.unwrap_or_default();
                Ok(classify_input(&line))
            }

            ExprKind::Quit => Err(Unwind::Quit),
        }
    }

    /// Evaluate a loop or `if` condition to its truthiness.
    fn eval_condition(&mut self, expr: &Expr, cond: &Expr) -> Result<bool, Unwind> {
        let value = self.eval_expr(cond)?;
        value
            .truthiness()
            .ok_or_else(|| self.error(expr, SemanticError::at_arg(1, CannotBeFunctNullListOrStr)))
    }

    fn reject_function(&self, expr: &Expr, arg: usize, value: Value) -> EvalResult {
        if value.type_class() == TypeClass::FUNCTION {
            self.fail_at(expr, arg, CannotBeFunct)
        } else {
            Ok(value)
        }
    }

    fn eval_printable(&mut self, expr: &Expr, operand: &Expr) -> EvalResult {
        let value = self.eval_expr(operand)?;
        let class = value.type_class();
        if class == TypeClass::FUNCTION || class == TypeClass::NULL {
            return self.fail_at(expr, 1, CannotBeFunctOrNull);
        }
        Ok(value)
    }

    fn count_iteration(&self, expr: &Expr, iterations: &mut usize) -> Result<(), Unwind> {
        *iterations += 1;
        match self.options.max_iterations {
            Some(max_iterations) if *iterations > max_iterations => {
                Err(Unwind::Error(EvalError::ResourceExceeded {
                    error: ResourceExceeded::IterationLimit { max_iterations },
                    span: expr.span.clone(),
                }))
            }
            _ => Ok(()),
        }
    }

    fn end_scope(&mut self, expr: &Expr) -> Result<(), Unwind> {
        self.scope_stack
            .end_scope()
            .map_err(|_| self.error(expr, SemanticError::new(SemanticErrorKind::Error)))
    }

    /// Bind `value` to an existing entry of the current scope.
    ///
    /// Parameters keep their parameter status and must stay integers.
    fn rebind(&mut self, expr: &Expr, name: &str, value: Value) -> Result<(), Unwind> {
        let is_param = self
            .scope_stack
            .find_entry(name)
            .is_some_and(|entry| entry.info.is_param);
        if is_param && !value.type_class().is_int_compatible() {
            return Err(self.error(expr, SemanticError::at_arg(1, MustBeInteger)));
        }

        let mut info = type_info_of(&value);
        info.is_param = is_param;
        self.scope_stack
            .change_entry(SymbolTableEntry::new(name, info, Some(value)))
            .map_err(|_| self.error(expr, SemanticError::new(SemanticErrorKind::Error)))
    }

    fn eval_assignment(
        &mut self,
        expr: &Expr,
        name: &str,
        index: Option<&Expr>,
        value: &Expr,
    ) -> EvalResult {
        let index = match index {
            Some(index) => Some(self.eval_expr(index)?),
            None => None,
        };
        let value = self.eval_expr(value)?;

        let Some(index) = index else {
            self.rebind(expr, name, value.clone())?;
            return Ok(value);
        };

        let target = self
            .scope_stack
            .find_entry(name)
            .and_then(|entry| entry.value.as_ref())
            .and_then(Value::as_list)
            .cloned();
        let Some(list) = target else {
            return self.fail_at(expr, 1, MustBeList);
        };
        if value.type_class() == TypeClass::LIST {
            return self.fail_at(expr, 1, CannotBeList);
        }
        let Some(position) = index.to_int() else {
            return self.fail(expr, MustBeInteger);
        };
        if !list.set(position, value) {
            return self.fail(expr, SubOutOfBounds);
        }

        self.console.println(&list.to_string())?;
        Ok(Value::List(list))
    }

    fn eval_for(&mut self, expr: &Expr, var: &str, iterable: &Expr, body: &Expr) -> EvalResult {
        match self.scope_stack.find_entry(var) {
            None => {
                let placeholder = TypeInfo::new(TypeClass::INT_OR_STR_OR_FLOAT_OR_BOOL);
                self.scope_stack
                    .add_entry(SymbolTableEntry::new(var, placeholder, None));
            }
            Some(entry) => {
                let class = entry.info.class;
                if class == TypeClass::FUNCTION
                    || class == TypeClass::NULL
                    || class == TypeClass::LIST
                {
                    return self.fail_at(expr, 1, CannotBeFunctOrNullOrList);
                }
            }
        }

        let items = match self.eval_expr(iterable)? {
            Value::List(list) => list.snapshot(),
            _ => return self.fail_at(expr, 2, MustBeList),
        };

        let mut result = Value::Null;
        let mut iterations = 0;
        for item in items {
            self.count_iteration(expr, &mut iterations)?;
            self.rebind(expr, var, item)?;
            match self.eval_expr(body) {
                Ok(value) => result = value,
                Err(Unwind::Break) => break,
                Err(Unwind::Next) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(result)
    }

    fn eval_call(&mut self, expr: &Expr, name: &str, args: &[Expr]) -> EvalResult {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            let value = self.eval_expr(arg)?;
            let Some(int) = value.to_int() else {
                return self.fail(expr, NonIntFunctParam);
            };
            values.push(int);
        }

        let Some(bound) = self.lookup(name) else {
            return self.fail(expr, UndefinedIdent);
        };
        let Some(function) = bound.as_function().cloned() else {
            return self.fail_at(expr, 1, MustBeFunct);
        };

        if values.len() > function.num_params {
            return self.fail(expr, TooManyParams);
        }
        if values.len() < function.num_params {
            return self.fail(expr, TooFewParams);
        }

        debug!(function = %name, args = values.len(), "calling function");
        // The body sees the scopes of its definition site, not its caller's.
        let callers = self.scope_stack.detach_above(function.scope_depth);
        self.scope_stack.begin_scope();
        for (param, value) in function.params.iter().zip(values) {
            let entry = SymbolTableEntry::new(param.as_str(), TypeInfo::param(), Some(Value::Int(value)));
            self.scope_stack.add_entry(entry);
        }
        let result = self.eval_expr(&function.body);
        let ended = self.end_scope(expr);
        self.scope_stack.reattach(callers);
        ended?;

        let value = match result {
            Ok(value) => value,
            // `break`/`next` outside a loop end the function body.
            Err(Unwind::Break | Unwind::Next) => Value::Null,
            Err(e) => return Err(e),
        };
        let value = self.reject_function(expr, 2, value)?;
        function.return_type.set(Some(value.type_class()));
        Ok(value)
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Int(i) => Value::Int(*i),
        Literal::Float(f) => Value::Float(*f),
        Literal::Str(s) => Value::Str(s.clone()),
        Literal::Bool(b) => Value::Bool(*b),
    }
}

fn type_info_of(value: &Value) -> TypeInfo {
    match value {
        Value::Function(function) => {
            TypeInfo::function(function.num_params, function.return_type.get())
        }
        _ => TypeInfo::new(value.type_class()),
    }
}

/// Classify a line typed in response to `read()`.
///
/// Text that does not start with a sign or digit is a string. Otherwise an
/// integer is tried first, then a float, and finally the leading integer
/// prefix (`12abc` reads as 12).
pub(crate) fn classify_input(line: &str) -> Value {
    let text = line.trim();
    let starts_like_number = text
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '+' | '-'));
    if !starts_like_number {
        return Value::str(line);
    }
    if let Ok(i) = text.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = text.parse::<f64>() {
        return Value::Float(f);
    }

    let sign_len = usize::from(text.starts_with(['+', '-']));
    let digits_len = text[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    Value::Int(text[..sign_len + digits_len].parse().unwrap_or(0))
}
