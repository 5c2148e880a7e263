//! Unit tests for the evaluator.

use pretty_assertions::assert_eq;

use super::*;
use crate::{api::ExecutionOptions, console::Console, parser, values::Value};

use super::eval::classify_input;
use SemanticErrorKind::*;

struct Runner {
    options: ExecutionOptions,
    input: String,
}

/// Result of a run plus everything the program printed.
struct Run {
    result: Result<Outcome, EvalError>,
    output: String,
}

impl Run {
    fn value(&self) -> Value {
        match &self.result {
            Ok(Outcome::Completed(value)) => value.clone(),
            other => panic!("expected a completed run, got {:?}", other),
        }
    }

    fn semantic_error(&self) -> SemanticError {
        match &self.result {
            Err(EvalError::Semantic { error, .. }) => *error,
            other => panic!("expected a semantic error, got {:?}", other),
        }
    }
}

impl Runner {
    fn new() -> Self {
        Self {
            options: ExecutionOptions::default(),
            input: String::new(),
        }
    }

    fn with_input(mut self, input: &str) -> Self {
        self.input = input.to_string();
        self
    }

    fn with_options(mut self, options: ExecutionOptions) -> Self {
        self.options = options;
        self
    }

    fn run(&self, source: &str) -> Run {
        let program = parser::parse(source).expect("parsing failed");
        let mut output = Vec::new();
        let mut input = self.input.as_bytes();
        let console = Console::new(&mut output, &mut input);
        let result = Evaluator::new(self.options.clone(), console).run(&program);
        Run {
            result,
            output: String::from_utf8(output).expect("output is utf-8"),
        }
    }
}

fn run(source: &str) -> Run {
    Runner::new().run(source)
}

// ============================================================================
// Constants and arithmetic
// ============================================================================

#[test]
fn test_constants() {
    assert_eq!(run("42").value(), Value::int(42));
    assert_eq!(run("-7").value(), Value::int(-7));
    assert_eq!(run("2.5").value(), Value::float(2.5));
    assert_eq!(run("TRUE").value(), Value::bool(true));
    assert_eq!(run(r#""hi""#).value(), Value::str("hi"));
}

#[test]
fn test_int_arithmetic() {
    assert_eq!(run("2 + 3 * 4").value(), Value::int(14));
    assert_eq!(run("7 / 2").value(), Value::int(3));
    assert_eq!(run("7 %% 3").value(), Value::int(1));
    assert_eq!(run("2 ^ 10").value(), Value::int(1024));
}

#[test]
fn test_float_promotion() {
    assert_eq!(run("1 + 0.5").value(), Value::float(1.5));
    assert_eq!(run("1.0 / 4").value(), Value::float(0.25));
}

#[test]
fn test_bool_operand_gives_bool() {
    assert_eq!(run("TRUE + 1").value(), Value::bool(true));
    assert_eq!(run("TRUE - 1").value(), Value::bool(false));
}

#[test]
fn test_relational_and_logical() {
    assert_eq!(run("1 < 2").value(), Value::bool(true));
    assert_eq!(run("2.5 >= 3").value(), Value::bool(false));
    assert_eq!(run("1 < 2 & 0").value(), Value::bool(false));
    assert_eq!(run("0 | 3").value(), Value::bool(true));
    assert_eq!(run("!0").value(), Value::bool(true));
}

#[test]
fn test_division_by_zero() {
    let run = run("print(1/0)");
    assert_eq!(run.semantic_error(), SemanticError::new(AttemptedDivByZero));
    assert_eq!(run.output, "");
}

#[test]
fn test_string_operand_rejected() {
    assert_eq!(
        run(r#"1 + "a""#).semantic_error(),
        SemanticError::at_arg(2, MustBeIntFloatOrBool)
    );
}

// ============================================================================
// Variables and assignment
// ============================================================================

#[test]
fn test_assignment_and_read() {
    let run = run("x <- 3 + 4\nprint(x)");
    assert_eq!(run.output, "7\n");
    assert_eq!(run.value(), Value::int(7));
}

#[test]
fn test_rebinding_changes_type() {
    let run = run(r#"x <- 1; x <- "one"; print(x)"#);
    assert_eq!(run.output, "one\n");
}

#[test]
fn test_undefined_identifier() {
    assert_eq!(run("y + 1").semantic_error(), SemanticError::new(UndefinedIdent));
}

#[test]
fn test_self_reference_on_first_assignment() {
    assert_eq!(run("x <- x + 1").semantic_error(), SemanticError::new(UndefinedIdent));
}

#[test]
fn test_assignment_value_is_rhs() {
    assert_eq!(run("y <- (x <- 5) + 1").value(), Value::int(6));
}

// ============================================================================
// Lists
// ============================================================================

#[test]
fn test_list_indexing() {
    let run = run("l <- list(10, 20, 30); print(l[[2]])");
    assert_eq!(run.output, "20\n");
}

#[test]
fn test_list_print_format() {
    let run = run(r#"print(list(1, 2.5, TRUE, "s"))"#);
    assert_eq!(run.output, "( 1 2.50 TRUE s )\n");
}

#[test]
fn test_index_bounds() {
    assert_eq!(
        run("l <- list(1, 2); l[[0]]").semantic_error(),
        SemanticError::new(SubOutOfBounds)
    );
    assert_eq!(
        run("l <- list(1, 2); l[[3]]").semantic_error(),
        SemanticError::new(SubOutOfBounds)
    );
}

#[test]
fn test_index_undefined_list() {
    assert_eq!(run("x[[0]]").semantic_error(), SemanticError::new(UndefinedIdent));
}

#[test]
fn test_index_non_list() {
    assert_eq!(
        run("x <- 1; x[[1]]").semantic_error(),
        SemanticError::at_arg(1, MustBeList)
    );
}

#[test]
fn test_index_must_be_integer() {
    assert_eq!(
        run("l <- list(1); l[[1.0]]").semantic_error(),
        SemanticError::new(MustBeInteger)
    );
}

#[test]
fn test_indexed_assignment_prints_list() {
    let run = run("l <- list(1, 2, 3); l[[2]] <- 9; print(l[[2]])");
    assert_eq!(run.output, "( 1 9 3 )\n9\n");
}

#[test]
fn test_indexed_assignment_is_shared() {
    let run = run("a <- list(1, 2); b <- a; b[[1]] <- 5; print(a)");
    assert_eq!(run.output, "( 5 2 )\n( 5 2 )\n");
}

#[test]
fn test_indexed_assignment_rejects_list() {
    assert_eq!(
        run("l <- list(1); l[[1]] <- list(2)").semantic_error(),
        SemanticError::at_arg(1, CannotBeList)
    );
}

#[test]
fn test_indexed_assignment_requires_list() {
    assert_eq!(
        run("x <- 3; x[[1]] <- 2").semantic_error(),
        SemanticError::at_arg(1, MustBeList)
    );
}

// ============================================================================
// Control flow
// ============================================================================

#[test]
fn test_if_without_else() {
    assert_eq!(run("if (1) 5").value(), Value::int(5));
    assert_eq!(run("if (0) 5").value(), Value::Null);
}

#[test]
fn test_if_else_selects_branch() {
    assert_eq!(run("if (TRUE) 1 else 2").value(), Value::int(1));
    assert_eq!(run("if (FALSE) 1 else 2").value(), Value::int(2));
}

#[test]
fn test_if_only_runs_taken_branch() {
    let run = run("if (TRUE) print(1) else print(2)");
    assert_eq!(run.output, "1\n");
}

#[test]
fn test_if_condition_type() {
    assert_eq!(
        run(r#"if ("s") 1"#).semantic_error(),
        SemanticError::at_arg(1, CannotBeFunctNullListOrStr)
    );
}

#[test]
fn test_if_branch_cannot_be_function() {
    assert_eq!(
        run("if (1) function(a) { a } else 2").semantic_error(),
        SemanticError::at_arg(2, CannotBeFunct)
    );
    assert_eq!(
        run("if (0) 2 else function(a) { a }").semantic_error(),
        SemanticError::at_arg(3, CannotBeFunct)
    );
}

#[test]
fn test_if_without_else_branch_cannot_be_function() {
    assert_eq!(
        run("if (TRUE) function(a) { a }").semantic_error(),
        SemanticError::at_arg(2, CannotBeFunct)
    );
    assert_eq!(run("if (FALSE) function(a) { a }").value(), Value::Null);
}

#[test]
fn test_while_loop() {
    let run = run("i <- 0; while (i < 3) { i <- i + 1 }; print(i)");
    assert_eq!(run.output, "3\n");
}

#[test]
fn test_for_loop_visits_each_element() {
    let run = run("for (x in list(1, 2, 3)) { cat(x * 10) }");
    assert_eq!(run.output, "10\n20\n30\n");
}

#[test]
fn test_for_loop_requires_list() {
    assert_eq!(
        run("for (x in 5) { x }").semantic_error(),
        SemanticError::at_arg(2, MustBeList)
    );
}

#[test]
fn test_for_loop_variable_type() {
    assert_eq!(
        run("x <- list(1); for (x in list(1, 2)) { x }").semantic_error(),
        SemanticError::at_arg(1, CannotBeFunctOrNullOrList)
    );
}

#[test]
fn test_break_and_next() {
    let run = run(indoc::indoc! {"
        for (x in list(1, 2, 3, 4)) {
            if (x == 2) next
            if (x == 4) break
            cat(x)
        }
    "});
    assert_eq!(run.output, "1\n3\n");
}

#[test]
fn test_break_at_top_level_is_ignored() {
    let run = run("break; print(1)");
    assert_eq!(run.output, "1\n");
}

#[test]
fn test_quit_stops_program() {
    let run = run("print(1); quit(); print(2)");
    assert_eq!(run.output, "1\n");
    assert!(matches!(run.result, Ok(Outcome::Quit)));
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_function_call() {
    let run = run("f <- function(a, b) { a + b }; print(f(1, 2))");
    assert_eq!(run.output, "3\n");
}

#[test]
fn test_function_sees_globals() {
    let run = run("k <- 10; f <- function(a) { a * k }; print(f(3))");
    assert_eq!(run.output, "30\n");
}

#[test]
fn test_function_locals_do_not_leak() {
    let run = run("f <- function(a) { t <- a }; f(1); t");
    assert_eq!(run.semantic_error(), SemanticError::new(UndefinedIdent));
}

#[test]
fn test_function_scope_is_lexical() {
    assert_eq!(
        run("f <- function(b) { a }; g <- function(a) { f(1) }; g(5)").semantic_error(),
        SemanticError::new(UndefinedIdent)
    );
    assert_eq!(
        run("g <- function(a) { h <- function(b) { a * b }; h(3) }; g(4)").value(),
        Value::int(12)
    );
}

#[test]
fn test_recursion() {
    let source = indoc::indoc! {"
        fact <- function(n) {
            if (n <= 1) 1 else n * fact(n - 1)
        }
        print(fact(10))
    "};
    assert_eq!(run(source).output, "3628800\n");
}

#[test]
fn test_param_count_mismatch() {
    assert_eq!(
        run("f <- function(a, b) { a + b }; print(f(1, 2, 3))").semantic_error(),
        SemanticError::new(TooManyParams)
    );
    assert_eq!(
        run("f <- function(a, b) { a + b }; f(1)").semantic_error(),
        SemanticError::new(TooFewParams)
    );
}

#[test]
fn test_non_integer_argument() {
    assert_eq!(
        run("f <- function(a) { a }; f(1.5)").semantic_error(),
        SemanticError::new(NonIntFunctParam)
    );
}

#[test]
fn test_bool_argument_is_widened() {
    assert_eq!(
        run("f <- function(a) { a }; f(TRUE)").value(),
        Value::int(1)
    );
}

#[test]
fn test_duplicate_parameter() {
    assert_eq!(
        run("f <- function(a, a) { a }").semantic_error(),
        SemanticError::new(MultiplyDefinedIdent)
    );
}

#[test]
fn test_call_non_function() {
    assert_eq!(
        run("x <- 1; x(2)").semantic_error(),
        SemanticError::at_arg(1, MustBeFunct)
    );
}

#[test]
fn test_parameter_must_stay_integer() {
    assert_eq!(
        run("f <- function(a) { a <- 1.5 }; f(1)").semantic_error(),
        SemanticError::at_arg(1, MustBeInteger)
    );
}

// ============================================================================
// I/O
// ============================================================================

#[test]
fn test_print_echoes_and_cat_returns_null() {
    assert_eq!(run("print(2.5)").value(), Value::float(2.5));
    let cat = run("cat(2.5)");
    assert_eq!(cat.output, "2.50\n");
    assert_eq!(cat.value(), Value::Null);
}

#[test]
fn test_print_rejects_function() {
    assert_eq!(
        run("f <- function(a) { a }; print(f)").semantic_error(),
        SemanticError::at_arg(1, CannotBeFunctOrNull)
    );
}

#[test]
fn test_read_lines() {
    let run = Runner::new()
        .with_input("12\n3.5\nhello\n")
        .run("a <- read(); b <- read(); c <- read(); print(a + 1); print(b); print(c)");
    assert_eq!(run.output, "13\n3.50\nhello\n");
}

#[test]
fn test_classify_input() {
    assert_eq!(classify_input("42"), Value::int(42));
    assert_eq!(classify_input(" -3 "), Value::int(-3));
    assert_eq!(classify_input("2.5"), Value::float(2.5));
    assert_eq!(classify_input("12abc"), Value::int(12));
    assert_eq!(classify_input("abc"), Value::str("abc"));
    assert_eq!(classify_input(""), Value::str(""));
}

#[test]
fn test_read_at_end_of_input() {
    assert_eq!(run("read()").value(), Value::str(""));
}

// ============================================================================
// Resource limits
// ============================================================================

#[test]
fn test_stack_overflow() {
    crate::test_utils::init_test_logging();
    let run = Runner::new()
        .with_options(ExecutionOptions {
            max_depth: 50,
            max_iterations: None,
        })
        .run("f <- function(n) { f(n + 1) }; f(0)");
    assert!(matches!(
        run.result,
        Err(EvalError::ResourceExceeded {
            error: ResourceExceeded::StackOverflow { max_depth: 50, .. },
            ..
        })
    ));
}

/// Runs `source` on a thread with a small native stack.
fn run_on_small_stack(source: &'static str, options: ExecutionOptions) -> (String, Option<String>) {
    std::thread::Builder::new()
        .stack_size(512 * 1024)
        .spawn(move || {
            let run = Runner::new().with_options(options).run(source);
            let error = run.result.err().map(|e| e.to_string());
            (run.output, error)
        })
        .expect("failed to spawn evaluator thread")
        .join()
        .expect("evaluator thread panicked")
}

#[test]
fn test_deep_recursion_on_small_stack() {
    let (output, error) = run_on_small_stack(
        "f <- function(n) { if (n <= 0) 0 else f(n - 1) }; print(f(5000))",
        ExecutionOptions {
            max_depth: 100_000,
            max_iterations: None,
        },
    );
    assert_eq!(error, None);
    assert_eq!(output, "0\n");
}

#[test]
fn test_default_depth_limit_on_small_stack() {
    let (output, error) = run_on_small_stack(
        "f <- function(n) { if (n <= 0) 0 else f(n - 1) }; print(f(100000))",
        ExecutionOptions::default(),
    );
    assert_eq!(output, "");
    assert!(error.is_some_and(|e| e.contains("stack overflow")));
}

#[test]
fn test_iteration_limit() {
    let run = Runner::new()
        .with_options(ExecutionOptions {
            max_depth: 1000,
            max_iterations: Some(5),
        })
        .run("while (TRUE) { 1 }");
    assert!(matches!(
        run.result,
        Err(EvalError::ResourceExceeded {
            error: ResourceExceeded::IterationLimit { max_iterations: 5 },
            ..
        })
    ));
}

#[test]
fn test_error_span_points_at_failing_expression() {
    let source = "x <- 1\ny <- x / 0";
    let run = run(source);
    let span = run.result.unwrap_err().span().cloned().unwrap();
    assert_eq!(span.line(source), 2);
}
