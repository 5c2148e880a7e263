mod cases;

use indoc::indoc;

test_case!(
    if_true,
    input: "if (1 < 2) print(1)",
    output: "1\n",
);

test_case!(
    if_false_is_null,
    input: "x <- if (0) 5\nif (1) print(3)",
    output: "3\n",
);

test_case!(
    if_else,
    input: "print(if (TRUE) 1 else 2); print(if (FALSE) 1 else 2)",
    output: "1\n2\n",
);

test_case!(
    if_else_only_runs_taken_branch,
    input: r#"if (0) print("then") else print("else")"#,
    output: "else\n",
);

test_case!(
    if_string_condition,
    input: r#"if ("yes") 1"#,
    output: "",
    error: "Line 1: Arg 1: cannot be function or null or list or string",
);

test_case!(
    if_else_function_branch,
    input: "g <- if (0) 1 else function(a) { a }",
    output: "",
    error: "Line 1: Arg 3: cannot be function",
);

test_case!(
    if_without_else_function_branch,
    input: "g <- if (TRUE) function(a) { a }\nprint(1)",
    output: "",
    error: "Line 1: Arg 2: cannot be function",
);

test_case!(
    while_counts,
    input: indoc! {"
        i <- 0
        while (i < 3) {
            i <- i + 1
            cat(i)
        }
    "},
    output: "1\n2\n3\n",
);

test_case!(
    while_never_runs,
    input: "x <- while (FALSE) 1\nprint(1)",
    output: "1\n",
);

test_case!(
    while_list_condition,
    input: "l <- list(1)\nwhile (l) 1",
    output: "",
    error: "Line 2: Arg 1: cannot be function or null or list or string",
);

test_case!(
    for_each_element,
    input: r#"for (s in list("a", "b", "c")) { cat(s) }"#,
    output: "a\nb\nc\n",
);

test_case!(
    for_accumulates,
    input: indoc! {"
        total <- 0
        for (x in list(1, 2, 3, 4)) {
            total <- total + x
        }
        print(total)
    "},
    output: "10\n",
);

test_case!(
    for_variable_keeps_last_element,
    input: "for (x in list(4, 5)) { 0 }; print(x)",
    output: "5\n",
);

test_case!(
    for_requires_list,
    input: "for (x in 3) { 0 }",
    output: "",
    error: "Line 1: Arg 2: must be list",
);

test_case!(
    for_variable_cannot_be_list,
    input: "x <- list(1)\nfor (x in list(1)) { 0 }",
    output: "",
    error: "Line 2: Arg 1: cannot be function or null or list",
);

test_case!(
    break_leaves_loop,
    input: indoc! {"
        i <- 0
        while (TRUE) {
            i <- i + 1
            if (i == 3) break
        }
        print(i)
    "},
    output: "3\n",
);

test_case!(
    next_skips_iteration,
    input: indoc! {"
        for (x in list(1, 2, 3, 4, 5)) {
            if (x %% 2 == 0) next
            cat(x)
        }
    "},
    output: "1\n3\n5\n",
);

test_case!(
    break_only_leaves_innermost_loop,
    input: indoc! {"
        for (a in list(1, 2)) {
            for (b in list(10, 20)) {
                if (b == 20) break
                cat(a * b)
            }
        }
    "},
    output: "10\n20\n",
);

test_case!(
    quit_stops_program,
    input: "print(1)\nquit()\nprint(2)",
    output: "1\n",
);

test_case!(
    comments_are_ignored,
    input: "# a comment\nprint(1) # trailing\n",
    output: "1\n",
);

#[test]
fn iteration_limit() {
    let run = cases::run_with(
        "while (TRUE) { 1 }",
        "",
        hol::ExecutionOptions {
            max_depth: 1000,
            max_iterations: Some(100),
        },
    );
    let err = run.result.unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert_eq!(err.to_string(), "Line 1: Loop iteration limit of 100 exceeded");
}
