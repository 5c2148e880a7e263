#![allow(dead_code)]

use hol::{Error, ExecutionOptions, Interpreter, Outcome};

/// Everything observable about one program run.
pub struct Run {
    pub result: Result<Outcome, Error>,
    pub output: String,
}

pub fn run_with(source: &str, stdin: &str, options: ExecutionOptions) -> Run {
    let mut output = Vec::new();
    let mut input = stdin.as_bytes();
    let result = Interpreter::new(options).run(source, &mut output, &mut input);
    Run {
        result,
        output: String::from_utf8(output).expect("program output is utf-8"),
    }
}

pub fn run(source: &str, stdin: &str) -> Run {
    run_with(source, stdin, ExecutionOptions::default())
}

/// Declare an end-to-end test running a HOL program.
///
/// `output` is the expected console output. With `error`, the run must fail
/// with that `Line <n>: <message>` text; without it, the run must complete.
#[macro_export]
macro_rules! test_case {
    ($name:ident, input: $input:expr, $(stdin: $stdin:expr,)? output: $output:expr, error: $error:expr $(,)?) => {
        #[test]
        fn $name() {
            #[allow(unused_mut, unused_assignments)]
            let mut stdin = "";
            $(stdin = $stdin;)?
            let run = $crate::cases::run($input, stdin);
            match &run.result {
                Err(e) => pretty_assertions::assert_eq!(e.to_string(), $error),
                Ok(outcome) => panic!("expected an error, got {:?}", outcome),
            }
            pretty_assertions::assert_eq!(run.output, $output);
        }
    };
    ($name:ident, input: $input:expr, $(stdin: $stdin:expr,)? output: $output:expr $(,)?) => {
        #[test]
        fn $name() {
            #[allow(unused_mut, unused_assignments)]
            let mut stdin = "";
            $(stdin = $stdin;)?
            let run = $crate::cases::run($input, stdin);
            if let Err(e) = &run.result {
                panic!("program failed: {}", e);
            }
            pretty_assertions::assert_eq!(run.output, $output);
        }
    };
}
