//! Console for configurable program I/O.
//!
//! `print`, `cat` and indexed assignment write through the console; `read()`
//! pulls lines from it. The CLI wires it to stdin/stdout, tests to in-memory
//! buffers.

use std::io::{self, BufRead, Write};

pub struct Console<'io> {
    output: &'io mut dyn Write,
    input: &'io mut dyn BufRead,
}

impl<'io> Console<'io> {
    pub fn new(output: &'io mut dyn Write, input: &'io mut dyn BufRead) -> Self {
        Self { output, input }
    }

    /// Write `text` followed by a newline.
    pub fn println(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    /// Read one line without its terminator; `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}
