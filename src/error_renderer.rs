//! Error rendering using ariadne
//!
//! This module renders HOL errors with source code snippets and
//! annotations. The plain `Line <n>: <message>` form is the error's
//! `Display`; this is the richer form shown on request.

use crate::{Diagnostic, Error, Severity};
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::io::Write;

/// Render an error with source snippets to stderr
///
/// # Example
/// ```no_run
/// use hol::{Interpreter, render_error};
///
/// let source = "print(1/0)";
/// let mut output = Vec::new();
/// let mut input: &[u8] = b"";
/// if let Err(e) = Interpreter::default().run(source, &mut output, &mut input) {
///     render_error(&e, source);
/// }
/// ```
pub fn render_error(error: &Error, source: &str) {
    render_error_to_writer(error, source, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(error: &Error, source: &str, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, source, writer, true)
}

/// Render an error to a String
pub fn render_error_to_string(error: &Error, source: &str) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, source, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
pub fn render_error_to_string_no_color(error: &Error, source: &str) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, source, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &Error,
    source: &str,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    match error.to_diagnostic() {
        Some(diagnostic) => render_diagnostic(source, &diagnostic, writer, use_color),
        None => writeln!(writer, "{}", error),
    }
}

fn render_diagnostic(
    source: &str,
    diag: &Diagnostic,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let kind = match diag.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
    };

    // ariadne needs a span inside the source; clamp spans past the end.
    let end = diag.span.0.end.min(source.len());
    let span = diag.span.0.start.min(end)..end;

    let mut report = Report::build(kind, ("<unknown>", span.clone()))
        .with_message(&diag.message)
        .with_config(ariadne::Config::default().with_color(use_color));

    if let Some(code) = &diag.code {
        report = report.with_code(code);
    }

    let color = colors.next();
    report = report.with_label(
        Label::new(("<unknown>", span))
            .with_message(&diag.message)
            .with_color(color),
    );

    if let Some(help) = &diag.help {
        report = report.with_help(help);
    }

    // Reborrow to avoid moving the writer
    report
        .finish()
        .write(("<unknown>", Source::from(source)), &mut *writer)
}
