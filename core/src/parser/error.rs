use crate::parser::{Rule, Span};

/// Parser error with its location.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    /// 1-based line where parsing failed.
    pub line: usize,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Unexpected token
    UnexpectedToken { expected: String, found: String },
    /// Numeric literal that does not fit its type
    InvalidNumber { text: String },
    /// Other parse errors (catch-all for Pest errors we don't specifically handle)
    Other { message: String },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span, line: usize) -> Self {
        Self { kind, span, line }
    }

    /// Human-readable description of what went wrong, used for rich rendering.
    pub fn detail(&self) -> String {
        match &self.kind {
            ParseErrorKind::UnexpectedToken { expected, found } => {
                format!("Expected {}, found {}", expected, found)
            }
            ParseErrorKind::InvalidNumber { text } => {
                format!("Invalid number literal '{}'", text)
            }
            ParseErrorKind::Other { message } => message.clone(),
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "syntax error")
    }
}

impl std::error::Error for ParseError {}

/// Convert Pest error to human-readable ParseError
pub fn convert_pest_error(err: pest::error::Error<Rule>) -> ParseError {
    use pest::error::{ErrorVariant, InputLocation, LineColLocation};

    let span = match err.location {
        InputLocation::Pos(pos) => Span(pos..pos),
        InputLocation::Span((start, end)) => Span(start..end),
    };
    let line = match err.line_col {
        LineColLocation::Pos((line, _)) => line,
        LineColLocation::Span((line, _), _) => line,
    };

    let kind = match err.variant {
        ErrorVariant::ParsingError {
            positives,
            negatives,
        } => ParseErrorKind::UnexpectedToken {
            expected: format_expected_rules(&positives),
            found: format_found_rules(&negatives),
        },
        ErrorVariant::CustomError { message } => {
            if let Some(text) = message.strip_prefix("invalid number literal: ") {
                ParseErrorKind::InvalidNumber {
                    text: text.to_string(),
                }
            } else {
                ParseErrorKind::Other { message }
            }
        }
    };

    ParseError::new(kind, span, line)
}

/// Format expected rules in a human-readable way
fn format_expected_rules(rules: &[Rule]) -> String {
    let mut concepts = Vec::new();

    for rule in rules {
        let concept = match rule {
            Rule::int | Rule::float | Rule::boolean | Rule::string => "literal",
            Rule::ident => "identifier",
            Rule::EOI => "end of input",
            Rule::add
            | Rule::sub
            | Rule::or
            | Rule::mul
            | Rule::div
            | Rule::and
            | Rule::modulo
            | Rule::pow => "operator",
            Rule::lt | Rule::le | Rule::gt | Rule::ge | Rule::eq | Rule::ne => {
                "comparison operator"
            }
            Rule::index => "index",
            _ => "expression",
        };
        if !concepts.contains(&concept) {
            concepts.push(concept);
        }
    }

    match concepts.split_last() {
        None => "something else".to_string(),
        Some((only, [])) => only.to_string(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}

/// Format found rules in a human-readable way
fn format_found_rules(rules: &[Rule]) -> String {
    match rules.first() {
        None => "unexpected token".to_string(),
        Some(Rule::ident) => "identifier".to_string(),
        Some(Rule::int) => "integer".to_string(),
        Some(Rule::float) => "floating-point number".to_string(),
        Some(Rule::boolean) => "boolean".to_string(),
        Some(Rule::string) => "string".to_string(),
        Some(Rule::EOI) => "end of input".to_string(),
        Some(rule) => format!("{:?}", rule),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_expected_rules() {
        assert_eq!(format_expected_rules(&[Rule::int, Rule::float]), "literal");
        assert_eq!(
            format_expected_rules(&[Rule::int, Rule::ident, Rule::EOI]),
            "literal, identifier or end of input"
        );
        assert_eq!(format_expected_rules(&[]), "something else");
    }

    #[test]
    fn test_custom_error_conversion() {
        let pest_err = pest::error::Error::<Rule>::new_from_pos(
            pest::error::ErrorVariant::CustomError {
                message: "invalid number literal: 99999999999999999999".to_string(),
            },
            pest::Position::from_start("test"),
        );

        let parse_err = convert_pest_error(pest_err);
        assert_eq!(parse_err.line, 1);
        assert_eq!(
            parse_err.kind,
            ParseErrorKind::InvalidNumber {
                text: "99999999999999999999".to_string()
            }
        );
        assert_eq!(parse_err.to_string(), "syntax error");
    }
}
