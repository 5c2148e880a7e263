use std::rc::Rc;

use lazy_static::lazy_static;
use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;

use crate::parser::{
    BinaryOp, BoolOp, ComparisonOp, ParseError, Span, UnaryOp,
    error::convert_pest_error,
    parsed_expr::{Expr, ExprKind, Literal, Program},
};

type PestError = pest::error::Error<Rule>;

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        .op(
            Op::infix(Rule::add, Assoc::Left) |
            Op::infix(Rule::sub, Assoc::Left) |
            Op::infix(Rule::or, Assoc::Left)
        )                                               // `+`, `-`, `|`
        .op(
            Op::infix(Rule::mul, Assoc::Left) |
            Op::infix(Rule::div, Assoc::Left) |
            Op::infix(Rule::and, Assoc::Left) |
            Op::infix(Rule::modulo, Assoc::Left) |
            Op::infix(Rule::pow, Assoc::Left)
        )                                               // `*`, `/`, `&`, `%%`, `^`
        .op(Op::prefix(Rule::not))                       // `!`
        // (highest precedence)
        ;
}

#[derive(Parser)]
#[grammar = "parser/hol.pest"]
pub struct HolParser;

/// Parse a whole HOL program.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let mut pairs = HolParser::parse(Rule::program, source).map_err(convert_pest_error)?;
    let program = pairs.next().ok_or_else(|| {
        convert_pest_error(PestError::new_from_pos(
            pest::error::ErrorVariant::CustomError {
                message: "missing program".to_string(),
            },
            pest::Position::from_start(source),
        ))
    })?;

    let exprs = program
        .into_inner()
        .filter(|pair| pair.as_rule() != Rule::EOI)
        .map(parse_expr)
        .collect::<Result<_, _>>()
        .map_err(convert_pest_error)?;

    Ok(Program { exprs })
}

fn custom_error(message: &str, span: pest::Span<'_>) -> PestError {
    pest::error::Error::new_from_span(
        pest::error::ErrorVariant::CustomError {
            message: message.to_string(),
        },
        span,
    )
}

/// Take the next child of a rule, failing with a parse error if it is missing.
fn next_pair<'i>(
    pairs: &mut Pairs<'i, Rule>,
    span: pest::Span<'i>,
    what: &str,
) -> Result<Pair<'i, Rule>, PestError> {
    pairs
        .next()
        .ok_or_else(|| custom_error(&format!("missing {}", what), span))
}

fn boxed(pair: Pair<Rule>) -> Result<Box<Expr>, PestError> {
    parse_expr(pair).map(Box::new)
}

pub fn parse_expr(pair: Pair<Rule>) -> Result<Expr, PestError> {
    let pest_span = pair.as_span();
    let span = Span::from(pest_span);
    let expr = |kind: ExprKind| -> Result<Expr, PestError> {
        Ok(Expr::new(span.clone(), kind))
    };

    match pair.as_rule() {
        Rule::arith => {
            let mut pairs = pair.into_inner();
            let left = parse_expr(next_pair(&mut pairs, pest_span, "operand")?)?;
            let Some(op) = pairs.next() else {
                return Ok(left);
            };
            let op = match op.as_rule() {
                Rule::lt => ComparisonOp::Lt,
                Rule::le => ComparisonOp::Le,
                Rule::gt => ComparisonOp::Gt,
                Rule::ge => ComparisonOp::Ge,
                Rule::eq => ComparisonOp::Eq,
                Rule::ne => ComparisonOp::Ne,
                rule => {
                    return Err(custom_error(
                        &format!("unknown relational operator: {:?}", rule),
                        op.as_span(),
                    ));
                }
            };
            let right = parse_expr(next_pair(&mut pairs, pest_span, "operand")?)?;
            expr(ExprKind::Comparison {
                op,
                left: Box::new(left),
                right: Box::new(right),
            })
        }

        Rule::simple => PRATT_PARSER
            .map_primary(parse_expr)
            .map_prefix(|op, rhs| {
                let rhs = rhs?;
                let span = Span::combine(&Span::from(op.as_span()), &rhs.span);
                let op = match op.as_rule() {
                    Rule::not => UnaryOp::Not,
                    rule => {
                        return Err(custom_error(
                            &format!("unknown prefix operator: {:?}", rule),
                            op.as_span(),
                        ));
                    }
                };
                Ok(Expr::new(
                    span,
                    ExprKind::Unary {
                        op,
                        expr: Box::new(rhs),
                    },
                ))
            })
            .map_infix(|lhs, op, rhs| {
                let (left, right) = (Box::new(lhs?), Box::new(rhs?));
                let span = Span::combine(&left.span, &right.span);
                let kind = match op.as_rule() {
                    Rule::and => ExprKind::Boolean {
                        op: BoolOp::And,
                        left,
                        right,
                    },
                    Rule::or => ExprKind::Boolean {
                        op: BoolOp::Or,
                        left,
                        right,
                    },
                    rule => {
                        let op = match rule {
                            Rule::add => BinaryOp::Add,
                            Rule::sub => BinaryOp::Sub,
                            Rule::mul => BinaryOp::Mul,
                            Rule::div => BinaryOp::Div,
                            Rule::modulo => BinaryOp::Mod,
                            Rule::pow => BinaryOp::Pow,
                            _ => {
                                return Err(custom_error(
                                    &format!("unknown binary operator: {:?}", rule),
                                    op.as_span(),
                                ));
                            }
                        };
                        ExprKind::Binary { op, left, right }
                    }
                };
                Ok(Expr::new(span, kind))
            })
            .parse(pair.into_inner()),

        Rule::grouped => {
            let mut pairs = pair.into_inner();
            parse_expr(next_pair(&mut pairs, pest_span, "expression")?)
        }

        Rule::int | Rule::float | Rule::string | Rule::boolean => {
            expr(ExprKind::Literal(parse_literal(pair)?))
        }

        Rule::ident => expr(ExprKind::Ident(pair.as_str().to_string())),

        Rule::single_element => {
            let mut pairs = pair.into_inner();
            let name = next_pair(&mut pairs, pest_span, "identifier")?
                .as_str()
                .to_string();
            let index = boxed(next_pair(&mut pairs, pest_span, "index")?)?;
            expr(ExprKind::Element { name, index })
        }

        Rule::call => {
            let mut pairs = pair.into_inner();
            let name = next_pair(&mut pairs, pest_span, "function name")?
                .as_str()
                .to_string();
            let args = next_pair(&mut pairs, pest_span, "arguments")?
                .into_inner()
                .map(parse_expr)
                .collect::<Result<_, _>>()?;
            expr(ExprKind::Call { name, args })
        }

        Rule::if_expr => {
            let mut pairs = pair.into_inner();
            let cond = boxed(next_pair(&mut pairs, pest_span, "condition")?)?;
            let then_branch = boxed(next_pair(&mut pairs, pest_span, "then branch")?)?;
            let else_branch = pairs.next().map(boxed).transpose()?;
            expr(ExprKind::If {
                cond,
                then_branch,
                else_branch,
            })
        }

        Rule::while_expr => {
            let mut pairs = pair.into_inner();
            let cond = boxed(next_pair(&mut pairs, pest_span, "condition")?)?;
            let body = boxed(next_pair(&mut pairs, pest_span, "loop body")?)?;
            expr(ExprKind::While { cond, body })
        }

        Rule::for_expr => {
            let mut pairs = pair.into_inner();
            let var = next_pair(&mut pairs, pest_span, "loop variable")?
                .as_str()
                .to_string();
            let iterable = boxed(next_pair(&mut pairs, pest_span, "loop list")?)?;
            let body = boxed(next_pair(&mut pairs, pest_span, "loop body")?)?;
            expr(ExprKind::For {
                var,
                iterable,
                body,
            })
        }

        Rule::break_expr => expr(ExprKind::Break),
        Rule::next_expr => expr(ExprKind::Next),

        Rule::compound => {
            let exprs = pair
                .into_inner()
                .map(parse_expr)
                .collect::<Result<_, _>>()?;
            expr(ExprKind::Compound(exprs))
        }

        Rule::assignment => {
            let mut pairs = pair.into_inner();
            let name = next_pair(&mut pairs, pest_span, "identifier")?
                .as_str()
                .to_string();
            let mut index = None;
            if pairs.peek().map(|p| p.as_rule()) == Some(Rule::index) {
                let index_pair = next_pair(&mut pairs, pest_span, "index")?;
                let index_span = index_pair.as_span();
                let mut inner = index_pair.into_inner();
                index = Some(boxed(next_pair(&mut inner, index_span, "index")?)?);
            }
            let value = boxed(next_pair(&mut pairs, pest_span, "assigned value")?)?;
            expr(ExprKind::Assign { name, index, value })
        }

        Rule::function_def => {
            let mut pairs = pair.into_inner();
            let params = next_pair(&mut pairs, pest_span, "parameters")?
                .into_inner()
                .map(|p| p.as_str().to_string())
                .collect();
            let body = Rc::new(parse_expr(next_pair(
                &mut pairs,
                pest_span,
                "function body",
            )?)?);
            expr(ExprKind::Function { params, body })
        }

        Rule::list_expr => {
            let items = pair
                .into_inner()
                .map(parse_literal)
                .collect::<Result<_, _>>()?;
            expr(ExprKind::List(items))
        }

        Rule::print_expr | Rule::cat_expr => {
            let is_print = pair.as_rule() == Rule::print_expr;
            let mut pairs = pair.into_inner();
            let operand = boxed(next_pair(&mut pairs, pest_span, "operand")?)?;
            if is_print {
                expr(ExprKind::Print(operand))
            } else {
                expr(ExprKind::Cat(operand))
            }
        }

        Rule::read_expr => expr(ExprKind::Read),
        Rule::quit_expr => expr(ExprKind::Quit),

        rule => Err(custom_error(
            &format!("Unhandled rule: {:?}", rule),
            pest_span,
        )),
    }
}

fn parse_literal(pair: Pair<Rule>) -> Result<Literal, PestError> {
    let text = pair.as_str();
    let invalid = || custom_error(&format!("invalid number literal: {}", text), pair.as_span());

    match pair.as_rule() {
        Rule::int => text.parse().map(Literal::Int).map_err(|_| invalid()),
        Rule::float => text.parse().map(Literal::Float).map_err(|_| invalid()),
        Rule::string => Ok(Literal::Str(text[1..text.len() - 1].to_string())),
        Rule::boolean => match text {
            "TRUE" => Ok(Literal::Bool(true)),
            "FALSE" => Ok(Literal::Bool(false)),
            _ => Err(custom_error("invalid boolean literal", pair.as_span())),
        },
        rule => Err(custom_error(
            &format!("expected a constant, found {:?}", rule),
            pair.as_span(),
        )),
    }
}
