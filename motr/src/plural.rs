/* Copyright (C) 2018 Olivier Goffart <ogoffart@woboq.com>

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the "Software"), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense,
and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so,
subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or substantial
portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES
OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
*/

//! Compiler for the `Plural-Forms` catalog header.
//!
//! The header has the shape `nplurals=<count>; plural=<expression>;` where the expression is a
//! C expression over the single variable `n`. It is tokenized, parsed by recursive descent into a
//! flat arena of sub-expressions, and evaluated by walking that tree. Nothing from the catalog is
//! ever executed as code, and anything outside the grammar is rejected when the catalog is loaded.

use std::collections::HashMap;

use crate::error::InvalidCatalog;

/// The rule used when a catalog carries no `Plural-Forms` header.
pub const DEFAULT_PLURAL_FORMS: &str = "nplurals=2; plural=n!=1;";

/// Deepest sub-expression tree accepted.
const MAX_DEPTH: u16 = 256;
/// Deepest parenthesis / ternary / prefix operator nesting accepted by the parser.
const MAX_NESTING: usize = 64;

/// Why a plural rule was rejected, and where.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason} at offset {offset}")]
pub struct PluralParseError {
    pub reason: &'static str,
    /// Byte offset into the full `Plural-Forms` text.
    pub offset: usize,
}

fn error(reason: &'static str, offset: usize) -> PluralParseError {
    PluralParseError { reason, offset }
}

/// A compiled `Plural-Forms` header.
#[derive(Debug, Clone)]
pub struct PluralForms {
    source: String,
    nplurals: usize,
    expression: Expression,
}

impl PluralForms {
    /// Compiles a full header value such as `nplurals=2; plural=(n != 1);`.
    pub fn parse(source: &str) -> Result<Self, PluralParseError> {
        let (nplurals, expression, offset) = split_header(source)?;
        let expression = parse_rule_expression(expression, offset)?;
        Ok(Self {
            source: source.to_owned(),
            nplurals,
            expression,
        })
    }

    /// Compiles the `Plural-Forms` entry of a catalog header, or [`DEFAULT_PLURAL_FORMS`] when
    /// there is none.
    pub fn from_metadata(metadata: &HashMap<String, String>) -> Result<Self, InvalidCatalog> {
        Self::compile(
            metadata
                .get("Plural-Forms")
                .map_or(DEFAULT_PLURAL_FORMS, String::as_str),
        )
    }

    /// Like [`Self::parse`], reporting failures as a catalog error.
    pub fn compile(rules: &str) -> Result<Self, InvalidCatalog> {
        Self::parse(rules).map_err(|parse_error| InvalidCatalog::InvalidPluralForms {
            rules: rules.to_owned(),
            error: parse_error.to_string(),
        })
    }

    /// The header text this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The number of plural forms the header declares.
    pub fn nplurals(&self) -> usize {
        self.nplurals
    }

    /// Evaluates the rule for the count `n`.
    pub fn evaluate(&self, n: i64) -> i64 {
        self.expression.evaluate(n)
    }

    /// The plural index for `n`, or `None` when the rule produced a negative value.
    pub fn select(&self, n: i64) -> Option<usize> {
        usize::try_from(self.evaluate(n)).ok()
    }
}

/// Checks `\s*nplurals\s*=\s*\d+\s*;\s+plural\s*=\s*(.+)\s*;\s*` and returns the count, the
/// expression text and the offset of the expression in `source`.
fn split_header(source: &str) -> Result<(usize, &str, usize), PluralParseError> {
    let offset_of = |rest: &str| source.len() - rest.len();

    let rest = expect(source, source, "nplurals", "expected 'nplurals'")?;
    let rest = expect(source, rest, "=", "expected '=' after 'nplurals'")?;
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let nplurals = rest[..digits]
        .parse()
        .map_err(|_| error("expected the number of plural forms", offset_of(rest)))?;
    let rest = expect(source, &rest[digits..], ";", "expected ';' after nplurals")?;
    if !rest.starts_with(|c: char| c.is_ascii_whitespace()) {
        return Err(error("expected whitespace after ';'", offset_of(rest)));
    }
    let rest = expect(source, rest, "plural", "expected 'plural'")?;
    let rest = expect(source, rest, "=", "expected '=' after 'plural'")?;
    let expression = rest
        .trim_end_matches(|c: char| c.is_ascii_whitespace())
        .strip_suffix(';')
        .ok_or_else(|| error("expected ';' after the plural expression", source.len()))?;
    Ok((nplurals, expression, offset_of(rest)))
}

/// Skips whitespace in `rest`, then strips `token`.
fn expect<'a>(
    source: &str,
    rest: &'a str,
    token: &str,
    reason: &'static str,
) -> Result<&'a str, PluralParseError> {
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
    rest.strip_prefix(token)
        .ok_or_else(|| error(reason, source.len() - rest.len()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Equal,
    NotEqual,
    Smaller,
    SmallerOrEqual,
    Greater,
    GreaterOrEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

/// Binary operators from the loosest to the tightest binding. All are left associative.
const PRECEDENCE: &[&[BinaryOp]] = &[
    &[BinaryOp::Or],
    &[BinaryOp::And],
    &[BinaryOp::Equal, BinaryOp::NotEqual],
    &[
        BinaryOp::Smaller,
        BinaryOp::SmallerOrEqual,
        BinaryOp::Greater,
        BinaryOp::GreaterOrEqual,
    ],
    &[BinaryOp::Add, BinaryOp::Subtract],
    &[BinaryOp::Multiply, BinaryOp::Divide, BinaryOp::Modulo],
];

#[derive(Debug, Clone)]
pub enum SubExpression {
    NumberLiteral(i64),
    NVariable,
    Unary {
        op: UnaryOp,
        operand: u16,
    },
    BinaryOp {
        op: BinaryOp,
        lhs: u16,
        rhs: u16,
    },
    Condition {
        condition: u16,
        true_expr: u16,
        false_expr: u16,
    },
}

impl SubExpression {
    fn evaluate(&self, sub_expressions: &[SubExpression], n: i64) -> i64 {
        let eval = |index: u16| sub_expressions[index as usize].evaluate(sub_expressions, n);
        match self {
            Self::NumberLiteral(value) => *value,
            Self::NVariable => n,
            Self::Unary { op, operand } => {
                let value = eval(*operand);
                match op {
                    UnaryOp::Not => (value == 0) as i64,
                    UnaryOp::Negate => value.wrapping_neg(),
                }
            }
            Self::Condition {
                condition,
                true_expr,
                false_expr,
            } => {
                if eval(*condition) != 0 {
                    eval(*true_expr)
                } else {
                    eval(*false_expr)
                }
            }
            Self::BinaryOp { op, lhs, rhs } => {
                let lhs_value = eval(*lhs);
                let rhs_value = || eval(*rhs);
                match op {
                    BinaryOp::Or => (lhs_value != 0 || rhs_value() != 0) as i64,
                    BinaryOp::And => (lhs_value != 0 && rhs_value() != 0) as i64,
                    BinaryOp::Equal => (lhs_value == rhs_value()) as i64,
                    BinaryOp::NotEqual => (lhs_value != rhs_value()) as i64,
                    BinaryOp::Smaller => (lhs_value < rhs_value()) as i64,
                    BinaryOp::SmallerOrEqual => (lhs_value <= rhs_value()) as i64,
                    BinaryOp::Greater => (lhs_value > rhs_value()) as i64,
                    BinaryOp::GreaterOrEqual => (lhs_value >= rhs_value()) as i64,
                    BinaryOp::Add => lhs_value.wrapping_add(rhs_value()),
                    BinaryOp::Subtract => lhs_value.wrapping_sub(rhs_value()),
                    BinaryOp::Multiply => lhs_value.wrapping_mul(rhs_value()),
                    // Division by zero is undefined in C; it evaluates to 0 here.
                    BinaryOp::Divide => match rhs_value() {
                        0 => 0,
                        divisor => lhs_value.wrapping_div(divisor),
                    },
                    BinaryOp::Modulo => match rhs_value() {
                        0 => 0,
                        divisor => lhs_value.wrapping_rem(divisor),
                    },
                }
            }
        }
    }
}

#[cfg(test)]
struct DisplayExpression<'a>(usize, &'a [SubExpression]);

#[cfg(test)]
impl<'a> DisplayExpression<'a> {
    fn sub(&self, index: u16) -> Self {
        Self(index as usize, self.1)
    }
}

#[cfg(test)]
impl<'a> std::fmt::Display for DisplayExpression<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.1[self.0] {
            SubExpression::NumberLiteral(value) => write!(f, "{}", value),
            SubExpression::NVariable => write!(f, "n"),
            SubExpression::Unary { op, operand } => {
                let op_str = match op {
                    UnaryOp::Not => "!",
                    UnaryOp::Negate => "-",
                };
                write!(f, "{}{}", op_str, self.sub(*operand))
            }
            SubExpression::Condition {
                condition,
                true_expr,
                false_expr,
            } => write!(
                f,
                "({} ? {} : {})",
                self.sub(*condition),
                self.sub(*true_expr),
                self.sub(*false_expr)
            ),
            SubExpression::BinaryOp { op, lhs, rhs } => {
                let op_str = match op {
                    BinaryOp::Or => "||",
                    BinaryOp::And => "&&",
                    BinaryOp::Equal => "==",
                    BinaryOp::NotEqual => "!=",
                    BinaryOp::Smaller => "<",
                    BinaryOp::SmallerOrEqual => "<=",
                    BinaryOp::Greater => ">",
                    BinaryOp::GreaterOrEqual => ">=",
                    BinaryOp::Add => "+",
                    BinaryOp::Subtract => "-",
                    BinaryOp::Multiply => "*",
                    BinaryOp::Divide => "/",
                    BinaryOp::Modulo => "%",
                };
                write!(f, "({} {} {})", self.sub(*lhs), op_str, self.sub(*rhs))
            }
        }
    }
}

#[derive(Default)]
struct ExpressionBuilder {
    sub_expressions: Vec<SubExpression>,
    depths: Vec<u16>,
    nesting: usize,
}

impl ExpressionBuilder {
    fn add(&mut self, sub_expr: SubExpression, offset: usize) -> Result<u16, PluralParseError> {
        let depth_of = |index: &u16| self.depths[*index as usize];
        let children_depth = match &sub_expr {
            SubExpression::NumberLiteral(_) | SubExpression::NVariable => 0,
            SubExpression::Unary { operand, .. } => depth_of(operand),
            SubExpression::BinaryOp { lhs, rhs, .. } => depth_of(lhs).max(depth_of(rhs)),
            SubExpression::Condition {
                condition,
                true_expr,
                false_expr,
            } => depth_of(condition)
                .max(depth_of(true_expr))
                .max(depth_of(false_expr)),
        };
        if children_depth >= MAX_DEPTH {
            return Err(error("expression nested too deeply", offset));
        }
        let index = u16::try_from(self.sub_expressions.len())
            .map_err(|_| error("expression too long", offset))?;
        self.sub_expressions.push(sub_expr);
        self.depths.push(children_depth + 1);
        Ok(index)
    }

    fn enter(&mut self, offset: usize) -> Result<(), PluralParseError> {
        self.nesting += 1;
        if self.nesting > MAX_NESTING {
            return Err(error("expression nested too deeply", offset));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }
}

/// A parsed plural expression. The sub-expressions form a tree rooted at `root`.
#[derive(Debug, Clone)]
pub struct Expression {
    sub_expressions: Box<[SubExpression]>,
    root: u16,
}

impl Expression {
    pub fn evaluate(&self, n: i64) -> i64 {
        self.sub_expressions
            .get(self.root as usize)
            .map(|expr| expr.evaluate(&self.sub_expressions, n))
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    N,
    Number(i64),
    LParen,
    RParen,
    Question,
    Colon,
    Not,
    Op(BinaryOp),
}

#[derive(Debug, Clone, Copy)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

fn tokenize(string: &str, base: usize) -> Result<Vec<Token>, PluralParseError> {
    let bytes = string.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let offset = base + pos;
        let next = bytes.get(pos + 1).copied();
        let (kind, len) = match (bytes[pos], next) {
            (c, _) if c.is_ascii_whitespace() => {
                pos += 1;
                continue;
            }
            (c, _) if c.is_ascii_digit() => {
                let len = bytes[pos..]
                    .iter()
                    .position(|c| !c.is_ascii_digit())
                    .unwrap_or(bytes.len() - pos);
                let value = string[pos..pos + len]
                    .parse()
                    .map_err(|_| error("number too large", offset))?;
                (TokenKind::Number(value), len)
            }
            (b'n', _) => (TokenKind::N, 1),
            (b'(', _) => (TokenKind::LParen, 1),
            (b')', _) => (TokenKind::RParen, 1),
            (b'?', _) => (TokenKind::Question, 1),
            (b':', _) => (TokenKind::Colon, 1),
            (b'|', Some(b'|')) => (TokenKind::Op(BinaryOp::Or), 2),
            (b'&', Some(b'&')) => (TokenKind::Op(BinaryOp::And), 2),
            (b'=', Some(b'=')) => (TokenKind::Op(BinaryOp::Equal), 2),
            (b'!', Some(b'=')) => (TokenKind::Op(BinaryOp::NotEqual), 2),
            (b'<', Some(b'=')) => (TokenKind::Op(BinaryOp::SmallerOrEqual), 2),
            (b'>', Some(b'=')) => (TokenKind::Op(BinaryOp::GreaterOrEqual), 2),
            (b'!', _) => (TokenKind::Not, 1),
            (b'<', _) => (TokenKind::Op(BinaryOp::Smaller), 1),
            (b'>', _) => (TokenKind::Op(BinaryOp::Greater), 1),
            (b'+', _) => (TokenKind::Op(BinaryOp::Add), 1),
            (b'-', _) => (TokenKind::Op(BinaryOp::Subtract), 1),
            (b'*', _) => (TokenKind::Op(BinaryOp::Multiply), 1),
            (b'/', _) => (TokenKind::Op(BinaryOp::Divide), 1),
            (b'%', _) => (TokenKind::Op(BinaryOp::Modulo), 1),
            _ => return Err(error("unexpected character", offset)),
        };
        tokens.push(Token { kind, offset });
        pos += len;
    }
    Ok(tokens)
}

struct ParsingState<'a> {
    expr: u16,
    rest: &'a [Token],
}

/// Offset of the first remaining token, or of the end of the expression.
fn offset_of(rest: &[Token], end: usize) -> usize {
    rest.first().map_or(end, |token| token.offset)
}

/// Parses the expression part of a plural rule. `base` is its offset in the whole header.
fn parse_rule_expression(string: &str, base: usize) -> Result<Expression, PluralParseError> {
    let end = base + string.len();
    let tokens = tokenize(string, base)?;
    let mut builder = ExpressionBuilder::default();
    let state = parse_expression(&tokens, end, &mut builder)?;
    if let Some(token) = state.rest.first() {
        return Err(error("extra token in expression", token.offset));
    }
    Ok(Expression {
        sub_expressions: builder.sub_expressions.into_boxed_slice(),
        root: state.expr,
    })
}

/// `<binary> ('?' <expression> ':' <expression>)?`
fn parse_expression<'a>(
    tokens: &'a [Token],
    end: usize,
    builder: &mut ExpressionBuilder,
) -> Result<ParsingState<'a>, PluralParseError> {
    builder.enter(offset_of(tokens, end))?;
    let state = parse_binary(tokens, 0, end, builder)?;
    let rest: &'a [Token] = state.rest;
    let state = match rest {
        [Token {
            kind: TokenKind::Question,
            offset,
        }, rest @ ..] => {
            let s1 = parse_expression(rest, end, builder)?;
            let rest = match s1.rest {
                [Token {
                    kind: TokenKind::Colon,
                    ..
                }, rest @ ..] => rest,
                rest => return Err(error("expected ':'", offset_of(rest, end))),
            };
            let s2 = parse_expression(rest, end, builder)?;
            ParsingState {
                expr: builder.add(
                    SubExpression::Condition {
                        condition: state.expr,
                        true_expr: s1.expr,
                        false_expr: s2.expr,
                    },
                    *offset,
                )?,
                rest: s2.rest,
            }
        }
        _ => state,
    };
    builder.leave();
    Ok(state)
}

/// `<operand> (<op> <operand>)*` for the operators of `PRECEDENCE[level]`, where an operand is
/// the next tighter level.
fn parse_binary<'a>(
    tokens: &'a [Token],
    level: usize,
    end: usize,
    builder: &mut ExpressionBuilder,
) -> Result<ParsingState<'a>, PluralParseError> {
    let Some(operators) = PRECEDENCE.get(level) else {
        return parse_unary(tokens, end, builder);
    };
    let mut state = parse_binary(tokens, level + 1, end, builder)?;
    loop {
        let rest: &'a [Token] = state.rest;
        let [Token {
            kind: TokenKind::Op(op),
            offset,
        }, rest @ ..] = rest
        else {
            break;
        };
        if !operators.contains(op) {
            break;
        }
        let rhs = parse_binary(rest, level + 1, end, builder)?;
        state = ParsingState {
            expr: builder.add(
                SubExpression::BinaryOp {
                    op: *op,
                    lhs: state.expr,
                    rhs: rhs.expr,
                },
                *offset,
            )?,
            rest: rhs.rest,
        };
    }
    Ok(state)
}

/// `('!' | '-' | '+')* <term>`
fn parse_unary<'a>(
    tokens: &'a [Token],
    end: usize,
    builder: &mut ExpressionBuilder,
) -> Result<ParsingState<'a>, PluralParseError> {
    let (op, offset, rest) = match tokens {
        [Token {
            kind: TokenKind::Not,
            offset,
        }, rest @ ..] => (Some(UnaryOp::Not), *offset, rest),
        [Token {
            kind: TokenKind::Op(BinaryOp::Subtract),
            offset,
        }, rest @ ..] => (Some(UnaryOp::Negate), *offset, rest),
        [Token {
            kind: TokenKind::Op(BinaryOp::Add),
            offset,
        }, rest @ ..] => (None, *offset, rest),
        _ => return parse_term(tokens, end, builder),
    };
    builder.enter(offset)?;
    let mut state = parse_unary(rest, end, builder)?;
    if let Some(op) = op {
        state.expr = builder.add(
            SubExpression::Unary {
                op,
                operand: state.expr,
            },
            offset,
        )?;
    }
    builder.leave();
    Ok(state)
}

/// `'n' | <number> | '(' <expression> ')'`
fn parse_term<'a>(
    tokens: &'a [Token],
    end: usize,
    builder: &mut ExpressionBuilder,
) -> Result<ParsingState<'a>, PluralParseError> {
    let (first, rest) = tokens
        .split_first()
        .ok_or_else(|| error("unexpected end of expression", end))?;
    let state = match first.kind {
        TokenKind::N => ParsingState {
            expr: builder.add(SubExpression::NVariable, first.offset)?,
            rest,
        },
        TokenKind::Number(value) => ParsingState {
            expr: builder.add(SubExpression::NumberLiteral(value), first.offset)?,
            rest,
        },
        TokenKind::LParen => {
            let mut s = parse_expression(rest, end, builder)?;
            s.rest = match s.rest {
                [Token {
                    kind: TokenKind::RParen,
                    ..
                }, rest @ ..] => rest,
                rest => return Err(error("expected ')'", offset_of(rest, end))),
            };
            s
        }
        _ => return Err(error("unexpected token", first.offset)),
    };
    Ok(state)
}
