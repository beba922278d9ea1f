//! Formula tokenizer.
//!
//! Splits an infix expression into lexemes, left to right, taking the longest
//! match among: `(`, `)`, one of `+ - * /`, a variable
//! (`[A-Za-z_][A-Za-z0-9_]*`), a non-negative decimal literal with optional
//! exponent, or whitespace (dropped). Unary signs are not part of numeric
//! syntax: `-3` lexes as `-` followed by `3`.

use regex::Regex;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// A binary arithmetic operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    /// `*` and `/` bind tighter than `+` and `-`.
    pub fn is_multiplicative(self) -> bool {
        matches!(self, Operator::Mul | Operator::Div)
    }
}

/// A validated formula token. Variables are stored already normalized.
#[derive(Clone, Debug)]
pub enum Token {
    Number(f64),
    Variable(String),
    Op(Operator),
    LParen,
    RParen,
}

impl Token {
    /// Numbers, variables and `(` may start an operand.
    pub(crate) fn starts_operand(&self) -> bool {
        matches!(self, Token::Number(_) | Token::Variable(_) | Token::LParen)
    }

    /// Numbers, variables and `)` may end an operand.
    pub(crate) fn ends_operand(&self) -> bool {
        matches!(self, Token::Number(_) | Token::Variable(_) | Token::RParen)
    }
}

// Numeric tokens compare by parsed value: "2.0" and "2.000" are the same token.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Token::Number(a), Token::Number(b)) => a == b,
            (Token::Variable(a), Token::Variable(b)) => a == b,
            (Token::Op(a), Token::Op(b)) => a == b,
            (Token::LParen, Token::LParen) | (Token::RParen, Token::RParen) => true,
            _ => false,
        }
    }
}

// Literals are finite and unsigned, so bitwise hashing agrees with `==`.
impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Token::Number(n) => n.to_bits().hash(state),
            Token::Variable(v) => v.hash(state),
            Token::Op(op) => op.hash(state),
            Token::LParen | Token::RParen => {}
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Variable(v) => f.write_str(v),
            Token::Op(op) => write!(f, "{}", op.symbol()),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

/// A raw lexeme, before normalization and grammar checks.
#[derive(Clone, Debug, PartialEq)]
pub enum Lexeme<'a> {
    LParen,
    RParen,
    Op(Operator),
    Variable(&'a str),
    Number(&'a str),
    /// Text that matches no token category.
    Invalid(&'a str),
}

fn token_re() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        Regex::new(
            r"(?x)
              (?P<lp>\()
            | (?P<rp>\))
            | (?P<op>[-+*/])
            | (?P<var>[A-Za-z_][A-Za-z0-9_]*)
            | (?P<num>(?:[0-9]+\.[0-9]*|\.[0-9]+|[0-9]+)(?:[eE][-+]?[0-9]+)?)
            | (?P<ws>\s+)
            ",
        )
        .expect("formula token regex must compile")
    })
}

/// Split `source` into lexemes. Whitespace is dropped; any run of text that
/// no category matches becomes a single [`Lexeme::Invalid`].
pub fn lex(source: &str) -> Vec<Lexeme<'_>> {
    let re = token_re();
    let mut out = Vec::new();
    let mut pos = 0;

    while pos < source.len() {
        let Some(caps) = re.captures_at(source, pos) else {
            out.push(Lexeme::Invalid(&source[pos..]));
            break;
        };
        let whole = caps.get(0).map_or(pos..pos, |m| m.range());
        if whole.start > pos {
            out.push(Lexeme::Invalid(&source[pos..whole.start]));
        }
        pos = whole.end;

        if caps.name("ws").is_some() {
            continue;
        }
        let lexeme = if caps.name("lp").is_some() {
            Lexeme::LParen
        } else if caps.name("rp").is_some() {
            Lexeme::RParen
        } else if let Some(m) = caps.name("op") {
            Lexeme::Op(match m.as_str() {
                "+" => Operator::Add,
                "-" => Operator::Sub,
                "*" => Operator::Mul,
                _ => Operator::Div,
            })
        } else if let Some(m) = caps.name("var") {
            Lexeme::Variable(m.as_str())
        } else if let Some(m) = caps.name("num") {
            Lexeme::Number(m.as_str())
        } else {
            continue;
        };
        out.push(lexeme);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_operators_and_parens() {
        assert_eq!(
            lex("(a+b)*c/d-e"),
            vec![
                Lexeme::LParen,
                Lexeme::Variable("a"),
                Lexeme::Op(Operator::Add),
                Lexeme::Variable("b"),
                Lexeme::RParen,
                Lexeme::Op(Operator::Mul),
                Lexeme::Variable("c"),
                Lexeme::Op(Operator::Div),
                Lexeme::Variable("d"),
                Lexeme::Op(Operator::Sub),
                Lexeme::Variable("e"),
            ]
        );
    }

    #[test]
    fn test_lex_whitespace_delimits() {
        assert_eq!(lex("xy"), vec![Lexeme::Variable("xy")]);
        assert_eq!(lex("x y"), vec![Lexeme::Variable("x"), Lexeme::Variable("y")]);
        assert_eq!(lex("x23"), vec![Lexeme::Variable("x23")]);
        assert_eq!(lex("x 23"), vec![Lexeme::Variable("x"), Lexeme::Number("23")]);
        assert!(lex("   \t\n").is_empty());
    }

    #[test]
    fn test_lex_numeric_literals() {
        assert_eq!(lex("2.0"), vec![Lexeme::Number("2.0")]);
        assert_eq!(lex(".5"), vec![Lexeme::Number(".5")]);
        assert_eq!(lex("3."), vec![Lexeme::Number("3.")]);
        assert_eq!(lex("1e10"), vec![Lexeme::Number("1e10")]);
        assert_eq!(lex("2.5E-3"), vec![Lexeme::Number("2.5E-3")]);
        assert_eq!(
            lex("-3"),
            vec![Lexeme::Op(Operator::Sub), Lexeme::Number("3")]
        );
    }

    #[test]
    fn test_lex_invalid_runs() {
        assert_eq!(
            lex("3 + $ + C2"),
            vec![
                Lexeme::Number("3"),
                Lexeme::Op(Operator::Add),
                Lexeme::Invalid("$"),
                Lexeme::Op(Operator::Add),
                Lexeme::Variable("C2"),
            ]
        );
        assert_eq!(lex("4#"), vec![Lexeme::Number("4"), Lexeme::Invalid("#")]);
    }

    #[test]
    fn test_number_tokens_compare_by_value() {
        assert_eq!(Token::Number(2.0), Token::Number(2.000));
        assert_ne!(Token::Number(2.0), Token::Number(2.1));
        assert_ne!(Token::Number(1.0), Token::Variable("1".to_string()));
    }
}
