//! Infix arithmetic formulas.
//!
//! A [`Formula`] is parsed once from source text, validated against the
//! expression grammar, and is immutable afterwards. Variables are stored in
//! normalized form, so equality, hashing, [`Formula::variables`] and the
//! canonical `Display` output all see the normalized names.
//!
//! Grammar rules checked at construction:
//!
//! - at least one token, and every lexeme belongs to a token category
//! - first token is a number, variable or `(`; last is a number, variable or `)`
//! - after `(` or an operator comes a number, variable or `(`
//! - after a number, variable or `)` comes an operator or `)`
//! - `)` never outnumbers `(` in any prefix, and the totals match
//! - every normalized variable is still a legal name and passes the validator

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::cell_name::{NameRules, is_valid_name};
use super::token::{Lexeme, Token, lex};

/// Raised when formula text cannot be turned into a [`Formula`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid formula: {reason}")]
pub struct FormulaFormatError {
    pub reason: String,
}

impl FormulaFormatError {
    pub fn new(reason: impl Into<String>) -> FormulaFormatError {
        FormulaFormatError {
            reason: reason.into(),
        }
    }
}

/// A validated, immutable infix expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Formula {
    tokens: Vec<Token>,
}

impl Formula {
    /// Parse with the identity normalizer and an accept-all validator.
    pub fn new(source: &str) -> Result<Formula, FormulaFormatError> {
        Formula::with_rules(source, &NameRules::default())
    }

    /// Parse, normalizing every variable with `rules` and requiring the
    /// normalized form to pass `rules`' validator.
    pub fn with_rules(source: &str, rules: &NameRules) -> Result<Formula, FormulaFormatError> {
        let tokens = normalize_tokens(lex(source), rules)?;
        check_grammar(&tokens)?;
        Ok(Formula { tokens })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The distinct normalized variables, in order of first occurrence.
    ///
    /// The iterator is lazy; call again to restart.
    pub fn variables(&self) -> impl Iterator<Item = &str> + '_ {
        let mut seen = HashSet::new();
        self.tokens
            .iter()
            .filter_map(|token| match token {
                Token::Variable(name) => Some(name.as_str()),
                _ => None,
            })
            .filter(move |name| seen.insert(*name))
    }
}

fn normalize_tokens(
    lexemes: Vec<Lexeme<'_>>,
    rules: &NameRules,
) -> Result<Vec<Token>, FormulaFormatError> {
    let mut tokens = Vec::with_capacity(lexemes.len());
    for (idx, lexeme) in lexemes.into_iter().enumerate() {
        let token = match lexeme {
            Lexeme::LParen => Token::LParen,
            Lexeme::RParen => Token::RParen,
            Lexeme::Op(op) => Token::Op(op),
            Lexeme::Number(text) => {
                let value: f64 = text.parse().map_err(|_| {
                    FormulaFormatError::new(format!("token {}: bad number '{}'", idx, text))
                })?;
                if !value.is_finite() {
                    return Err(FormulaFormatError::new(format!(
                        "token {}: number '{}' is out of range",
                        idx, text
                    )));
                }
                Token::Number(value)
            }
            Lexeme::Variable(raw) => {
                let name = rules.normalize(raw);
                if !is_valid_name(&name) {
                    return Err(FormulaFormatError::new(format!(
                        "token {}: variable '{}' normalizes to illegal name '{}'",
                        idx, raw, name
                    )));
                }
                if !rules.validate(&name) {
                    return Err(FormulaFormatError::new(format!(
                        "token {}: variable '{}' is not allowed",
                        idx, name
                    )));
                }
                Token::Variable(name)
            }
            Lexeme::Invalid(text) => {
                return Err(FormulaFormatError::new(format!(
                    "token {}: unrecognized text '{}'",
                    idx, text
                )));
            }
        };
        tokens.push(token);
    }
    Ok(tokens)
}

fn check_grammar(tokens: &[Token]) -> Result<(), FormulaFormatError> {
    let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
        return Err(FormulaFormatError::new("formula is empty"));
    };
    if !first.starts_operand() {
        return Err(FormulaFormatError::new(format!(
            "formula must start with a number, variable or '(', found '{}'",
            first
        )));
    }
    if !last.ends_operand() {
        return Err(FormulaFormatError::new(format!(
            "formula must end with a number, variable or ')', found '{}'",
            last
        )));
    }

    for (idx, pair) in tokens.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        if prev.ends_operand() {
            if !matches!(next, Token::Op(_) | Token::RParen) {
                return Err(FormulaFormatError::new(format!(
                    "token {}: '{}' must be followed by an operator or ')', found '{}'",
                    idx, prev, next
                )));
            }
        } else if !next.starts_operand() {
            return Err(FormulaFormatError::new(format!(
                "token {}: '{}' must be followed by a number, variable or '(', found '{}'",
                idx, prev, next
            )));
        }
    }

    let mut open = 0usize;
    let mut close = 0usize;
    for (idx, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen => open += 1,
            Token::RParen => {
                close += 1;
                if close > open {
                    return Err(FormulaFormatError::new(format!(
                        "token {}: unmatched ')'",
                        idx
                    )));
                }
            }
            _ => {}
        }
    }
    if open != close {
        return Err(FormulaFormatError::new(format!(
            "{} '(' but {} ')'",
            open, close
        )));
    }

    Ok(())
}

/// Canonical form: normalized tokens with no separating whitespace.
impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

impl FromStr for Formula {
    type Err = FormulaFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::new(s)
    }
}

impl Serialize for Formula {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Formula {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Formula::new(&source).map_err(serde::de::Error::custom)
    }
}
