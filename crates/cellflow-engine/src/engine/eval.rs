//! Formula evaluation.
//!
//! Runs the classic two-stack (values, pending operators) algorithm over a
//! formula's validated token sequence. Failures inside the formula (an
//! unknown variable, division by exactly zero) come back as a
//! [`FormulaError`] value; evaluation itself never panics or raises.

use thiserror::Error;

use super::formula::Formula;
use super::token::{Operator, Token};

/// A value-level failure produced while evaluating a formula.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct FormulaError {
    pub reason: String,
}

impl FormulaError {
    pub fn new(reason: impl Into<String>) -> FormulaError {
        FormulaError {
            reason: reason.into(),
        }
    }
}

pub type EvalResult = Result<f64, FormulaError>;

#[derive(Clone, Copy, Debug)]
enum Pending {
    Op(Operator),
    LParen,
}

impl Formula {
    /// Evaluate against `lookup`, which maps a normalized variable to its value
    /// or returns `None` when the variable has no numeric value.
    pub fn evaluate<F>(&self, lookup: F) -> EvalResult
    where
        F: Fn(&str) -> Option<f64>,
    {
        let mut values: Vec<f64> = Vec::new();
        let mut ops: Vec<Pending> = Vec::new();

        for token in self.tokens() {
            match token {
                Token::Number(n) => push_operand(&mut values, &mut ops, *n)?,
                Token::Variable(name) => {
                    let value = lookup(name).ok_or_else(|| {
                        FormulaError::new(format!("variable '{}' is undefined", name))
                    })?;
                    push_operand(&mut values, &mut ops, value)?;
                }
                Token::Op(op) if op.is_multiplicative() => ops.push(Pending::Op(*op)),
                Token::Op(op) => {
                    reduce_if(&mut values, &mut ops, |o| !o.is_multiplicative())?;
                    ops.push(Pending::Op(*op));
                }
                Token::LParen => ops.push(Pending::LParen),
                Token::RParen => {
                    reduce_if(&mut values, &mut ops, |o| !o.is_multiplicative())?;
                    match ops.pop() {
                        Some(Pending::LParen) => {}
                        _ => return Err(malformed()),
                    }
                    reduce_if(&mut values, &mut ops, Operator::is_multiplicative)?;
                }
            }
        }

        if let Some(Pending::Op(op)) = ops.pop() {
            let right = pop_value(&mut values)?;
            let left = pop_value(&mut values)?;
            values.push(apply(op, left, right)?);
        }
        match (values.pop(), values.is_empty(), ops.is_empty()) {
            (Some(result), true, true) => Ok(result),
            _ => Err(malformed()),
        }
    }
}

/// Push an operand, first folding it into a pending `*` or `/`.
fn push_operand(values: &mut Vec<f64>, ops: &mut Vec<Pending>, value: f64) -> Result<(), FormulaError> {
    match ops.last() {
        Some(Pending::Op(op)) if op.is_multiplicative() => {
            let op = *op;
            ops.pop();
            let left = pop_value(values)?;
            values.push(apply(op, left, value)?);
        }
        _ => values.push(value),
    }
    Ok(())
}

/// If the top pending entry is an operator matching `wanted`, apply it to the
/// top two values.
fn reduce_if(
    values: &mut Vec<f64>,
    ops: &mut Vec<Pending>,
    wanted: impl Fn(Operator) -> bool,
) -> Result<(), FormulaError> {
    if let Some(Pending::Op(op)) = ops.last().copied() {
        if wanted(op) {
            ops.pop();
            let right = pop_value(values)?;
            let left = pop_value(values)?;
            values.push(apply(op, left, right)?);
        }
    }
    Ok(())
}

fn apply(op: Operator, left: f64, right: f64) -> EvalResult {
    match op {
        Operator::Add => Ok(left + right),
        Operator::Sub => Ok(left - right),
        Operator::Mul => Ok(left * right),
        Operator::Div if right == 0.0 => Err(FormulaError::new("division by zero")),
        Operator::Div => Ok(left / right),
    }
}

fn pop_value(values: &mut Vec<f64>) -> EvalResult {
    values.pop().ok_or_else(malformed)
}

// Unreachable for validated formulas.
fn malformed() -> FormulaError {
    FormulaError::new("malformed expression")
}
