use super::{Error, Operand};
use crate::error;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Greater,
    Less,
    Equal,
}

impl Comparison {
    pub fn parse(s: &str) -> Result<Comparison> {
        match s {
            ">" => Ok(Comparison::Greater),
            "<" => Ok(Comparison::Less),
            "=" | "==" => Ok(Comparison::Equal),
            _ => Err(error!(InvalidConditionOperator)),
        }
    }

    pub fn holds(self, a: i32, b: i32) -> bool {
        match self {
            Comparison::Greater => a > b,
            Comparison::Less => a < b,
            Comparison::Equal => a == b,
        }
    }
}

/// ## Parsed `-if (A OP B) ? DESTT : DESTF`
///
/// Parsing is complete before anything is evaluated, so a malformed
/// condition never runs either branch.

#[derive(Debug, Clone, PartialEq)]
pub struct Condition<'a> {
    pub left: Operand,
    pub comparison: Comparison,
    pub right: Operand,
    pub if_true: Option<&'a str>,
    pub if_false: Option<&'a str>,
}

impl<'a> Condition<'a> {
    /// `s` is everything after the `-if` keyword.
    pub fn parse(s: &'a str) -> Result<Condition<'a>> {
        let (test, destinations) = match s.split_once('?') {
            Some(parts) => parts,
            None => return Err(error!(InvalidConditionSyntax; "missing '?'")),
        };
        let mut test = test.trim();
        if let Some(inner) = test.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
            test = inner.trim();
        }
        let mut fields = test.split_whitespace();
        let (a, op, b) = match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(a), Some(op), Some(b), None) => (a, op, b),
            _ => return Err(error!(InvalidConditionSyntax; "expected (A OP B)")),
        };
        let comparison = Comparison::parse(op)?;
        let left = value_operand(a)?;
        let right = value_operand(b)?;
        let (if_true, if_false) = match destinations.split_once(':') {
            Some(parts) => parts,
            None => return Err(error!(MissingConditionDestination)),
        };
        Ok(Condition {
            left,
            comparison,
            right,
            if_true: non_empty(if_true),
            if_false: non_empty(if_false),
        })
    }

    /// The branch selected by the outcome, if that branch has a command.
    pub fn branch(&self, outcome: bool) -> Option<&'a str> {
        if outcome {
            self.if_true
        } else {
            self.if_false
        }
    }
}

fn value_operand(token: &str) -> Result<Operand> {
    match Operand::parse(token)? {
        Operand::Memory(_) => Err(error!(InvalidOperand; "registers or immediates only")),
        operand => Ok(operand),
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
