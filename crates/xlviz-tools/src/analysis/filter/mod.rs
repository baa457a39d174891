//! Row filter expressions
//!
//! A small boolean language over column values:
//!
//! ```text
//! sales > 100 and region == "North"
//! not (`unit price` <= 2.5) | active == True
//! ```
//!
//! [`parse`] builds an [`Expr`], [`filter_rows`] evaluates it against a
//! dataset. [`translate_simple`] recognises the single-comparison subset
//! that can be pushed down to the columnar engine.

mod eval;
mod lexer;
mod parser;
mod translate;

pub use eval::{filter_rows, query_rows};
pub use lexer::{Token, tokenize};
pub use parser::{Expr, parse};
pub use translate::{Comparison, ComparisonValue, translate_simple};

use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Errors raised while parsing a filter expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },

    #[error("unterminated string starting at position {0}")]
    UnterminatedString(usize),

    #[error("unterminated column name starting at position {0}")]
    UnterminatedName(usize),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("empty expression")]
    Empty,

    #[error("expression nests deeper than {0} levels")]
    TooDeep(usize),

    #[error("expression has more than {0} tokens")]
    TooLong(usize),
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl CompareOp {
    /// Parse an operator symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Ne),
            ">" => Some(CompareOp::Gt),
            "<" => Some(CompareOp::Lt),
            ">=" => Some(CompareOp::Ge),
            "<=" => Some(CompareOp::Le),
            _ => None,
        }
    }

    /// Operator symbol
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
        }
    }

    /// Whether `ordering` satisfies the operator
    ///
    /// `None` means the operands could not be compared; only `!=` holds then.
    pub fn holds(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (CompareOp::Ne, None) => true,
            (_, None) => false,
            (CompareOp::Eq, Some(o)) => o == Ordering::Equal,
            (CompareOp::Ne, Some(o)) => o != Ordering::Equal,
            (CompareOp::Gt, Some(o)) => o == Ordering::Greater,
            (CompareOp::Lt, Some(o)) => o == Ordering::Less,
            (CompareOp::Ge, Some(o)) => o != Ordering::Less,
            (CompareOp::Le, Some(o)) => o != Ordering::Greater,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holds() {
        assert!(CompareOp::Ge.holds(Some(Ordering::Equal)));
        assert!(!CompareOp::Gt.holds(Some(Ordering::Equal)));
        assert!(CompareOp::Ne.holds(None));
        assert!(!CompareOp::Eq.holds(None));
        assert!(!CompareOp::Lt.holds(None));
    }

    #[test]
    fn test_symbol_round_trip() {
        for op in [CompareOp::Eq, CompareOp::Ne, CompareOp::Gt, CompareOp::Lt, CompareOp::Ge, CompareOp::Le] {
            assert_eq!(CompareOp::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(CompareOp::from_symbol("="), None);
    }
}
