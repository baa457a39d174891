//! Recursive-descent parser for filter expressions
//!
//! Precedence, loosest first: `or`, `and`, `not`, comparison. Chained
//! comparisons such as `1 < x <= 5` expand to a conjunction.

use super::lexer::{Token, tokenize};
use super::{CompareOp, FilterError};
use crate::workbook::CellValue;

/// Deepest allowed nesting of parentheses and `not`
pub const MAX_DEPTH: usize = 256;
/// Longest accepted expression; bounds the depth of `and`/`or` chains
pub const MAX_TOKENS: usize = 2048;

/// Parsed filter expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(String),
    Literal(CellValue),
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    /// Column names referenced anywhere in the expression, in order
    pub fn columns(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_columns(&mut names);
        names
    }

    fn collect_columns<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expr::Column(name) => {
                if !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            }
            Expr::Literal(_) => {}
            Expr::Compare { left, right, .. } | Expr::And(left, right) | Expr::Or(left, right) => {
                left.collect_columns(names);
                right.collect_columns(names);
            }
            Expr::Not(inner) => inner.collect_columns(names),
        }
    }
}

/// Parse an expression
pub fn parse(input: &str) -> Result<Expr, FilterError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(FilterError::Empty);
    }
    if tokens.len() > MAX_TOKENS {
        return Err(FilterError::TooLong(MAX_TOKENS));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_or()?;
    match parser.peek() {
        Some(token) => Err(FilterError::UnexpectedToken(token.to_string())),
        None => Ok(expr),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T, FilterError>) -> Result<T, FilterError> {
        if self.depth >= MAX_DEPTH {
            return Err(FilterError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_or(&mut self) -> Result<Expr, FilterError> {
        let mut left = self.parse_and()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, FilterError> {
        let mut left = self.parse_not()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let right = self.parse_not()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, FilterError> {
        if self.peek() == Some(&Token::Not) {
            self.pos += 1;
            let inner = self.nested(Self::parse_not)?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, FilterError> {
        let first = self.parse_operand()?;
        let mut comparisons: Vec<Expr> = Vec::new();
        let mut left = first.clone();

        while let Some(Token::Op(op)) = self.peek().cloned() {
            self.pos += 1;
            let right = self.parse_operand()?;
            comparisons.push(Expr::Compare {
                op,
                left: Box::new(left),
                right: Box::new(right.clone()),
            });
            left = right;
        }

        Ok(comparisons
            .into_iter()
            .reduce(|acc, next| Expr::And(Box::new(acc), Box::new(next)))
            .unwrap_or(first))
    }

    fn parse_operand(&mut self) -> Result<Expr, FilterError> {
        match self.next() {
            Some(Token::Name(name)) => Ok(Expr::Column(name)),
            Some(Token::Number(n)) => Ok(Expr::Literal(CellValue::Number(n))),
            Some(Token::Str(s)) => Ok(Expr::Literal(CellValue::Text(s))),
            Some(Token::Bool(b)) => Ok(Expr::Literal(CellValue::Bool(b))),
            Some(Token::Minus) => match self.next() {
                Some(Token::Number(n)) => Ok(Expr::Literal(CellValue::Number(-n))),
                Some(other) => Err(FilterError::UnexpectedToken(other.to_string())),
                None => Err(FilterError::UnexpectedEnd),
            },
            Some(Token::LParen) => {
                let inner = self.nested(Self::parse_or)?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    Some(other) => Err(FilterError::UnexpectedToken(other.to_string())),
                    None => Err(FilterError::UnexpectedEnd),
                }
            }
            Some(other) => Err(FilterError::UnexpectedToken(other.to_string())),
            None => Err(FilterError::UnexpectedEnd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str) -> Box<Expr> {
        Box::new(Expr::Column(name.to_string()))
    }

    fn num(n: f64) -> Box<Expr> {
        Box::new(Expr::Literal(CellValue::Number(n)))
    }

    #[test]
    fn test_parse_simple_comparison() {
        assert_eq!(
            parse("sales > 15").unwrap(),
            Expr::Compare {
                op: CompareOp::Gt,
                left: col("sales"),
                right: num(15.0)
            }
        );
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let expr = parse("a == 1 or b == 2 and c == 3").unwrap();
        match expr {
            Expr::Or(_, right) => assert!(matches!(*right, Expr::And(_, _))),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_chained_comparison_expands() {
        let expr = parse("1 < x <= 5").unwrap();
        assert_eq!(
            expr,
            Expr::And(
                Box::new(Expr::Compare {
                    op: CompareOp::Lt,
                    left: num(1.0),
                    right: col("x")
                }),
                Box::new(Expr::Compare {
                    op: CompareOp::Le,
                    left: col("x"),
                    right: num(5.0)
                })
            )
        );
    }

    #[test]
    fn test_negative_literal_and_parens() {
        let expr = parse("not (delta < -2)").unwrap();
        assert_eq!(
            expr,
            Expr::Not(Box::new(Expr::Compare {
                op: CompareOp::Lt,
                left: col("delta"),
                right: num(-2.0)
            }))
        );
    }

    #[test]
    fn test_columns_listed_once() {
        let expr = parse("a > 1 and (b < 2 or a < 0)").unwrap();
        assert_eq!(expr.columns(), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse(""), Err(FilterError::Empty));
        assert_eq!(parse("a >"), Err(FilterError::UnexpectedEnd));
        assert_eq!(parse("(a > 1"), Err(FilterError::UnexpectedEnd));
        assert_eq!(parse("a > 1 )"), Err(FilterError::UnexpectedToken(")".into())));
        assert_eq!(parse("and a"), Err(FilterError::UnexpectedToken("and".into())));
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |levels: usize| format!("{}sales > 1{}", "(".repeat(levels), ")".repeat(levels));
        assert!(parse(&nested(MAX_DEPTH)).is_ok());
        assert_eq!(parse(&nested(MAX_DEPTH + 1)), Err(FilterError::TooDeep(MAX_DEPTH)));
        assert_eq!(parse(&"not ".repeat(MAX_DEPTH + 1)), Err(FilterError::TooDeep(MAX_DEPTH)));
    }

    #[test]
    fn test_token_limit() {
        let chain = vec!["a > 1"; MAX_TOKENS].join(" and ");
        assert_eq!(parse(&chain), Err(FilterError::TooLong(MAX_TOKENS)));
        let huge = format!("{}a > 1{}", "(".repeat(20_000), ")".repeat(20_000));
        assert_eq!(parse(&huge), Err(FilterError::TooLong(MAX_TOKENS)));
    }
}
