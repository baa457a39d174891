//! Single-comparison filters for the columnar engine
//!
//! Only `column operator value` with exactly three whitespace-separated
//! tokens is recognised. Anything else returns `None` and the caller falls
//! back to the full evaluator.

use super::CompareOp;

/// Literal side of a pushed-down comparison
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonValue {
    Number(f64),
    Text(String),
}

/// `column operator value`
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub column: String,
    pub op: CompareOp,
    pub value: ComparisonValue,
}

/// Recognise a three-token comparison
pub fn translate_simple(query: &str) -> Option<Comparison> {
    let tokens: Vec<&str> = query.split_whitespace().collect();
    let [column, op, value] = tokens.as_slice() else {
        return None;
    };
    let op = CompareOp::from_symbol(op)?;
    let column = column.trim_matches('`');
    if column.is_empty() {
        return None;
    }

    let value = match unquote(value) {
        Some(text) => ComparisonValue::Text(text.to_string()),
        None => match value.parse::<f64>() {
            Ok(n) => ComparisonValue::Number(n),
            Err(_) => ComparisonValue::Text(value.to_string()),
        },
    };

    Some(Comparison {
        column: column.to_string(),
        op,
        value,
    })
}

fn unquote(token: &str) -> Option<&str> {
    ['"', '\'']
        .iter()
        .find_map(|&q| token.strip_prefix(q).and_then(|t| t.strip_suffix(q)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_comparison() {
        assert_eq!(
            translate_simple("sales > 15"),
            Some(Comparison {
                column: "sales".into(),
                op: CompareOp::Gt,
                value: ComparisonValue::Number(15.0),
            })
        );
    }

    #[test]
    fn test_quoted_and_bare_text() {
        assert_eq!(
            translate_simple("region == 'North'").map(|c| c.value),
            Some(ComparisonValue::Text("North".into()))
        );
        assert_eq!(
            translate_simple("region != South").map(|c| c.value),
            Some(ComparisonValue::Text("South".into()))
        );
    }

    #[test]
    fn test_other_shapes_are_rejected() {
        assert_eq!(translate_simple("sales>15"), None);
        assert_eq!(translate_simple("sales > 15 and region == 'A'"), None);
        assert_eq!(translate_simple("sales = 15"), None);
        assert_eq!(translate_simple("region == 'North America'"), None);
    }
}
