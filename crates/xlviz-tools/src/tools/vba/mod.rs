//! VBA module generators
//!
//! Both tools return installation instructions followed by a VBA module
//! with the arguments filled in. Nothing is read or written.

mod dynamic_chart;
mod export_chart;

pub use dynamic_chart::GenerateDynamicChartVbaTool;
pub use export_chart::GenerateChartExportVbaTool;

/// Escape a value for use inside a VBA string literal
pub fn escape_vba(value: &str) -> String {
    value.replace('"', "\"\"")
}

/// Replace `{{name}}` placeholders in one pass
///
/// Values are escaped with [`escape_vba`]; unknown placeholders are left as
/// they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(&escape_vba(value)),
            None => {
                out.push_str("{{");
                out.push_str(key);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Instructions, a blank line, then the module
fn compose(instructions: &str, module: String) -> String {
    format!("{}\n\n{}", instructions.trim_end(), module)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_vba() {
        assert_eq!(escape_vba(r#"Say "hi""#), r#"Say ""hi"""#);
        assert_eq!(escape_vba("plain"), "plain");
    }

    #[test]
    fn test_fill_template() {
        let filled = fill_template(
            "a = \"{{x}}\"\nb = \"{{y}}\" {{unknown}}",
            &[("x", "{{y}}"), ("y", "q\"q")],
        );
        assert_eq!(filled, "a = \"{{y}}\"\nb = \"q\"\"q\" {{unknown}}");
    }

    #[test]
    fn test_unterminated_placeholder_is_kept() {
        assert_eq!(fill_template("x {{open", &[("open", "v")]), "x {{open");
    }
}
