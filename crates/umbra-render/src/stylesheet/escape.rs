//! Quoting of untrusted text embedded in generated CSS.

/// Quotes `value` as a CSS string literal.
///
/// Quotes, backslashes and control characters are escaped, so the result
/// always reads back as exactly one string token. Registered as the
/// `css_string` template filter.
///
/// # Example
///
/// ```rust
/// use umbra_render::stylesheet::css_string;
///
/// assert_eq!(css_string("color: #fff"), r#""color: #fff""#);
/// assert_eq!(css_string(r#"a"b"#), r#""a\"b""#);
/// ```
pub fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    // Writes the surrounding quotes too. Writing into a String never fails.
    let _ = cssparser::serialize_string(value, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cssparser::{Parser, ParserInput, Token};
    use proptest::prelude::*;

    fn read_back(quoted: &str) -> Option<String> {
        let mut input = ParserInput::new(quoted);
        let mut parser = Parser::new(&mut input);
        let value = match parser.next() {
            Ok(Token::QuotedString(s)) => s.to_string(),
            _ => return None,
        };
        parser.is_exhausted().then_some(value)
    }

    #[test]
    fn test_plain_value() {
        assert_eq!(css_string("#ffffff"), "\"#ffffff\"");
    }

    #[test]
    fn test_escapes_quote_and_backslash() {
        assert_eq!(css_string("\"\\"), r#""\"\\""#);
    }

    #[test]
    fn test_escapes_newline() {
        let quoted = css_string("a\nb");
        assert!(!quoted.contains('\n'));
        assert_eq!(read_back(&quoted).as_deref(), Some("a\nb"));
    }

    #[test]
    fn test_breakout_attempt_stays_inside_string() {
        let hostile = "#fff\"] { color: red } x[y=\"";
        assert_eq!(read_back(&css_string(hostile)).as_deref(), Some(hostile));
    }

    #[test]
    fn test_output_is_a_single_quoted_token() {
        let quoted = css_string("color: #fff");
        assert!(quoted.starts_with('"') && !quoted.starts_with("\"\""));
        assert!(quoted.ends_with('"') && !quoted.ends_with("\"\""));
    }

    proptest! {
        #[test]
        fn quoted_text_reads_back_as_one_string(value in "[^\\x00]{0,40}") {
            prop_assert_eq!(read_back(&css_string(&value)), Some(value));
        }
    }
}
