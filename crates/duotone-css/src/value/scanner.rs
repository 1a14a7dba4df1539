//! Detection of `light-dark()` calls in declaration values.

use cssparser::{Delimiter, ParseError as CssParseError, Parser, ParserInput, Token};

use super::{ThemeBranch, TokenStream};

/// Function name recognized as a theme pair (case-sensitive).
pub const LIGHT_DARK: &str = "light-dark";

/// Result of scanning one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueScan {
    /// Token stream covering the whole value.
    pub tokens: TokenStream,
    /// Number of malformed `light-dark()` calls kept as literal text.
    pub malformed: usize,
}

impl ValueScan {
    /// Whether at least one well-formed theme pair was found.
    pub fn is_themed(&self) -> bool {
        self.tokens.has_pairs()
    }
}

/// Scan a value for `light-dark()` calls.
///
/// Returns `None` when the value holds no well-formed call, in which case the
/// declaration should be left alone.
pub fn scan_value(value: &str) -> Option<TokenStream> {
    let scan = scan_value_detailed(value);
    scan.is_themed().then_some(scan.tokens)
}

/// Scan a value, also reporting malformed calls.
///
/// Every `light-dark(<light>, <dark>)` occurrence, at the top level or inside
/// another function, becomes a theme pair whose branches are the trimmed
/// argument texts. A call inside a branch is resolved to that branch, so
/// `light-dark(light-dark(a, b), c)` is `a` when light and `c` when dark.
/// Calls without exactly two non-empty arguments, or without a closing
/// parenthesis, are kept verbatim as literals.
pub fn scan_value_detailed(value: &str) -> ValueScan {
    let mut scan = ValueScan::default();

    if !value.contains("light-dark(") {
        scan.tokens.push_literal(value);
        return scan;
    }

    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    scan_block(&mut parser, &mut scan);
    scan
}

fn scan_block<'i>(parser: &mut Parser<'i, '_>, scan: &mut ValueScan) {
    loop {
        let before = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::Function(ref name) if &**name == LIGHT_DARK => {
                let pair = parser.parse_nested_block(|p| {
                    let pair = parse_pair(p)?;
                    Ok::<_, CssParseError<'i, ()>>((pair, p.position()))
                });
                // cssparser closes blocks left open at the end of input
                match pair {
                    Ok(((light, dark), inner_end)) if parser.slice_from(inner_end).ends_with(')') => {
                        let light = resolve_branch(&light, ThemeBranch::Light, scan);
                        let dark = resolve_branch(&dark, ThemeBranch::Dark, scan);
                        scan.tokens.push_pair(light, dark);
                    }
                    _ => {
                        let text = parser.slice_from(before);
                        tracing::warn!("Leaving malformed {} call unchanged: {}", LIGHT_DARK, text);
                        scan.malformed += 1;
                        scan.tokens.push_literal(text);
                    }
                }
            }
            Token::Function(_)
            | Token::ParenthesisBlock
            | Token::SquareBracketBlock
            | Token::CurlyBracketBlock => {
                scan.tokens.push_literal(parser.slice_from(before));
                let inner_end = parser.parse_nested_block(|p| {
                    scan_block(p, scan);
                    Ok::<_, CssParseError<'i, ()>>(p.position())
                });
                if let Ok(inner_end) = inner_end {
                    scan.tokens.push_literal(parser.slice_from(inner_end));
                }
            }
            _ => scan.tokens.push_literal(parser.slice_from(before)),
        }
    }
}

fn resolve_branch(text: &str, branch: ThemeBranch, scan: &mut ValueScan) -> String {
    let inner = scan_value_detailed(text);
    scan.malformed += inner.malformed;
    inner.tokens.resolve(branch)
}

/// Parse the inside of `light-dark(...)`: exactly two arguments.
fn parse_pair<'i>(parser: &mut Parser<'i, '_>) -> Result<(String, String), CssParseError<'i, ()>> {
    let light = parse_argument(parser)?;
    parser.expect_comma()?;
    let dark = parse_argument(parser)?;
    parser.expect_exhausted()?;
    Ok((light, dark))
}

fn parse_argument<'i>(parser: &mut Parser<'i, '_>) -> Result<String, CssParseError<'i, ()>> {
    let argument = parser.parse_until_before(Delimiter::Comma, |p| {
        let start = p.position();
        while p.next_including_whitespace_and_comments().is_ok() {}
        Ok::<_, CssParseError<'i, ()>>(p.slice_from(start).trim().to_string())
    })?;

    if argument.is_empty() {
        return Err(parser.new_custom_error(()));
    }
    Ok(argument)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueToken;

    fn both(value: &str) -> (String, String) {
        let tokens = scan_value(value).unwrap();
        (tokens.resolve(ThemeBranch::Light), tokens.resolve(ThemeBranch::Dark))
    }

    #[test]
    fn plain_values_are_not_themed() {
        assert!(scan_value("red").is_none());
        assert!(scan_value("var(--light-dark)").is_none());
        assert!(scan_value("LIGHT-DARK(red, blue)").is_none());
    }

    #[test]
    fn single_pair() {
        let tokens = scan_value("light-dark(#fff, #000)").unwrap();
        assert_eq!(
            tokens.tokens(),
            &[ValueToken::ThemePair {
                light: "#fff".into(),
                dark: "#000".into()
            }]
        );
    }

    #[test]
    fn shorthand_keeps_literals() {
        assert_eq!(
            both("url(foo.png) light-dark(#fff, #000) no-repeat"),
            ("url(foo.png) #fff no-repeat".into(), "url(foo.png) #000 no-repeat".into())
        );
    }

    #[test]
    fn nested_functions_in_branches() {
        assert_eq!(
            both("0 1px 2px light-dark(rgba(0, 0, 0, 0.5), rgb(255 255 255 / 10%))"),
            (
                "0 1px 2px rgba(0, 0, 0, 0.5)".into(),
                "0 1px 2px rgb(255 255 255 / 10%)".into()
            )
        );
    }

    #[test]
    fn multiple_pairs() {
        let tokens = scan_value("1px solid light-dark(red, blue), light-dark(#111,#eee)").unwrap();
        assert_eq!(tokens.pair_count(), 2);
        assert_eq!(tokens.resolve(ThemeBranch::Light), "1px solid red, #111");
        assert_eq!(tokens.resolve(ThemeBranch::Dark), "1px solid blue, #eee");
    }

    #[test]
    fn pair_nested_in_other_function() {
        assert_eq!(
            both("var(--accent, light-dark(navy, skyblue))"),
            ("var(--accent, navy)".into(), "var(--accent, skyblue)".into())
        );
        assert_eq!(
            both("calc((light-dark(1px, 2px)) * 2)"),
            ("calc((1px) * 2)".into(), "calc((2px) * 2)".into())
        );
    }

    #[test]
    fn malformed_calls_fail_soft() {
        let scan = scan_value_detailed("light-dark(red)");
        assert!(!scan.is_themed());
        assert_eq!(scan.malformed, 1);
        assert_eq!(scan.tokens.resolve(ThemeBranch::Light), "light-dark(red)");

        let scan = scan_value_detailed("light-dark(a, b, c) light-dark(red, blue)");
        assert!(scan.is_themed());
        assert_eq!(scan.malformed, 1);
        assert_eq!(scan.tokens.resolve(ThemeBranch::Dark), "light-dark(a, b, c) blue");

        assert_eq!(scan_value_detailed("light-dark(, blue)").malformed, 1);
    }

    #[test]
    fn unclosed_call_is_malformed() {
        let scan = scan_value_detailed("1px solid light-dark(red, blue");
        assert!(!scan.is_themed());
        assert_eq!(scan.malformed, 1);
        assert_eq!(scan.tokens.resolve(ThemeBranch::Dark), "1px solid light-dark(red, blue");

        let scan = scan_value_detailed("var(--a, light-dark(red, blue)");
        assert!(scan.is_themed());
        assert_eq!(scan.malformed, 0);
    }

    #[test]
    fn calls_inside_branches_are_resolved() {
        assert_eq!(
            both("light-dark(light-dark(red, pink), blue)"),
            ("red".into(), "blue".into())
        );
        assert_eq!(
            both("light-dark(white, var(--ink, light-dark(gray, black)))"),
            ("white".into(), "var(--ink, black)".into())
        );

        let scan = scan_value_detailed("light-dark(light-dark(red), blue)");
        assert!(scan.is_themed());
        assert_eq!(scan.malformed, 1);
        assert_eq!(scan.tokens.resolve(ThemeBranch::Light), "light-dark(red)");
    }
}
