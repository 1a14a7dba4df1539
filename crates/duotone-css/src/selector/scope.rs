//! Theme scope classification of single selectors.

use cssparser::{ParseError as CssParseError, Parser, ParserInput, Token};

/// How a single selector relates to the theme root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// `:root` or `:where(:root)`.
    Root,
    /// Bare `[data-theme]` or `:where([data-theme])`.
    ThemeAttribute,
    /// Anything else.
    Other,
}

impl ScopeKind {
    /// Whether the selector is a simple theme scope (the whole document,
    /// regardless of nesting).
    pub fn is_simple(self) -> bool {
        !matches!(self, ScopeKind::Other)
    }
}

/// Classify a single selector (already split out of its list).
///
/// A selector is a simple theme scope iff it is exactly one component that is
/// `:root`, a bare attribute selector on `attribute` (no operator, no value),
/// or `:where(X)` wrapping exactly one such selector.
pub fn classify(selector: &str, attribute: &str) -> ScopeKind {
    let mut input = ParserInput::new(selector);
    let mut parser = Parser::new(&mut input);

    parser
        .parse_entirely(|p| classify_component(p, attribute, true))
        .unwrap_or(ScopeKind::Other)
}

fn classify_component<'i>(
    parser: &mut Parser<'i, '_>,
    attribute: &str,
    allow_where: bool,
) -> Result<ScopeKind, CssParseError<'i, ()>> {
    match parser.next()?.clone() {
        Token::Colon => match parser.next_including_whitespace()?.clone() {
            Token::Ident(name) if name.eq_ignore_ascii_case("root") => Ok(ScopeKind::Root),
            Token::Function(name) if allow_where && name.eq_ignore_ascii_case("where") => parser
                .parse_nested_block(|p| {
                    p.parse_entirely(|p| classify_component(p, attribute, false))
                }),
            _ => Ok(ScopeKind::Other),
        },
        Token::SquareBracketBlock => parser.parse_nested_block(|p| {
            let name = p.expect_ident()?.clone();
            p.expect_exhausted()?;
            Ok(if name.eq_ignore_ascii_case(attribute) {
                ScopeKind::ThemeAttribute
            } else {
                ScopeKind::Other
            })
        }),
        _ => Ok(ScopeKind::Other),
    }
}
