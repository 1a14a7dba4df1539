//! Resolution of nested selectors against their parent rule.

use cssparser::{ParseError as CssParseError, Parser, ParserInput, Token};

use super::rewrite::OrderedSet;
use super::SelectorList;
use crate::Result;

/// Resolve a nested rule's selector list against its parent's selector list.
///
/// Every nested selector is combined with every parent selector. `&` is
/// replaced by the parent; a nested selector without `&` is relative to the
/// parent (`.x` means `& .x`, `> .x` means `& > .x`). The parent is inserted
/// as-is when that keeps its meaning (a compound parent, or a single leading
/// `&`), otherwise it is wrapped in `:is(...)`.
pub fn resolve_nested_selector(parent: &str, nested: &str) -> Result<String> {
    let parents = SelectorList::parse(parent)?;
    let nested = SelectorList::parse(nested)?;

    let mut resolved = OrderedSet::new();
    for parent in parents.iter() {
        let compound = is_compound(parent);
        for selector in nested.iter() {
            let info = nesting_info(selector);
            let selector = nest_explicitly(selector);

            let direct = compound || info.count == 0 || (info.count == 1 && info.leading);
            let replacement = if direct {
                parent.clone()
            } else {
                format!(":is({parent})")
            };
            resolved.insert(replace_nesting(&selector, &replacement));
        }
    }

    Ok(resolved.join(", "))
}

/// Make a nested selector's relation to its parent explicit: `.x` becomes
/// `& .x` and `> .x` becomes `& > .x`. Selectors already using `&` are
/// returned unchanged.
pub fn nest_explicitly(selector: &str) -> String {
    if nesting_info(selector).count == 0 {
        format!("& {selector}")
    } else {
        selector.to_string()
    }
}

/// Whether a single selector is one compound selector (no combinators).
pub fn is_compound(selector: &str) -> bool {
    let mut input = ParserInput::new(selector.trim());
    let mut parser = Parser::new(&mut input);

    while let Ok(token) = parser.next_including_whitespace() {
        if matches!(
            token,
            Token::WhiteSpace(_) | Token::Delim('>') | Token::Delim('+') | Token::Delim('~')
        ) {
            return false;
        }
    }
    true
}

struct NestingInfo {
    count: usize,
    leading: bool,
}

fn nesting_info(selector: &str) -> NestingInfo {
    let mut input = ParserInput::new(selector);
    let mut parser = Parser::new(&mut input);
    let leading = matches!(parser.next(), Ok(Token::Delim('&')));

    let mut input = ParserInput::new(selector);
    let mut parser = Parser::new(&mut input);
    let mut count = 0;
    rebuild(&mut parser, None, &mut count);

    NestingInfo { count, leading }
}

/// Replace every `&` (at any depth) with `replacement`.
pub fn replace_nesting(selector: &str, replacement: &str) -> String {
    let mut input = ParserInput::new(selector);
    let mut parser = Parser::new(&mut input);
    let mut count = 0;
    rebuild(&mut parser, Some(replacement), &mut count)
}

/// Copy the remaining input verbatim, descending into blocks, counting `&`
/// tokens and substituting them when a replacement is given.
fn rebuild<'i>(parser: &mut Parser<'i, '_>, replacement: Option<&str>, count: &mut usize) -> String {
    let mut out = String::new();

    loop {
        let before = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::Delim('&') => {
                *count += 1;
                out.push_str(replacement.unwrap_or("&"));
            }
            Token::Function(_)
            | Token::ParenthesisBlock
            | Token::SquareBracketBlock
            | Token::CurlyBracketBlock => {
                out.push_str(parser.slice_from(before));
                let nested = parser.parse_nested_block(|p| {
                    let inner = rebuild(p, replacement, count);
                    Ok::<_, CssParseError<'i, ()>>((inner, p.position()))
                });
                if let Ok((inner, inner_end)) = nested {
                    out.push_str(&inner);
                    out.push_str(parser.slice_from(inner_end));
                }
            }
            _ => out.push_str(parser.slice_from(before)),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_selector_becomes_descendant() {
        assert_eq!(resolve_nested_selector(".card", ".title").unwrap(), ".card .title");
        assert_eq!(resolve_nested_selector(".card", "> p").unwrap(), ".card > p");
    }

    #[test]
    fn explicit_nesting() {
        assert_eq!(nest_explicitly(".title"), "& .title");
        assert_eq!(nest_explicitly("> p"), "& > p");
        assert_eq!(nest_explicitly("&:hover"), "&:hover");
        assert_eq!(nest_explicitly(":not(&) .x"), ":not(&) .x");
    }

    #[test]
    fn nesting_selector_is_substituted() {
        assert_eq!(resolve_nested_selector(".btn", "&:hover").unwrap(), ".btn:hover");
        assert_eq!(resolve_nested_selector(".btn", "&.primary, &.ghost").unwrap(), ".btn.primary, .btn.ghost");
        assert_eq!(resolve_nested_selector(".btn", ".group &").unwrap(), ".group .btn");
    }

    #[test]
    fn complex_parent_is_wrapped_when_needed() {
        assert_eq!(resolve_nested_selector(".a .b", "&:hover").unwrap(), ".a .b:hover");
        assert_eq!(resolve_nested_selector(".a .b", ".x &").unwrap(), ".x :is(.a .b)");
    }

    #[test]
    fn parent_list_is_distributed() {
        assert_eq!(resolve_nested_selector(".a, .b", "&:hover, i").unwrap(), ".a:hover, .a i, .b:hover, .b i");
    }

    #[test]
    fn nesting_inside_functional_pseudo_class() {
        assert_eq!(resolve_nested_selector(".btn", ":not(&)").unwrap(), ":not(.btn)");
        assert_eq!(replace_nesting("&:is(.x, &.y)", ".p"), ".p:is(.x, .p.y)");
    }

    #[test]
    fn compound_detection() {
        assert!(is_compound(".a.b:hover"));
        assert!(is_compound("a:not(.x .y)"));
        assert!(!is_compound(".a .b"));
        assert!(!is_compound(".a>.b"));
    }

    #[test]
    fn duplicates_are_removed() {
        assert_eq!(resolve_nested_selector(".a, .a", "&:hover").unwrap(), ".a:hover");
    }
}
