//! CSS syntax parser using the `cssparser` crate.
//!
//! This module turns stylesheet text into a [`Node`] tree. Unlike a parser
//! that computes styles, it keeps selectors, at-rule preludes and declaration
//! values as raw source text so the printed output stays faithful to the
//! input. Comments and insignificant whitespace between items are dropped.

use std::fmt;

use cssparser::{
    BasicParseErrorKind, Delimiter, ParseError as CssParseError, ParseErrorKind, Parser,
    ParserInput, Token,
};

use super::ParseOptions;
use crate::rules::{AtRule, Declaration, Node, StyleRule};
use crate::selector::SelectorList;
use crate::{Error, Result};

/// Syntax errors raised by this parser on top of the tokenizer's own.
#[derive(Debug, Clone)]
enum SyntaxError {
    EmptySelector,
    InvalidSelector(String),
    UnexpectedSemicolon,
    BlockInValue,
    UnclosedBlock,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySelector => write!(f, "Empty selector"),
            Self::InvalidSelector(message) => write!(f, "{message}"),
            Self::UnexpectedSemicolon => write!(f, "Unexpected ';' in selector"),
            Self::BlockInValue => write!(f, "Unexpected '{{' in declaration value"),
            Self::UnclosedBlock => write!(f, "Unclosed function or block in declaration value"),
        }
    }
}

type ParseResult<'i, T> = std::result::Result<T, CssParseError<'i, SyntaxError>>;

/// Parse a CSS stylesheet string into a list of top-level nodes.
///
/// # Error Recovery
///
/// By default the first invalid rule aborts the parse with [`Error::Parse`].
/// With [`ParseOptions::recover`] set, the parser instead:
/// 1. Logs the error via `tracing::warn!`
/// 2. Skips to the next rule (after the closing `}` or `;`)
/// 3. Continues parsing subsequent rules
///
/// # Example
///
/// ```ignore
/// let css = ".a { color: red; } @media print { .b { color: blue; } }";
/// let nodes = parse_css(css, &ParseOptions::default())?;
/// assert_eq!(nodes.len(), 2);
/// ```
pub fn parse_css(css: &str, options: &ParseOptions) -> Result<Vec<Node>> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut nodes = vec![];

    loop {
        // Skip whitespace and comments
        parser.skip_whitespace();

        if parser.is_exhausted() {
            break;
        }

        let state = parser.state();
        match parse_top_level_item(&mut parser) {
            Ok(Some(node)) => nodes.push(node),
            Ok(None) => {}
            Err(e) => {
                let error = to_error(e);
                if !options.recover {
                    return Err(error);
                }
                tracing::warn!("CSS parse error: {}", error);
                parser.reset(&state);
                skip_to_next_rule(&mut parser);
            }
        }
    }

    Ok(nodes)
}

fn to_error(error: CssParseError<'_, SyntaxError>) -> Error {
    let message = match error.kind {
        ParseErrorKind::Basic(BasicParseErrorKind::UnexpectedToken(token)) => {
            format!("Unexpected token {:?}", token)
        }
        ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => {
            "Unexpected end of input".to_string()
        }
        ParseErrorKind::Basic(other) => format!("{:?}", other),
        ParseErrorKind::Custom(custom) => custom.to_string(),
    };

    Error::syntax(message, error.location)
}

/// Parse one top-level item. HTML comment tokens (`<!--`, `-->`) yield `None`.
fn parse_top_level_item<'i>(parser: &mut Parser<'i, '_>) -> ParseResult<'i, Option<Node>> {
    let state = parser.state();

    match parser.next()?.clone() {
        Token::CDO | Token::CDC => return Ok(None),
        Token::AtKeyword(name) => {
            return parse_at_rule(parser, name.to_string()).map(|rule| Some(Node::AtRule(rule)));
        }
        _ => {}
    }

    parser.reset(&state);
    parse_style_rule(parser).map(|rule| Some(Node::Rule(rule)))
}

/// Parse a style rule: `selector { body }`.
fn parse_style_rule<'i>(parser: &mut Parser<'i, '_>) -> ParseResult<'i, StyleRule> {
    let selector = parser.parse_until_before(Delimiter::CurlyBracketBlock, |p| {
        let start = p.position();
        while let Ok(token) = p.next_including_whitespace_and_comments() {
            if matches!(token, Token::Semicolon) {
                return Err(p.new_custom_error(SyntaxError::UnexpectedSemicolon));
            }
        }
        Ok::<_, CssParseError<'i, SyntaxError>>(p.slice_from(start).trim().to_string())
    })?;

    if selector.is_empty() {
        return Err(parser.new_custom_error(SyntaxError::EmptySelector));
    }
    if let Err(e) = SelectorList::parse(&selector) {
        return Err(parser.new_custom_error(SyntaxError::InvalidSelector(e.to_string())));
    }

    match parser.next().cloned() {
        Ok(Token::CurlyBracketBlock) => {}
        Ok(token) => return Err(parser.new_unexpected_token_error(token)),
        Err(e) => return Err(e.into()),
    }

    let children = parser.parse_nested_block(parse_body)?;
    Ok(StyleRule { selector, children })
}

/// Parse an at-rule after its `@name` token.
fn parse_at_rule<'i>(parser: &mut Parser<'i, '_>, name: String) -> ParseResult<'i, AtRule> {
    let prelude = parser.parse_until_before(
        Delimiter::Semicolon | Delimiter::CurlyBracketBlock,
        |p| {
            let start = p.position();
            while p.next_including_whitespace_and_comments().is_ok() {}
            Ok::<_, CssParseError<'i, SyntaxError>>(p.slice_from(start).trim().to_string())
        },
    )?;

    match parser.next().cloned() {
        // A statement at-rule may also be terminated by the end of input
        Ok(Token::Semicolon) | Err(_) => Ok(AtRule::statement(name, prelude)),
        Ok(Token::CurlyBracketBlock) => {
            let block = parser.parse_nested_block(parse_body)?;
            Ok(AtRule::with_block(name, prelude, block))
        }
        Ok(token) => Err(parser.new_unexpected_token_error(token)),
    }
}

/// Parse the contents of a `{}` block.
///
/// A body may mix declarations, nested style rules and at-rules. Items that
/// start with an identifier are tried as declarations first; if that fails
/// (for example `a:hover { ... }` reaches a block) they are re-parsed as a
/// nested rule.
fn parse_body<'i>(parser: &mut Parser<'i, '_>) -> ParseResult<'i, Vec<Node>> {
    let mut nodes = vec![];

    loop {
        parser.skip_whitespace();

        if parser.is_exhausted() {
            break;
        }

        let state = parser.state();
        match parser.next()?.clone() {
            Token::Semicolon => continue,
            Token::AtKeyword(name) => {
                nodes.push(Node::AtRule(parse_at_rule(parser, name.to_string())?));
                continue;
            }
            Token::Ident(_) => {
                parser.reset(&state);
                match parser.try_parse(parse_declaration) {
                    Ok(decl) => {
                        nodes.push(Node::Declaration(decl));
                        continue;
                    }
                    // An unclosed block runs to the end of input, so there is
                    // no nested rule to fall back to
                    Err(e) if matches!(e.kind, ParseErrorKind::Custom(SyntaxError::UnclosedBlock)) => {
                        return Err(e);
                    }
                    Err(_) => {}
                }
            }
            _ => {}
        }

        parser.reset(&state);
        nodes.push(Node::Rule(parse_style_rule(parser)?));
    }

    Ok(nodes)
}

/// Parse `property: value [!important]` and its optional trailing semicolon.
fn parse_declaration<'i>(parser: &mut Parser<'i, '_>) -> ParseResult<'i, Declaration> {
    let property = parser.expect_ident()?.to_string();
    parser.expect_colon()?;

    let custom = property.starts_with("--");
    let (value, important) = parser.parse_until_before(Delimiter::Semicolon, |p| {
        parse_declaration_value(p, custom)
    })?;

    // Skip optional semicolon
    let _ = parser.try_parse(|p| p.expect_semicolon());

    Ok(Declaration {
        property,
        value,
        important,
    })
}

/// Capture the raw value text, splitting off a trailing `!important`.
fn parse_declaration_value<'i>(
    parser: &mut Parser<'i, '_>,
    custom: bool,
) -> ParseResult<'i, (String, bool)> {
    let start = parser.position();
    // Position of a `!` that was the last significant token
    let mut bang = None;
    // Position of the `!` in a trailing `! important`
    let mut important_at = None;

    loop {
        let before = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::WhiteSpace(_) | Token::Comment(_) => {}
            Token::Delim('!') => {
                bang = Some(before);
                important_at = None;
            }
            Token::Ident(ref name) if bang.is_some() && name.eq_ignore_ascii_case("important") => {
                important_at = bang.take();
            }
            Token::CurlyBracketBlock if !custom => {
                return Err(parser.new_custom_error(SyntaxError::BlockInValue));
            }
            Token::Function(_)
            | Token::ParenthesisBlock
            | Token::SquareBracketBlock
            | Token::CurlyBracketBlock => {
                bang = None;
                important_at = None;
                if !consume_closed_block(parser) {
                    return Err(parser.new_custom_error(SyntaxError::UnclosedBlock));
                }
            }
            _ => {
                bang = None;
                important_at = None;
            }
        }
    }

    Ok(match important_at {
        Some(end) => (parser.slice(start..end).trim().to_string(), true),
        None => (parser.slice_from(start).trim().to_string(), false),
    })
}

/// Consume the block just opened, reporting whether it and every block nested
/// in it has a closing token.
///
/// cssparser closes blocks left open at the end of input, so `a(b; } .c {`
/// would otherwise read as one value running to the end of the stylesheet.
fn consume_closed_block<'i>(parser: &mut Parser<'i, '_>) -> bool {
    let inner = parser.parse_nested_block(|p| {
        let mut closed = true;
        while let Ok(token) = p.next_including_whitespace_and_comments() {
            if matches!(
                token,
                Token::Function(_)
                    | Token::ParenthesisBlock
                    | Token::SquareBracketBlock
                    | Token::CurlyBracketBlock
            ) {
                closed &= consume_closed_block(p);
            }
        }
        Ok::<_, CssParseError<'i, ()>>((closed, p.position()))
    });

    match inner {
        Ok((closed, end)) => closed && !parser.slice_from(end).is_empty(),
        Err(_) => false,
    }
}

/// Skip to the next rule (error recovery).
///
/// Consumes tokens up to and including the first `{}` block or `;`.
fn skip_to_next_rule(parser: &mut Parser<'_, '_>) {
    loop {
        match parser.next() {
            Ok(Token::CurlyBracketBlock) | Ok(Token::Semicolon) | Ok(Token::CloseCurlyBracket) => {
                return;
            }
            Err(_) => return,
            _ => {}
        }
    }
}
