//! Comma-aware selector list splitting.

use std::fmt;
use std::ops::Deref;

use cssparser::{Delimiter, ParseError as CssParseError, Parser, ParserInput, Token};

use crate::{Error, Result};

/// An ordered list of individual selectors split from a comma-separated
/// selector.
///
/// Splitting only happens at top-level commas: commas inside functional
/// pseudo-classes (`:not(a, b)`), attribute selectors and strings belong to
/// the selector that contains them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SelectorList(Vec<String>);

impl SelectorList {
    /// Split a selector list. Fails if any entry is empty (`a,,b`, `a,`).
    pub fn parse(text: &str) -> Result<Self> {
        let mut input = ParserInput::new(text);
        let mut parser = Parser::new(&mut input);
        let mut selectors = vec![];

        loop {
            let selector = parser
                .parse_until_before(Delimiter::Comma, |p| {
                    let start = p.position();
                    while p.next_including_whitespace_and_comments().is_ok() {}
                    Ok::<_, CssParseError<'_, ()>>(p.slice_from(start).trim().to_string())
                })
                .map_err(|_| Error::invalid_selector(text, "Unreadable selector list"))?;

            if selector.is_empty() {
                return Err(Error::invalid_selector(text, "Empty selector in list"));
            }
            selectors.push(selector);

            match parser.next() {
                Ok(Token::Comma) => continue,
                _ => break,
            }
        }

        Ok(Self(selectors))
    }

    /// Create a list from already-split selectors.
    pub fn from_selectors(selectors: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(selectors.into_iter().map(Into::into).collect())
    }

    /// Consume the list.
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl Deref for SelectorList {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(selector)?;
        }
        Ok(())
    }
}
