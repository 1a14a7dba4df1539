//! Theme-aware value tokens.

/// Which side of a theme pair to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeBranch {
    /// First argument of `light-dark()`.
    Light,
    /// Second argument of `light-dark()`.
    Dark,
}

/// A piece of a declaration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueToken {
    /// Text carried unchanged into both branches.
    Literal(String),
    /// A `light-dark(<light>, <dark>)` call.
    ThemePair {
        /// Light argument, verbatim.
        light: String,
        /// Dark argument, verbatim.
        dark: String,
    },
}

impl ValueToken {
    /// Text of this token in the given branch.
    pub fn resolve(&self, branch: ThemeBranch) -> &str {
        match (self, branch) {
            (ValueToken::Literal(text), _) => text,
            (ValueToken::ThemePair { light, .. }, ThemeBranch::Light) => light,
            (ValueToken::ThemePair { dark, .. }, ThemeBranch::Dark) => dark,
        }
    }
}

/// An ordered sequence of value tokens. Adjacent literals are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<ValueToken>,
}

impl TokenStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal text, merging with a preceding literal.
    pub fn push_literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(ValueToken::Literal(last)) = self.tokens.last_mut() {
            last.push_str(text);
        } else {
            self.tokens.push(ValueToken::Literal(text.to_string()));
        }
    }

    /// Append a theme pair.
    pub fn push_pair(&mut self, light: impl Into<String>, dark: impl Into<String>) {
        self.tokens.push(ValueToken::ThemePair {
            light: light.into(),
            dark: dark.into(),
        });
    }

    /// The tokens.
    pub fn tokens(&self) -> &[ValueToken] {
        &self.tokens
    }

    /// Number of theme pairs.
    pub fn pair_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|token| matches!(token, ValueToken::ThemePair { .. }))
            .count()
    }

    /// Whether the stream holds at least one theme pair.
    pub fn has_pairs(&self) -> bool {
        self.pair_count() > 0
    }

    /// Concatenate the stream, taking `branch` from every theme pair.
    pub fn resolve(&self, branch: ThemeBranch) -> String {
        self.tokens.iter().map(|token| token.resolve(branch)).collect()
    }
}
