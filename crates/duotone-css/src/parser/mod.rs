//! CSS parsing module.

mod css_parser;

use serde::{Deserialize, Serialize};

pub use css_parser::parse_css;

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Skip invalid rules (logging a warning) instead of failing the parse.
    pub recover: bool,
}

impl ParseOptions {
    /// Options that skip invalid rules.
    pub fn recovering() -> Self {
        Self { recover: true }
    }
}
