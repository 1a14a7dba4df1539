//! Transform configuration.

use cssparser::{Parser, ParserInput, Token};
use serde::{Deserialize, Serialize};

use crate::parser::ParseOptions;
use crate::rules::PrintOptions;
use crate::{Error, Result};

/// How themes are addressed in the synthesized selectors.
///
/// With the defaults, light rules are scoped to `[data-theme="light"]` and
/// dark rules to `[data-theme="dark"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeOptions {
    /// Attribute that carries the active theme.
    pub attribute: String,
    /// Attribute value selecting the light theme.
    pub light: String,
    /// Attribute value selecting the dark theme.
    pub dark: String,
}

impl Default for ThemeOptions {
    fn default() -> Self {
        Self {
            attribute: "data-theme".to_string(),
            light: "light".to_string(),
            dark: "dark".to_string(),
        }
    }
}

impl ThemeOptions {
    /// Zero-specificity document root scope.
    pub const ROOT_SCOPE: &'static str = ":where(:root)";

    /// `:where([data-theme="light"])`.
    pub fn light_scope(&self) -> String {
        self.scope(&self.light)
    }

    /// `:where([data-theme="dark"])`.
    pub fn dark_scope(&self) -> String {
        self.scope(&self.dark)
    }

    fn scope(&self, value: &str) -> String {
        let mut out = format!(":where([{}=", self.attribute);
        // Writing to a String cannot fail
        let _ = cssparser::serialize_string(value, &mut out);
        out.push_str("])");
        out
    }

    /// Check that the attribute is a plain identifier.
    pub fn validate(&self) -> Result<()> {
        let mut input = ParserInput::new(&self.attribute);
        let mut parser = Parser::new(&mut input);

        let is_ident = matches!(parser.next_including_whitespace(), Ok(Token::Ident(_)))
            && parser.is_exhausted();
        if !is_ident {
            return Err(Error::InvalidThemeAttribute(self.attribute.clone()));
        }
        Ok(())
    }
}

/// Options for a full transform run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Theme addressing.
    pub theme: ThemeOptions,
    /// Flatten nested style rules before expanding `light-dark()`.
    pub flatten_nesting: bool,
    /// Parser behavior for [`crate::transform_css`].
    pub parse: ParseOptions,
    /// Printer behavior for [`crate::transform_css`].
    pub print: PrintOptions,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            theme: ThemeOptions::default(),
            flatten_nesting: true,
            parse: ParseOptions::default(),
            print: PrintOptions::default(),
        }
    }
}
