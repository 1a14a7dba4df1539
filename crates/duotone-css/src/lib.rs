//! Build-time expansion of CSS `light-dark()` into theme rule sets.
//!
//! Browsers resolve `light-dark(<light>, <dark>)` from the `color-scheme` in
//! effect. This crate resolves it ahead of time instead: every declaration
//! using it moves into a pair of rules scoped to a theme attribute, so the
//! active theme is chosen by setting e.g. `data-theme="dark"` on an element.
//!
//! - **Parsing**: stylesheets are read into a tree of rules, at-rules and
//!   declarations, with selectors and values kept as source text
//! - **Nesting**: nested style rules can be flattened before expansion
//! - **Expansion**: each rule using `light-dark()` is followed by a light and
//!   a dark rule, with selectors rewritten to keep the theme scope at zero
//!   specificity
//! - **Hot Reload**: watch stylesheets and rebuild on change
//!
//! # Example
//!
//! ```
//! use duotone_css::prelude::*;
//!
//! let mut sheet = StyleSheet::parse(":root { --surface: light-dark(#fff, #111); }")?;
//! let stats = transform(&mut sheet, &TransformOptions::default())?;
//!
//! assert_eq!(stats.rules_expanded, 1);
//! assert_eq!(
//!     sheet.to_css(&PrintOptions::default()),
//!     ":where(:root), :where([data-theme=\"light\"]) {\n  --surface: #fff;\n}\n\n\
//!      :where([data-theme=\"dark\"]) {\n  --surface: #111;\n}\n"
//! );
//! # Ok::<(), duotone_css::Error>(())
//! ```

pub mod options;
pub mod parser;
pub mod rules;
pub mod selector;
pub mod transform;
pub mod value;

#[cfg(feature = "hot-reload")]
pub mod hot_reload;

mod error;

pub use error::{Error, Result};
pub use options::{ThemeOptions, TransformOptions};
pub use transform::{TransformStats, Transformed, transform, transform_css};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::options::{ThemeOptions, TransformOptions};
    pub use crate::parser::ParseOptions;
    pub use crate::rules::{AtRule, Declaration, Node, OutputStyle, PrintOptions, StyleRule, StyleSheet};
    pub use crate::selector::{ScopeKind, SelectorList};
    pub use crate::transform::{TransformStats, Transformed, transform, transform_css};
    pub use crate::value::{ThemeBranch, TokenStream, ValueToken};
    pub use crate::{Error, Result};

    #[cfg(feature = "hot-reload")]
    pub use crate::hot_reload::StylesheetWatcher;
}
