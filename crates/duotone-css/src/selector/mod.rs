//! Selector list splitting, theme scope classification and rewriting.

mod list;
mod resolve;
mod rewrite;
mod scope;

pub use list::SelectorList;
pub use resolve::{is_compound, nest_explicitly, replace_nesting, resolve_nested_selector};
pub use rewrite::{OrderedSet, ThemeSelectors, theme_selectors};
pub use scope::{ScopeKind, classify};
