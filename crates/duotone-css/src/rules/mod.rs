//! Stylesheet tree: rules, at-rules, declarations and printing.

mod printer;
mod rule;
mod stylesheet;

pub use printer::{OutputStyle, PrintOptions};
pub use rule::{AtRule, Declaration, Node, StyleRule};
pub use stylesheet::StyleSheet;
