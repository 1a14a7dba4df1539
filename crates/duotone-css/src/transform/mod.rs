//! Expansion of `light-dark()` declarations into theme rule sets.
//!
//! The transform runs in two phases over a [`StyleSheet`]:
//!
//! 1. **Collect**: every style rule outside `@keyframes` gives up its
//!    declarations whose values contain a well-formed `light-dark()` call.
//!    These are recorded per rule, keyed by the rule's position in the tree.
//! 2. **Splice**: at each recorded position the rule is replaced by itself
//!    (only if it still has children), followed by a light rule and a dark
//!    rule holding the resolved declarations.
//!
//! Collecting everything before any rule is inserted means a rule synthesized
//! for one source rule is never scanned again.
//!
//! # Example
//!
//! ```
//! use duotone_css::{TransformOptions, transform_css};
//! use duotone_css::rules::PrintOptions;
//!
//! let options = TransformOptions {
//!     print: PrintOptions::compact(),
//!     ..TransformOptions::default()
//! };
//! let out = transform_css(".foo { color: light-dark(red, blue); }", &options).unwrap();
//!
//! assert_eq!(
//!     out.css,
//!     r#".foo, :where([data-theme="light"]) .foo{color:red}:where([data-theme="dark"]) .foo{color:blue}"#
//! );
//! assert_eq!(out.stats.rules_expanded, 1);
//! ```

mod collector;
mod nesting;
mod synthesizer;

use std::ops::AddAssign;

pub use collector::{Accumulation, ThemedDeclaration, collect, extract_themed};
pub use nesting::flatten;
pub use synthesizer::synthesize;

use crate::Result;
use crate::options::{ThemeOptions, TransformOptions};
use crate::rules::{Node, StyleSheet};

/// Counters describing what a transform changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Source rules that received a light and a dark rule.
    pub rules_expanded: usize,
    /// Declarations moved into synthesized rules.
    pub declarations_moved: usize,
    /// `light-dark()` calls resolved.
    pub pairs_resolved: usize,
    /// Source rules removed because nothing was left in them.
    pub rules_removed: usize,
    /// Malformed `light-dark()` calls left unchanged.
    pub malformed: usize,
}

impl TransformStats {
    /// Whether the transform left the stylesheet as it was.
    pub fn is_unchanged(&self) -> bool {
        self.rules_expanded == 0
    }
}

impl AddAssign for TransformStats {
    fn add_assign(&mut self, other: Self) {
        self.rules_expanded += other.rules_expanded;
        self.declarations_moved += other.declarations_moved;
        self.pairs_resolved += other.pairs_resolved;
        self.rules_removed += other.rules_removed;
        self.malformed += other.malformed;
    }
}

/// Output of [`transform_css`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    /// Serialized stylesheet.
    pub css: String,
    /// What changed.
    pub stats: TransformStats,
}

/// Expand every `light-dark()` declaration in `sheet`.
///
/// On error the stylesheet is left untouched.
pub fn transform(sheet: &mut StyleSheet, options: &TransformOptions) -> Result<TransformStats> {
    options.theme.validate()?;

    let mut stats = TransformStats::default();
    let mut nodes = sheet.nodes.clone();

    if options.flatten_nesting {
        nodes = flatten(nodes)?;
    }

    let mut accumulation = collect(&mut nodes, &mut stats);
    if !accumulation.is_empty() {
        tracing::debug!(rules = accumulation.len(), "expanding themed rules");
        nodes = splice(nodes, &mut vec![], false, &mut accumulation, &options.theme, &mut stats)?;
    }

    sheet.nodes = nodes;
    Ok(stats)
}

/// Parse, transform and print a stylesheet.
pub fn transform_css(css: &str, options: &TransformOptions) -> Result<Transformed> {
    let mut sheet = StyleSheet::parse_with(css, &options.parse)?;
    let stats = transform(&mut sheet, options)?;

    Ok(Transformed {
        css: sheet.to_css(&options.print),
        stats,
    })
}

/// Rebuild `nodes`, emitting the theme rules right after each collected rule.
///
/// Indices are taken from the input list, so synthesized rules never shift
/// the positions of rules that come later. `in_rule` is set below a style
/// rule, where synthesized rules are nested under the same parent.
fn splice(
    nodes: Vec<Node>,
    path: &mut Vec<usize>,
    in_rule: bool,
    accumulation: &mut Accumulation,
    theme: &ThemeOptions,
    stats: &mut TransformStats,
) -> Result<Vec<Node>> {
    let mut out = Vec::with_capacity(nodes.len());

    for (i, node) in nodes.into_iter().enumerate() {
        path.push(i);
        match node {
            Node::Rule(mut rule) => {
                let children = std::mem::take(&mut rule.children);
                rule.children = splice(children, path, true, accumulation, theme, stats)?;

                match accumulation.take(path) {
                    Some(themed) => {
                        let (light, dark) = synthesize(&rule.selector, &themed, theme, in_rule)?;
                        tracing::debug!(
                            selector = %rule.selector,
                            declarations = themed.len(),
                            "expanded light-dark() rule"
                        );

                        stats.rules_expanded += 1;
                        if rule.is_empty() {
                            stats.rules_removed += 1;
                        } else {
                            out.push(Node::Rule(rule));
                        }
                        out.push(Node::Rule(light));
                        out.push(Node::Rule(dark));
                    }
                    None => out.push(Node::Rule(rule)),
                }
            }
            Node::AtRule(mut at_rule) => {
                if let Some(block) = at_rule.block.take() {
                    at_rule.block = Some(splice(block, path, in_rule, accumulation, theme, stats)?);
                }
                out.push(Node::AtRule(at_rule));
            }
            other => out.push(other),
        }
        path.pop();
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::PrintOptions;

    fn compact() -> TransformOptions {
        TransformOptions {
            print: PrintOptions::compact(),
            ..TransformOptions::default()
        }
    }

    fn run(css: &str) -> String {
        transform_css(css, &compact()).unwrap().css
    }

    #[test]
    fn root_rule_is_replaced() {
        let out = transform_css(":root { --surface: light-dark(#fff, #000); }", &compact()).unwrap();

        assert_eq!(
            out.css,
            r#":where(:root), :where([data-theme="light"]){--surface:#fff}:where([data-theme="dark"]){--surface:#000}"#
        );
        assert_eq!(
            out.stats,
            TransformStats {
                rules_expanded: 1,
                declarations_moved: 1,
                pairs_resolved: 1,
                rules_removed: 1,
                malformed: 0,
            }
        );
    }

    #[test]
    fn remaining_declarations_stay_in_place() {
        assert_eq!(
            run(".a { margin: 0; color: light-dark(red, blue); } .b { color: green; }"),
            concat!(
                ".a{margin:0}",
                r#".a, :where([data-theme="light"]) .a{color:red}"#,
                r#":where([data-theme="dark"]) .a{color:blue}"#,
                ".b{color:green}"
            )
        );
    }

    #[test]
    fn rules_in_media_blocks() {
        assert_eq!(
            run("@media print { .a { color: light-dark(red, blue); } }"),
            concat!(
                "@media print{",
                r#".a, :where([data-theme="light"]) .a{color:red}"#,
                r#":where([data-theme="dark"]) .a{color:blue}"#,
                "}"
            )
        );
    }

    #[test]
    fn nested_rules_are_flattened_first() {
        assert_eq!(
            run(".card { margin: 0; &:hover { color: light-dark(red, blue); } }"),
            concat!(
                ".card{margin:0}",
                r#".card:hover, :where([data-theme="light"]) .card:hover{color:red}"#,
                r#":where([data-theme="dark"]) .card:hover{color:blue}"#
            )
        );
    }

    #[test]
    fn nested_rules_without_flattening() {
        let options = TransformOptions {
            flatten_nesting: false,
            ..compact()
        };
        let out = transform_css(".card { .title { color: light-dark(red, blue); } }", &options).unwrap();

        assert_eq!(
            out.css,
            concat!(
                ".card{",
                r#"& .title, :where([data-theme="light"]) & .title{color:red}"#,
                r#":where([data-theme="dark"]) & .title{color:blue}"#,
                "}"
            )
        );

        // Resolving the nesting keeps the theme scope above the parent
        let flat = transform_css(&out.css, &compact()).unwrap().css;
        assert_eq!(
            flat,
            concat!(
                r#".card .title, :where([data-theme="light"]) .card .title{color:red}"#,
                r#":where([data-theme="dark"]) .card .title{color:blue}"#
            )
        );
    }

    #[test]
    fn untouched_stylesheet() {
        let out = transform_css(".a { color: red; }", &compact()).unwrap();
        assert!(out.stats.is_unchanged());
        assert_eq!(out.css, ".a{color:red}");
    }

    #[test]
    fn invalid_theme_attribute_leaves_sheet_alone() {
        let mut sheet = StyleSheet::parse(".a { color: light-dark(red, blue); }").unwrap();
        let before = sheet.clone();
        let options = TransformOptions {
            theme: ThemeOptions {
                attribute: "data theme".into(),
                ..ThemeOptions::default()
            },
            ..TransformOptions::default()
        };

        assert!(transform(&mut sheet, &options).is_err());
        assert_eq!(sheet, before);
    }

    #[test]
    fn stats_accumulate() {
        let mut total = TransformStats::default();
        total += TransformStats {
            rules_expanded: 1,
            declarations_moved: 2,
            ..TransformStats::default()
        };
        total += TransformStats {
            rules_expanded: 3,
            malformed: 1,
            ..TransformStats::default()
        };

        assert_eq!(total.rules_expanded, 4);
        assert_eq!(total.declarations_moved, 2);
        assert_eq!(total.malformed, 1);
    }
}
