//! Phase 1: pulling theme-bearing declarations out of their rules.

use std::collections::HashMap;

use super::TransformStats;
use crate::rules::{Declaration, Node, StyleRule};
use crate::value::{LIGHT_DARK, ThemeBranch, TokenStream, scan_value_detailed};

/// A declaration whose value holds at least one theme pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemedDeclaration {
    /// Property name.
    pub property: String,
    /// Tokenized value.
    pub tokens: TokenStream,
    /// `!important` flag of the source declaration.
    pub important: bool,
}

impl ThemedDeclaration {
    /// Build the plain declaration for one theme branch.
    pub fn resolve(&self, branch: ThemeBranch) -> Declaration {
        Declaration {
            property: self.property.clone(),
            value: self.tokens.resolve(branch),
            important: self.important,
        }
    }
}

/// Child indices leading from the stylesheet root to a rule.
pub type RulePath = Vec<usize>;

/// Theme-bearing declarations per rule, keyed by the rule's position.
///
/// Paths refer to the tree as it is after extraction, so phase 2 must walk
/// the same tree without reshaping it first.
#[derive(Debug, Default)]
pub struct Accumulation {
    entries: HashMap<RulePath, Vec<ThemedDeclaration>>,
}

impl Accumulation {
    /// Number of rules with theme-bearing declarations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no rule had theme-bearing declarations.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return the entry for a rule.
    pub fn take(&mut self, path: &[usize]) -> Option<Vec<ThemedDeclaration>> {
        self.entries.remove(path)
    }
}

/// Walk the whole tree, extracting theme-bearing declarations from every
/// style rule outside `@keyframes`.
pub fn collect(nodes: &mut [Node], stats: &mut TransformStats) -> Accumulation {
    let mut accumulation = Accumulation::default();
    let mut path = vec![];
    collect_nodes(nodes, &mut path, &mut accumulation, stats, false);
    accumulation
}

fn collect_nodes(
    nodes: &mut [Node],
    path: &mut RulePath,
    accumulation: &mut Accumulation,
    stats: &mut TransformStats,
    in_keyframes: bool,
) {
    for (i, node) in nodes.iter_mut().enumerate() {
        path.push(i);
        match node {
            Node::Rule(rule) => {
                if in_keyframes {
                    if uses_light_dark(rule) {
                        tracing::warn!(
                            "{}() inside @keyframes step '{}' cannot be theme-scoped; left unchanged",
                            LIGHT_DARK,
                            rule.selector
                        );
                    }
                } else {
                    let themed = extract_themed(rule, stats);
                    if !themed.is_empty() {
                        accumulation.entries.insert(path.clone(), themed);
                    }
                }
                collect_nodes(&mut rule.children, path, accumulation, stats, in_keyframes);
            }
            Node::AtRule(at_rule) => {
                let in_keyframes = in_keyframes || at_rule.is_keyframes();
                if let Some(block) = &mut at_rule.block {
                    collect_nodes(block, path, accumulation, stats, in_keyframes);
                }
            }
            Node::Declaration(_) => {}
        }
        path.pop();
    }
}

/// Whether any declaration of `rule` holds a well-formed `light-dark()` call.
fn uses_light_dark(rule: &StyleRule) -> bool {
    rule.declarations()
        .any(|decl| scan_value_detailed(&decl.value).is_themed())
}

/// Remove every theme-bearing declaration from `rule`, in order.
///
/// All other children keep their relative order.
pub fn extract_themed(rule: &mut StyleRule, stats: &mut TransformStats) -> Vec<ThemedDeclaration> {
    let mut themed = vec![];

    for child in std::mem::take(&mut rule.children) {
        let decl = match child {
            Node::Declaration(decl) => decl,
            other => {
                rule.children.push(other);
                continue;
            }
        };

        let scan = scan_value_detailed(&decl.value);
        stats.malformed += scan.malformed;

        if scan.is_themed() {
            tracing::trace!(selector = %rule.selector, property = %decl.property, "collected themed declaration");
            stats.declarations_moved += 1;
            stats.pairs_resolved += scan.tokens.pair_count();
            themed.push(ThemedDeclaration {
                property: decl.property,
                tokens: scan.tokens,
                important: decl.important,
            });
        } else {
            rule.children.push(Node::Declaration(decl));
        }
    }

    themed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::StyleSheet;

    #[test]
    fn extraction_keeps_other_declarations_in_order() {
        let mut sheet = StyleSheet::parse(
            ".a { margin: 0; color: light-dark(red, blue); padding: 1px !important; border-color: light-dark(#000, #fff) !important; }",
        )
        .unwrap();
        let Node::Rule(rule) = &mut sheet.nodes[0] else {
            panic!("expected a rule");
        };

        let mut stats = TransformStats::default();
        let themed = extract_themed(rule, &mut stats);

        let kept: Vec<_> = rule.declarations().cloned().collect();
        assert_eq!(
            kept,
            vec![
                Declaration::new("margin", "0"),
                Declaration::important("padding", "1px"),
            ]
        );

        assert_eq!(themed.len(), 2);
        assert_eq!(themed[0].property, "color");
        assert!(!themed[0].important);
        assert_eq!(themed[1].property, "border-color");
        assert!(themed[1].important);
        assert_eq!(stats.declarations_moved, 2);
        assert_eq!(stats.pairs_resolved, 2);
    }

    #[test]
    fn ordinary_rules_are_not_accumulated() {
        let mut sheet = StyleSheet::parse(".a { color: red; } .b { color: blue; }").unwrap();
        let mut stats = TransformStats::default();

        let accumulation = collect(&mut sheet.nodes, &mut stats);
        assert!(accumulation.is_empty());
        assert_eq!(stats, TransformStats::default());
    }

    #[test]
    fn paths_address_nested_rules() {
        let mut sheet = StyleSheet::parse(
            ".a { color: red; } @media print { .b { color: light-dark(red, blue); } }",
        )
        .unwrap();
        let mut stats = TransformStats::default();

        let mut accumulation = collect(&mut sheet.nodes, &mut stats);
        assert_eq!(accumulation.len(), 1);
        assert!(accumulation.take(&[1, 0]).is_some());
        assert!(accumulation.is_empty());
    }

    #[test]
    fn keyframes_are_skipped() {
        let mut sheet = StyleSheet::parse(
            "@keyframes pulse { from { color: light-dark(red, blue); } }",
        )
        .unwrap();
        let before = sheet.clone();
        let mut stats = TransformStats::default();

        let accumulation = collect(&mut sheet.nodes, &mut stats);
        assert!(accumulation.is_empty());
        assert_eq!(sheet, before);
    }

    #[test]
    fn keyframe_steps_report_only_real_calls() {
        let step = |value: &str| StyleRule::with_declarations("from", [Declaration::new("color", value)]);

        assert!(uses_light_dark(&step("light-dark(red, blue)")));
        assert!(uses_light_dark(&step("var(--c, light-dark(red, blue))")));
        assert!(!uses_light_dark(&step("var(--light-dark)")));
        assert!(!uses_light_dark(&step("var(--light-dark-surface, red)")));
    }

    #[test]
    fn malformed_calls_are_counted_and_kept() {
        let mut rule = StyleRule::with_declarations(".a", [Declaration::new("color", "light-dark(red)")]);
        let mut stats = TransformStats::default();

        let themed = extract_themed(&mut rule, &mut stats);
        assert!(themed.is_empty());
        assert_eq!(stats.malformed, 1);
        assert_eq!(rule.declarations().count(), 1);
    }
}
