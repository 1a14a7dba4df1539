//! Flattening of nested style rules.

use crate::Result;
use crate::rules::{AtRule, Node, StyleRule};
use crate::selector::resolve_nested_selector;

/// Hoist nested style rules out of their parents, in document order.
///
/// A rule's consecutive declarations stay together under the parent
/// selector; every nested rule follows at its own position with a resolved
/// selector, and nested conditional at-rules (`@media`, `@supports`, ...) are
/// moved around a copy of the parent rule.
pub fn flatten(nodes: Vec<Node>) -> Result<Vec<Node>> {
    let mut out = Vec::with_capacity(nodes.len());

    for node in nodes {
        match node {
            Node::Rule(rule) => out.extend(flatten_rule(rule)?),
            Node::AtRule(AtRule {
                name,
                prelude,
                block: Some(block),
            }) => out.push(Node::AtRule(AtRule::with_block(name, prelude, flatten(block)?))),
            other => out.push(other),
        }
    }

    Ok(out)
}

fn flatten_rule(rule: StyleRule) -> Result<Vec<Node>> {
    if !rule.has_nested_rules() {
        return Ok(vec![Node::Rule(rule)]);
    }

    let StyleRule { selector, children } = rule;
    let mut out = vec![];
    let mut run = vec![];

    for child in children {
        match child {
            Node::Rule(nested) => {
                flush(&selector, &mut run, &mut out);
                let resolved = resolve_nested_selector(&selector, &nested.selector)?;
                tracing::trace!(parent = %selector, nested = %nested.selector, %resolved, "flattened nested rule");
                out.extend(flatten_rule(StyleRule {
                    selector: resolved,
                    children: nested.children,
                })?);
            }
            Node::AtRule(at_rule) if at_rule.is_conditional_group() && at_rule.block.is_some() => {
                flush(&selector, &mut run, &mut out);
                let AtRule { name, prelude, block } = at_rule;
                let inner = flatten_rule(StyleRule {
                    selector: selector.clone(),
                    children: block.unwrap_or_default(),
                })?;
                out.push(Node::AtRule(AtRule::with_block(name, prelude, inner)));
            }
            other => run.push(other),
        }
    }
    flush(&selector, &mut run, &mut out);

    Ok(out)
}

/// Emit pending declarations as a rule with the parent selector.
fn flush(selector: &str, run: &mut Vec<Node>, out: &mut Vec<Node>) {
    if !run.is_empty() {
        out.push(Node::Rule(StyleRule {
            selector: selector.to_string(),
            children: std::mem::take(run),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{PrintOptions, StyleSheet};

    fn flat(css: &str) -> String {
        let sheet = StyleSheet::parse(css).unwrap();
        StyleSheet::from_nodes(flatten(sheet.nodes).unwrap()).to_css(&PrintOptions::compact())
    }

    #[test]
    fn flat_rules_are_unchanged() {
        assert_eq!(flat(".a { color: red; } .b {}"), ".a{color:red}.b{}");
    }

    #[test]
    fn nested_rules_follow_parent_declarations() {
        assert_eq!(
            flat(".card { color: red; &:hover { color: blue; } .title { margin: 0; } }"),
            ".card{color:red}.card:hover{color:blue}.card .title{margin:0}"
        );
    }

    #[test]
    fn declaration_runs_keep_document_order() {
        assert_eq!(
            flat(".a { color: red; & b { color: blue; } margin: 0; }"),
            ".a{color:red}.a b{color:blue}.a{margin:0}"
        );
    }

    #[test]
    fn deep_nesting() {
        assert_eq!(
            flat(".a { .b { & > .c { color: red; } } }"),
            ".a .b > .c{color:red}"
        );
    }

    #[test]
    fn nested_media_wraps_parent() {
        assert_eq!(
            flat(".a { color: red; @media (min-width: 40em) { color: blue; .b { margin: 0; } } }"),
            ".a{color:red}@media (min-width: 40em){.a{color:blue}.a .b{margin:0}}"
        );
    }

    #[test]
    fn media_blocks_are_flattened_inside() {
        assert_eq!(
            flat("@media print { .a { & .b { color: red; } } }"),
            "@media print{.a .b{color:red}}"
        );
    }
}
