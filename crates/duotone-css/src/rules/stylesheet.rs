//! Stylesheet tree.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::parser::ParseOptions;
use crate::rules::{Node, PrintOptions, StyleRule};
use crate::{Error, Result};

/// A parsed stylesheet: an ordered list of top-level rules and at-rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSheet {
    /// Top-level nodes in source order.
    pub nodes: Vec<Node>,
    /// Source file path, when loaded from disk.
    pub source_path: Option<PathBuf>,
}

impl StyleSheet {
    /// Create an empty stylesheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stylesheet from already-built nodes.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            source_path: None,
        }
    }

    /// Parse a stylesheet from CSS text with default (strict) options.
    pub fn parse(css: &str) -> Result<Self> {
        Self::parse_with(css, &ParseOptions::default())
    }

    /// Parse a stylesheet from CSS text.
    pub fn parse_with(css: &str, options: &ParseOptions) -> Result<Self> {
        let nodes = crate::parser::parse_css(css, options)?;
        Ok(Self::from_nodes(nodes))
    }

    /// Load a stylesheet from a CSS file.
    ///
    /// The source path is stored so watchers and build drivers can map the
    /// tree back to its file.
    pub fn from_file(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let mut sheet = Self::parse_with(&content, options)?;
        sheet.source_path = Some(path.to_path_buf());
        Ok(sheet)
    }

    /// Serialize the stylesheet.
    pub fn to_css(&self, options: &PrintOptions) -> String {
        crate::rules::printer::print_nodes(&self.nodes, options)
    }

    /// Append a node.
    pub fn push(&mut self, node: impl Into<Node>) {
        self.nodes.push(node.into());
    }

    /// Get the number of top-level nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the stylesheet is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over top-level nodes.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Iterate over top-level style rules.
    pub fn rules(&self) -> impl Iterator<Item = &StyleRule> {
        self.nodes.iter().filter_map(Node::as_rule)
    }

    /// Visit every style rule in the tree, including those nested in
    /// at-rule blocks and other rules, in document order.
    pub fn for_each_rule(&self, mut f: impl FnMut(&StyleRule)) {
        fn walk(nodes: &[Node], f: &mut dyn FnMut(&StyleRule)) {
            for node in nodes {
                match node {
                    Node::Rule(rule) => {
                        f(rule);
                        walk(&rule.children, f);
                    }
                    Node::AtRule(at_rule) => {
                        if let Some(block) = &at_rule.block {
                            walk(block, f);
                        }
                    }
                    Node::Declaration(_) => {}
                }
            }
        }
        walk(&self.nodes, &mut f);
    }
}

impl fmt::Display for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css(&PrintOptions::default()))
    }
}
