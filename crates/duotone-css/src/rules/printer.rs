//! Stylesheet serialization.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::rules::{AtRule, Declaration, Node, StyleRule};

/// Output formatting style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    /// One declaration per line, indented blocks.
    #[default]
    Pretty,
    /// No optional whitespace.
    Compact,
}

/// Printer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PrintOptions {
    /// Output formatting style.
    pub style: OutputStyle,
    /// Spaces per nesting level in pretty output.
    pub indent: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            style: OutputStyle::Pretty,
            indent: 2,
        }
    }
}

impl PrintOptions {
    /// Compact output.
    pub fn compact() -> Self {
        Self {
            style: OutputStyle::Compact,
            ..Self::default()
        }
    }
}

pub(super) fn print_nodes(nodes: &[Node], options: &PrintOptions) -> String {
    let mut printer = Printer {
        out: String::new(),
        options,
    };

    for (i, node) in nodes.iter().enumerate() {
        if i > 0 && options.style == OutputStyle::Pretty {
            printer.out.push('\n');
        }
        printer.node(node, 0, i + 1 == nodes.len());
    }

    printer.out
}

struct Printer<'a> {
    out: String,
    options: &'a PrintOptions,
}

impl Printer<'_> {
    fn pretty(&self) -> bool {
        self.options.style == OutputStyle::Pretty
    }

    fn indent(&mut self, depth: usize) {
        if self.pretty() {
            let width = depth * self.options.indent;
            let _ = write!(self.out, "{:width$}", "");
        }
    }

    fn node(&mut self, node: &Node, depth: usize, last: bool) {
        match node {
            Node::Rule(rule) => self.rule(rule, depth),
            Node::AtRule(at_rule) => self.at_rule(at_rule, depth),
            Node::Declaration(decl) => self.declaration(decl, depth, last),
        }
    }

    fn rule(&mut self, rule: &StyleRule, depth: usize) {
        self.indent(depth);
        self.out.push_str(&rule.selector);
        self.block(&rule.children, depth);
    }

    fn at_rule(&mut self, at_rule: &AtRule, depth: usize) {
        self.indent(depth);
        self.out.push('@');
        self.out.push_str(&at_rule.name);
        if !at_rule.prelude.is_empty() {
            self.out.push(' ');
            self.out.push_str(&at_rule.prelude);
        }

        match &at_rule.block {
            Some(children) => self.block(children, depth),
            None => {
                self.out.push(';');
                if self.pretty() {
                    self.out.push('\n');
                }
            }
        }
    }

    fn block(&mut self, children: &[Node], depth: usize) {
        if self.pretty() {
            if children.is_empty() {
                self.out.push_str(" {}\n");
                return;
            }
            self.out.push_str(" {\n");
        } else {
            self.out.push('{');
        }

        for (i, child) in children.iter().enumerate() {
            self.node(child, depth + 1, i + 1 == children.len());
        }

        self.indent(depth);
        self.out.push('}');
        if self.pretty() {
            self.out.push('\n');
        }
    }

    fn declaration(&mut self, decl: &Declaration, depth: usize, last: bool) {
        self.indent(depth);
        self.out.push_str(&decl.property);
        self.out.push(':');
        if self.pretty() && !decl.value.is_empty() {
            self.out.push(' ');
        }
        self.out.push_str(&decl.value);
        if decl.important {
            if self.pretty() {
                self.out.push(' ');
            }
            self.out.push_str("!important");
        }

        if self.pretty() {
            self.out.push_str(";\n");
        } else if !last {
            self.out.push(';');
        }
    }
}
