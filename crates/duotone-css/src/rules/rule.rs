//! Rule, at-rule and declaration nodes.

/// A single `property: value` declaration.
///
/// The value is kept as raw source text (trimmed) with any trailing
/// `!important` removed and recorded in [`Declaration::important`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name as written (custom properties keep their case).
    pub property: String,
    /// Raw value text.
    pub value: String,
    /// Whether the declaration carried `!important`.
    pub important: bool,
}

impl Declaration {
    /// Create a normal declaration.
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            important: false,
        }
    }

    /// Create an `!important` declaration.
    pub fn important(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            important: true,
            ..Self::new(property, value)
        }
    }
}

/// A style rule: a selector list and its body.
///
/// The body holds declarations and, for nested CSS, child rules and
/// conditional at-rules in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// Raw selector text, possibly a comma-separated list.
    pub selector: String,
    /// Body items in source order.
    pub children: Vec<Node>,
}

impl StyleRule {
    /// Create an empty rule.
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            children: vec![],
        }
    }

    /// Create a rule holding only declarations.
    pub fn with_declarations(
        selector: impl Into<String>,
        declarations: impl IntoIterator<Item = Declaration>,
    ) -> Self {
        Self {
            selector: selector.into(),
            children: declarations.into_iter().map(Node::Declaration).collect(),
        }
    }

    /// Iterate over the declarations directly in this rule's body.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.children.iter().filter_map(Node::as_declaration)
    }

    /// Whether the body contains nested rules or at-rules.
    pub fn has_nested_rules(&self) -> bool {
        self.children
            .iter()
            .any(|child| !matches!(child, Node::Declaration(_)))
    }

    /// Whether the body is empty.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// An at-rule such as `@media`, `@import` or `@font-face`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    /// Name without the leading `@`.
    pub name: String,
    /// Raw prelude text between the name and the block or semicolon.
    pub prelude: String,
    /// Block contents, `None` for statement at-rules ending in `;`.
    pub block: Option<Vec<Node>>,
}

impl AtRule {
    /// Create a statement at-rule (`@import url(x.css);`).
    pub fn statement(name: impl Into<String>, prelude: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prelude: prelude.into(),
            block: None,
        }
    }

    /// Create a block at-rule.
    pub fn with_block(name: impl Into<String>, prelude: impl Into<String>, block: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            prelude: prelude.into(),
            block: Some(block),
        }
    }

    /// Whether this is a `@keyframes` rule, including vendor-prefixed forms.
    pub fn is_keyframes(&self) -> bool {
        self.name.to_ascii_lowercase().ends_with("keyframes")
    }

    /// Whether the block holds rules that apply conditionally to the same
    /// elements as the enclosing context (`@media`, `@supports`, ...).
    pub fn is_conditional_group(&self) -> bool {
        matches!(
            self.name.to_ascii_lowercase().as_str(),
            "media" | "supports" | "container" | "layer" | "scope" | "starting-style" | "document"
        )
    }
}

/// A node in the stylesheet tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A style rule.
    Rule(StyleRule),
    /// An at-rule.
    AtRule(AtRule),
    /// A declaration inside a rule or at-rule body.
    Declaration(Declaration),
}

impl Node {
    /// Borrow as a style rule.
    pub fn as_rule(&self) -> Option<&StyleRule> {
        match self {
            Node::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    /// Borrow as an at-rule.
    pub fn as_at_rule(&self) -> Option<&AtRule> {
        match self {
            Node::AtRule(rule) => Some(rule),
            _ => None,
        }
    }

    /// Borrow as a declaration.
    pub fn as_declaration(&self) -> Option<&Declaration> {
        match self {
            Node::Declaration(decl) => Some(decl),
            _ => None,
        }
    }
}

impl From<StyleRule> for Node {
    fn from(rule: StyleRule) -> Self {
        Node::Rule(rule)
    }
}

impl From<AtRule> for Node {
    fn from(rule: AtRule) -> Self {
        Node::AtRule(rule)
    }
}

impl From<Declaration> for Node {
    fn from(decl: Declaration) -> Self {
        Node::Declaration(decl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_creation() {
        let rule = StyleRule::with_declarations(
            ".card",
            [Declaration::new("color", "red"), Declaration::important("margin", "0")],
        );

        assert_eq!(rule.declarations().count(), 2);
        assert!(!rule.has_nested_rules());
        assert!(rule.declarations().nth(1).unwrap().important);
    }

    #[test]
    fn nested_rule_detection() {
        let mut rule = StyleRule::new(".card");
        rule.children.push(Declaration::new("color", "red").into());
        rule.children.push(StyleRule::new("&:hover").into());

        assert!(rule.has_nested_rules());
        assert_eq!(rule.declarations().count(), 1);
    }

    #[test]
    fn at_rule_kinds() {
        assert!(AtRule::with_block("keyframes", "spin", vec![]).is_keyframes());
        assert!(AtRule::with_block("-webkit-keyframes", "spin", vec![]).is_keyframes());
        assert!(AtRule::with_block("media", "(min-width: 10px)", vec![]).is_conditional_group());
        assert!(!AtRule::with_block("font-face", "", vec![]).is_conditional_group());
        assert!(!AtRule::statement("import", "url(a.css)").is_keyframes());
    }
}
