//! Light/dark selector synthesis.

use std::collections::HashSet;
use std::hash::Hash;

use super::{ScopeKind, SelectorList, classify};
use crate::options::ThemeOptions;

/// Insertion-ordered set: a sequence plus a membership check.
#[derive(Debug, Clone)]
pub struct OrderedSet<T> {
    items: Vec<T>,
    seen: HashSet<T>,
}

impl<T: Eq + Hash + Clone> OrderedSet<T> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            items: vec![],
            seen: HashSet::new(),
        }
    }

    /// Insert a value unless already present. Returns whether it was added.
    pub fn insert(&mut self, value: T) -> bool {
        if self.seen.contains(&value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.items.push(value);
        true
    }

    /// Items in first-insertion order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume into the ordered items.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Eq + Hash + Clone> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash + Clone> Extend<T> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl OrderedSet<String> {
    /// Join the items with a separator.
    pub fn join(&self, separator: &str) -> String {
        self.items.join(separator)
    }
}

/// The selector pair for a rule's synthesized light and dark rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSelectors {
    /// Selector list of the light rule.
    pub light: String,
    /// Selector list of the dark rule.
    pub dark: String,
}

/// Compute the light and dark selectors for a rule's selector list.
///
/// When every selector is a simple theme scope the canonical root pair is
/// produced. Otherwise each non-scope selector keeps its unthemed form (only
/// when there are no scope selectors) and gains a light- and dark-prefixed
/// copy, while scope selectors collapse into the theme scopes themselves.
pub fn theme_selectors(list: &SelectorList, theme: &ThemeOptions) -> ThemeSelectors {
    let kinds: Vec<ScopeKind> = list
        .iter()
        .map(|selector| classify(selector, &theme.attribute))
        .collect();

    let light_scope = theme.light_scope();
    let dark_scope = theme.dark_scope();

    if !kinds.is_empty() && kinds.iter().all(|kind| kind.is_simple()) {
        return ThemeSelectors {
            light: format!("{}, {}", ThemeOptions::ROOT_SCOPE, light_scope),
            dark: dark_scope,
        };
    }

    let others: Vec<&String> = list
        .iter()
        .zip(&kinds)
        .filter(|(_, kind)| !kind.is_simple())
        .map(|(selector, _)| selector)
        .collect();
    let has_simple = kinds.iter().any(|kind| kind.is_simple());
    let has_root = kinds.contains(&ScopeKind::Root);

    let mut light = OrderedSet::new();
    let mut dark = OrderedSet::new();

    if !has_simple {
        light.extend(others.iter().map(|selector| selector.to_string()));
    }
    if has_root {
        light.insert(ThemeOptions::ROOT_SCOPE.to_string());
    }
    if has_simple {
        light.insert(light_scope.clone());
        dark.insert(dark_scope.clone());
    }
    light.extend(others.iter().map(|selector| format!("{light_scope} {selector}")));
    dark.extend(others.iter().map(|selector| format!("{dark_scope} {selector}")));

    ThemeSelectors {
        light: light.join(", "),
        dark: dark.join(", "),
    }
}
