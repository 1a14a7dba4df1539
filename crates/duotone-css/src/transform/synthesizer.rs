//! Phase 2: building the light and dark rules for a collected rule.

use super::collector::ThemedDeclaration;
use crate::Result;
use crate::options::ThemeOptions;
use crate::rules::StyleRule;
use crate::selector::{SelectorList, nest_explicitly, theme_selectors};
use crate::value::ThemeBranch;

/// Build the light rule and the dark rule for a source rule's selector and
/// its collected declarations. Each declaration appears once in each rule,
/// with its `!important` flag preserved.
///
/// When `nested` is set the rule sits inside another style rule, so its
/// selectors are made relative to the parent with `&` before the theme scope
/// is prefixed. Otherwise the scope would land between parent and child.
pub fn synthesize(
    selector: &str,
    themed: &[ThemedDeclaration],
    theme: &ThemeOptions,
    nested: bool,
) -> Result<(StyleRule, StyleRule)> {
    let mut list = SelectorList::parse(selector)?;
    if nested {
        list = SelectorList::from_selectors(list.iter().map(|s| nest_explicitly(s)));
    }
    let selectors = theme_selectors(&list, theme);

    let light = StyleRule::with_declarations(
        selectors.light,
        themed.iter().map(|decl| decl.resolve(ThemeBranch::Light)),
    );
    let dark = StyleRule::with_declarations(
        selectors.dark,
        themed.iter().map(|decl| decl.resolve(ThemeBranch::Dark)),
    );

    Ok((light, dark))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Declaration;
    use crate::value::scan_value;

    fn themed(property: &str, value: &str, important: bool) -> ThemedDeclaration {
        ThemedDeclaration {
            property: property.into(),
            tokens: scan_value(value).unwrap(),
            important,
        }
    }

    #[test]
    fn root_rule_pair() {
        let (light, dark) = synthesize(
            ":root",
            &[themed("--surface", "light-dark(#fff, #000)", false)],
            &ThemeOptions::default(),
            false,
        )
        .unwrap();

        assert_eq!(light.selector, r#":where(:root), :where([data-theme="light"])"#);
        assert_eq!(light.declarations().collect::<Vec<_>>(), vec![&Declaration::new("--surface", "#fff")]);
        assert_eq!(dark.selector, r#":where([data-theme="dark"])"#);
        assert_eq!(dark.declarations().collect::<Vec<_>>(), vec![&Declaration::new("--surface", "#000")]);
    }

    #[test]
    fn important_is_copied_to_both() {
        let (light, dark) = synthesize(
            ".foo",
            &[
                themed("color", "light-dark(red, blue)", true),
                themed("background", "url(a.png) light-dark(#fff, #000)", false),
            ],
            &ThemeOptions::default(),
            false,
        )
        .unwrap();

        let light: Vec<_> = light.declarations().cloned().collect();
        let dark: Vec<_> = dark.declarations().cloned().collect();
        assert_eq!(
            light,
            vec![
                Declaration::important("color", "red"),
                Declaration::new("background", "url(a.png) #fff"),
            ]
        );
        assert_eq!(
            dark,
            vec![
                Declaration::important("color", "blue"),
                Declaration::new("background", "url(a.png) #000"),
            ]
        );
    }

    #[test]
    fn nested_selectors_keep_the_parent_outside_the_scope() {
        let (light, dark) = synthesize(
            ".title, &:hover",
            &[themed("color", "light-dark(red, blue)", false)],
            &ThemeOptions::default(),
            true,
        )
        .unwrap();

        assert_eq!(
            light.selector,
            r#"& .title, &:hover, :where([data-theme="light"]) & .title, :where([data-theme="light"]) &:hover"#
        );
        assert_eq!(
            dark.selector,
            r#":where([data-theme="dark"]) & .title, :where([data-theme="dark"]) &:hover"#
        );
    }

    #[test]
    fn invalid_selector_is_an_error() {
        let result = synthesize(
            "a,",
            &[themed("color", "light-dark(red, blue)", false)],
            &ThemeOptions::default(),
            false,
        );
        assert!(result.is_err());
    }
}
