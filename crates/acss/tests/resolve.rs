//! Integration tests for expression resolution.
//!
//! Resolution runs against the bundled rule and theme data:
//! - Static rules and package imports
//! - Dynamic rules and parameter extraction
//! - Composition order and transitive references
//! - Dependencies (keyframes)
//! - Misses and inert rules

use acss::format::CssFormat;
use acss::resolve::{Resolver, StyleInfo};
use acss::rule::{RawRule, RuleTable};
use acss::theme::ThemeMap;

const RULES: &str = include_str!("../../../data/rules.json");
const THEMES: &str = include_str!("../../../data/themes.json");

struct Fixture {
    rules: RuleTable,
    themes: ThemeMap,
    format: CssFormat,
}

impl Fixture {
    fn bundled() -> Self {
        Self::with_rules(RuleTable::from_json(RULES).unwrap())
    }

    fn with_rules(rules: RuleTable) -> Self {
        Self {
            rules,
            themes: ThemeMap::from_json(THEMES).unwrap(),
            format: CssFormat::default(),
        }
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.rules, &self.themes, "antd", &self.format)
    }
}

fn rule(syntax: &str, compose: &[&str], expr: Option<&str>) -> RawRule {
    RawRule {
        package: "test.core".into(),
        syntax: syntax.into(),
        compose: (!compose.is_empty()).then(|| compose.iter().map(|c| c.to_string()).collect()),
        expr: expr.map(String::from),
        ..Default::default()
    }
}

// ============================================================================
// STATIC RULES
// ============================================================================

#[test]
fn test_every_static_expr_rule_resolves_to_its_declaration() {
    let fixture = Fixture::bundled();
    let resolver = fixture.resolver();

    for rule in fixture.rules.rules().iter().filter(|rule| !rule.is_dynamic()) {
        let Some(expr) = &rule.expr else { continue };
        let info = resolver.resolve(&rule.syntax);
        assert!(info.warnings.is_empty(), "{}", rule.syntax);
        assert_eq!(info.styles.len(), 1, "{}", rule.syntax);
        assert!(info.styles[0].contains(expr.as_str()), "{}", rule.syntax);
    }
}

#[test]
fn test_static_rule_block() {
    let fixture = Fixture::bundled();
    let info = fixture.resolver().resolve("border");
    assert_eq!(
        info.styles,
        vec![".border {\n    border: var(--unit-d5) solid var(--color-gray-4);\n}\n"]
    );
    assert_eq!(info.units, vec!["d5"]);
    assert_eq!(info.colors, vec!["gray-4"]);
}

#[test]
fn test_package_import_folds_all_rules() {
    let fixture = Fixture::bundled();
    let info = fixture.resolver().resolve("layout.float.core");
    insta::assert_snapshot!(info.styles[0], @r"
    .layout.float.core {
        position: absolute;
        position: relative;
    }
    ");
}

// ============================================================================
// DYNAMIC RULES
// ============================================================================

#[test]
fn test_unit_parameter() {
    let fixture = Fixture::bundled();
    let info = fixture.resolver().resolve("mt-d5");
    assert_eq!(info.units, vec!["d5"]);
    assert_eq!(info.styles, vec![".mt-d5 {\n    margin-top: var(--unit-d5);\n}\n"]);
}

#[test]
fn test_color_parameters() {
    let fixture = Fixture::bundled();
    let resolver = fixture.resolver();

    assert_eq!(resolver.resolve("bg-red").colors, vec!["red-1"]);
    assert_eq!(resolver.resolve("bg-red-2").colors, vec!["red-2"]);
    assert_eq!(resolver.resolve("bg-red-a5").colors, vec!["red-1-5"]);
    assert_eq!(resolver.resolve("bg-red-2-a5").colors, vec!["red-2-5"]);

    let info = resolver.resolve("bg-red-a5");
    assert!(info.styles[0].contains("background-color: var(--color-red-1-5);"));
}

#[test]
fn test_single_color_theme_order_is_alpha() {
    let fixture = Fixture::bundled();
    let resolver = fixture.resolver();

    let info = resolver.resolve("bg-black-5");
    assert_eq!(info.colors, vec!["black-1-5"]);
    assert!(info.styles[0].contains("var(--color-black-1-5)"));

    let info = resolver.resolve("text-brand-3");
    assert_eq!(info.colors, vec!["brand-1-3"]);
    assert!(info.styles[0].contains("color: var(--color-brand-1-3);"));

    let info = resolver.resolve("text-gray-3");
    assert_eq!(info.colors, vec!["gray-3"]);
}

#[test]
fn test_number_parameter_without_color() {
    let fixture = Fixture::bundled();
    let info = fixture.resolver().resolve("opacity-5");
    assert!(info.colors.is_empty());
    assert_eq!(info.styles, vec![".opacity-5 {\n    opacity: 0.5;\n}\n"]);
}

// ============================================================================
// COMPOSITION
// ============================================================================

#[test]
fn test_composition_folds_into_one_block() {
    let fixture = Fixture::bundled();
    let info = fixture.resolver().resolve("px-20");
    assert_eq!(info.units, vec!["20"]);
    insta::assert_snapshot!(info.styles[0], @r"
    .px-20 {
        padding-right: var(--unit-20);
        padding-left: var(--unit-20);
    }
    ");
}

#[test]
fn test_composition_is_depth_first_most_recent_first() {
    let fixture = Fixture::bundled();
    let info = fixture.resolver().resolve("tip-warn");
    assert_eq!(info.units, vec!["20", "10"]);
    assert_eq!(info.colors, vec!["orange-2"]);
    assert!(info.warnings.is_empty());
    insta::assert_snapshot!(info.styles[0], @r"
    .tip-warn {
        gap: var(--unit-20);
        align-items: center;
        display: flex; flex-direction: row;
        border-radius: var(--unit-10);
        padding-bottom: var(--unit-20);
        padding-top: var(--unit-20);
        padding-right: var(--unit-20);
        padding-left: var(--unit-20);
        background-color: var(--color-orange-2);
    }
    ");
}

#[test]
fn test_composition_collects_static_child_references() {
    let fixture = Fixture::bundled();
    let info = fixture.resolver().resolve("shadow");
    assert_eq!(info.units, vec!["6", "12"]);
    assert_eq!(info.colors, vec!["gray-5-a05"]);
    assert_eq!(
        info.styles,
        vec![".shadow {\n    box-shadow: 0 var(--unit-6) var(--unit-12) var(--color-gray-5-a05);\n}\n"]
    );
}

#[test]
fn test_composed_child_without_rule_is_dropped() {
    let rules = RuleTable::new(vec![
        rule("broken", &["nothing-here", "pos-abs"], None),
        rule("pos-abs", &[], Some("position: absolute;")),
    ])
    .unwrap();
    let fixture = Fixture::with_rules(rules);
    let info = fixture.resolver().resolve("broken");
    assert!(info.warnings.is_empty());
    assert_eq!(info.styles, vec![".broken {\n    position: absolute;\n}\n"]);
}

#[test]
fn test_compose_cycle_terminates() {
    let rules = RuleTable::new(vec![rule("loop", &["loop"], None)]).unwrap();
    let fixture = Fixture::with_rules(rules);
    let info = fixture.resolver().resolve("loop");
    assert!(info.styles.is_empty());
    assert!(info.warnings.is_empty());
}

#[test]
fn test_overlapping_dynamic_rules_share_one_block() {
    let rules = RuleTable::new(vec![
        rule("sz-[U]", &[], Some("width: var(--unit-[U]);")),
        rule("sz-[N]", &[], Some("z-index: [N];")),
    ])
    .unwrap();
    let fixture = Fixture::with_rules(rules);
    let info = fixture.resolver().resolve("sz-20");
    assert_eq!(
        info.styles,
        vec![".sz-20 {\n    width: var(--unit-20);\n    z-index: 20;\n}\n"]
    );
}

// ============================================================================
// DEPENDENCIES AND MISSES
// ============================================================================

#[test]
fn test_keyframe_dependency_propagates() {
    let fixture = Fixture::bundled();
    let info = fixture.resolver().resolve("animate-spin");
    assert_eq!(info.class_names, vec!["@keyframes spin"]);
    assert_eq!(
        info.styles,
        vec![".animate-spin {\n    animation: spin 1s linear infinite;\n}\n"]
    );
}

#[test]
fn test_unmatched_expression() {
    let fixture = Fixture::bundled();
    let info = fixture.resolver().resolve("totally-unknown-xyz");
    assert_eq!(
        info,
        StyleInfo {
            warnings: vec!["totally-unknown-xyz".to_string()],
            ..StyleInfo::default()
        }
    );
    assert!(info.is_unmatched());
}

#[test]
fn test_resolution_is_idempotent() {
    let fixture = Fixture::bundled();
    let resolver = fixture.resolver();
    for expression in ["tip-warn", "bg-red-2-a5", "shadow", "nope"] {
        assert_eq!(resolver.resolve(expression), resolver.resolve(expression));
    }
}

#[test]
fn test_minified_block() {
    let mut fixture = Fixture::bundled();
    fixture.format.minify = true;
    let info = fixture.resolver().resolve("mx-4");
    assert_eq!(
        info.styles,
        vec![".mx-4{margin-right:var(--unit-4);margin-left:var(--unit-4)}"]
    );
}
