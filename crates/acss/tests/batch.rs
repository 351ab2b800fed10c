//! Integration tests for batch runs: rule text, variable block, dependency
//! blocks and the value error policy.

use acss::AcssError;
use acss::batch::{BatchFormatter, BatchOutcome, BatchOutput, CssOption};
use acss::rule::RuleTable;
use acss::theme::ThemeMap;
use std::collections::HashSet;

const RULES: &str = include_str!("../../../data/rules.json");
const THEMES: &str = include_str!("../../../data/themes.json");

fn run_with(option: &CssOption, expressions: &[&str], existing: &[&str]) -> acss::error::Result<BatchOutcome> {
    let rules = RuleTable::from_json(RULES).unwrap();
    let themes = ThemeMap::from_json(THEMES).unwrap();
    let formatter = BatchFormatter::new(&rules, &themes, option);
    let expressions: Vec<String> = expressions.iter().map(|e| e.to_string()).collect();
    let existing: HashSet<String> = existing.iter().map(|e| e.to_string()).collect();
    formatter.run(&expressions, &existing)
}

fn emitted(option: &CssOption, expressions: &[&str], existing: &[&str]) -> BatchOutput {
    match run_with(option, expressions, existing).unwrap() {
        BatchOutcome::Emit(output) => output,
        BatchOutcome::Nothing { warnings } => panic!("nothing emitted, warnings = {:?}", warnings),
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

#[test]
fn test_variable_block() {
    let output = emitted(&CssOption::default(), &["tip-warn", "border"], &[]);
    assert_eq!(output.units, vec!["d5", "10", "20"]);
    insta::assert_snapshot!(output.vars, @r"
    page {
        --unit-d5: 0.067vmin;
        --unit-10: 1.333vmin;
        --unit-20: 2.667vmin;
        --color-gray-4: #f0f0f0;
        --color-orange-2: #ffe7ba;
    }
    ");
}

#[test]
fn test_rules_in_resolution_order() {
    let output = emitted(&CssOption::default(), &["mt-2", "border"], &[]);
    assert_eq!(
        output.rules,
        ".mt-2 {\n    margin-top: var(--unit-2);\n}\n\
         .border {\n    border: var(--unit-d5) solid var(--color-gray-4);\n}\n"
    );
}

#[test]
fn test_partial_success_reports_misses() {
    let output = emitted(&CssOption::default(), &["nope", "mt-2", "zzz-1"], &[]);
    assert_eq!(output.warnings, vec!["nope", "zzz-1"]);
    assert!(output.rules.starts_with(".mt-2 {"));
}

#[test]
fn test_nothing_when_all_miss() {
    let outcome = run_with(&CssOption::default(), &["nope", "zzz-1"], &[]).unwrap();
    assert_eq!(
        outcome,
        BatchOutcome::Nothing {
            warnings: vec!["nope".to_string(), "zzz-1".to_string()]
        }
    );
    assert!(outcome.is_nothing());
}

#[test]
fn test_minified_output() {
    let option = CssOption {
        minify: true,
        ..CssOption::default()
    };
    let output = emitted(&option, &["px-20"], &[]);
    assert_eq!(
        output.rules,
        ".px-20{padding-right:var(--unit-20);padding-left:var(--unit-20)}"
    );
    assert_eq!(output.vars, "page{--unit-20:2.667vmin}");
}

#[test]
fn test_variable_prefixes_apply_to_rules_and_vars() {
    let option = CssOption {
        root_element_name: ":root".into(),
        var_prefix: "ui-".into(),
        var_unit_prefix: "u".into(),
        var_color_prefix: "c".into(),
        ..CssOption::default()
    };
    let output = emitted(&option, &["bg-red-2"], &[]);
    assert_eq!(
        output.rules,
        ".bg-red-2 {\n    background-color: var(--ui-cred-2);\n}\n"
    );
    assert_eq!(output.vars, ":root {\n    --ui-cred-2: #ffccc7;\n}");
}

// ============================================================================
// DEPENDENCIES
// ============================================================================

#[test]
fn test_keyframes_emitted_once() {
    let output = emitted(&CssOption::default(), &["animate-spin", "mt-2"], &[]);
    assert_eq!(output.class_names, vec!["@keyframes spin"]);
    insta::assert_snapshot!(output.rules, @r"
    .animate-spin {
        animation: spin 1s linear infinite;
    }
    .mt-2 {
        margin-top: var(--unit-2);
    }
    @keyframes spin {
        from { transform: rotate(0deg); } to { transform: rotate(360deg); }
    }
    ");
}

#[test]
fn test_existing_dependency_not_emitted() {
    let output = emitted(&CssOption::default(), &["animate-spin"], &["@keyframes spin"]);
    assert!(!output.rules.contains("@keyframes"));
}

// ============================================================================
// VALUE ERRORS
// ============================================================================

#[test]
fn test_lenient_mode_skips_bad_variables() {
    let output = emitted(&CssOption::default(), &["bg-purple-2", "bg-red-11", "mt-2"], &[]);
    assert_eq!(output.value_errors.len(), 2);
    assert_eq!(output.vars, "page {\n    --unit-2: 0.267vmin;\n}");
    assert!(output.rules.contains(".bg-purple-2 {"));
}

#[test]
fn test_strict_mode_fails_batch() {
    let option = CssOption {
        strict_values: true,
        ..CssOption::default()
    };
    let result = run_with(&option, &["mt-2", "bg-purple-2"], &[]);
    assert!(matches!(result, Err(AcssError::MissingTheme { .. })));
}
