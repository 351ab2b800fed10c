//! Class names used by a page template.

use once_cell::sync::Lazy;
use regex::Regex;

/// Attributes whose values hold class names.
static CLASS_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|[\s<])(?:class|hover-class|placeholder-class)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("class attribute pattern")
});

static TERNARY_CONDITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z\d\\.\s=&\[\]<>!%]+\?").expect("ternary pattern"));

static PLAIN_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\s\da-z\-\\.]+$").expect("plain value pattern"));

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w-]+").expect("word pattern"));

/// Splits one class attribute value into class names.
///
/// Template expressions are tolerated: ternary conditions are dropped and the
/// remaining lowercase words are taken as class names.
pub fn extract_class_names(value: &str) -> Vec<String> {
    if value.len() < 2 {
        return Vec::new();
    }

    let value = TERNARY_CONDITION.replace_all(value, "");
    if PLAIN_VALUE.is_match(&value) {
        return value.split_whitespace().map(String::from).collect();
    }

    WORD.find_iter(&value)
        .map(|word| word.as_str())
        .filter(|word| word.len() > 1 && !word.chars().any(|c| c.is_ascii_uppercase()))
        .map(String::from)
        .collect()
}

/// Collects class names from every class attribute in a template, in
/// document order. Duplicates are kept.
pub fn parse_class_names(source: &str) -> Vec<String> {
    CLASS_ATTRIBUTE
        .captures_iter(source)
        .filter_map(|captures| captures.get(1).or_else(|| captures.get(2)))
        .flat_map(|value| extract_class_names(value.as_str()))
        .collect()
}
