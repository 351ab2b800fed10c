//! The atomic style rule table.
//!
//! Rules are authored as JSON records ([`RawRule`]) and compiled once into a
//! [`RuleTable`]:
//!
//! - every rule syntax is parsed into a [`SyntaxPattern`];
//! - dynamic rules (those with placeholder slots) get an anchored matcher;
//! - `--unit-*` and `--color-*` variable references in `expr` are extracted so
//!   static references are known without matching anything.
//!
//! ## Example
//!
//! ```rust
//! use acss::rule::RuleTable;
//!
//! let table = RuleTable::from_json(r#"[
//!     { "package": "spacing.padding.ext", "syntax": "pt-[U]", "expr": "padding-top: var(--unit-[U]);" },
//!     { "package": "border.core", "syntax": "border", "expr": "border: var(--unit-d5) solid var(--color-gray-4);" }
//! ]"#).unwrap();
//!
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.search("pt-20").len(), 1);
//! assert_eq!(table.get("border").unwrap().colors, vec!["gray-4"]);
//! ```

pub mod syntax;

pub use syntax::{Placeholders, Segment, SyntaxPattern};

use crate::error::Result;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

static UNIT_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"--unit-([0-9dp]+)").expect("unit reference pattern is valid"));

static COLOR_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"--color-([a-z]+(?:-[0-9]+(?:-a[0-9]+)?)?)").expect("color reference pattern is valid")
});

/// A rule record as authored in a rule file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRule {
    /// Dotted namespace, e.g. `spacing.padding.ext`.
    pub package: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    pub syntax: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compose: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
}

/// A compiled rule.
#[derive(Debug, Clone)]
pub struct AtomicStyleRule {
    pub package: String,
    pub desc: Option<String>,
    pub syntax: String,
    pub pattern: SyntaxPattern,
    /// Expressions this rule expands into, possibly with placeholders.
    pub compose: Vec<String>,
    /// Declaration template, possibly with placeholders.
    pub expr: Option<String>,
    /// Names of blocks that must be emitted alongside this rule.
    pub dependencies: Vec<String>,
    /// Unit tokens referenced literally by `expr`.
    pub units: Vec<String>,
    /// Color references (`theme-order[-aalpha]`) used literally by `expr`.
    pub colors: Vec<String>,
    matcher: Option<Regex>,
}

impl AtomicStyleRule {
    /// Compiles a raw record, failing fast on a malformed syntax.
    pub fn compile(raw: RawRule) -> Result<Self> {
        let pattern = SyntaxPattern::parse(&raw.syntax)?;
        let matcher = if pattern.is_dynamic() {
            Some(pattern.to_regex()?)
        } else {
            None
        };

        let expr = raw.expr.filter(|expr| !expr.is_empty());
        let (units, colors) = match &expr {
            Some(expr) => (
                extract_references(&UNIT_REFERENCE, expr),
                extract_references(&COLOR_REFERENCE, expr),
            ),
            None => (Vec::new(), Vec::new()),
        };

        Ok(Self {
            package: raw.package,
            desc: raw.desc,
            syntax: raw.syntax,
            pattern,
            compose: raw.compose.unwrap_or_default(),
            expr,
            dependencies: raw.dependencies.unwrap_or_default(),
            units,
            colors,
            matcher,
        })
    }

    pub fn is_dynamic(&self) -> bool {
        self.matcher.is_some()
    }

    /// Returns true if this dynamic rule accepts the whole expression.
    pub fn matches(&self, expression: &str) -> bool {
        self.matcher
            .as_ref()
            .is_some_and(|matcher| matcher.is_match(expression))
    }

    /// Runs the matcher against an expression. Static rules never capture.
    pub fn captures<'e>(&self, expression: &'e str) -> Option<Captures<'e>> {
        self.matcher.as_ref()?.captures(expression)
    }
}

fn extract_references(pattern: &Regex, expr: &str) -> Vec<String> {
    pattern
        .captures_iter(expr)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// The loaded rule table: rules in authored order plus a lookup map.
///
/// The map is keyed by the literal syntax of static rules and by the leading
/// literal of dynamic rules (see [`SyntaxPattern::key`]). A static rule is
/// never displaced from the map by a dynamic key.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rule_map: HashMap<String, usize>,
    rules: Vec<AtomicStyleRule>,
}

impl RuleTable {
    /// Compiles raw records. Any malformed syntax fails the whole table.
    pub fn new(raw_rules: Vec<RawRule>) -> Result<Self> {
        let mut rule_map: HashMap<String, usize> = HashMap::new();
        let mut rules: Vec<AtomicStyleRule> = Vec::with_capacity(raw_rules.len());

        for raw in raw_rules {
            let rule = AtomicStyleRule::compile(raw)?;
            let index = rules.len();
            let key = rule.pattern.key();

            if rule.is_dynamic() {
                let taken_by_static = rule_map
                    .get(&key)
                    .is_some_and(|&existing| !rules[existing].is_dynamic());
                if !taken_by_static {
                    rule_map.insert(key, index);
                }
            } else {
                rule_map.insert(key, index);
            }
            rules.push(rule);
        }

        log::debug!(
            "compiled {} rules, {} dynamic",
            rules.len(),
            rules.iter().filter(|rule| rule.is_dynamic()).count()
        );
        Ok(Self { rule_map, rules })
    }

    /// Parses a JSON array of rule records.
    pub fn from_json(source: &str) -> Result<Self> {
        let raw: Vec<RawRule> = serde_json::from_str(source)?;
        Self::new(raw)
    }

    /// Reads and parses a JSON rule file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    pub fn rules(&self) -> &[AtomicStyleRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Exact lookup by map key.
    pub fn get(&self, name: &str) -> Option<&AtomicStyleRule> {
        self.rule_map.get(name).map(|&index| &self.rules[index])
    }

    /// Finds every rule an expression refers to.
    ///
    /// - An empty expression finds nothing.
    /// - An expression containing `.` is a package import: every static rule
    ///   whose package contains the expression is returned.
    /// - Otherwise an exact map hit wins, unless it is a dynamic rule whose
    ///   matcher rejects the expression.
    /// - Otherwise every dynamic rule whose matcher accepts the expression is
    ///   returned, in table order.
    pub fn search(&self, expression: &str) -> Vec<&AtomicStyleRule> {
        if expression.is_empty() {
            return Vec::new();
        }

        if expression.contains('.') {
            return self
                .rules
                .iter()
                .filter(|rule| !rule.is_dynamic() && rule.package.contains(expression))
                .collect();
        }

        if let Some(rule) = self.get(expression) {
            if !rule.is_dynamic() || rule.matches(expression) {
                return vec![rule];
            }
        }

        self.rules
            .iter()
            .filter(|rule| rule.matches(expression))
            .collect()
    }
}

impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut packages: Vec<(&str, Vec<&str>)> = Vec::new();
        for rule in &self.rules {
            match packages.iter_mut().find(|(name, _)| *name == rule.package) {
                Some((_, syntaxes)) => syntaxes.push(rule.syntax.as_str()),
                None => packages.push((rule.package.as_str(), vec![rule.syntax.as_str()])),
            }
        }

        writeln!(
            f,
            "total {} packages and {} rules",
            packages.len(),
            self.rules.len()
        )?;
        for (index, (package, syntaxes)) in packages.iter().enumerate() {
            writeln!(
                f,
                "{:>2}) package = {}, syntax = [{}]",
                index + 1,
                package,
                syntaxes.join(",")
            )?;
        }
        Ok(())
    }
}
