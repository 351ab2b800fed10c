//! Expression resolution.
//!
//! Resolving a class-name expression finds its rules, extracts placeholder
//! parameters, expands composed rules and folds every declaration reached into
//! a single block named after the expression.
//!
//! Expansion is depth-first: the children of a composed rule are queued at the
//! front of the work list, so the most recently discovered rule is processed
//! next. This order decides the order of declarations inside the block.
//!
//! Units and colors are only collected as references here; turning them into
//! values is the job of [`crate::values`].

use crate::format::CssFormat;
use crate::rule::{AtomicStyleRule, RuleTable};
use crate::theme::ThemeMap;
use regex::Captures;
use std::collections::{HashSet, VecDeque};

/// Upper bound on processed work-list entries for one expression.
pub const MAX_EXPANSIONS: usize = 512;

/// Parameter values captured from one expression by one dynamic rule.
///
/// When a color is captured without an order, the order is `1`. When the
/// color has a single shade (a scalar color or a one-color ramp), a captured
/// order is really a transparency and is moved to `alpha`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyValueParameter {
    pub unit: Option<String>,
    pub number: Option<String>,
    pub color: Option<String>,
    pub alpha: Option<String>,
    order_as_alpha: bool,
}

impl PropertyValueParameter {
    /// Builds parameters from matcher captures. `is_single_color` decides
    /// whether a theme has an order dimension.
    pub fn from_captures(caps: &Captures<'_>, is_single_color: impl Fn(&str) -> bool) -> Self {
        let group = |name: &str| {
            caps.name(name)
                .map(|m| m.as_str().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut para = Self {
            unit: group("U"),
            number: group("N"),
            color: group("C"),
            alpha: group("A"),
            order_as_alpha: false,
        };

        if let Some(color) = &para.color {
            if para.alpha.is_none() && para.number.is_some() && is_single_color(color) {
                para.alpha = para.number.take();
                para.order_as_alpha = true;
            }
            if para.number.is_none() {
                para.number = Some("1".to_string());
            }
        }
        para
    }

    /// Color reference string: `color`, `color-number`, `color-alpha` or
    /// `color-number-alpha`.
    pub fn color_reference(&self) -> Option<String> {
        let color = self.color.as_ref()?;
        Some(match (&self.number, &self.alpha) {
            (None, None) => color.clone(),
            (Some(number), None) => format!("{}-{}", color, number),
            (None, Some(alpha)) => format!("{}-{}", color, alpha),
            (Some(number), Some(alpha)) => format!("{}-{}-{}", color, number, alpha),
        })
    }

    /// Fills the placeholders of a declaration template.
    ///
    /// A template without `[A]` still receives a moved alpha through `[N]`
    /// (`--color-[C]-[N]` becomes `--color-black-1-5`), so it names the same
    /// variable as [`color_reference`](Self::color_reference).
    pub fn substitute(&self, template: &str) -> String {
        let number = match (&self.number, &self.alpha) {
            (Some(number), Some(alpha)) if self.order_as_alpha && !template.contains("[A]") => {
                Some(format!("{}-{}", number, alpha))
            }
            (number, _) => number.clone(),
        };
        self.fill(template, number.as_deref())
    }

    /// Fills the placeholders of a composed expression.
    ///
    /// A moved alpha goes back through `[N]` when the pattern has no `[A]`, so
    /// the child rule sees the expression as written and reinterprets it itself.
    pub fn substitute_compose(&self, pattern: &str) -> String {
        let number = if self.order_as_alpha && !pattern.contains("[A]") {
            self.alpha.as_deref()
        } else {
            self.number.as_deref()
        };
        self.fill(pattern, number)
    }

    fn fill(&self, template: &str, number: Option<&str>) -> String {
        let mut text = template.to_string();
        for (placeholder, value) in [
            ("[U]", self.unit.as_deref()),
            ("[N]", number),
            ("[C]", self.color.as_deref()),
            ("[A]", self.alpha.as_deref()),
        ] {
            if let Some(value) = value {
                text = text.replace(placeholder, value);
            }
        }
        text
    }
}

/// The resolution result for one expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleInfo {
    /// Referenced unit tokens, deduplicated.
    pub units: Vec<String>,
    /// Referenced color references, deduplicated.
    pub colors: Vec<String>,
    /// The formatted block, or nothing.
    pub styles: Vec<String>,
    /// The expression itself when it matched no rule.
    pub warnings: Vec<String>,
    /// Dependency names that must also be present in the output.
    pub class_names: Vec<String>,
}

impl StyleInfo {
    pub fn unmatched(expression: &str) -> Self {
        Self {
            warnings: vec![expression.to_string()],
            ..Self::default()
        }
    }

    pub fn is_unmatched(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Resolves expressions against a rule table and a palette provider.
///
/// # Examples
///
/// ```rust
/// use acss::format::CssFormat;
/// use acss::resolve::Resolver;
/// use acss::rule::RuleTable;
/// use acss::theme::ThemeMap;
///
/// let rules = RuleTable::from_json(r#"[
///     { "package": "spacing.padding.ext", "syntax": "px-[U]",
///       "compose": ["pl-[U]", "pr-[U]"] },
///     { "package": "spacing.padding.core", "syntax": "pl-[U]", "expr": "padding-left: var(--unit-[U]);" },
///     { "package": "spacing.padding.core", "syntax": "pr-[U]", "expr": "padding-right: var(--unit-[U]);" }
/// ]"#).unwrap();
/// let themes = ThemeMap::from_json(
///     r##"{ "primary": "#1890ff", "black": "#000000", "white": "#ffffff" }"##,
/// ).unwrap();
/// let format = CssFormat::default();
///
/// let resolver = Resolver::new(&rules, &themes, "antd", &format);
/// let info = resolver.resolve("px-20");
/// assert_eq!(info.units, vec!["20"]);
/// assert_eq!(
///     info.styles[0],
///     ".px-20 {\n    padding-right: var(--unit-20);\n    padding-left: var(--unit-20);\n}\n"
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    rules: &'a RuleTable,
    themes: &'a ThemeMap,
    provider: &'a str,
    format: &'a CssFormat,
}

impl<'a> Resolver<'a> {
    pub fn new(
        rules: &'a RuleTable,
        themes: &'a ThemeMap,
        provider: &'a str,
        format: &'a CssFormat,
    ) -> Self {
        Self {
            rules,
            themes,
            provider,
            format,
        }
    }

    pub fn rules(&self) -> &'a RuleTable {
        self.rules
    }

    pub fn format(&self) -> &'a CssFormat {
        self.format
    }

    /// Extracts the parameters of an expression matched by a dynamic rule.
    pub fn parameters(&self, rule: &AtomicStyleRule, expression: &str) -> Option<PropertyValueParameter> {
        let caps = rule.captures(expression)?;
        Some(PropertyValueParameter::from_captures(&caps, |theme| {
            self.themes.is_single_color(self.provider, theme)
        }))
    }

    /// Resolves one expression. A miss is reported in [`StyleInfo::warnings`].
    pub fn resolve(&self, expression: &str) -> StyleInfo {
        let matched = self.rules.search(expression);
        if matched.is_empty() {
            log::debug!("no rule matches {}", expression);
            return StyleInfo::unmatched(expression);
        }

        let mut queue: VecDeque<(String, &AtomicStyleRule)> = matched
            .into_iter()
            .map(|rule| (expression.to_string(), rule))
            .collect();

        let mut declarations = Vec::new();
        let mut units = Vec::new();
        let mut colors = Vec::new();
        let mut class_names = Vec::new();
        let mut processed = 0;

        while let Some((current, rule)) = queue.pop_front() {
            processed += 1;
            if processed > MAX_EXPANSIONS {
                log::warn!(
                    "expansion of {} stopped after {} steps, check compose cycles",
                    expression,
                    MAX_EXPANSIONS
                );
                break;
            }
            log::trace!("expand {} with rule {}", current, rule.syntax);

            let para = self.parameters(rule, &current);
            if let Some(para) = &para {
                units.extend(para.unit.clone());
                colors.extend(para.color_reference());
            }

            for pattern in &rule.compose {
                let child = match &para {
                    Some(para) => para.substitute_compose(pattern),
                    None => pattern.clone(),
                };
                let children = self.rules.search(&child);
                if children.is_empty() {
                    log::debug!("composed {} of {} matches no rule", child, current);
                }
                for child_rule in children {
                    units.extend(child_rule.units.iter().cloned());
                    colors.extend(child_rule.colors.iter().cloned());
                    queue.push_front((child.clone(), child_rule));
                }
            }

            if let Some(template) = &rule.expr {
                units.extend(rule.units.iter().cloned());
                colors.extend(rule.colors.iter().cloned());
                let declaration = match &para {
                    Some(para) => para.substitute(template),
                    None => template.clone(),
                };
                declarations.push(self.format.rewrite_var_references(&declaration));
            }

            class_names.extend(rule.dependencies.iter().cloned());
        }

        let styles = if declarations.is_empty() {
            Vec::new()
        } else {
            vec![self.format.block(&format!(".{}", expression), &declarations)]
        };

        StyleInfo {
            units: dedup(units),
            colors: dedup(colors),
            styles,
            warnings: Vec::new(),
            class_names: dedup(class_names),
        }
    }
}

/// Removes repeats, keeping first occurrences in order.
pub(crate) fn dedup(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
