//! Batch formatting: many expressions in, one stylesheet out.
//!
//! The batch resolves every expression, emits the dependency blocks its rules
//! ask for, and materializes the deduplicated unit and color references into
//! one variable block under the root element.

use crate::error::Result;
use crate::format::CssFormat;
use crate::resolve::{Resolver, StyleInfo, dedup};
use crate::rule::RuleTable;
use crate::theme::ThemeMap;
use crate::values::{ColorRef, UnitValueDeclaration, calc_unit_value, sort_units};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Options that shape the generated stylesheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CssOption {
    /// Selector of the variable block.
    pub root_element_name: String,
    /// Design unit ratio.
    pub one: UnitValueDeclaration,
    /// Palette provider used for theme colors.
    pub palette: String,
    pub minify: bool,
    pub style_indent: String,
    pub var_prefix: String,
    pub var_unit_prefix: String,
    pub var_color_prefix: String,
    /// Abort on the first invalid variable instead of skipping it.
    pub strict_values: bool,
}

impl Default for CssOption {
    fn default() -> Self {
        Self {
            root_element_name: "page".to_string(),
            one: UnitValueDeclaration::default(),
            palette: "antd".to_string(),
            minify: false,
            style_indent: "    ".to_string(),
            var_prefix: String::new(),
            var_unit_prefix: "unit-".to_string(),
            var_color_prefix: "color-".to_string(),
            strict_values: false,
        }
    }
}

impl CssOption {
    pub fn format(&self) -> CssFormat {
        CssFormat {
            minify: self.minify,
            indent: self.style_indent.clone(),
            var_prefix: self.var_prefix.clone(),
            var_unit_prefix: self.var_unit_prefix.clone(),
            var_color_prefix: self.var_color_prefix.clone(),
        }
    }
}

/// The generated stylesheet pieces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutput {
    /// Concatenated rule blocks, in resolution order, dependencies last.
    pub rules: String,
    /// The variable block.
    pub vars: String,
    /// Expressions (and dependencies) that matched no rule.
    pub warnings: Vec<String>,
    /// Dependency names requested by the resolved rules.
    pub class_names: Vec<String>,
    /// Variables skipped in lenient mode.
    pub value_errors: Vec<String>,
    /// Unit tokens, sorted as emitted.
    pub units: Vec<String>,
    /// Color references, sorted as emitted.
    pub colors: Vec<String>,
}

/// Result of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// No expression produced any declaration; nothing should be written.
    Nothing { warnings: Vec<String> },
    Emit(BatchOutput),
}

/// Runs batches against a loaded rule table and palette.
#[derive(Debug)]
pub struct BatchFormatter<'a> {
    rules: &'a RuleTable,
    themes: &'a ThemeMap,
    option: &'a CssOption,
    format: CssFormat,
}

impl<'a> BatchFormatter<'a> {
    pub fn new(rules: &'a RuleTable, themes: &'a ThemeMap, option: &'a CssOption) -> Self {
        Self {
            rules,
            themes,
            option,
            format: option.format(),
        }
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self.rules, self.themes, &self.option.palette, &self.format)
    }

    /// Resolves every expression independently.
    pub fn generate_style_contents(&self, expressions: &[String]) -> Vec<StyleInfo> {
        let resolver = self.resolver();
        expressions
            .iter()
            .map(|expression| {
                let info = resolver.resolve(expression);
                log::debug!(
                    "[task] {:<20} units = [{}] colors = [{}] warnings = [{}] classNames = [{}]",
                    expression,
                    info.units.join(","),
                    info.colors.join(","),
                    info.warnings.join(","),
                    info.class_names.join(",")
                );
                info
            })
            .collect()
    }

    /// Materializes unit and color references into the variable block.
    ///
    /// Units are sorted by numeric value, colors keep the given order. In strict
    /// mode the first invalid variable fails the call; otherwise it is skipped
    /// and its error message returned alongside the block.
    pub fn generate_vars(&self, units: &[String], colors: &[String]) -> Result<(String, Vec<String>)> {
        let mut units = units.to_vec();
        sort_units(&mut units);

        let mut variables = Vec::with_capacity(units.len() + colors.len());
        let mut errors = Vec::new();

        for token in &units {
            let value = calc_unit_value(token, &self.option.one);
            self.collect(
                self.format.unit_var_name(token),
                value,
                &mut variables,
                &mut errors,
            )?;
        }
        for reference in colors {
            let value = ColorRef::parse(reference)
                .and_then(|color| color.resolve(self.themes, &self.option.palette));
            self.collect(
                self.format.color_var_name(reference),
                value,
                &mut variables,
                &mut errors,
            )?;
        }

        Ok((
            self.format
                .var_block(&self.option.root_element_name, &variables),
            errors,
        ))
    }

    fn collect(
        &self,
        name: String,
        value: Result<String>,
        variables: &mut Vec<(String, String)>,
        errors: &mut Vec<String>,
    ) -> Result<()> {
        match value {
            Ok(value) => variables.push((name, value)),
            Err(err) if self.option.strict_values => return Err(err),
            Err(err) => {
                log::warn!("skip variable --{}: {}", name, err);
                errors.push(err.to_string());
            }
        }
        Ok(())
    }

    /// Resolves a batch of missing expressions.
    ///
    /// `existing` holds names already declared elsewhere; dependencies found
    /// there are not emitted again. A dependency naming a static `@` rule
    /// (`@keyframes spin`) is written as a raw block, any other dependency is
    /// resolved like an expression. When no expression yields a declaration
    /// the outcome is [`BatchOutcome::Nothing`].
    pub fn run(&self, expressions: &[String], existing: &HashSet<String>) -> Result<BatchOutcome> {
        let infos = self.generate_style_contents(expressions);

        let mut rules = String::new();
        let mut units = Vec::new();
        let mut colors = Vec::new();
        let mut warnings = Vec::new();
        let mut class_names = Vec::new();

        for info in &infos {
            absorb(info, &mut rules, &mut units, &mut colors, &mut warnings);
            class_names.extend(info.class_names.iter().cloned());
        }

        if rules.is_empty() {
            log::info!("nothing to generate, {} expressions unresolved", warnings.len());
            return Ok(BatchOutcome::Nothing { warnings });
        }

        let mut emitted: HashSet<String> = expressions.iter().cloned().collect();
        let mut pending: VecDeque<String> = class_names.iter().cloned().collect();
        let resolver = self.resolver();

        while let Some(name) = pending.pop_front() {
            if existing.contains(&name) || !emitted.insert(name.clone()) {
                continue;
            }

            let raw = self
                .rules
                .get(&name)
                .filter(|rule| name.starts_with('@') && !rule.is_dynamic());
            if let Some(rule) = raw {
                log::debug!("emit dependency block {}", name);
                if let Some(expr) = &rule.expr {
                    units.extend(rule.units.iter().cloned());
                    colors.extend(rule.colors.iter().cloned());
                    let body = self.format.rewrite_var_references(expr);
                    rules.push_str(&self.format.block(&name, &[body]));
                }
                class_names.extend(rule.dependencies.iter().cloned());
                pending.extend(rule.dependencies.iter().cloned());
                continue;
            }

            let info = resolver.resolve(&name);
            absorb(&info, &mut rules, &mut units, &mut colors, &mut warnings);
            class_names.extend(info.class_names.iter().cloned());
            pending.extend(info.class_names);
        }

        let units = dedup(units);
        let mut colors = dedup(colors);
        colors.sort();
        let (vars, value_errors) = self.generate_vars(&units, &colors)?;
        let mut sorted_units = units;
        sort_units(&mut sorted_units);

        Ok(BatchOutcome::Emit(BatchOutput {
            rules,
            vars,
            warnings,
            class_names: dedup(class_names),
            value_errors,
            units: sorted_units,
            colors,
        }))
    }
}

fn absorb(
    info: &StyleInfo,
    rules: &mut String,
    units: &mut Vec<String>,
    colors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    for style in &info.styles {
        rules.push_str(style);
    }
    units.extend(info.units.iter().cloned());
    colors.extend(info.colors.iter().cloned());
    warnings.extend(info.warnings.iter().cloned());
}

impl BatchOutcome {
    pub fn is_nothing(&self) -> bool {
        matches!(self, BatchOutcome::Nothing { .. })
    }
}
