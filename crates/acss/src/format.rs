//! Stylesheet text formatting.
//!
//! Blocks are written either pretty (one declaration per indented line) or
//! minified. Variable names carry configurable prefixes, and variable
//! references inside rule text are rewritten to the same prefixes so the rule
//! text and the variable block always agree.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PUNCTUATION_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*([{};:,])\s*").expect("punctuation pattern is valid"));

static VAR_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"--(unit|color)-").expect("variable reference pattern is valid"));

/// Output layout and variable naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssFormat {
    pub minify: bool,
    pub indent: String,
    pub var_prefix: String,
    pub var_unit_prefix: String,
    pub var_color_prefix: String,
}

impl Default for CssFormat {
    fn default() -> Self {
        Self {
            minify: false,
            indent: "    ".to_string(),
            var_prefix: String::new(),
            var_unit_prefix: "unit-".to_string(),
            var_color_prefix: "color-".to_string(),
        }
    }
}

impl CssFormat {
    /// Writes one block. `selector` is used verbatim (`.px-20`, `@keyframes spin`).
    ///
    /// ```rust
    /// use acss::format::CssFormat;
    ///
    /// let pretty = CssFormat::default();
    /// assert_eq!(
    ///     pretty.block(".px-20", &["padding-left: 1px;".to_string()]),
    ///     ".px-20 {\n    padding-left: 1px;\n}\n"
    /// );
    ///
    /// let minified = CssFormat { minify: true, ..CssFormat::default() };
    /// assert_eq!(
    ///     minified.block(".px-20", &["padding-left: 1px;".to_string()]),
    ///     ".px-20{padding-left:1px}"
    /// );
    /// ```
    pub fn block(&self, selector: &str, declarations: &[String]) -> String {
        if self.minify {
            return minify_css(&format!("{}{{{}}}", selector, declarations.concat()));
        }
        let mut text = format!("{} {{\n", selector);
        for declaration in declarations {
            text.push_str(&self.indent);
            text.push_str(declaration);
            text.push('\n');
        }
        text.push_str("}\n");
        text
    }

    /// Writes the variable block: `root { --name: value; ... }`.
    pub fn var_block(&self, root: &str, variables: &[(String, String)]) -> String {
        if self.minify {
            let body: String = variables
                .iter()
                .map(|(name, value)| format!("--{}:{};", name, value))
                .collect();
            return minify_css(&format!("{}{{{}}}", root, body));
        }
        let mut lines = Vec::with_capacity(variables.len() + 2);
        lines.push(format!("{} {{", root));
        for (name, value) in variables {
            lines.push(format!("{}--{}: {};", self.indent, name, value));
        }
        lines.push("}".to_string());
        lines.join("\n")
    }

    /// Variable name (without `--`) of a unit token.
    pub fn unit_var_name(&self, token: &str) -> String {
        format!("{}{}{}", self.var_prefix, self.var_unit_prefix, token)
    }

    /// Variable name (without `--`) of a color reference.
    pub fn color_var_name(&self, reference: &str) -> String {
        format!("{}{}{}", self.var_prefix, self.var_color_prefix, reference)
    }

    /// Rewrites `--unit-` and `--color-` references to the configured prefixes.
    pub fn rewrite_var_references(&self, text: &str) -> String {
        VAR_REFERENCE
            .replace_all(text, |caps: &Captures| match &caps[1] {
                "unit" => format!("--{}{}", self.var_prefix, self.var_unit_prefix),
                _ => format!("--{}{}", self.var_prefix, self.var_color_prefix),
            })
            .into_owned()
    }
}

/// Collapses whitespace around CSS punctuation and drops a `;` before `}`.
pub fn minify_css(text: &str) -> String {
    PUNCTUATION_SPACE
        .replace_all(text.trim(), "$1")
        .replace(";}", "}")
}
