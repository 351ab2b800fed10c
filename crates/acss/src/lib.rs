//! # ACSS - Atomic class names to CSS
//!
//! Translates short, parameterized class-name expressions such as `px-20`,
//! `bg-red-2-a5` or `tip-warn` into CSS rule blocks plus one block of CSS
//! custom properties, driven by a rule table and a color palette.
//!
//! - **Rules**: load a [`RuleTable`](rule::RuleTable) from JSON records; dynamic
//!   syntaxes like `text-[C]-[N]` are compiled into anchored matchers once.
//! - **Palette**: load a [`ThemeMap`](theme::ThemeMap) of scalar colors and
//!   provider color ramps.
//! - **Resolution**: [`Resolver`](resolve::Resolver) expands one expression into
//!   a [`StyleInfo`](resolve::StyleInfo).
//! - **Values**: [`values`] turns unit tokens and color references into
//!   lengths and colors.
//! - **Batches**: [`BatchFormatter`](batch::BatchFormatter) produces the final
//!   stylesheet text for a list of expressions.
//!
//! ## Quick Start
//!
//! ```rust
//! use acss::batch::{BatchFormatter, BatchOutcome, CssOption};
//! use acss::rule::RuleTable;
//! use acss::theme::ThemeMap;
//! use std::collections::HashSet;
//!
//! let rules = RuleTable::from_json(r#"[
//!     { "package": "spacing.margin.core", "syntax": "mt-[U]", "expr": "margin-top: var(--unit-[U]);" },
//!     { "package": "color.text.core", "syntax": "text-[C]-[N]", "expr": "color: var(--color-[C]-[N]);" }
//! ]"#).unwrap();
//! let themes = ThemeMap::from_json(r##"{
//!     "primary": "#1890ff", "black": "#000000", "white": "#ffffff",
//!     "palette": { "antd": { "red": ["#fff1f0", "#ffccc7"] } }
//! }"##).unwrap();
//! let option = CssOption::default();
//!
//! let formatter = BatchFormatter::new(&rules, &themes, &option);
//! let expressions = vec!["mt-15".to_string(), "text-red-2".to_string()];
//! let BatchOutcome::Emit(output) = formatter.run(&expressions, &HashSet::new()).unwrap() else {
//!     panic!("expected output");
//! };
//!
//! assert_eq!(output.vars, "page {\n    --unit-15: 2vmin;\n    --color-red-2: #ffccc7;\n}");
//! assert!(output.rules.starts_with(".mt-15 {\n    margin-top: var(--unit-15);\n}\n"));
//! ```
//!
//! ## Modules
//!
//! - [`rule`]: rule records, syntax patterns and the rule table
//! - [`theme`]: the color palette and short aliases
//! - [`resolve`]: expression resolution
//! - [`values`]: unit and color materialization
//! - [`format`]: block and variable layout
//! - [`batch`]: batch runs and output options
//! - [`error`]: error types

pub mod batch;
pub mod error;
pub mod format;
pub mod resolve;
pub mod rule;
pub mod theme;
pub mod values;

pub use batch::{BatchFormatter, BatchOutcome, BatchOutput, CssOption};
pub use error::AcssError;
pub use resolve::{PropertyValueParameter, Resolver, StyleInfo};
pub use rule::{AtomicStyleRule, RawRule, RuleTable};
pub use theme::{RawThemeMap, ThemeMap};
