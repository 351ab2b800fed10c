//! Error types for rule loading and value materialization.
//!
//! Three kinds of failure exist in the crate:
//!
//! - **Configuration errors** abort loading a rule table or a theme map.
//! - **Value errors** fail the materialization of a single CSS variable
//!   (an invalid unit token, an unknown theme, an out-of-range color order).
//! - **Data errors** wrap JSON and I/O failures while reading rule or theme files.
//!
//! An expression that matches no rule is *not* an error: it is reported through
//! [`StyleInfo::warnings`](crate::resolve::StyleInfo::warnings).

use thiserror::Error;

/// Errors raised while loading rule/theme tables or materializing values.
///
/// # Examples
///
/// ```rust
/// use acss::rule::SyntaxPattern;
/// use acss::AcssError;
///
/// // `[X]` is not a known placeholder
/// let result = SyntaxPattern::parse("px-[X]");
/// assert!(matches!(result, Err(AcssError::InvalidSyntax { .. })));
/// ```
#[derive(Error, Debug)]
pub enum AcssError {
    /// A rule syntax has an unknown, repeated or unbalanced placeholder.
    #[error("invalid rule syntax `{syntax}`: {reason}")]
    InvalidSyntax { syntax: String, reason: String },

    /// The matcher compiled from a rule syntax was rejected by the regex engine.
    #[error("invalid matcher for rule syntax")]
    InvalidPattern(#[from] regex::Error),

    /// The theme description is malformed.
    #[error("invalid theme: {0}")]
    InvalidTheme(String),

    /// A unit token cannot be converted to a length.
    #[error("invalid unit value: {0}")]
    InvalidUnit(String),

    /// The unit ratio turns a design unit into a non-finite length.
    #[error("invalid unit value {token}: ratio {from}/{to} is not finite")]
    InvalidUnitDeclaration { token: String, from: f64, to: f64 },

    /// A color reference or a resolved color value is malformed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// The configured palette provider does not exist.
    #[error("missing palette {0}")]
    MissingProvider(String),

    /// The theme does not exist under the palette provider.
    #[error("missing theme {theme} in palette {provider}")]
    MissingTheme { provider: String, theme: String },

    /// The theme exists but its ramp has no colors.
    #[error("palette {provider} theme {theme} is empty")]
    EmptyTheme { provider: String, theme: String },

    /// A 1-based color order falls outside the theme ramp.
    #[error("invalid color value {theme}-{order}: order must be within 1..={len}")]
    ColorOrderOutOfRange {
        theme: String,
        order: String,
        len: usize,
    },

    /// A rule or theme file is not valid JSON for its schema.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred while reading a rule or theme file.
    #[error("I/O error reading data file")]
    Io(#[from] std::io::Error),
}

impl AcssError {
    /// Returns true for errors that only affect one materialized variable.
    pub fn is_value_error(&self) -> bool {
        matches!(
            self,
            AcssError::InvalidUnit(_)
                | AcssError::InvalidUnitDeclaration { .. }
                | AcssError::InvalidColor(_)
                | AcssError::MissingProvider(_)
                | AcssError::MissingTheme { .. }
                | AcssError::EmptyTheme { .. }
                | AcssError::ColorOrderOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AcssError>;
