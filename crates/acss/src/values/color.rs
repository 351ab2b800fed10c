//! Color references and their conversion to CSS color values.

use crate::error::{AcssError, Result};
use crate::theme::ThemeMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static COLOR_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<theme>[a-z]+)(?:-(?P<order>[0-9]+))?(?:-a?(?P<alpha>[0-9]+))?$")
        .expect("color reference pattern is valid")
});

/// A parsed color reference: `theme`, `theme-order`, `theme-order-alpha` or
/// `theme-order-aalpha`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRef {
    pub theme: String,
    pub order: Option<String>,
    pub alpha: Option<String>,
}

impl ColorRef {
    pub fn parse(reference: &str) -> Result<Self> {
        let caps = COLOR_REF
            .captures(reference)
            .ok_or_else(|| AcssError::InvalidColor(reference.to_string()))?;
        Ok(Self {
            theme: caps["theme"].to_string(),
            order: caps.name("order").map(|m| m.as_str().to_string()),
            alpha: caps.name("alpha").map(|m| m.as_str().to_string()),
        })
    }

    /// Resolves this reference against a palette provider.
    pub fn resolve(&self, themes: &ThemeMap, provider: &str) -> Result<String> {
        generate_color_var(
            themes,
            provider,
            &self.theme,
            self.order.as_deref(),
            self.alpha.as_deref(),
        )
    }
}

impl fmt::Display for ColorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.theme)?;
        if let Some(order) = &self.order {
            write!(f, "-{}", order)?;
        }
        if let Some(alpha) = &self.alpha {
            write!(f, "-{}", alpha)?;
        }
        Ok(())
    }
}

fn has_alpha(alpha: Option<&str>) -> Option<&str> {
    alpha.filter(|alpha| *alpha != "1")
}

/// Resolves a theme color.
///
/// Scalar themes (`primary`, `black`, `white`) have no ramp, so an order other
/// than `1` is read as the alpha. Palette themes index their ramp with the
/// 1-based order, defaulting to the first color. An alpha of `1` means opaque.
///
/// # Examples
///
/// ```rust
/// use acss::theme::ThemeMap;
/// use acss::values::generate_color_var;
///
/// let themes = ThemeMap::from_json(r##"{
///     "primary": "#1890ff", "black": "#000000", "white": "#ffffff",
///     "palette": { "antd": { "red": ["#fff1f0", "#ffccc7"] } }
/// }"##).unwrap();
///
/// assert_eq!(generate_color_var(&themes, "antd", "red", Some("2"), None).unwrap(), "#ffccc7");
/// assert_eq!(generate_color_var(&themes, "antd", "red", Some("2"), Some("5")).unwrap(), "#ffccc70d");
/// assert_eq!(generate_color_var(&themes, "antd", "black", Some("5"), None).unwrap(), "#0000000d");
/// ```
pub fn generate_color_var(
    themes: &ThemeMap,
    provider: &str,
    theme: &str,
    order: Option<&str>,
    alpha: Option<&str>,
) -> Result<String> {
    if theme.is_empty() {
        return Err(AcssError::InvalidColor("missing theme name".to_string()));
    }

    if let Some(value) = themes.scalar(theme) {
        let alpha = has_alpha(alpha).or_else(|| has_alpha(order));
        return match alpha {
            Some(alpha) => append_alpha(value, alpha),
            None => Ok(value.to_string()),
        };
    }

    let colors = themes.ramp(provider, theme)?;
    if colors.is_empty() {
        return Err(AcssError::EmptyTheme {
            provider: provider.to_string(),
            theme: theme.to_string(),
        });
    }

    let color = match order {
        None => &colors[0],
        Some(order) => {
            let index = order
                .parse::<usize>()
                .ok()
                .filter(|&index| (1..=colors.len()).contains(&index))
                .ok_or_else(|| AcssError::ColorOrderOutOfRange {
                    theme: theme.to_string(),
                    order: order.to_string(),
                    len: colors.len(),
                })?;
            &colors[index - 1]
        }
    };

    match has_alpha(alpha) {
        Some(alpha) => append_alpha(color, alpha),
        None => Ok(color.clone()),
    }
}

/// Appends a two-digit alpha channel to a hex color.
///
/// The alpha digits are scaled by `2.56` and clamped to `ff`. A short `#rgb`
/// color is expanded first; anything other than `#rgb` or `#rrggbb` is
/// rejected.
pub fn append_alpha(color: &str, alpha: &str) -> Result<String> {
    let invalid = || AcssError::InvalidColor(format!("{} with alpha {}", color, alpha));

    let hex = color.strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let hex = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => hex.to_string(),
        _ => return Err(invalid()),
    };

    let digits: f64 = alpha.parse().map_err(|_| invalid())?;
    let channel = (digits * 2.56).round().min(255.0) as u8;
    Ok(format!("#{}{:02x}", hex.to_ascii_lowercase(), channel))
}
