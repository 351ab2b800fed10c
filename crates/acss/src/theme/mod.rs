//! The color palette model.
//!
//! A theme file holds three scalar colors (`primary`, `black`, `white`) and a
//! palette table: provider name -> theme name -> color ramp.
//!
//! ```json
//! {
//!   "primary": "#1890ff",
//!   "black": "#000000",
//!   "white": "#ffffff",
//!   "palette": {
//!     "antd": {
//!       "red": ["#fff1f0", "#ffccc7", "#ffa39e"],
//!       "gray": ["#ffffff", "#fafafa", "#f5f5f5"]
//!     }
//!   }
//! }
//! ```
//!
//! Color references use `theme`, `theme-order` or `theme-order-aalpha`, where
//! `order` is 1-based into the ramp.

pub mod alias;

use crate::error::{AcssError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Theme names of the scalar colors.
pub const SCALAR_THEMES: [&str; 3] = ["primary", "black", "white"];

/// A theme record as authored in a theme file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawThemeMap {
    pub primary: String,
    pub black: String,
    pub white: String,
    #[serde(default)]
    pub palette: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

/// The validated, read-only palette.
#[derive(Debug, Clone)]
pub struct ThemeMap {
    raw: RawThemeMap,
    color_alias_map: BTreeMap<String, String>,
}

impl ThemeMap {
    /// Validates a raw theme record and derives the alias table.
    pub fn new(raw: RawThemeMap) -> Result<Self> {
        for (name, value) in [
            ("primary", &raw.primary),
            ("black", &raw.black),
            ("white", &raw.white),
        ] {
            if value.trim().is_empty() {
                return Err(AcssError::InvalidTheme(format!("{} color is empty", name)));
            }
        }

        for (provider, themes) in &raw.palette {
            for theme in themes.keys() {
                if theme.is_empty() || !theme.chars().all(|c| c.is_ascii_lowercase()) {
                    return Err(AcssError::InvalidTheme(format!(
                        "theme name `{}` in palette {} must be lowercase letters",
                        theme, provider
                    )));
                }
                if SCALAR_THEMES.contains(&theme.as_str()) {
                    return Err(AcssError::InvalidTheme(format!(
                        "theme name `{}` in palette {} shadows a scalar color",
                        theme, provider
                    )));
                }
            }
        }

        let color_alias_map = alias::derive_aliases(
            raw.palette
                .values()
                .flat_map(|themes| themes.keys().map(String::as_str)),
        );

        log::debug!(
            "loaded {} palettes, {} theme aliases",
            raw.palette.len(),
            color_alias_map.len()
        );
        Ok(Self {
            raw,
            color_alias_map,
        })
    }

    pub fn from_json(source: &str) -> Result<Self> {
        let raw: RawThemeMap = serde_json::from_str(source)?;
        Self::new(raw)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    /// Returns the value of `primary`, `black` or `white`.
    pub fn scalar(&self, name: &str) -> Option<&str> {
        match name {
            "primary" => Some(&self.raw.primary),
            "black" => Some(&self.raw.black),
            "white" => Some(&self.raw.white),
            _ => None,
        }
    }

    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.raw.palette.keys().map(String::as_str)
    }

    /// Looks up a theme ramp, distinguishing a missing provider from a missing theme.
    pub fn ramp(&self, provider: &str, theme: &str) -> Result<&[String]> {
        let themes = self
            .raw
            .palette
            .get(provider)
            .ok_or_else(|| AcssError::MissingProvider(provider.to_string()))?;
        themes
            .get(theme)
            .map(Vec::as_slice)
            .ok_or_else(|| AcssError::MissingTheme {
                provider: provider.to_string(),
                theme: theme.to_string(),
            })
    }

    /// True when a theme has no order dimension: a scalar color or a ramp of one.
    pub fn is_single_color(&self, provider: &str, theme: &str) -> bool {
        if self.scalar(theme).is_some() {
            return true;
        }
        self.ramp(provider, theme)
            .is_ok_and(|colors| colors.len() == 1)
    }

    /// Full theme name -> short alias, including the reserved scalar aliases.
    pub fn color_alias_map(&self) -> &BTreeMap<String, String> {
        &self.color_alias_map
    }

    pub fn alias(&self, name: &str) -> Option<&str> {
        self.color_alias_map.get(name).map(String::as_str)
    }
}

impl fmt::Display for ThemeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "primary = {}", self.raw.primary)?;
        writeln!(f, "black = {}", self.raw.black)?;
        writeln!(f, "white = {}", self.raw.white)?;

        for (provider, themes) in &self.raw.palette {
            writeln!(f, "palette {}, total {} themes", provider, themes.len())?;
            for (index, (theme, colors)) in themes.iter().enumerate() {
                writeln!(
                    f,
                    "{:>2}) theme = {}, colors = [{}]",
                    index + 1,
                    theme,
                    colors.join(",")
                )?;
            }
        }

        let aliases: Vec<String> = self
            .color_alias_map
            .iter()
            .map(|(name, alias)| format!("{}={}", name, alias))
            .collect();
        writeln!(f, "aliases = [{}]", aliases.join(","))
    }
}
