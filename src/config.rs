//! Running configuration.
//!
//! Every section and field is optional in the JSON file and falls back to the
//! defaults of a stock mini program layout.

use crate::error::Result;
use acss::{CssOption, RuleTable, ThemeMap};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const BUNDLED_RULES: &str = include_str!("../data/rules.json");
const BUNDLED_THEMES: &str = include_str!("../data/themes.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileStructure {
    pub mini_program_dir: String,
    pub component_dir: String,
    pub app_config_file: String,
    pub css_main_file: String,
    pub css_var_file: String,
    pub css_output_file: String,
    pub css_input_files: Vec<String>,
}

impl Default for FileStructure {
    fn default() -> Self {
        Self {
            mini_program_dir: "miniprogram".to_string(),
            component_dir: "components".to_string(),
            app_config_file: "app.json".to_string(),
            css_main_file: "app.wxss".to_string(),
            css_var_file: "var.wxss".to_string(),
            css_output_file: "mini.wxss".to_string(),
            css_input_files: vec!["font.wxss".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExtension {
    pub page: String,
    pub ts: String,
    pub js: String,
    pub css: String,
}

impl Default for FileExtension {
    fn default() -> Self {
        Self {
            page: ".wxml".to_string(),
            ts: ".ts".to_string(),
            js: ".js".to_string(),
            css: ".wxss".to_string(),
        }
    }
}

/// Stylesheet options plus the marker of components sharing global classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppCssOption {
    #[serde(flatten)]
    pub css: CssOption,
    /// Pattern searched in a component script to opt it into global classes.
    pub component_global_css: String,
}

impl Default for AppCssOption {
    fn default() -> Self {
        Self {
            css: CssOption::default(),
            component_global_css: r"addGlobalClass:\s*true".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataOption {
    pub rule_file: PathBuf,
    pub theme_file: PathBuf,
}

impl Default for DataOption {
    fn default() -> Self {
        Self {
            rule_file: PathBuf::from("rules.json"),
            theme_file: PathBuf::from("themes.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProcessOption {
    /// Page scans in flight at once.
    pub promise_limit: usize,
}

impl Default for ProcessOption {
    fn default() -> Self {
        Self { promise_limit: 5 }
    }
}

/// Flags raising individual debug messages to info.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DebugOption {
    pub print_rule: bool,
    pub print_themes: bool,
    pub show_page_class_names: bool,
    pub show_style_task_result: bool,
    pub show_file_content: bool,
}

impl DebugOption {
    pub fn level(flag: bool) -> log::Level {
        if flag { log::Level::Info } else { log::Level::Debug }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunningConfig {
    pub file_structure: FileStructure,
    pub file_extension: FileExtension,
    pub css_option: AppCssOption,
    pub data_option: DataOption,
    pub process_option: ProcessOption,
    pub debug_option: DebugOption,
    /// Directory of the configuration file; data paths resolve against it.
    /// Unset when running on defaults, in which case the bundled data is used.
    #[serde(skip)]
    pub config_dir: Option<PathBuf>,
}

impl RunningConfig {
    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Reads a configuration file and records its directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::from_json(&std::fs::read_to_string(path)?)?;
        config.config_dir = Some(
            path.parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        );
        log::debug!("read config from {}", path.display());
        Ok(config)
    }

    /// Loads the configured file, or the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    fn data_path(&self, file: &Path) -> Option<PathBuf> {
        let dir = self.config_dir.as_ref()?;
        Some(if file.is_absolute() { file.to_path_buf() } else { dir.join(file) })
    }

    /// Loads the rule table once for the whole run.
    pub fn load_rules(&self) -> Result<RuleTable> {
        let rules = match self.data_path(&self.data_option.rule_file) {
            Some(path) => RuleTable::from_path(path)?,
            None => RuleTable::from_json(BUNDLED_RULES)?,
        };
        log::log!(
            DebugOption::level(self.debug_option.print_rule),
            "rules:\n{}",
            rules
        );
        Ok(rules)
    }

    /// Loads the palette once for the whole run.
    pub fn load_themes(&self) -> Result<ThemeMap> {
        let themes = match self.data_path(&self.data_option.theme_file) {
            Some(path) => ThemeMap::from_path(path)?,
            None => ThemeMap::from_json(BUNDLED_THEMES)?,
        };
        log::log!(
            DebugOption::level(self.debug_option.print_themes),
            "themes:\n{}",
            themes
        );
        Ok(themes)
    }
}
