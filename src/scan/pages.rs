//! Mini program layout: pages, components and global stylesheets.

use super::{markup, stylesheet};
use crate::config::{DebugOption, RunningConfig};
use crate::error::{AppError, Result};
use futures::stream::{self, StreamExt};
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct AppJson {
    #[serde(default)]
    pages: Vec<String>,
    #[serde(default, alias = "subPackages")]
    subpackages: Vec<Subpackage>,
}

#[derive(Debug, Deserialize)]
struct Subpackage {
    root: String,
    #[serde(default)]
    pages: Vec<String>,
}

/// Class names a mini program uses but does not declare.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanResult {
    /// Sorted, distinct names to generate.
    pub missing: Vec<String>,
    /// Names declared by the global stylesheets.
    pub global: HashSet<String>,
    pub pages: usize,
    pub components: usize,
}

/// Locates the mini program root below `dir`.
///
/// `dir` either contains the mini program directory or is the mini program
/// itself, recognized by its main stylesheet.
pub fn ensure_work_dir(dir: &Path, config: &RunningConfig) -> Result<PathBuf> {
    let nested = dir.join(&config.file_structure.mini_program_dir);
    if nested.is_dir() {
        return Ok(nested);
    }
    if dir.join(&config.file_structure.css_main_file).is_file() {
        return Ok(dir.to_path_buf());
    }
    Err(AppError::InvalidWorkDir(dir.to_path_buf()))
}

fn sibling(page: &Path, page_ext: &str, ext: &str) -> PathBuf {
    let text = page.to_string_lossy();
    let stem = text.strip_suffix(page_ext).unwrap_or(&text);
    PathBuf::from(format!("{stem}{ext}"))
}

/// Page templates listed by the app config, subpackages included.
pub async fn read_pages(work_dir: &Path, config: &RunningConfig) -> Result<Vec<PathBuf>> {
    let source =
        tokio::fs::read_to_string(work_dir.join(&config.file_structure.app_config_file)).await?;
    let app: AppJson = serde_json::from_str(&source)?;

    let pages: Vec<PathBuf> = app
        .pages
        .iter()
        .cloned()
        .chain(app.subpackages.iter().flat_map(|package| {
            package
                .pages
                .iter()
                .map(move |page| format!("{}/{}", package.root, page))
        }))
        .map(|page| work_dir.join(format!("{}{}", page, config.file_extension.page)))
        .collect();
    log::info!("found {} pages in {}", pages.len(), config.file_structure.app_config_file);
    Ok(pages)
}

/// Component templates below the component directory, sorted by path.
pub async fn read_component_pages(work_dir: &Path, config: &RunningConfig) -> Result<Vec<PathBuf>> {
    let root = work_dir.join(&config.file_structure.component_dir);
    if !root.is_dir() {
        log::debug!("no component directory {}", root.display());
        return Ok(Vec::new());
    }

    let mut stack = vec![root];
    let mut pages = Vec::new();
    while let Some(dir) = stack.pop() {
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            let path = entry.path();
            if file_type.is_dir() {
                stack.push(path);
            } else if file_type.is_file()
                && path.to_string_lossy().ends_with(&config.file_extension.page)
            {
                pages.push(path);
            }
        }
    }
    pages.sort();
    log::info!("found {} component pages", pages.len());
    Ok(pages)
}

async fn read_declared(path: &Path, parse: fn(&str) -> Vec<String>) -> Option<Vec<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(source) => Some(parse(&source)),
        Err(_) => None,
    }
}

/// Class names of one template minus the ones its own stylesheet declares.
async fn scan_template(page: &Path, config: &RunningConfig) -> Vec<String> {
    let source = match tokio::fs::read_to_string(page).await {
        Ok(source) => source,
        Err(err) => {
            log::warn!("skip page {}: {}", page.display(), err);
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let class_names: Vec<String> = markup::parse_class_names(&source)
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect();
    log::log!(
        DebugOption::level(config.debug_option.show_page_class_names),
        "{}: [{}]",
        page.display(),
        class_names.join(",")
    );

    let css = sibling(page, &config.file_extension.page, &config.file_extension.css);
    let declared: HashSet<String> = read_declared(&css, stylesheet::parse_class_selectors)
        .await
        .unwrap_or_default()
        .into_iter()
        .collect();
    class_names
        .into_iter()
        .filter(|name| !declared.contains(name))
        .collect()
}

/// Scans a component template when its script opts into global classes.
async fn scan_component(page: &Path, config: &RunningConfig, marker: &Regex) -> Vec<String> {
    let ext = &config.file_extension;
    let mut script = None;
    for candidate in [sibling(page, &ext.page, &ext.ts), sibling(page, &ext.page, &ext.js)] {
        if let Ok(source) = tokio::fs::read_to_string(&candidate).await {
            script = Some(source);
            break;
        }
    }

    match script {
        Some(source) if marker.is_match(&source) => scan_template(page, config).await,
        _ => {
            log::debug!("ignore component {} without global class option", page.display());
            Vec::new()
        }
    }
}

/// Names declared by the shared input stylesheets and the main stylesheet,
/// named `@` blocks included so dependencies are not emitted twice.
pub async fn read_global_names(work_dir: &Path, config: &RunningConfig) -> HashSet<String> {
    let structure = &config.file_structure;
    let mut names = HashSet::new();
    for file in structure.css_input_files.iter().chain([&structure.css_main_file]) {
        match read_declared(&work_dir.join(file), stylesheet::parse_declared_names).await {
            Some(found) => {
                log::info!("found {} global style names in {}", found.len(), file);
                names.extend(found);
            }
            None => log::info!("missing global stylesheet {} and ignore", file),
        }
    }
    names
}

/// Scans pages and components, at most `promiseLimit` at a time.
pub async fn scan(work_dir: &Path, config: &RunningConfig) -> Result<ScanResult> {
    let marker = Regex::new(&config.css_option.component_global_css)?;
    let limit = config.process_option.promise_limit.max(1);

    let global = read_global_names(work_dir, config).await;
    let pages = read_pages(work_dir, config).await?;
    let components = read_component_pages(work_dir, config).await?;

    let page_names: Vec<Vec<String>> = stream::iter(&pages)
        .map(|page| scan_template(page, config))
        .buffered(limit)
        .collect()
        .await;
    let component_names: Vec<Vec<String>> = stream::iter(&components)
        .map(|page| scan_component(page, config, &marker))
        .buffered(limit)
        .collect()
        .await;

    let missing: BTreeSet<String> = page_names
        .into_iter()
        .chain(component_names)
        .flatten()
        .filter(|name| !global.contains(name))
        .collect();
    log::info!("{} class names to generate", missing.len());

    Ok(ScanResult {
        missing: missing.into_iter().collect(),
        global,
        pages: pages.len(),
        components: components.len(),
    })
}
