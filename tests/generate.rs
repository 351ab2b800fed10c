//! End-to-end tests for the generate task on a throw-away mini program.
//!
//! Covers:
//! - Page, subpackage and component discovery
//! - Declared class names (page and global stylesheets)
//! - Written stylesheets
//! - Exit statuses

use atomic_css::config::RunningConfig;
use atomic_css::scan::{ensure_work_dir, scan};
use atomic_css::{AppError, GenerateStatus, generate};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Project directory holding `miniprogram/` with two pages, one subpackage
/// page and two components (only one opts into global classes).
fn project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let app = dir.path().join("miniprogram");
    write(
        &app,
        "app.json",
        r#"{ "pages": ["pages/index/index"], "subpackages": [{ "root": "pkg", "pages": ["detail/detail"] }] }"#,
    );
    write(&app, "app.wxss", "@import \"mini.wxss\";\n.flex-row { display: flex; }\n");
    write(
        &app,
        "pages/index/index.wxml",
        r#"<view class="flex-row mt-2 card">
    <text class="text-red-2 {{ on ? 'bg-gray-2' : '' }}">hi</text>
</view>"#,
    );
    write(&app, "pages/index/index.wxss", ".card { padding: 4px; }\n");
    write(&app, "pkg/detail/detail.wxml", r#"<view class="px-20 animate-spin"></view>"#);
    write(&app, "components/badge/badge.wxml", r#"<view class="round-4 nope-zz"></view>"#);
    write(
        &app,
        "components/badge/badge.ts",
        "Component({ options: { addGlobalClass: true } })",
    );
    write(&app, "components/plain/plain.wxml", r#"<view class="mb-8"></view>"#);
    write(&app, "components/plain/plain.js", "Component({})");
    dir
}

// ============================================================================
// SCANNING
// ============================================================================

#[test]
fn test_work_dir_detection() {
    let dir = project();
    let config = RunningConfig::default();
    let app = dir.path().join("miniprogram");

    assert_eq!(ensure_work_dir(dir.path(), &config).unwrap(), app);
    assert_eq!(ensure_work_dir(&app, &config).unwrap(), app);

    let empty = tempfile::tempdir().unwrap();
    assert!(matches!(
        ensure_work_dir(empty.path(), &config),
        Err(AppError::InvalidWorkDir(_))
    ));
}

#[tokio::test]
async fn test_scan_collects_missing_names() {
    let dir = project();
    let config = RunningConfig::default();
    let found = scan(&dir.path().join("miniprogram"), &config).await.unwrap();

    assert_eq!(found.pages, 2);
    assert_eq!(found.components, 2);
    assert!(found.global.contains("flex-row"));
    assert_eq!(
        found.missing,
        vec!["animate-spin", "bg-gray-2", "mt-2", "nope-zz", "px-20", "round-4", "text-red-2"]
    );
}

#[tokio::test]
async fn test_scan_with_single_page_in_flight() {
    let dir = project();
    let mut config = RunningConfig::default();
    config.process_option.promise_limit = 1;
    let found = scan(&dir.path().join("miniprogram"), &config).await.unwrap();
    assert_eq!(found.missing.len(), 7);
}

#[tokio::test]
async fn test_missing_app_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "app.wxss", "");
    let result = scan(dir.path(), &RunningConfig::default()).await;
    assert!(matches!(result, Err(AppError::Io(_))));
}

// ============================================================================
// GENERATE
// ============================================================================

#[tokio::test]
async fn test_generate_writes_stylesheets() {
    let dir = project();
    let config = RunningConfig::default();
    let app = dir.path().join("miniprogram");
    let rules = config.load_rules().unwrap();
    let themes = config.load_themes().unwrap();

    let status = generate(&app, &config, &rules, &themes).await.unwrap();
    assert_eq!(status.exit_code(), 0);
    let GenerateStatus::Written(output) = status else {
        panic!("expected written stylesheets");
    };
    assert_eq!(output.warnings, vec!["nope-zz"]);

    let vars = fs::read_to_string(app.join("var.wxss")).unwrap();
    insta::assert_snapshot!(vars, @r"
    page {
        --unit-2: 0.267vmin;
        --unit-4: 0.533vmin;
        --unit-20: 2.667vmin;
        --color-gray-2: #fafafa;
        --color-red-2: #ffccc7;
    }
    ");

    let rules_text = fs::read_to_string(app.join("mini.wxss")).unwrap();
    insta::assert_snapshot!(rules_text, @r"
    .animate-spin {
        animation: spin 1s linear infinite;
    }
    .bg-gray-2 {
        background-color: var(--color-gray-2);
    }
    .mt-2 {
        margin-top: var(--unit-2);
    }
    .px-20 {
        padding-right: var(--unit-20);
        padding-left: var(--unit-20);
    }
    .round-4 {
        border-radius: var(--unit-4);
    }
    .text-red-2 {
        color: var(--color-red-2);
    }
    @keyframes spin {
        from { transform: rotate(0deg); } to { transform: rotate(360deg); }
    }
    ");
}

#[tokio::test]
async fn test_generate_up_to_date() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "app.json", r#"{ "pages": ["index"] }"#);
    write(dir.path(), "app.wxss", ".mt-2 { margin-top: 2px; }");
    write(dir.path(), "index.wxml", r#"<view class="mt-2"></view>"#);

    let config = RunningConfig::default();
    let rules = config.load_rules().unwrap();
    let themes = config.load_themes().unwrap();
    let status = generate(dir.path(), &config, &rules, &themes).await.unwrap();

    assert_eq!(status, GenerateStatus::UpToDate);
    assert_eq!(status.exit_code(), 0);
    assert!(!dir.path().join("mini.wxss").exists());
}

#[tokio::test]
async fn test_generate_nothing_matched() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "app.json", r#"{ "pages": ["index"] }"#);
    write(dir.path(), "app.wxss", "");
    write(dir.path(), "index.wxml", r#"<view class="card title"></view>"#);

    let config = RunningConfig::default();
    let rules = config.load_rules().unwrap();
    let themes = config.load_themes().unwrap();
    let status = generate(dir.path(), &config, &rules, &themes).await.unwrap();

    assert_eq!(
        status,
        GenerateStatus::Nothing {
            warnings: vec!["card".to_string(), "title".to_string()]
        }
    );
    assert_eq!(status.exit_code(), 2);
    assert!(!dir.path().join("var.wxss").exists());
}

#[tokio::test]
async fn test_generate_skips_declared_keyframes() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "app.json", r#"{ "pages": ["index"] }"#);
    write(
        dir.path(),
        "app.wxss",
        "@keyframes spin { from { transform: rotate(0deg); } to { transform: rotate(360deg); } }\n",
    );
    write(dir.path(), "index.wxml", r#"<view class="animate-spin"></view>"#);

    let config = RunningConfig::default();
    let found = scan(dir.path(), &config).await.unwrap();
    assert!(found.global.contains("@keyframes spin"));

    let rules = config.load_rules().unwrap();
    let themes = config.load_themes().unwrap();
    let status = generate(dir.path(), &config, &rules, &themes).await.unwrap();
    assert_eq!(status.exit_code(), 0);

    let written = fs::read_to_string(dir.path().join("mini.wxss")).unwrap();
    assert_eq!(written, ".animate-spin {\n    animation: spin 1s linear infinite;\n}\n");
}

#[tokio::test]
async fn test_generate_with_config_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "app.json", r#"{ "pages": ["index"] }"#);
    write(dir.path(), "app.wxss", "");
    write(dir.path(), "index.wxml", r#"<view class="mx-4"></view>"#);

    let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    write(
        dir.path(),
        "acss.json",
        &format!(
            r#"{{
                "fileStructure": {{ "cssOutputFile": "atomic.wxss" }},
                "cssOption": {{ "minify": true, "rootElementName": ":root" }},
                "dataOption": {{ "ruleFile": {:?}, "themeFile": {:?} }}
            }}"#,
            data.join("rules.json"),
            data.join("themes.json")
        ),
    );

    let config = RunningConfig::from_path(dir.path().join("acss.json")).unwrap();
    let rules = config.load_rules().unwrap();
    let themes = config.load_themes().unwrap();
    let status = generate(dir.path(), &config, &rules, &themes).await.unwrap();

    assert_eq!(status.exit_code(), 0);
    assert_eq!(
        fs::read_to_string(dir.path().join("atomic.wxss")).unwrap(),
        ".mx-4{margin-right:var(--unit-4);margin-left:var(--unit-4)}"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("var.wxss")).unwrap(),
        ":root{--unit-4:0.533vmin}"
    );
}
