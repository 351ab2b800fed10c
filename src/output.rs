//! Generating and writing the variable and rule stylesheets.

use crate::config::{DebugOption, RunningConfig};
use crate::error::Result;
use crate::scan;
use acss::{BatchFormatter, BatchOutcome, BatchOutput, RuleTable, ThemeMap};
use std::path::Path;

/// How a generate run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateStatus {
    /// Both stylesheets were written.
    Written(BatchOutput),
    /// Every used class name is already declared.
    UpToDate,
    /// No used class name matched a rule; nothing was written.
    Nothing { warnings: Vec<String> },
}

impl GenerateStatus {
    pub fn exit_code(&self) -> i32 {
        match self {
            GenerateStatus::Written(_) | GenerateStatus::UpToDate => 0,
            GenerateStatus::Nothing { .. } => 2,
        }
    }
}

fn report_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    let mut sorted = warnings.to_vec();
    sorted.sort();
    sorted.dedup();
    log::warn!("{} class names not matched, {}", sorted.len(), sorted.join(","));
}

/// Writes the variable stylesheet and the rule stylesheet into `work_dir`.
pub fn write_output(work_dir: &Path, config: &RunningConfig, output: &BatchOutput) -> Result<()> {
    let structure = &config.file_structure;
    let show = DebugOption::level(config.debug_option.show_file_content);

    let var_path = work_dir.join(&structure.css_var_file);
    std::fs::write(&var_path, &output.vars)?;
    log::info!("save {} chars to {}", output.vars.len(), structure.css_var_file);
    log::log!(show, "{}:\n{}", structure.css_var_file, output.vars);

    let rule_path = work_dir.join(&structure.css_output_file);
    std::fs::write(&rule_path, &output.rules)?;
    log::info!("save {} chars to {}", output.rules.len(), structure.css_output_file);
    log::log!(show, "{}:\n{}", structure.css_output_file, output.rules);
    Ok(())
}

/// Scans the mini program in `work_dir` and writes the stylesheets for the
/// class names it uses but does not declare.
pub async fn generate(
    work_dir: &Path,
    config: &RunningConfig,
    rules: &RuleTable,
    themes: &ThemeMap,
) -> Result<GenerateStatus> {
    let found = scan::scan(work_dir, config).await?;
    if found.missing.is_empty() {
        log::info!("no class names to create");
        return Ok(GenerateStatus::UpToDate);
    }
    log::info!(
        "new task for {} class names = [{}]",
        found.missing.len(),
        found.missing.join(",")
    );

    let option = &config.css_option.css;
    let formatter = BatchFormatter::new(rules, themes, option);
    match formatter.run(&found.missing, &found.global)? {
        BatchOutcome::Nothing { warnings } => {
            report_warnings(&warnings);
            log::info!("no updates with warnings");
            Ok(GenerateStatus::Nothing { warnings })
        }
        BatchOutcome::Emit(output) => {
            report_warnings(&output.warnings);
            log::log!(
                DebugOption::level(config.debug_option.show_style_task_result),
                "units = [{}] colors = [{}]",
                output.units.join(","),
                output.colors.join(",")
            );
            write_output(work_dir, config, &output)?;
            Ok(GenerateStatus::Written(output))
        }
    }
}
