//! Command line interface.

use crate::config::RunningConfig;
use crate::error::Result;
use crate::output;
use crate::scan::ensure_work_dir;
use acss::{BatchFormatter, BatchOutcome, CssOption, RuleTable, ThemeMap};
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "atomic-css")]
#[command(version)]
#[command(about = "Generate stylesheets for atomic class names used by a mini program", long_about = None)]
pub struct Cli {
    /// Configuration file (JSON); bundled defaults when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Append log lines to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a mini program and write its variable and rule stylesheets
    Generate {
        /// Project or mini program directory
        #[arg(default_value = ".")]
        work_dir: PathBuf,
    },
    /// Print the stylesheet of the given expressions
    Resolve {
        #[arg(required = true)]
        exprs: Vec<String>,
    },
    /// List the loaded rules
    Rules,
    /// List the loaded palette
    Themes,
}

/// Resolves expressions and prints the variable block, then the rules.
///
/// Unresolved names are reported on `err`. Returns the exit code: 0 when
/// something was printed, 2 otherwise.
pub fn print_resolved(
    exprs: &[String],
    rules: &RuleTable,
    themes: &ThemeMap,
    option: &CssOption,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<i32> {
    let formatter = BatchFormatter::new(rules, themes, option);
    match formatter.run(exprs, &HashSet::new())? {
        BatchOutcome::Nothing { warnings } => {
            writeln!(err, "unresolved: {}", warnings.join(","))?;
            Ok(2)
        }
        BatchOutcome::Emit(output) => {
            writeln!(out, "{}", output.vars)?;
            write!(out, "{}", output.rules)?;
            if !output.warnings.is_empty() {
                writeln!(err, "unresolved: {}", output.warnings.join(","))?;
            }
            for message in &output.value_errors {
                writeln!(err, "skipped: {}", message)?;
            }
            Ok(0)
        }
    }
}

/// Runs one command and returns the process exit code.
pub async fn run(cli: Cli) -> Result<i32> {
    let config = RunningConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate { work_dir } => {
            let work_dir = ensure_work_dir(&work_dir, &config)?;
            log::info!("work dir {}", work_dir.display());
            let rules = config.load_rules()?;
            let themes = config.load_themes()?;
            let status = output::generate(&work_dir, &config, &rules, &themes).await?;
            Ok(status.exit_code())
        }
        Commands::Resolve { exprs } => {
            let rules = config.load_rules()?;
            let themes = config.load_themes()?;
            print_resolved(
                &exprs,
                &rules,
                &themes,
                &config.css_option.css,
                &mut std::io::stdout().lock(),
                &mut std::io::stderr().lock(),
            )
        }
        Commands::Rules => {
            print!("{}", config.load_rules()?);
            Ok(0)
        }
        Commands::Themes => {
            print!("{}", config.load_themes()?);
            Ok(0)
        }
    }
}
