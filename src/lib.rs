//! # atomic-css
//!
//! Scans a WeChat mini program for the class names its templates use, and
//! writes the stylesheets for the ones no stylesheet declares yet. Rule
//! resolution lives in the `acss` crate; this crate adds the configuration,
//! the page scanner and the command line.

pub mod cli;
pub mod config;
pub mod error;
pub mod log_init;
pub mod output;
pub mod scan;

pub use config::RunningConfig;
pub use error::{AppError, Result};
pub use output::{GenerateStatus, generate};
