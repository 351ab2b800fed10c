//! Discovery of the class names a mini program needs.

pub mod markup;
pub mod pages;
pub mod stylesheet;

pub use markup::{extract_class_names, parse_class_names};
pub use pages::{ScanResult, ensure_work_dir, scan};
pub use stylesheet::{parse_class_selectors, parse_declared_names};
