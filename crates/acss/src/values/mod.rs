//! Value materialization: unit tokens to lengths, color references to colors.
//!
//! The resolver only collects references; these functions turn them into the
//! values of the CSS variable block.

pub mod color;
pub mod unit;

pub use color::{ColorRef, append_alpha, generate_color_var};
pub use unit::{FULL_ALIAS, UnitValueDeclaration, calc_unit_value, sort_units, unit_sort_key};
