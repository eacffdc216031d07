//! Output writers for the result table and the optional run report.
//!
//! # Submodules
//!
//! - [`table`]: the CSV result table (input columns + thirteen metric columns)
//! - [`json`]: a JSON report with per-article metrics and excluded rows

pub mod json;
pub mod table;
