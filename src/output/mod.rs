//! Everything a run produces: generated files and the status report.
//!
//! - [`artifacts`] - The make fragment and function availability header
//! - [`report`] - The summary printed after probing
//! - [`rewrite`] - Writing files only when their content changes

pub mod artifacts;
pub mod report;
pub mod rewrite;

pub use artifacts::{ArtifactWriter, HEADER_FILE, MAKE_FILE};
pub use report::{column_width, render, Verdict, COLUMN_PADDING};
pub use rewrite::{lines_to_content, rewrite_if_changed};
