//! Generated build inputs.
//!
//! Two files come out of a run: a make fragment with the library variables
//! and a C++ header listing which functions are available.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::rewrite::{lines_to_content, rewrite_if_changed};
use crate::error::Result;
use crate::probe::results::{library_keys, ProbeResults};

/// File name of the generated make fragment.
pub const MAKE_FILE: &str = "probed_defs.mk";

/// File name of the generated function availability header.
pub const HEADER_FILE: &str = "systemfuncs.hh";

/// Make fragment assigning every library variable, in library order.
pub fn make_vars(results: &ProbeResults, libraries: &[String]) -> Vec<String> {
    let mut lines = vec![
        "# Automatically generated by build system.".to_string(),
        "# Non-empty value means found, empty means not found.".to_string(),
    ];
    for lib in libraries {
        for key in library_keys(lib) {
            lines.push(format!("{}:={}", key, results.value(&key)));
        }
    }
    lines
}

/// Header defining `HAVE_<ID>` as 0 or 1 for every probed function.
pub fn system_funcs_header(functions: &BTreeMap<String, bool>) -> Vec<String> {
    let mut lines = vec![
        "// Automatically generated by build process.".to_string(),
        String::new(),
        "#ifndef SYSTEMFUNCS_HH".to_string(),
        "#define SYSTEMFUNCS_HH".to_string(),
        String::new(),
    ];
    for (id, found) in functions {
        lines.push(format!("#define HAVE_{} {}", id, u8::from(*found)));
    }
    lines.push(String::new());
    lines.push("#endif".to_string());
    lines
}

/// Writes the generated files into an output directory.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    make_path: PathBuf,
    header_path: PathBuf,
}

impl ArtifactWriter {
    pub fn new(out_dir: &Path) -> Self {
        Self {
            make_path: out_dir.join(MAKE_FILE),
            header_path: out_dir.join(HEADER_FILE),
        }
    }

    pub fn make_path(&self) -> &Path {
        &self.make_path
    }

    pub fn header_path(&self) -> &Path {
        &self.header_path
    }

    /// Write both files, leaving unchanged ones untouched.
    pub fn write(&self, results: &ProbeResults, libraries: &[String]) -> Result<()> {
        rewrite_if_changed(
            &self.make_path,
            &lines_to_content(&make_vars(results, libraries)),
        )?;
        rewrite_if_changed(
            &self.header_path,
            &lines_to_content(&system_funcs_header(results.functions())),
        )?;
        Ok(())
    }
}
