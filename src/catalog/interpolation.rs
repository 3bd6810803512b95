//! Variable interpolation for catalog flag templates.
//!
//! Flag templates may reference the probing context using `${variable}`
//! syntax before any backtick helpers run.
//!
//! # Syntax
//!
//! - `${variable_name}` - replaced with variable value
//! - `$${escaped}` - produces literal `${escaped}` in output
//!
//! # Variables
//!
//! - `platform` - target platform identifier, e.g. `linux` or `darwin`
//! - `link_mode` - `static` or `dynamic`
//! - `distro_root` - third-party install root, empty if unknown
//!
//! # Example
//!
//! ```
//! use sysprobe::catalog::{resolve_string, FlagContext};
//!
//! let ctx = FlagContext::new("darwin", false, Some("/opt/local"));
//! let flags = resolve_string("-I${distro_root}/include", &ctx).unwrap();
//! assert_eq!(flags, "-I/opt/local/include");
//! ```

use crate::error::{ProbeError, Result};
use std::collections::HashMap;

/// A segment of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Variable reference: ${name}
    Variable(String),
}

/// Parse a string containing ${var} interpolations.
pub fn parse_interpolation(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut chars = input.chars().peekable();
    let mut current_literal = String::new();

    while let Some(c) = chars.next() {
        if c != '$' {
            current_literal.push(c);
            continue;
        }
        match chars.peek() {
            Some('$') => {
                // $$ becomes $; $${...} passes through literally
                chars.next();
                current_literal.push('$');
                if chars.peek() == Some(&'{') {
                    for c in chars.by_ref() {
                        current_literal.push(c);
                        if c == '}' {
                            break;
                        }
                    }
                }
            }
            Some('{') => {
                chars.next();
                if !current_literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut current_literal)));
                }
                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }
                segments.push(Segment::Variable(var_name));
            }
            _ => current_literal.push(c),
        }
    }

    if !current_literal.is_empty() {
        segments.push(Segment::Literal(current_literal));
    }

    segments
}

/// Variables every [`FlagContext`] provides.
pub const VARIABLES: [&str; 3] = ["platform", "link_mode", "distro_root"];

/// Variables referenced by `input` that no context provides.
pub fn unknown_variables(input: &str) -> Vec<String> {
    parse_interpolation(input)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Variable(name) if !VARIABLES.contains(&name.as_str()) => Some(name),
            _ => None,
        })
        .collect()
}

/// What flag providers know about the probing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagContext {
    /// Target platform identifier.
    pub platform: String,
    /// Whether libraries are linked statically.
    pub link_static: bool,
    /// Third-party install root, if any.
    pub distro_root: Option<String>,
}

impl FlagContext {
    pub fn new(platform: &str, link_static: bool, distro_root: Option<&str>) -> Self {
        Self {
            platform: platform.to_string(),
            link_static,
            distro_root: distro_root.map(str::to_string),
        }
    }

    fn variables(&self) -> HashMap<&'static str, String> {
        let mut vars = HashMap::new();
        vars.insert("platform", self.platform.clone());
        vars.insert(
            "link_mode",
            if self.link_static { "static" } else { "dynamic" }.to_string(),
        );
        vars.insert("distro_root", self.distro_root.clone().unwrap_or_default());
        vars
    }
}

/// Resolve all variables in an interpolated string.
///
/// # Errors
///
/// Returns [`ProbeError::UnresolvedVariable`] for unknown variable names.
pub fn resolve_string(input: &str, context: &FlagContext) -> Result<String> {
    let vars = context.variables();
    let mut result = String::new();

    for segment in parse_interpolation(input) {
        match segment {
            Segment::Literal(text) => result.push_str(&text),
            Segment::Variable(name) => {
                let value = vars
                    .get(name.as_str())
                    .ok_or(ProbeError::UnresolvedVariable { name: name.clone() })?;
                result.push_str(value);
            }
        }
    }

    Ok(result)
}
