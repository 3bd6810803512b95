//! Make fragment parsing.
//!
//! The build keeps user-editable settings such as the install path in a
//! small make fragment. Only plain variable assignments are understood.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

/// Parses make variable assignments into a map.
///
/// # Supported Formats
///
/// - Immediate: `NAME:=value`
/// - Recursive: `NAME=value`
/// - Conditional: `NAME?=value` (only if not yet assigned)
/// - Comments: `# This is a comment`
/// - Whitespace around the operator: `NAME := value`
///
/// Other lines (rules, directives, recipes) are ignored.
///
/// # Example
///
/// ```
/// use sysprobe::config::MakeVarParser;
///
/// let content = "# Install location\nINSTALL_BASE:=/opt/emu\nSYMLINK_FOR_BINARY?=true\n";
///
/// let vars = MakeVarParser::parse(content);
/// assert_eq!(vars.get("INSTALL_BASE"), Some(&"/opt/emu".to_string()));
/// assert_eq!(vars.get("SYMLINK_FOR_BINARY"), Some(&"true".to_string()));
/// ```
pub struct MakeVarParser;

impl MakeVarParser {
    /// Parse make fragment content.
    pub fn parse(content: &str) -> BTreeMap<String, String> {
        let mut vars = BTreeMap::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, op, value)) = Self::parse_line(line) {
                if op == "?=" && vars.contains_key(&key) {
                    continue;
                }
                vars.insert(key, value);
            }
        }

        vars
    }

    /// Split a line into name, operator and value.
    fn parse_line(line: &str) -> Option<(String, &'static str, String)> {
        let eq_pos = line.find('=')?;
        let (name, op) = match line[..eq_pos].chars().last() {
            Some(':') => (&line[..eq_pos - 1], ":="),
            Some('?') => (&line[..eq_pos - 1], "?="),
            _ => (&line[..eq_pos], "="),
        };
        let name = name.trim();
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            return None;
        }
        let value = line[eq_pos + 1..].trim();
        Some((name.to_string(), op, value.to_string()))
    }

    /// Load a make fragment.
    pub fn load(path: &Path) -> Result<BTreeMap<String, String>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Load a make fragment, returning an empty map if the file doesn't exist.
    pub fn load_optional(path: &Path) -> Result<BTreeMap<String, String>> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No custom variables at {}", path.display());
            Ok(BTreeMap::new())
        }
    }
}
