//! The result map.
//!
//! Probe outcomes are recorded as string variables named after a fixed
//! scheme, ready to be written out as make variables. An empty value means
//! "not found"; anything else means found or carries a literal such as a
//! version string.

use std::collections::BTreeMap;

/// Key of the compiler sanity check result.
pub const COMPILER_KEY: &str = "COMPILER";

/// Version value recorded when a linked library's version cannot be read.
pub const VERSION_ERROR: &str = "error";

pub fn header_key(lib: &str) -> String {
    format!("HAVE_{}_H", lib)
}

pub fn lib_key(lib: &str) -> String {
    format!("HAVE_{}_LIB", lib)
}

pub fn cflags_key(lib: &str) -> String {
    format!("{}_CFLAGS", lib)
}

pub fn ldflags_key(lib: &str) -> String {
    format!("{}_LDFLAGS", lib)
}

pub fn version_key(lib: &str) -> String {
    format!("VERSION_{}", lib)
}

/// The keys always present for a probed library, in output order.
pub fn library_keys(lib: &str) -> [String; 4] {
    [
        header_key(lib),
        lib_key(lib),
        cflags_key(lib),
        ldflags_key(lib),
    ]
}

/// Variables and function availability gathered during a run.
///
/// Only grows: probes add entries, nothing removes them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResults {
    vars: BTreeMap<String, String>,
    functions: BTreeMap<String, bool>,
}

impl ProbeResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a variable.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Record a yes/no variable: `"true"` or empty.
    pub fn set_flag(&mut self, key: impl Into<String>, found: bool) {
        self.insert(key, if found { "true" } else { "" });
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Value of `key`, empty if it was never recorded.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// Whether `key` holds a non-empty value.
    pub fn is_set(&self, key: &str) -> bool {
        !self.value(key).is_empty()
    }

    pub fn set_compiler(&mut self, works: bool) {
        self.insert(COMPILER_KEY, if works { "true" } else { "false" });
    }

    pub fn compiler_works(&self) -> bool {
        self.value(COMPILER_KEY) == "true"
    }

    pub fn has_header(&self, lib: &str) -> bool {
        self.is_set(&header_key(lib))
    }

    pub fn has_lib(&self, lib: &str) -> bool {
        self.is_set(&lib_key(lib))
    }

    pub fn version(&self, lib: &str) -> Option<&str> {
        self.get(&version_key(lib))
    }

    /// All variables in key order.
    pub fn vars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Record whether a function is declared.
    pub fn set_function(&mut self, id: &str, found: bool) {
        self.functions.insert(id.to_string(), found);
    }

    /// Function availability keyed by canonical id.
    pub fn functions(&self) -> &BTreeMap<String, bool> {
        &self.functions
    }
}
