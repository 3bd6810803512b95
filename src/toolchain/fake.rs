//! Scripted toolchain for unit tests.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use super::Toolchain;
use crate::probe::ProbeLog;

/// Succeeds unless the source/binary stem is listed as failing.
///
/// Successful steps create their output file so cleanup can be observed.
#[derive(Debug, Default)]
pub(crate) struct FakeToolchain {
    pub compile_fails: Vec<String>,
    pub link_fails: Vec<String>,
    pub preprocess_output: Option<String>,
    pub calls: RefCell<Vec<String>>,
    pub sources_seen: RefCell<Vec<String>>,
}

impl FakeToolchain {
    pub fn failing_compile(stems: &[&str]) -> Self {
        Self {
            compile_fails: stems.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn failing_link(stems: &[&str]) -> Self {
        Self {
            link_fails: stems.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.starts_with(prefix))
    }
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

impl Toolchain for FakeToolchain {
    fn describe(&self) -> String {
        "fake-c++".to_string()
    }

    fn compile(&self, log: &mut ProbeLog, flags: &str, source: &Path, object: &Path) -> bool {
        let name = stem(source);
        self.calls
            .borrow_mut()
            .push(format!("compile:{}:{}", name, flags));
        if let Ok(text) = fs::read_to_string(source) {
            self.sources_seen.borrow_mut().push(text);
        }
        log.line(format_args!("fake compile {}", name));
        if self.compile_fails.contains(&name) {
            return false;
        }
        fs::write(object, b"obj").is_ok()
    }

    fn link(
        &self,
        log: &mut ProbeLog,
        flags: &str,
        _objects: &[PathBuf],
        binary: &Path,
    ) -> bool {
        let name = stem(binary);
        self.calls.borrow_mut().push(format!("link:{}:{}", name, flags));
        log.line(format_args!("fake link {}", name));
        if self.link_fails.contains(&name) {
            return false;
        }
        fs::write(binary, b"bin").is_ok()
    }

    fn preprocess(&self, _log: &mut ProbeLog, flags: &str, source: &Path) -> Option<String> {
        self.calls
            .borrow_mut()
            .push(format!("preprocess:{}:{}", stem(source), flags));
        self.preprocess_output.clone()
    }
}
