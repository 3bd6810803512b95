//! Test-compile driver.
//!
//! Synthesizes tiny C++ programs, hands them to the [`Toolchain`] and makes
//! sure nothing it wrote survives the attempt.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::probe::ProbeLog;
use crate::toolchain::Toolchain;

/// Deletes the registered files when dropped, whether or not they exist.
///
/// Holding one across a probe guarantees cleanup on every exit path,
/// including early returns through `?` and unwinding.
#[derive(Debug, Default)]
pub struct ArtifactGuard {
    paths: Vec<PathBuf>,
}

impl ArtifactGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` for deletion and hand it back.
    pub fn track(&mut self, path: PathBuf) -> PathBuf {
        self.paths.push(path.clone());
        path
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        for path in &self.paths {
            if path.is_file() {
                if let Err(e) = fs::remove_file(path) {
                    tracing::warn!("Failed to remove {}: {}", path.display(), e);
                }
            }
        }
    }
}

/// Write `lines` to `path`, one per line.
pub fn write_source(path: &Path, lines: &[String]) -> Result<()> {
    let mut out = std::io::BufWriter::new(fs::File::create(path)?);
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    Ok(())
}

/// The most famous program.
pub fn hello_program() -> Vec<String> {
    [
        "#include <iostream>",
        "int main(int argc, char** argv) {",
        "  std::cout << \"Hello World!\" << std::endl;",
        "  return 0;",
        "}",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Include `headers` and take the address of `symbol`.
///
/// Compiles only if the headers declare the symbol.
pub fn take_func_addr(headers: &[String], symbol: &str) -> Vec<String> {
    let mut lines: Vec<String> = headers.iter().map(|h| format!("#include {}", h)).collect();
    lines.push(format!(
        "void (*f)() = reinterpret_cast<void (*)()>({});",
        symbol
    ));
    lines
}

/// [`take_func_addr`] plus an entry point, so the result also links.
pub fn library_stub(headers: &[String], symbol: &str) -> Vec<String> {
    let mut lines = take_func_addr(headers, symbol);
    lines.push("int main(int argc, char** argv) {".to_string());
    lines.push("  return 0;".to_string());
    lines.push("}".to_string());
    lines
}

/// Drives compile attempts for probes inside a scratch directory.
pub struct ProbeRunner<'a> {
    toolchain: &'a dyn Toolchain,
    out_dir: PathBuf,
}

impl<'a> ProbeRunner<'a> {
    /// Create a runner writing its scratch files into `out_dir`.
    pub fn new(toolchain: &'a dyn Toolchain, out_dir: &Path) -> Self {
        Self {
            toolchain,
            out_dir: out_dir.to_path_buf(),
        }
    }

    /// The toolchain this runner drives.
    pub fn toolchain(&self) -> &'a dyn Toolchain {
        self.toolchain
    }

    /// Scratch path for an artifact named `name` with extension `ext`.
    pub fn scratch_path(&self, name: &str, ext: &str) -> PathBuf {
        self.out_dir.join(format!("{}.{}", name, ext))
    }

    /// Write the program `lines` to `source` and try to compile it.
    ///
    /// Returns whether compilation succeeded. The source and object file
    /// are removed before returning.
    pub fn try_compile(
        &self,
        log: &mut ProbeLog,
        flags: &str,
        source: &Path,
        lines: &[String],
    ) -> Result<bool> {
        let mut guard = ArtifactGuard::new();
        let source = guard.track(source.to_path_buf());
        let object = guard.track(source.with_extension("o"));

        write_source(&source, lines)?;
        Ok(self.toolchain.compile(log, flags, &source, &object))
    }

    /// Check whether the compiler can compile anything at all.
    pub fn check_compiler(&self, log: &mut ProbeLog) -> Result<bool> {
        let source = self.scratch_path("hello", "cc");
        self.try_compile(log, "", &source, &hello_program())
    }

    /// Check whether `symbol` is declared by `headers`.
    ///
    /// This is a declaration test only; nothing is linked.
    pub fn check_func(
        &self,
        log: &mut ProbeLog,
        name: &str,
        symbol: &str,
        headers: &[String],
    ) -> Result<bool> {
        let source = self.scratch_path(name, "cc");
        self.try_compile(log, "", &source, &take_func_addr(headers, symbol))
    }
}
