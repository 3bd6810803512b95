//! Compile and link primitives.
//!
//! A [`Toolchain`] turns a source file into an object file, and object files
//! into a binary. Nothing produced is ever executed, which keeps probing
//! safe when cross compiling.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::probe::ProbeLog;
use crate::shell::{self, words};

#[cfg(test)]
pub(crate) mod fake;

/// Compile, link and preprocess operations used by probes.
///
/// Failures are outcomes, not errors: each operation logs what it ran and
/// what the tool printed, then reports whether the tool succeeded.
pub trait Toolchain {
    /// Human-readable description, e.g. the compiler command line.
    fn describe(&self) -> String;

    /// Compile `source` into `object` using extra `flags`.
    fn compile(&self, log: &mut ProbeLog, flags: &str, source: &Path, object: &Path) -> bool;

    /// Link `objects` into `binary` using extra `flags`.
    fn link(&self, log: &mut ProbeLog, flags: &str, objects: &[PathBuf], binary: &Path)
        -> bool;

    /// Run the preprocessor over `source`, returning its output on success.
    fn preprocess(&self, log: &mut ProbeLog, flags: &str, source: &Path) -> Option<String>;
}

/// [`Toolchain`] driving a compiler driver such as `g++` or `clang++`.
#[derive(Debug, Clone)]
pub struct CommandToolchain {
    line: String,
    command: Vec<String>,
}

impl CommandToolchain {
    /// Build from a compile command line, e.g. `"ccache g++ -std=c++17"`.
    pub fn from_line(line: &str) -> Result<Self> {
        Ok(Self {
            line: line.to_string(),
            command: words::split(line)?,
        })
    }

    fn run(&self, log: &mut ProbeLog, args: Vec<String>) -> Option<String> {
        let Some((program, base_args)) = self.command.split_first() else {
            log.line("No compile command configured");
            return None;
        };
        let mut full_args = base_args.to_vec();
        full_args.extend(args);

        let mut shown = vec![program.clone()];
        shown.extend(full_args.iter().cloned());
        log.line(format_args!("Executing: {}", words::join(&shown)));

        match shell::execute(program, &full_args) {
            Ok(result) => {
                if !result.stderr.trim().is_empty() {
                    log.block(&result.stderr);
                }
                if result.success {
                    Some(result.stdout)
                } else {
                    log.line(format_args!(
                        "Exited with code {:?}",
                        result.exit_code
                    ));
                    None
                }
            }
            Err(e) => {
                log.line(e.to_string());
                None
            }
        }
    }
}

impl std::fmt::Display for CommandToolchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.line)
    }
}

/// Split a flag string, logging rather than failing on bad quoting.
fn flag_words(log: &mut ProbeLog, flags: &str) -> Option<Vec<String>> {
    match words::split(flags) {
        Ok(w) => Some(w),
        Err(e) => {
            log.line(format_args!("Cannot use flags: {}", e));
            None
        }
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

impl Toolchain for CommandToolchain {
    fn describe(&self) -> String {
        self.line.clone()
    }

    fn compile(&self, log: &mut ProbeLog, flags: &str, source: &Path, object: &Path) -> bool {
        let Some(mut args) = flag_words(log, flags) else {
            return false;
        };
        args.extend([
            "-c".to_string(),
            path_arg(source),
            "-o".to_string(),
            path_arg(object),
        ]);
        self.run(log, args).is_some()
    }

    fn link(
        &self,
        log: &mut ProbeLog,
        flags: &str,
        objects: &[PathBuf],
        binary: &Path,
    ) -> bool {
        let Some(flag_args) = flag_words(log, flags) else {
            return false;
        };
        let mut args: Vec<String> = objects.iter().map(|o| path_arg(o)).collect();
        args.extend(["-o".to_string(), path_arg(binary)]);
        args.extend(flag_args);
        self.run(log, args).is_some()
    }

    fn preprocess(&self, log: &mut ProbeLog, flags: &str, source: &Path) -> Option<String> {
        let mut args = flag_words(log, flags)?;
        args.extend(["-E".to_string(), path_arg(source)]);
        self.run(log, args)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn from_line_splits_words() {
        let tc = CommandToolchain::from_line("ccache g++ -std=c++17").unwrap();
        assert_eq!(tc.command, ["ccache", "g++", "-std=c++17"]);
        assert_eq!(tc.to_string(), "ccache g++ -std=c++17");
    }

    #[test]
    fn compile_reports_tool_exit_status() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.cc");
        let obj = temp.path().join("a.o");
        let mut log = ProbeLog::memory();

        let ok = CommandToolchain::from_line("true").unwrap();
        assert!(ok.compile(&mut log, "-DX", &src, &obj));

        let broken = CommandToolchain::from_line("false").unwrap();
        assert!(!broken.compile(&mut log, "", &src, &obj));
        assert!(log.contains("Executing: true -DX -c"));
    }

    #[test]
    fn link_puts_flags_after_objects() {
        let temp = TempDir::new().unwrap();
        let obj = temp.path().join("a.o");
        let bin = temp.path().join("a.bin");
        let mut log = ProbeLog::memory();

        let tc = CommandToolchain::from_line("true").unwrap();
        assert!(tc.link(&mut log, "-lz", &[obj.clone()], &bin));

        let expected = format!("{} -o {} -lz", obj.display(), bin.display());
        assert!(log.contains(&expected));
    }

    #[test]
    fn missing_compiler_fails_without_error() {
        let temp = TempDir::new().unwrap();
        let mut log = ProbeLog::memory();
        let tc = CommandToolchain::from_line("/nonexistent/c++").unwrap();

        assert!(!tc.compile(
            &mut log,
            "",
            &temp.path().join("a.cc"),
            &temp.path().join("a.o")
        ));
    }

    #[test]
    fn preprocess_returns_stdout() {
        let temp = TempDir::new().unwrap();
        let mut log = ProbeLog::memory();
        let tc = CommandToolchain::from_line("echo").unwrap();

        let out = tc
            .preprocess(&mut log, "", &temp.path().join("v.cc"))
            .unwrap();
        assert!(out.contains("-E"));
    }

    #[test]
    fn empty_command_never_succeeds() {
        let temp = TempDir::new().unwrap();
        let mut log = ProbeLog::memory();
        let tc = CommandToolchain::from_line("").unwrap();

        assert!(!tc.compile(
            &mut log,
            "",
            &temp.path().join("a.cc"),
            &temp.path().join("a.o")
        ));
        assert!(log.contains("No compile command configured"));
    }
}
