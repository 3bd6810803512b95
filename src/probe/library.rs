//! Per-library probing.
//!
//! One stub program per library backs both questions asked about it: does
//! it compile against the headers, and does it link against the library.
//! A library that links is then asked for its version.

use std::path::PathBuf;

use super::flags::FlagResolver;
use super::results::{self, ProbeResults, VERSION_ERROR};
use super::runner::{library_stub, write_source, ArtifactGuard, ProbeRunner};
use super::version::VersionProbe;
use super::ProbeLog;
use crate::catalog::{FlagContext, LibraryDescriptor, VersionProvider};
use crate::error::{ProbeError, Result};

/// Platform on which libraries are linked into a shared object instead of
/// an executable.
pub const SHARED_OBJECT_PLATFORM: &str = "android";

/// Everything learned about one library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryOutcome {
    pub header_found: bool,
    pub link_found: bool,
    pub cflags: String,
    pub ldflags: String,
    /// Only present if the library linked.
    pub version: Option<String>,
}

impl LibraryOutcome {
    /// Store the outcome under the fixed keys for `lib`.
    pub fn record(&self, lib: &str, results: &mut ProbeResults) {
        results.set_flag(results::header_key(lib), self.header_found);
        results.set_flag(results::lib_key(lib), self.link_found);
        results.insert(results::cflags_key(lib), self.cflags.as_str());
        results.insert(results::ldflags_key(lib), self.ldflags.as_str());
        if let Some(version) = &self.version {
            results.insert(results::version_key(lib), version.as_str());
        }
    }
}

/// Probes libraries for one platform, link mode and install root.
pub struct LibraryProbe<'a> {
    runner: &'a ProbeRunner<'a>,
    resolver: &'a FlagResolver<'a>,
    context: &'a FlagContext,
}

impl<'a> LibraryProbe<'a> {
    pub fn new(
        runner: &'a ProbeRunner<'a>,
        resolver: &'a FlagResolver<'a>,
        context: &'a FlagContext,
    ) -> Self {
        Self {
            runner,
            resolver,
            context,
        }
    }

    /// Probe `library`.
    ///
    /// Only a malformed flag expression or a failure to write scratch files
    /// is an error; a missing library is a regular outcome.
    pub fn check(&self, log: &mut ProbeLog, library: &LibraryDescriptor) -> Result<LibraryOutcome> {
        let name = library.name.as_str();
        let cflags = self
            .resolver
            .resolve(log, library.compile_flags(self.context)?.as_deref())?;
        let ldflags = self
            .resolver
            .resolve(log, library.link_flags(self.context)?.as_deref())?;
        let headers = library.headers(&self.context.platform);

        let (header_found, link_found) = self.try_build(log, library, &headers, &cflags, &ldflags)?;

        let version = if link_found {
            let probe = VersionProbe {
                runner: self.runner,
                library: name,
                cflags: &cflags,
                headers: &headers,
            };
            let provider = library.version_provider(self.context)?;
            Some(self.resolve_version(log, name, &provider, &probe)?)
        } else {
            None
        };

        Ok(LibraryOutcome {
            header_found,
            link_found,
            cflags,
            ldflags,
            version,
        })
    }

    /// Compile, then link the stub program; all artifacts are removed on return.
    fn try_build(
        &self,
        log: &mut ProbeLog,
        library: &LibraryDescriptor,
        headers: &[String],
        cflags: &str,
        ldflags: &str,
    ) -> Result<(bool, bool)> {
        let name = library.name.as_str();
        let toolchain = self.runner.toolchain();

        let mut guard = ArtifactGuard::new();
        let source = guard.track(self.runner.scratch_path(name, "cc"));
        let object = guard.track(self.runner.scratch_path(name, "o"));
        let (binary, ldflags): (PathBuf, String) =
            if self.context.platform == SHARED_OBJECT_PLATFORM {
                (
                    self.runner.scratch_path(name, "so"),
                    format!("{} -shared -Wl,--no-undefined", ldflags)
                        .trim_start()
                        .to_string(),
                )
            } else {
                (self.runner.scratch_path(name, "bin"), ldflags.to_string())
            };
        let binary = guard.track(binary);

        write_source(&source, &library_stub(headers, library.function()))?;

        let compile_ok = toolchain.compile(log, cflags, &source, &object);
        log.line(format_args!(
            "{}: {} header",
            name,
            if compile_ok { "Found" } else { "Missing" }
        ));
        if !compile_ok {
            log.line(format_args!(
                "{}: Cannot test linking because compile failed",
                name
            ));
            return Ok((false, false));
        }

        let link_ok = toolchain.link(log, &ldflags, &[object.clone()], &binary);
        log.line(format_args!(
            "{}: {} lib",
            name,
            if link_ok { "Found" } else { "Missing" }
        ));
        Ok((true, link_ok))
    }

    /// Run the version provider; any provider failure yields `"error"`.
    fn resolve_version(
        &self,
        log: &mut ProbeLog,
        name: &str,
        provider: &VersionProvider,
        probe: &VersionProbe<'_>,
    ) -> Result<String> {
        let version = match provider {
            VersionProvider::Expression(expr) => match self.resolver.evaluate(log, expr) {
                Ok(version) => version,
                Err(ProbeError::ToolInvocationFailure { command, .. }) => {
                    log.line(format_args!(
                        "{}: Version helper \"{}\" failed",
                        name, command
                    ));
                    VERSION_ERROR.to_string()
                }
                Err(e) => return Err(e),
            },
            VersionProvider::Computed(compute) => match compute(probe, log) {
                Ok(version) => version,
                Err(e) => {
                    log.line(format_args!("{}: Version check failed: {:#}", name, e));
                    VERSION_ERROR.to_string()
                }
            },
        };
        log.line(format_args!("{}: Version {}", name, version));
        Ok(version)
    }
}
