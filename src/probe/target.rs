//! Probing one target system from start to finish.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::flags::FlagResolver;
use super::function::FunctionProbe;
use super::library::LibraryProbe;
use super::runner::ProbeRunner;
use super::{ProbeLog, ProbeResults};
use crate::catalog::{Catalog, Configuration, FlagContext};
use crate::error::Result;
use crate::output::{report, ArtifactWriter};
use crate::shell::CommandRunner;
use crate::toolchain::Toolchain;

/// File name of the probe log inside the output directory.
pub const LOG_FILE: &str = "probe.log";

/// Owns the state of a probing run: the log and the results.
///
/// Probes run strictly one after another. The results only grow while
/// probing and are written out once at the end.
pub struct TargetSystem<'a> {
    catalog: &'a Catalog,
    configuration: Configuration,
    context: FlagContext,
    toolchain: &'a dyn Toolchain,
    commands: &'a dyn CommandRunner,
    out_dir: PathBuf,
    log: ProbeLog,
    results: ProbeResults,
    libraries: Vec<String>,
}

impl<'a> TargetSystem<'a> {
    pub fn new(
        catalog: &'a Catalog,
        configuration: Configuration,
        context: FlagContext,
        toolchain: &'a dyn Toolchain,
        commands: &'a dyn CommandRunner,
        out_dir: &Path,
        log: ProbeLog,
    ) -> Self {
        let libraries = configuration.required_libraries();
        tracing::debug!("Libraries to probe: {}", libraries.join(" "));
        Self {
            catalog,
            configuration,
            context,
            toolchain,
            commands,
            out_dir: out_dir.to_path_buf(),
            log,
            results: ProbeResults::new(),
            libraries,
        }
    }

    /// Libraries needed by the desired components, sorted.
    pub fn libraries(&self) -> &[String] {
        &self.libraries
    }

    pub fn results(&self) -> &ProbeResults {
        &self.results
    }

    pub fn log(&self) -> &ProbeLog {
        &self.log
    }

    pub fn log_path(&self) -> PathBuf {
        self.out_dir.join(LOG_FILE)
    }

    /// Probe the compiler, then every function, then every library.
    ///
    /// A broken compiler does not stop the remaining probes.
    pub fn check_all(&mut self) -> Result<()> {
        let runner = ProbeRunner::new(self.toolchain, &self.out_dir);
        self.check_compiler(&runner)?;
        self.check_functions(&runner)?;
        self.check_libraries(&runner)?;
        self.log.flush();
        Ok(())
    }

    fn check_compiler(&mut self, runner: &ProbeRunner<'_>) -> Result<()> {
        let works = runner.check_compiler(&mut self.log)?;
        self.log.line(format_args!(
            "Compiler {}: {}",
            if works { "works" } else { "broken" },
            self.toolchain.describe()
        ));
        if !works {
            tracing::warn!("Compiler does not work: {}", self.toolchain.describe());
        }
        self.results.set_compiler(works);
        Ok(())
    }

    fn check_functions(&mut self, runner: &ProbeRunner<'_>) -> Result<()> {
        let probe = FunctionProbe::new(runner, &self.context.platform);
        for func in &self.catalog.functions {
            let found = probe.check(&mut self.log, func)?;
            tracing::debug!("Function {}: {}", func.name, found);
            self.results.set_function(&func.name, found);
        }
        Ok(())
    }

    fn check_libraries(&mut self, runner: &ProbeRunner<'_>) -> Result<()> {
        let resolver = FlagResolver::new(self.commands);
        let probe = LibraryProbe::new(runner, &resolver, &self.context);
        for lib in &self.libraries {
            let descriptor = self.catalog.libraries.get(lib)?;
            let outcome = probe.check(&mut self.log, descriptor)?;
            tracing::debug!(
                "Library {}: header={} lib={}",
                lib,
                outcome.header_found,
                outcome.link_found
            );
            outcome.record(lib, &mut self.results);
        }
        Ok(())
    }

    /// Write the make fragment and function header into the output directory.
    pub fn write_all(&self) -> Result<()> {
        ArtifactWriter::new(&self.out_dir).write(&self.results, &self.libraries)
    }

    /// The status report for this run.
    pub fn report(&self, custom_vars: &BTreeMap<String, String>) -> Vec<String> {
        report::render(
            &self.results,
            self.catalog,
            &self.configuration,
            custom_vars,
            &self.log_path(),
        )
    }

    /// Print the status report to stdout.
    pub fn print_results(&self, custom_vars: &BTreeMap<String, String>) {
        for line in self.report(custom_vars) {
            println!("{}", line);
        }
    }
}
