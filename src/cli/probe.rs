//! The probe command.
//!
//! Sets up everything a run needs from the command line, then probes,
//! writes the generated files and prints the report.

use std::fs;
use std::path::Path;

use crate::catalog::{Catalog, FlagContext};
use crate::cli::args::Cli;
use crate::config::MakeVarParser;
use crate::environment::detect_install_root;
use crate::error::Result;
use crate::probe::{ProbeLog, TargetSystem, LOG_FILE};
use crate::shell::ShellRunner;
use crate::toolchain::CommandToolchain;

/// A single probing run.
pub struct ProbeCommand {
    args: Cli,
}

impl ProbeCommand {
    pub fn new(args: Cli) -> Self {
        Self { args }
    }

    fn load_catalog(&self) -> Result<Catalog> {
        match &self.args.catalog {
            Some(path) => {
                tracing::debug!("Loading catalog from {}", path.display());
                Catalog::load(path)
            }
            None => Catalog::builtin(),
        }
    }

    /// The install root to use, falling back to the platform default.
    fn install_root(&self) -> Option<String> {
        if let Some(root) = self.args.install_root() {
            return Some(root.to_string());
        }
        let detected = detect_install_root(&self.args.target_os)?;
        if let Some(message) = detected.message() {
            println!("{}", message);
        }
        Some(detected.path)
    }

    fn open_log(out_dir: &Path) -> Result<ProbeLog> {
        let mut log = ProbeLog::create(&out_dir.join(LOG_FILE))?;
        log.line("Probing system:");
        log.line(chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
        Ok(log)
    }

    pub fn execute(&self) -> Result<()> {
        let args = &self.args;
        let catalog = self.load_catalog()?;
        let configuration = catalog.configuration(&args.link_mode)?;
        let toolchain = CommandToolchain::from_line(&args.compile)?;
        let custom_vars = MakeVarParser::load_optional(&args.custom_vars)?;

        fs::create_dir_all(&args.outdir)?;
        let log = Self::open_log(&args.outdir)?;

        println!("Probing target system...");
        let install_root = self.install_root();
        let context = FlagContext::new(
            &args.target_os,
            configuration.link_static,
            install_root.as_deref(),
        );
        tracing::debug!(
            "Probing for {} ({}) with {}",
            args.target_os,
            args.link_mode,
            toolchain
        );

        let commands = ShellRunner;
        let mut target = TargetSystem::new(
            &catalog,
            configuration,
            context,
            &toolchain,
            &commands,
            &args.outdir,
            log,
        );
        target.check_all()?;
        target.write_all()?;
        target.print_results(&custom_vars);
        Ok(())
    }
}
