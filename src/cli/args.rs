//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_CUSTOM_VARS;

/// Probe a (possibly cross-compiling) toolchain for libraries and functions.
#[derive(Debug, Parser)]
#[command(name = "sysprobe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Compiler command line, e.g. "g++ -std=c++17"
    #[arg(value_name = "COMPILE")]
    pub compile: String,

    /// Directory receiving the generated files and the probe log
    #[arg(value_name = "OUTDIR")]
    pub outdir: PathBuf,

    /// Target operating system, e.g. linux, darwin, mingw32, android
    #[arg(value_name = "TARGET_OS")]
    pub target_os: String,

    /// Link mode selecting the configuration, e.g. SYS_DYN or 3RD_STA
    #[arg(value_name = "LINK_MODE")]
    pub link_mode: String,

    /// Third-party install root; empty to use the platform default
    #[arg(value_name = "THIRDPARTY_INSTALL_DIR")]
    pub thirdparty_install_dir: String,

    /// Catalog file to use instead of the built-in one
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Make fragment with user-editable build settings
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CUSTOM_VARS)]
    pub custom_vars: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// The install root given on the command line, if any.
    pub fn install_root(&self) -> Option<&str> {
        Some(self.thirdparty_install_dir.as_str()).filter(|s| !s.is_empty())
    }
}
