//! Command-line interface for sysprobe.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`probe`] - The probing run driven by those arguments

pub mod args;
pub mod probe;

pub use args::Cli;
pub use probe::ProbeCommand;
