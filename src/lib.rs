//! sysprobe - Cross-compile safe capability probing.
//!
//! sysprobe finds out which headers, libraries and functions a target
//! toolchain provides by compiling and linking tiny generated programs,
//! never running them. The findings are written as a make fragment and a
//! C++ header, and summarised in a report telling which components of the
//! project can be built.
//!
//! # Modules
//!
//! - [`catalog`] - What can be probed: libraries, functions, components
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - User-editable build settings
//! - [`environment`] - Install root defaults from the environment
//! - [`error`] - Error types and result aliases
//! - [`output`] - Generated files and the status report
//! - [`probe`] - The probing engine
//! - [`shell`] - External command execution and shell words
//! - [`toolchain`] - Compile, link and preprocess primitives
//!
//! # Example
//!
//! ```
//! use sysprobe::catalog::{resolve_string, FlagContext};
//!
//! // Resolve catalog variables in a flag template
//! let ctx = FlagContext::new("linux", true, Some("/opt/3rd"));
//! let flags = resolve_string("-I${distro_root}/include", &ctx).unwrap();
//! assert_eq!(flags, "-I/opt/3rd/include");
//! ```
//!
//! For complete runs, see the integration tests.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod output;
pub mod probe;
pub mod shell;
pub mod toolchain;

pub use error::{ProbeError, Result};
