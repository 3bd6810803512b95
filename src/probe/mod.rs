//! The probing engine.
//!
//! Answers which headers, libraries and functions the target toolchain
//! provides by compiling and linking small generated programs. Nothing that
//! gets built is ever run, so probing works the same when cross compiling.
//!
//! # Modules
//!
//! - [`flags`] - Backtick substitution and flag normalization
//! - [`runner`] - Scratch programs and compile attempts
//! - [`library`] - Header, link and version checks for one library
//! - [`function`] - Declaration checks for one function
//! - [`target`] - The whole run, in order
//! - [`results`] - The variable map filled by probes
//! - [`log`] - The probe log file
//! - [`version`] - Macro-based version extraction

pub mod flags;
pub mod function;
pub mod library;
pub mod log;
pub mod results;
pub mod runner;
pub mod target;
pub mod version;

pub use flags::{normalize_whitespace, FlagResolver};
pub use function::FunctionProbe;
pub use library::{LibraryOutcome, LibraryProbe};
pub use log::ProbeLog;
pub use results::ProbeResults;
pub use runner::ProbeRunner;
pub use target::{TargetSystem, LOG_FILE};
pub use version::VersionProbe;
