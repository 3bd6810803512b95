//! Environment inputs.
//!
//! The environment is only consulted to pick a default install root for
//! third-party libraries when none was given on the command line.

pub mod detection;

pub use detection::{detect_install_root, detect_install_root_with_env, DetectedInstallRoot};
