//! User-editable build settings.
//!
//! Settings such as the install path live in a make fragment
//! (`build/custom.mk` by default) shared with the build system. The probe
//! reads it but never writes it.

pub mod make_vars;

pub use make_vars::MakeVarParser;

/// Default location of the custom variables file.
pub const DEFAULT_CUSTOM_VARS: &str = "build/custom.mk";

/// Variable holding the install path shown in the report.
pub const INSTALL_BASE: &str = "INSTALL_BASE";
