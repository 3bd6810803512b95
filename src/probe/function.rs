//! Per-function probing.

use super::runner::ProbeRunner;
use super::ProbeLog;
use crate::catalog::FunctionDescriptor;
use crate::error::Result;

/// Checks which functions the target's headers declare.
pub struct FunctionProbe<'a> {
    runner: &'a ProbeRunner<'a>,
    platform: &'a str,
}

impl<'a> FunctionProbe<'a> {
    pub fn new(runner: &'a ProbeRunner<'a>, platform: &'a str) -> Self {
        Self { runner, platform }
    }

    /// Whether `func` is declared by its headers on this platform.
    pub fn check(&self, log: &mut ProbeLog, func: &FunctionDescriptor) -> Result<bool> {
        let found = self.runner.check_func(
            log,
            &func.name,
            &func.function,
            func.headers(self.platform),
        )?;
        log.line(format_args!(
            "{} function: {}",
            if found { "Found" } else { "Missing" },
            func.function
        ));
        Ok(found)
    }
}
