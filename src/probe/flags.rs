//! Flag expression resolution.
//!
//! Compile and link flags in the catalog may embed helper invocations in
//! backticks, e.g. `` `sdl2-config --cflags` -DUSE_SDL``. Resolving an
//! expression runs each helper, substitutes its output and normalizes the
//! whitespace of the result so that identical flags always compare equal.

use crate::error::{ProbeError, Result};
use crate::probe::ProbeLog;
use crate::shell::{words, CommandRunner};

/// Evaluates flag expressions using a [`CommandRunner`] for helpers.
pub struct FlagResolver<'r> {
    runner: &'r dyn CommandRunner,
}

impl<'r> FlagResolver<'r> {
    /// Create a resolver that runs helpers through `runner`.
    pub fn new(runner: &'r dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Resolve an optional flag expression into a canonical flag string.
    ///
    /// A missing expression resolves to `""`. A helper that cannot run is
    /// treated as "not installed" and also resolves to `""`. Only a
    /// malformed expression is an error.
    pub fn resolve(&self, log: &mut ProbeLog, expr: Option<&str>) -> Result<String> {
        let Some(expr) = expr else {
            return Ok(String::new());
        };

        // TODO: helpers such as sdl2-config back several flag lookups and
        // are executed once per lookup; cache output per command line.
        match self.evaluate(log, expr) {
            Ok(flags) => Ok(flags),
            Err(ProbeError::ToolInvocationFailure { command, code }) => {
                tracing::debug!(
                    "Helper '{}' unavailable (exit code {:?}), treating flags as empty",
                    command,
                    code
                );
                Ok(String::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Like [`FlagResolver::resolve`], but helper failures are returned
    /// as [`ProbeError::ToolInvocationFailure`] instead of masked.
    pub fn evaluate(&self, log: &mut ProbeLog, expr: &str) -> Result<String> {
        normalize_whitespace(&self.evaluate_backticks(log, expr)?)
    }

    /// Replace every backtick-delimited command in `expr` with its output.
    pub fn evaluate_backticks(&self, log: &mut ProbeLog, expr: &str) -> Result<String> {
        let mut parts = String::with_capacity(expr.len());
        let mut rest = expr;

        while let Some(start) = rest.find('`') {
            let after = &rest[start + 1..];
            let end = after
                .find('`')
                .ok_or_else(|| ProbeError::MalformedExpression {
                    expression: expr.to_string(),
                })?;

            parts.push_str(&rest[..start]);
            let command = after[..end].trim();
            parts.push_str(&self.runner.capture_stdout(log, command)?);
            rest = &after[end + 1..];
        }

        parts.push_str(rest);
        Ok(parts)
    }
}

/// Split `expr` shell-style and rejoin the words with single spaces.
pub fn normalize_whitespace(expr: &str) -> Result<String> {
    Ok(words::join(&words::split(expr)?))
}
