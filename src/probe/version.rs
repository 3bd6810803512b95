//! Version detection through the preprocessor.
//!
//! Libraries without a helper script usually publish their version as a
//! macro in one of their headers. Expanding that macro needs only the
//! preprocessor, so it is as cross-compile safe as the other probes.

use std::sync::LazyLock;

use anyhow::{anyhow, bail};
use regex::Regex;

use super::runner::{write_source, ArtifactGuard, ProbeRunner};
use super::ProbeLog;

/// Marks the line whose expansion carries the macro value.
const MARKER: &str = "sysprobe_expand";

/// What a computed version provider may use.
pub struct VersionProbe<'a> {
    pub runner: &'a ProbeRunner<'a>,
    /// Make-style name of the library being probed.
    pub library: &'a str,
    /// Resolved compile flags for the library.
    pub cflags: &'a str,
    pub headers: &'a [String],
}

/// Expand `macro_name` after including the library headers.
pub fn expand_macro(
    probe: &VersionProbe<'_>,
    log: &mut ProbeLog,
    macro_name: &str,
) -> anyhow::Result<String> {
    let mut guard = ArtifactGuard::new();
    let source = guard.track(
        probe
            .runner
            .scratch_path(&format!("{}_version", probe.library), "cc"),
    );

    let mut lines: Vec<String> = probe
        .headers
        .iter()
        .map(|h| format!("#include {}", h))
        .collect();
    lines.push(format!("{} {}", MARKER, macro_name));
    write_source(&source, &lines)?;

    let output = probe
        .runner
        .toolchain()
        .preprocess(log, probe.cflags, &source)
        .ok_or_else(|| anyhow!("preprocessing for {} failed", macro_name))?;
    let value = parse_expansion(&output, macro_name)?;
    log.line(format_args!("{} expands to: {}", macro_name, value));
    Ok(value)
}

// --- Compiled regexes (one-time via LazyLock) ---

static MARKER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?m)^\s*{}\s+(.*?)\s*$", MARKER)).unwrap());

static STRING_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""((?:[^"\\]|\\.)*)""#).unwrap());

/// Extract the expansion of `macro_name` from preprocessor output.
///
/// Adjacent string literals are concatenated without their quotes; other
/// expansions are returned as-is.
pub fn parse_expansion(output: &str, macro_name: &str) -> anyhow::Result<String> {
    let Some(caps) = MARKER_LINE.captures_iter(output).last() else {
        bail!("no expansion of {} in preprocessor output", macro_name);
    };
    let raw = caps[1].trim();
    if raw.is_empty() || raw == macro_name {
        bail!("{} is not defined", macro_name);
    }

    let literals: Vec<&str> = STRING_LITERAL
        .captures_iter(raw)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    if literals.is_empty() {
        Ok(raw.to_string())
    } else {
        Ok(literals.concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::fake::FakeToolchain;
    use tempfile::TempDir;

    #[test]
    fn parses_string_literal() {
        let out = "# 1 \"x.cc\"\nint y;\nsysprobe_expand \"1.2.13\"\n";
        assert_eq!(parse_expansion(out, "ZLIB_VERSION").unwrap(), "1.2.13");
    }

    #[test]
    fn concatenates_adjacent_literals() {
        let out = "sysprobe_expand \"1.6\" \".\" \"37\"";
        assert_eq!(parse_expansion(out, "PNG_LIBPNG_VER_STRING").unwrap(), "1.6.37");
    }

    #[test]
    fn keeps_numeric_expansion() {
        let out = "sysprobe_expand 10802\n";
        assert_eq!(parse_expansion(out, "OGG_VERSION").unwrap(), "10802");
    }

    #[test]
    fn unexpanded_macro_is_error() {
        let out = "sysprobe_expand ZLIB_VERSION\n";
        assert!(parse_expansion(out, "ZLIB_VERSION").is_err());
        assert!(parse_expansion("", "ZLIB_VERSION").is_err());
    }

    #[test]
    fn expand_macro_uses_headers_and_cleans_up() {
        let temp = TempDir::new().unwrap();
        let tc = FakeToolchain {
            preprocess_output: Some("sysprobe_expand \"1.3\"\n".to_string()),
            ..Default::default()
        };
        let runner = ProbeRunner::new(&tc, temp.path());
        let headers = vec!["<zlib.h>".to_string()];
        let probe = VersionProbe {
            runner: &runner,
            library: "ZLIB",
            cflags: "-I/opt/include",
            headers: &headers,
        };
        let mut log = ProbeLog::memory();

        let version = expand_macro(&probe, &mut log, "ZLIB_VERSION").unwrap();

        assert_eq!(version, "1.3");
        assert!(tc.called("preprocess:ZLIB_version:-I/opt/include"));
        assert!(!temp.path().join("ZLIB_version.cc").exists());
    }

    #[test]
    fn expand_macro_fails_when_preprocessor_fails() {
        let temp = TempDir::new().unwrap();
        let tc = FakeToolchain::default();
        let runner = ProbeRunner::new(&tc, temp.path());
        let probe = VersionProbe {
            runner: &runner,
            library: "ZLIB",
            cflags: "",
            headers: &[],
        };
        let mut log = ProbeLog::memory();

        assert!(expand_macro(&probe, &mut log, "ZLIB_VERSION").is_err());
    }
}
