//! Install root detection.
//!
//! When no third-party install directory is given, a few platforms have a
//! well-known place where libraries live. Detection looks at environment
//! variables only; nothing on disk is inspected.

use std::env::VarError;
use std::path::Path;

/// An install root picked from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedInstallRoot {
    /// The directory containing `include/` and `lib/`.
    pub path: String,
    /// Where the root came from, as shown to the user; `None` for a
    /// plain fallback that needs no mention.
    pub source: Option<String>,
}

impl DetectedInstallRoot {
    fn new(path: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: Some(source.into()),
        }
    }

    fn fallback(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: None,
        }
    }

    /// One-line note for the user about the chosen root, if worth telling.
    pub fn message(&self) -> Option<String> {
        self.source
            .as_ref()
            .map(|source| format!("Using libraries from {}.", source))
    }
}

/// Default install root for `platform` using the process environment.
///
/// # Example
///
/// ```
/// use sysprobe::environment::detect_install_root_with_env;
///
/// let root = detect_install_root_with_env("freebsd", |key| match key {
///     "LOCALBASE" => Ok("/opt/ports".to_string()),
///     _ => Err(std::env::VarError::NotPresent),
/// });
/// assert_eq!(root.unwrap().path, "/opt/ports");
/// ```
pub fn detect_install_root(platform: &str) -> Option<DetectedInstallRoot> {
    detect_install_root_with_env(platform, |key| std::env::var(key))
}

/// Detect with a custom env var lookup (for testing).
pub fn detect_install_root_with_env<F>(platform: &str, env_fn: F) -> Option<DetectedInstallRoot>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    if platform == "darwin" {
        let path = env_fn("PATH").unwrap_or_default();
        for dir in std::env::split_paths(&path) {
            if dir == Path::new("/opt/local/bin") {
                return Some(DetectedInstallRoot::new("/opt/local", "MacPorts"));
            }
            if dir == Path::new("/sw/bin") {
                return Some(DetectedInstallRoot::new("/sw", "Fink"));
            }
        }
        return Some(DetectedInstallRoot::fallback("/usr/local"));
    }

    if platform.ends_with("bsd") || platform == "dragonfly" {
        let base = env_fn("LOCALBASE").unwrap_or_else(|_| "/usr/local".to_string());
        let source = format!("ports directory {}", base);
        return Some(DetectedInstallRoot::new(base, source));
    }

    if platform == "pandora" {
        if let Ok(sysroot) = env_fn("LIBTOOL_SYSROOT_PATH") {
            let root = format!("{}/usr", sysroot);
            let source = format!("sysroot directory {}", root);
            return Some(DetectedInstallRoot::new(root, source));
        }
    }

    None
}
