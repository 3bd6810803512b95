//! Library descriptors.
//!
//! A descriptor tells the library probe which headers to include, which
//! symbol to reference and how to derive compile flags, link flags and the
//! version for a given platform, link mode and install root.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use super::interpolation::{resolve_string, FlagContext};
use crate::error::{ProbeError, Result};
use crate::probe::version::{expand_macro, VersionProbe};
use crate::probe::ProbeLog;

/// Computes a version string using the toolchain.
pub type ComputeVersion =
    Arc<dyn Fn(&VersionProbe<'_>, &mut ProbeLog) -> anyhow::Result<String> + Send + Sync>;

/// How to find out which version of a library was linked.
#[derive(Clone)]
pub enum VersionProvider {
    /// A flag expression, possibly running a helper in backticks.
    Expression(String),
    /// A function probing the toolchain directly.
    Computed(ComputeVersion),
}

impl fmt::Debug for VersionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionProvider::Expression(expr) => f.debug_tuple("Expression").field(expr).finish(),
            VersionProvider::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Per-platform replacements for a library's defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformOverride {
    pub cflags: Option<String>,
    pub ldflags: Option<String>,
    pub headers: Option<Vec<String>>,
}

/// Version section of a library entry; exactly one field is set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionSpec {
    pub expression: Option<String>,
    #[serde(rename = "macro")]
    pub macro_name: Option<String>,
}

/// A library entry as written in a catalog file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibrarySpec {
    /// Symbol the probe takes the address of.
    pub function: String,
    pub headers: Vec<String>,
    /// Names passed as `-l<name>` when no other link flags apply.
    #[serde(default)]
    pub libs: Vec<String>,
    /// `*-config` style helper script, e.g. `sdl2-config`.
    pub config_script: Option<String>,
    /// pkg-config module name.
    pub pkg_config: Option<String>,
    pub cflags: Option<String>,
    pub ldflags: Option<String>,
    pub static_ldflags: Option<String>,
    /// Platforms on which the library ships with the OS.
    #[serde(default)]
    pub system_on: Vec<String>,
    #[serde(default)]
    pub platforms: BTreeMap<String, PlatformOverride>,
    pub version: Option<VersionSpec>,
}

/// Immutable description of a probeable library.
#[derive(Debug, Clone)]
pub struct LibraryDescriptor {
    /// Make-style name, e.g. `ZLIB`; used in result keys.
    pub name: String,
    pub spec: LibrarySpec,
}

impl LibraryDescriptor {
    /// Build a descriptor, checking the version section.
    pub fn new(name: &str, spec: LibrarySpec) -> Result<Self> {
        if let Some(version) = &spec.version {
            if version.expression.is_some() == version.macro_name.is_some() {
                return Err(ProbeError::Other(anyhow::anyhow!(
                    "library {}: version needs exactly one of 'expression' or 'macro'",
                    name
                )));
            }
        }
        Ok(Self {
            name: name.to_string(),
            spec,
        })
    }

    /// Every flag and version template of this library.
    pub fn templates(&self) -> impl Iterator<Item = &str> {
        let spec = &self.spec;
        [&spec.cflags, &spec.ldflags, &spec.static_ldflags]
            .into_iter()
            .flatten()
            .chain(
                spec.platforms
                    .values()
                    .flat_map(|o| [&o.cflags, &o.ldflags].into_iter().flatten()),
            )
            .chain(spec.version.iter().flat_map(|v| v.expression.iter()))
            .map(String::as_str)
    }

    /// Symbol the probe references.
    pub fn function(&self) -> &str {
        &self.spec.function
    }

    /// Headers to include on `platform`.
    pub fn headers(&self, platform: &str) -> Vec<String> {
        self.platform_override(platform)
            .and_then(|o| o.headers.clone())
            .unwrap_or_else(|| self.spec.headers.clone())
    }

    /// Whether the library is part of the OS on `platform`.
    pub fn is_system_library(&self, platform: &str) -> bool {
        self.spec.system_on.iter().any(|p| p == platform)
    }

    fn platform_override(&self, platform: &str) -> Option<&PlatformOverride> {
        self.spec.platforms.get(platform)
    }

    /// Helper script to call, located under the install root if one is known.
    fn config_script(&self, ctx: &FlagContext) -> Option<String> {
        let script = self.spec.config_script.as_ref()?;
        match &ctx.distro_root {
            Some(root) if !self.is_system_library(&ctx.platform) => {
                Some(format!("{}/bin/{}", root, script))
            }
            _ => Some(script.clone()),
        }
    }

    /// The compile flag expression for this context.
    pub fn compile_flags(&self, ctx: &FlagContext) -> Result<Option<String>> {
        let explicit = self
            .platform_override(&ctx.platform)
            .and_then(|o| o.cflags.as_ref())
            .or(self.spec.cflags.as_ref());
        if let Some(template) = explicit {
            return resolve_string(template, ctx).map(Some);
        }
        if let Some(script) = self.config_script(ctx) {
            return Ok(Some(format!("`{} --cflags`", script)));
        }
        if let Some(module) = &self.spec.pkg_config {
            return Ok(Some(format!("`pkg-config --cflags {}`", module)));
        }
        match &ctx.distro_root {
            Some(root) if !self.is_system_library(&ctx.platform) => {
                Ok(Some(format!("-I{}/include", root)))
            }
            _ => Ok(None),
        }
    }

    /// The link flag expression for this context.
    pub fn link_flags(&self, ctx: &FlagContext) -> Result<Option<String>> {
        let explicit = self
            .platform_override(&ctx.platform)
            .and_then(|o| o.ldflags.as_ref())
            .or(if ctx.link_static {
                self.spec.static_ldflags.as_ref()
            } else {
                None
            })
            .or(self.spec.ldflags.as_ref());
        if let Some(template) = explicit {
            return resolve_string(template, ctx).map(Some);
        }
        if let Some(script) = self.config_script(ctx) {
            let option = if ctx.link_static {
                "--static-libs"
            } else {
                "--libs"
            };
            return Ok(Some(format!("`{} {}`", script, option)));
        }
        if let Some(module) = &self.spec.pkg_config {
            let option = if ctx.link_static {
                "--libs --static"
            } else {
                "--libs"
            };
            return Ok(Some(format!("`pkg-config {} {}`", option, module)));
        }

        let libs: Vec<String> = self.spec.libs.iter().map(|l| format!("-l{}", l)).collect();
        if libs.is_empty() {
            return Ok(None);
        }
        match &ctx.distro_root {
            Some(root) if !self.is_system_library(&ctx.platform) => {
                Ok(Some(format!("-L{}/lib {}", root, libs.join(" "))))
            }
            _ => Ok(Some(libs.join(" "))),
        }
    }

    /// How to determine the linked version in this context.
    ///
    /// Without an explicit version section, helper scripts are asked for
    /// their version; libraries with no such mechanism report `unknown`.
    pub fn version_provider(&self, ctx: &FlagContext) -> Result<VersionProvider> {
        if let Some(version) = &self.spec.version {
            if let Some(expr) = &version.expression {
                return resolve_string(expr, ctx).map(VersionProvider::Expression);
            }
            if let Some(macro_name) = &version.macro_name {
                let macro_name = macro_name.clone();
                return Ok(VersionProvider::Computed(Arc::new(
                    move |probe: &VersionProbe<'_>, log: &mut ProbeLog| {
                        expand_macro(probe, log, &macro_name)
                    },
                )));
            }
        }
        if let Some(script) = self.config_script(ctx) {
            return Ok(VersionProvider::Expression(format!("`{} --version`", script)));
        }
        if let Some(module) = &self.spec.pkg_config {
            return Ok(VersionProvider::Expression(format!(
                "`pkg-config --modversion {}`",
                module
            )));
        }
        Ok(VersionProvider::Expression("unknown".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(yaml: &str) -> LibrarySpec {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn zlib() -> LibraryDescriptor {
        LibraryDescriptor::new(
            "ZLIB",
            spec(
                r#"
function: inflate
headers: ["<zlib.h>"]
libs: [z]
system_on: [darwin]
version: { macro: ZLIB_VERSION }
"#,
            ),
        )
        .unwrap()
    }

    fn sdl() -> LibraryDescriptor {
        LibraryDescriptor::new(
            "SDL2",
            spec(
                r#"
function: SDL_Init
headers: ["<SDL.h>"]
config_script: sdl2-config
platforms:
  android:
    cflags: "-I${distro_root}/include/SDL2"
    ldflags: "-lSDL2"
"#,
            ),
        )
        .unwrap()
    }

    #[test]
    fn plain_library_without_root_has_no_cflags() {
        let ctx = FlagContext::new("linux", false, None);
        assert_eq!(zlib().compile_flags(&ctx).unwrap(), None);
        assert_eq!(zlib().link_flags(&ctx).unwrap().as_deref(), Some("-lz"));
    }

    #[test]
    fn plain_library_uses_install_root() {
        let ctx = FlagContext::new("linux", false, Some("/opt/3rd"));
        assert_eq!(
            zlib().compile_flags(&ctx).unwrap().as_deref(),
            Some("-I/opt/3rd/include")
        );
        assert_eq!(
            zlib().link_flags(&ctx).unwrap().as_deref(),
            Some("-L/opt/3rd/lib -lz")
        );
    }

    #[test]
    fn system_library_ignores_install_root() {
        let ctx = FlagContext::new("darwin", false, Some("/opt/local"));
        assert_eq!(zlib().compile_flags(&ctx).unwrap(), None);
        assert_eq!(zlib().link_flags(&ctx).unwrap().as_deref(), Some("-lz"));
    }

    #[test]
    fn config_script_flags() {
        let ctx = FlagContext::new("linux", false, None);
        assert_eq!(
            sdl().compile_flags(&ctx).unwrap().as_deref(),
            Some("`sdl2-config --cflags`")
        );
        assert_eq!(
            sdl().link_flags(&ctx).unwrap().as_deref(),
            Some("`sdl2-config --libs`")
        );

        let ctx = FlagContext::new("linux", true, Some("/opt/3rd"));
        assert_eq!(
            sdl().link_flags(&ctx).unwrap().as_deref(),
            Some("`/opt/3rd/bin/sdl2-config --static-libs`")
        );
    }

    #[test]
    fn platform_override_wins() {
        let ctx = FlagContext::new("android", true, Some("/sysroot"));
        assert_eq!(
            sdl().compile_flags(&ctx).unwrap().as_deref(),
            Some("-I/sysroot/include/SDL2")
        );
        assert_eq!(sdl().link_flags(&ctx).unwrap().as_deref(), Some("-lSDL2"));
    }

    #[test]
    fn static_ldflags_used_only_when_static() {
        let lib = LibraryDescriptor::new(
            "PNG",
            spec(
                r#"
function: png_write_image
headers: ["<png.h>"]
ldflags: "-lpng"
static_ldflags: "-lpng -lz"
"#,
            ),
        )
        .unwrap();

        let dynamic = FlagContext::new("linux", false, None);
        let fixed = FlagContext::new("linux", true, None);
        assert_eq!(lib.link_flags(&dynamic).unwrap().as_deref(), Some("-lpng"));
        assert_eq!(lib.link_flags(&fixed).unwrap().as_deref(), Some("-lpng -lz"));
    }

    #[test]
    fn version_provider_variants() {
        let ctx = FlagContext::new("linux", false, None);
        assert!(matches!(
            zlib().version_provider(&ctx).unwrap(),
            VersionProvider::Computed(_)
        ));
        match sdl().version_provider(&ctx).unwrap() {
            VersionProvider::Expression(expr) => assert_eq!(expr, "`sdl2-config --version`"),
            other => panic!("unexpected provider {:?}", other),
        }
    }

    #[test]
    fn version_defaults_to_unknown() {
        let lib = LibraryDescriptor::new(
            "GL",
            spec("function: glGenTextures\nheaders: [\"<GL/gl.h>\"]\nlibs: [GL]\n"),
        )
        .unwrap();
        let ctx = FlagContext::new("linux", false, None);
        match lib.version_provider(&ctx).unwrap() {
            VersionProvider::Expression(expr) => assert_eq!(expr, "unknown"),
            other => panic!("unexpected provider {:?}", other),
        }
    }

    #[test]
    fn version_section_needs_one_field() {
        let result = LibraryDescriptor::new(
            "X",
            spec("function: f\nheaders: []\nversion: {}\n"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn headers_follow_platform() {
        let lib = LibraryDescriptor::new(
            "GL",
            spec(
                r#"
function: glGenTextures
headers: ["<GL/gl.h>"]
platforms:
  darwin:
    headers: ["<OpenGL/gl.h>"]
"#,
            ),
        )
        .unwrap();
        assert_eq!(lib.headers("linux"), ["<GL/gl.h>"]);
        assert_eq!(lib.headers("darwin"), ["<OpenGL/gl.h>"]);
    }
}
