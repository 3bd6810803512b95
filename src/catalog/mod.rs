//! Read-only registries of what can be probed.
//!
//! The catalog describes libraries, functions, components, display names and
//! link-mode configurations. It is parsed once at startup, from the built-in
//! YAML or a user-supplied file, and shared by reference for the whole run.
//!
//! # Modules
//!
//! - [`component`] - Components, configurations and buildability
//! - [`function`] - Function descriptors
//! - [`interpolation`] - `${variable}` expansion in flag templates
//! - [`library`] - Library descriptors and flag/version providers

pub mod component;
pub mod function;
pub mod interpolation;
pub mod library;

pub use component::{required_libraries_for, Component, Configuration, ConfigurationSpec};
pub use function::FunctionDescriptor;
pub use interpolation::{resolve_string, unknown_variables, FlagContext};
pub use library::{
    ComputeVersion, LibraryDescriptor, LibrarySpec, PlatformOverride, VersionProvider,
    VersionSpec,
};

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ProbeError, Result};

const BUILTIN_CATALOG: &str = include_str!("default_catalog.yml");

/// Catalog file layout.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    libraries: BTreeMap<String, LibrarySpec>,
    #[serde(default)]
    functions: Vec<FunctionDescriptor>,
    #[serde(default)]
    components: Vec<Component>,
    #[serde(default)]
    packages: BTreeMap<String, String>,
    #[serde(default)]
    configurations: BTreeMap<String, ConfigurationSpec>,
}

/// Libraries by make-style name.
#[derive(Debug, Clone, Default)]
pub struct LibraryRegistry {
    libraries: BTreeMap<String, LibraryDescriptor>,
}

impl LibraryRegistry {
    pub fn get(&self, name: &str) -> Result<&LibraryDescriptor> {
        self.libraries
            .get(name)
            .ok_or_else(|| ProbeError::UnknownLibrary {
                name: name.to_string(),
            })
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}

/// Display names of libraries, as users know the packages.
#[derive(Debug, Clone, Default)]
pub struct PackageRegistry {
    names: BTreeMap<String, String>,
}

impl PackageRegistry {
    /// Display name for `lib`, falling back to the make-style name.
    pub fn display_name<'a>(&'a self, lib: &'a str) -> &'a str {
        self.names.get(lib).map(String::as_str).unwrap_or(lib)
    }
}

/// All registries for one run.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub libraries: LibraryRegistry,
    pub functions: Vec<FunctionDescriptor>,
    pub components: Vec<Component>,
    pub packages: PackageRegistry,
    configurations: BTreeMap<String, ConfigurationSpec>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_CATALOG, Path::new("<builtin>"))
    }

    /// Load a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content, path)
    }

    /// Parse catalog YAML; `origin` is only used in error messages.
    pub fn from_yaml(content: &str, origin: &Path) -> Result<Self> {
        let file: CatalogFile =
            serde_yaml::from_str(content).map_err(|e| ProbeError::CatalogParse {
                path: origin.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut libraries = BTreeMap::new();
        for (name, spec) in file.libraries {
            let descriptor = LibraryDescriptor::new(&name, spec)?;
            libraries.insert(name, descriptor);
        }

        let catalog = Self {
            libraries: LibraryRegistry { libraries },
            functions: file.functions,
            components: file.components,
            packages: PackageRegistry {
                names: file.packages,
            },
            configurations: file.configurations,
        };
        catalog.validate(origin)?;
        Ok(catalog)
    }

    fn validate(&self, origin: &Path) -> Result<()> {
        for (name, library) in &self.libraries.libraries {
            for template in library.templates() {
                if let Some(var) = unknown_variables(template).into_iter().next() {
                    return Err(ProbeError::CatalogParse {
                        path: origin.to_path_buf(),
                        message: format!(
                            "library {} uses unknown variable ${{{}}} in \"{}\"",
                            name, var, template
                        ),
                    });
                }
            }
        }
        for component in &self.components {
            for lib in &component.libraries {
                self.libraries.get(lib)?;
            }
        }
        for (mode, spec) in &self.configurations {
            for name in spec.components.iter().flatten() {
                if self.component(name).is_none() {
                    return Err(ProbeError::CatalogParse {
                        path: origin.to_path_buf(),
                        message: format!(
                            "configuration {} refers to unknown component {}",
                            mode, name
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Resolve the configuration for `link_mode`.
    pub fn configuration(&self, link_mode: &str) -> Result<Configuration> {
        let spec = self
            .configurations
            .get(link_mode)
            .ok_or_else(|| ProbeError::UnknownConfiguration {
                name: link_mode.to_string(),
            })?;

        let desired = match &spec.components {
            Some(names) => self
                .components
                .iter()
                .filter(|c| names.contains(&c.name))
                .cloned()
                .collect(),
            None => self.components.clone(),
        };
        Ok(Configuration::new(link_mode, spec.link_static, desired))
    }
}
