//! Build components and link-mode configurations.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::probe::ProbeResults;

/// A buildable part of the project and the libraries it needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Component {
    pub name: String,
    pub display_name: String,
    /// Core components must be buildable; the rest are optional.
    #[serde(default)]
    pub core: bool,
    #[serde(default)]
    pub libraries: Vec<String>,
}

impl Component {
    /// Whether the probe results allow building this component.
    pub fn can_build(&self, results: &ProbeResults) -> bool {
        results.compiler_works()
            && self
                .libraries
                .iter()
                .all(|lib| results.has_header(lib) && results.has_lib(lib))
    }
}

/// Union of the libraries needed by `components`, sorted and deduplicated.
pub fn required_libraries_for<'a>(
    components: impl IntoIterator<Item = &'a Component>,
) -> Vec<String> {
    components
        .into_iter()
        .flat_map(|c| c.libraries.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// A configuration entry as written in a catalog file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigurationSpec {
    #[serde(default)]
    pub link_static: bool,
    /// Desired components; all components when absent.
    pub components: Option<Vec<String>>,
}

/// The resolved settings for one link mode.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub link_mode: String,
    pub link_static: bool,
    desired: Vec<Component>,
}

impl Configuration {
    pub fn new(link_mode: &str, link_static: bool, desired: Vec<Component>) -> Self {
        Self {
            link_mode: link_mode.to_string(),
            link_static,
            desired,
        }
    }

    /// Components the user wants built.
    pub fn desired_components(&self) -> &[Component] {
        &self.desired
    }

    /// Desired components that must be buildable.
    pub fn required_components(&self) -> impl Iterator<Item = &Component> {
        self.desired.iter().filter(|c| c.core)
    }

    /// Desired components buildable according to `results`.
    pub fn buildable_components<'a>(
        &'a self,
        results: &'a ProbeResults,
    ) -> impl Iterator<Item = &'a Component> {
        self.desired.iter().filter(move |c| c.can_build(results))
    }

    pub fn is_desired(&self, name: &str) -> bool {
        self.desired.iter().any(|c| c.name == name)
    }

    /// Libraries needed by the desired components.
    pub fn required_libraries(&self) -> Vec<String> {
        required_libraries_for(&self.desired)
    }
}
