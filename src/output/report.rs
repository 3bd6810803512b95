//! Human-readable summary of a probing run.
//!
//! Rendering is a pure function of the probe results and catalogs; the
//! caller decides where the lines go.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::catalog::{Catalog, Configuration};
use crate::config::INSTALL_BASE;
use crate::probe::ProbeResults;

/// Extra columns after the longest name (room for the colon and a gap).
pub const COLUMN_PADDING: usize = 3;

/// Width of the name column for the given display names.
pub fn column_width<'a>(names: impl IntoIterator<Item = &'a str>) -> usize {
    names
        .into_iter()
        .map(|name| name.chars().count())
        .max()
        .unwrap_or(0)
        + COLUMN_PADDING
}

fn row(width: usize, name: &str, value: &str) -> String {
    format!("  {:<width$} {}", format!("{}:", name), value, width = width)
}

/// What a library row says about `lib`.
fn library_status<'a>(results: &'a ProbeResults, lib: &str) -> &'a str {
    if results.has_lib(lib) {
        results.version(lib).unwrap_or("yes")
    } else if results.has_header(lib) {
        "headers found, link test failed"
    } else {
        "no"
    }
}

/// Which of the three verdicts applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every desired component can be built.
    AllBuildable,
    /// Every required component can be built; some optional ones cannot.
    RequiredBuildable,
    /// At least one required component cannot be built.
    MissingRequired,
}

impl Verdict {
    pub fn evaluate(configuration: &Configuration, results: &ProbeResults) -> Self {
        let buildable: BTreeSet<&str> = configuration
            .buildable_components(results)
            .map(|c| c.name.as_str())
            .collect();
        let desired: BTreeSet<&str> = configuration
            .desired_components()
            .iter()
            .map(|c| c.name.as_str())
            .collect();

        if buildable == desired {
            Verdict::AllBuildable
        } else if configuration
            .required_components()
            .all(|c| buildable.contains(c.name.as_str()))
        {
            Verdict::RequiredBuildable
        } else {
            Verdict::MissingRequired
        }
    }

    fn lines(self) -> &'static [&'static str] {
        match self {
            Verdict::AllBuildable => &["All required and optional components can be built."],
            Verdict::RequiredBuildable => &[
                "If you are satisfied with the probe results, run \"make\" to start the build.",
                "Otherwise, install some libraries and headers and rerun \"configure\".",
            ],
            Verdict::MissingRequired => {
                &["Please install missing libraries and headers and rerun \"configure\"."]
            }
        }
    }
}

/// Render the report for a finished run.
pub fn render(
    results: &ProbeResults,
    catalog: &Catalog,
    configuration: &Configuration,
    custom_vars: &BTreeMap<String, String>,
    log_path: &Path,
) -> Vec<String> {
    let mut lines = vec![String::new()];

    if !results.compiler_works() {
        lines.extend(
            [
                "No working C++ compiler was found.",
                "Please install a C++ compiler, such as GCC's g++.",
                "If you have a C++ compiler installed and it was not detected, \
                 please set the environment variable CXX to the name of your \
                 C++ compiler.",
                "After you have corrected the situation, rerun \"configure\".",
                "",
            ]
            .map(String::from),
        );
        return lines;
    }

    let mut libraries = configuration.required_libraries();
    libraries.sort_by_key(|lib| catalog.packages.display_name(lib).to_lowercase());

    let width = column_width(
        libraries
            .iter()
            .map(|lib| catalog.packages.display_name(lib))
            .chain(catalog.components.iter().map(|c| c.display_name.as_str())),
    );

    lines.push("Found libraries:".to_string());
    for lib in &libraries {
        lines.push(row(
            width,
            catalog.packages.display_name(lib),
            library_status(results, lib),
        ));
    }
    lines.push(String::new());

    lines.push("Components overview:".to_string());
    for component in &catalog.components {
        let status = if !configuration.is_desired(&component.name) {
            "disabled"
        } else if component.can_build(results) {
            "yes"
        } else {
            "no"
        };
        lines.push(row(width, &component.display_name, status));
    }
    lines.push(String::new());

    lines.push("Customisable options:".to_string());
    let install_base = custom_vars
        .get(INSTALL_BASE)
        .map(String::as_str)
        .unwrap_or("(not set)");
    lines.push(format!("  {:<width$} {}", "Install to", install_base, width = width));
    lines.push("  (you can edit these in build/custom.mk)".to_string());
    lines.push(String::new());

    let verdict = Verdict::evaluate(configuration, results);
    lines.extend(verdict.lines().iter().map(|l| l.to_string()));
    lines.push(String::new());

    lines.push(format!(
        "If the detected libraries differ from what you think is installed on \
         this system, please check the log file: {}",
        log_path.display()
    ));
    lines.push(String::new());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const CATALOG: &str = r#"
libraries:
  AAA: { function: a, headers: ["<a.h>"] }
  BBB: { function: b, headers: ["<b.h>"] }
  CCC: { function: c, headers: ["<c.h>"] }
components:
  - name: A
    display_name: Abc
    core: true
    libraries: [AAA]
  - name: B
    display_name: Bigger1
    libraries: [BBB]
  - name: C
    display_name: Extras
    libraries: [CCC]
packages:
  AAA: aaa
  BBB: Twelve-chars
  CCC: ccc
configurations:
  DYN:
    components: [A, B]
"#;

    fn catalog() -> Catalog {
        Catalog::from_yaml(CATALOG, Path::new("test.yml")).unwrap()
    }

    fn results(found: &[&str]) -> ProbeResults {
        let mut results = ProbeResults::new();
        results.set_compiler(true);
        for lib in ["AAA", "BBB", "CCC"] {
            let ok = found.contains(&lib);
            results.set_flag(format!("HAVE_{}_H", lib), ok);
            results.set_flag(format!("HAVE_{}_LIB", lib), ok);
            if ok {
                results.insert(format!("VERSION_{}", lib), "1.0");
            }
        }
        results
    }

    fn render_for(results: &ProbeResults) -> Vec<String> {
        let catalog = catalog();
        let config = catalog.configuration("DYN").unwrap();
        let mut vars = BTreeMap::new();
        vars.insert(INSTALL_BASE.to_string(), "/opt/emu".to_string());
        render(results, &catalog, &config, &vars, &PathBuf::from("out/probe.log"))
    }

    #[test]
    fn required_only_suggests_running_the_build() {
        let lines = render_for(&results(&["AAA"]));

        assert!(lines.iter().any(|l| l.contains("run \"make\" to start the build")));
        assert!(!lines.iter().any(|l| l.contains("All required and optional")));
        assert!(!lines.iter().any(|l| l.contains("Please install missing")));
    }

    #[test]
    fn verdict_branches() {
        let catalog = catalog();
        let config = catalog.configuration("DYN").unwrap();

        assert_eq!(
            Verdict::evaluate(&config, &results(&["AAA", "BBB"])),
            Verdict::AllBuildable
        );
        assert_eq!(
            Verdict::evaluate(&config, &results(&["AAA"])),
            Verdict::RequiredBuildable
        );
        assert_eq!(
            Verdict::evaluate(&config, &results(&["BBB"])),
            Verdict::MissingRequired
        );
    }

    #[test]
    fn column_width_is_shared_by_both_tables() {
        // Display names "Abc" (3), "Bigger1" (7) and "Twelve-chars" (12).
        assert_eq!(column_width(["Abc", "Bigger1", "Twelve-chars"]), 12 + COLUMN_PADDING);

        let lines = render_for(&results(&["AAA"]));
        let width = 12 + COLUMN_PADDING;

        let twelve = lines.iter().find(|l| l.contains("Twelve-chars:")).unwrap();
        let abc = lines.iter().find(|l| l.contains("Abc:")).unwrap();
        assert_eq!(twelve.find("no"), Some(2 + width + 1));
        assert_eq!(abc.find("yes"), Some(2 + width + 1));
    }

    #[test]
    fn column_width_counts_characters() {
        assert_eq!(column_width(["Abc", "Größe"]), 5 + COLUMN_PADDING);

        let width = column_width(["Größe"]);
        let line = row(width, "Größe", "yes");
        assert_eq!(line.chars().position(|c| c == 'y'), Some(2 + width + 1));
    }

    #[test]
    fn library_rows_sorted_by_display_name() {
        let lines = render_for(&results(&["AAA"]));
        let start = lines.iter().position(|l| l == "Found libraries:").unwrap();

        assert!(lines[start + 1].starts_with("  aaa:"));
        assert!(lines[start + 2].starts_with("  Twelve-chars:"));
        assert!(lines[start + 1].ends_with("1.0"));
        assert_eq!(lines[start + 3], "");
    }

    #[test]
    fn header_only_library_is_flagged() {
        let mut results = results(&["AAA"]);
        results.set_flag("HAVE_BBB_H", true);

        let lines = render_for(&results);
        assert!(lines
            .iter()
            .any(|l| l.contains("Twelve-chars:") && l.ends_with("headers found, link test failed")));
    }

    #[test]
    fn undesired_component_is_disabled() {
        let lines = render_for(&results(&["AAA", "BBB", "CCC"]));
        let extras = lines.iter().find(|l| l.contains("Extras:")).unwrap();
        assert!(extras.ends_with("disabled"));
    }

    #[test]
    fn shows_install_path_and_log() {
        let lines = render_for(&results(&["AAA"]));
        assert!(lines.iter().any(|l| l.contains("Install to") && l.ends_with("/opt/emu")));
        assert!(lines.iter().any(|l| l.ends_with("out/probe.log")));
    }

    #[test]
    fn broken_compiler_skips_tables() {
        let mut results = results(&["AAA"]);
        results.set_compiler(false);

        let lines = render_for(&results);
        assert_eq!(lines[1], "No working C++ compiler was found.");
        assert!(!lines.iter().any(|l| l.contains("Found libraries")));
        assert!(!lines.iter().any(|l| l.contains("Components overview")));
    }
}
