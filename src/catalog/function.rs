//! OS/library function descriptors.

use std::collections::BTreeMap;

use serde::Deserialize;

/// A function whose declaration is probed for.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionDescriptor {
    /// Canonical id, e.g. `MMAP`; becomes `HAVE_MMAP` in the header.
    pub name: String,
    /// Symbol whose address is taken.
    pub function: String,
    pub headers: Vec<String>,
    /// Header lists replacing `headers` on specific platforms.
    #[serde(default)]
    pub platforms: BTreeMap<String, Vec<String>>,
}

impl FunctionDescriptor {
    /// Headers to include on `platform`.
    pub fn headers(&self, platform: &str) -> &[String] {
        self.platforms
            .get(platform)
            .map(Vec::as_slice)
            .unwrap_or(&self.headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_platform_filtered() {
        let func: FunctionDescriptor = serde_yaml::from_str(
            r#"
name: MMAP
function: mmap
headers: ["<sys/mman.h>"]
platforms:
  mingw32: []
"#,
        )
        .unwrap();

        assert_eq!(func.headers("linux"), ["<sys/mman.h>"]);
        assert!(func.headers("mingw32").is_empty());
    }
}
