//! Write files only when their content changes.
//!
//! Generated files feed an incremental build. Rewriting one with identical
//! content would bump its timestamp and trigger needless recompilation.

use std::fs;
use std::path::Path;

use crate::error::Result;

/// Write `content` to `path` unless the file already holds exactly that.
///
/// Returns whether the file was written.
pub fn rewrite_if_changed(path: &Path, content: &str) -> Result<bool> {
    match fs::read(path) {
        Ok(existing) if existing == content.as_bytes() => {
            tracing::debug!("{} is up to date", path.display());
            return Ok(false);
        }
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    fs::write(path, content)?;
    tracing::debug!("Wrote {}", path.display());
    Ok(true)
}

/// Join `lines` with a trailing newline after each.
pub fn lines_to_content<S: AsRef<str>>(lines: &[S]) -> String {
    let mut content = String::new();
    for line in lines {
        content.push_str(line.as_ref());
        content.push('\n');
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_new_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.mk");

        assert!(rewrite_if_changed(&path, "A:=1\n").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "A:=1\n");
    }

    #[test]
    fn skips_identical_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.mk");
        fs::write(&path, "A:=1\n").unwrap();
        let before = fs::metadata(&path).unwrap().modified().unwrap();

        assert!(!rewrite_if_changed(&path, "A:=1\n").unwrap());

        let after = fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn replaces_different_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.mk");
        fs::write(&path, "A:=1\n").unwrap();

        assert!(rewrite_if_changed(&path, "A:=\n").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "A:=\n");
    }

    #[test]
    fn lines_get_trailing_newlines() {
        assert_eq!(lines_to_content(&["a", "b"]), "a\nb\n");
        assert_eq!(lines_to_content::<&str>(&[]), "");
    }
}
