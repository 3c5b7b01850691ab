//! Local directory tree builders for mirror and pipeline tests.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Materialise a directory tree under `root`.
///
/// Each entry is a `/`-delimited relative path plus the file content;
/// intermediate directories are created as needed. An entry with a trailing
/// `/` creates an empty directory.
///
/// # Errors
///
/// Returns an error if any directory or file cannot be created.
pub fn build_tree(root: &Path, entries: &[(&str, &str)]) -> Result<()> {
    for (relative, content) in entries {
        let target = root.join(relative);
        if relative.ends_with('/') {
            fs::create_dir_all(&target)
                .with_context(|| format!("failed to create directory {}", target.display()))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&target, content)
            .with_context(|| format!("failed to write file {}", target.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_entries() -> Result<()> {
        let root = std::env::temp_dir().join(format!("urlstash-fixture-{}", std::process::id()));
        build_tree(&root, &[("a.txt", "alpha"), ("sub/b.txt", "beta"), ("empty/", "")])?;
        assert_eq!(fs::read_to_string(root.join("a.txt"))?, "alpha");
        assert_eq!(fs::read_to_string(root.join("sub/b.txt"))?, "beta");
        assert!(root.join("empty").is_dir());
        fs::remove_dir_all(&root)?;
        Ok(())
    }
}
