//! Write generated changelogs to disk.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::ChangelogError;

/// Prepend `content` to the file at `path`.
///
/// - Creates the file if it doesn't exist
/// - Places the new content before everything already in the file
/// - Replaces the file atomically, so a failed write leaves the old content intact
pub fn prepend_changelog(path: &Path, content: &str) -> Result<(), ChangelogError> {
    let existing = match std::fs::read_to_string(path) {
        Ok(existing) => existing,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(ChangelogError::ReadFailed(e)),
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(ChangelogError::WriteFailed)?;
    file.write_all(content.as_bytes())
        .map_err(ChangelogError::WriteFailed)?;
    file.write_all(existing.as_bytes())
        .map_err(ChangelogError::WriteFailed)?;
    file.persist(path)
        .map_err(|e| ChangelogError::WriteFailed(e.error))?;

    Ok(())
}

/// Generate a summary message for the user.
pub fn generate_summary(content: &str, path: &Path) -> String {
    let entries = content.lines().filter(|l| l.starts_with("- [#")).count();
    let entry_word = if entries == 1 { "entry" } else { "entries" };

    format!("Added {} {} to {}", entries, entry_word, path.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepend_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");

        prepend_changelog(&path, "new\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn test_prepend_places_new_content_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        std::fs::write(&path, "old\n").unwrap();

        prepend_changelog(&path, "new\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\nold\n");
    }

    #[test]
    fn test_generate_summary() {
        let content = "\n# 1.0.0\n------\n\n- [#2](u): Two by [a](p)\n- [#1](u): One by [a](p)\n";
        let summary = generate_summary(content, Path::new("CHANGELOG.md"));
        assert_eq!(summary, "Added 2 entries to CHANGELOG.md");
    }

    #[test]
    fn test_generate_summary_single_entry() {
        let summary = generate_summary("- [#1](u): One by [a](p)\n", Path::new("out.md"));
        assert_eq!(summary, "Added 1 entry to out.md");
    }
}
