//! Changelog section rendering and append-only file emission.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::analysis::DiffAnalysis;
use crate::error::ChangelogError;

/// Render one changelog section for an accepted message.
///
/// The section header is the accepted message itself, followed by the
/// overall summary, the per-file purposes, and the change type. Breaking
/// changes get an extra banner.
pub fn format_section(message: &str, analysis: &DiffAnalysis) -> String {
    let mut section = format!("## {}\n\n### Summary\n{}\n", message, analysis.summary);

    section.push_str("\n### Changed Files\n");
    for file in &analysis.files {
        section.push_str(&format!("- **{}**: {}\n", file.path, file.purpose));
    }

    if analysis.breaking_change {
        section.push_str("\n### BREAKING CHANGES\nThis commit contains breaking changes.\n");
    }

    section.push_str(&format!("\n### Type: `{}`\n", analysis.change_type));
    section
}

/// Append one section to the changelog file, creating it if missing.
///
/// Existing bytes are never rewritten: a non-empty file only gains a
/// blank separator line and the new section at its end.
pub fn append_section(path: &Path, section: &str) -> Result<(), ChangelogError> {
    let existing_len = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ChangelogError::OpenFailed {
            path: path.display().to_string(),
            source: e,
        })?;

    if existing_len > 0 {
        file.write_all(b"\n").map_err(|e| ChangelogError::WriteFailed {
            path: path.display().to_string(),
            source: e,
        })?;
    }
    file.write_all(section.as_bytes())
        .map_err(|e| ChangelogError::WriteFailed {
            path: path.display().to_string(),
            source: e,
        })?;

    info!("Appended changelog section to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::CommitType;
    use crate::diff::{ChangeType, FileChange};
    use tempfile::tempdir;

    fn analysis() -> DiffAnalysis {
        let mut file = FileChange::new("src/auth/login.rs", ChangeType::New);
        file.purpose = "Add login endpoint handler".to_string();
        DiffAnalysis {
            summary: "Add authentication endpoints".to_string(),
            change_type: CommitType::Feat,
            files: vec![file],
            breaking_change: false,
        }
    }

    #[test]
    fn test_format_section_layout() {
        let section = format_section("feat(auth): add login endpoint", &analysis());
        assert!(section.starts_with("## feat(auth): add login endpoint\n"));
        assert!(section.contains("### Summary\nAdd authentication endpoints\n"));
        assert!(section.contains("- **src/auth/login.rs**: Add login endpoint handler\n"));
        assert!(section.contains("### Type: `feat`\n"));
        assert!(!section.contains("BREAKING"));
    }

    #[test]
    fn test_format_section_breaking_banner() {
        let mut breaking = analysis();
        breaking.breaking_change = true;
        let section = format_section("feat(auth)!: drop session cookies", &breaking);
        assert!(section.contains("### BREAKING CHANGES\n"));
    }

    #[test]
    fn test_append_creates_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");

        append_section(&path, "## feat: first\n").unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "## feat: first\n");
    }

    #[test]
    fn test_append_preserves_existing_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        std::fs::write(&path, "## feat: first\n").unwrap();

        append_section(&path, "## fix: second\n").unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("## feat: first\n"));
        assert_eq!(contents, "## feat: first\n\n## fix: second\n");
    }

    #[test]
    fn test_append_twice_yields_two_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");

        append_section(&path, "## a\n").unwrap();
        append_section(&path, "## b\n").unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("## ").count(), 2);
    }

    #[test]
    fn test_open_failure_surfaces_path() {
        let err = append_section(Path::new("/nonexistent-dir/CHANGELOG.md"), "## a\n")
            .unwrap_err();
        match err {
            ChangelogError::OpenFailed { path, .. } => {
                assert!(path.contains("nonexistent-dir"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
