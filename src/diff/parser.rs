//! Parse raw `git diff` text into structured per-file change records.

use regex_lite::Regex;
use tracing::debug;

use super::types::{ChangeType, FileChange, Hunk};

/// Hunk header: `@@ -old_start[,old_lines] +new_start[,new_lines] @@`.
const HUNK_HEADER: &str = r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@";

/// The gitlink mode marking a submodule entry.
const SUBMODULE_MODE: &str = "160000";

/// Parse a multi-file diff into ordered [`FileChange`] records, one per
/// file section, in diff order.
///
/// Empty input yields an empty vec; callers must treat that as a terminal
/// "nothing to analyze" condition. Unrecognized text outside `diff --git`
/// sections is skipped rather than failing the whole parse.
pub fn parse_diff(diff_text: &str) -> Vec<FileChange> {
    let hunk_re = Regex::new(HUNK_HEADER).expect("Invalid regex");

    let mut sections: Vec<Vec<&str>> = Vec::new();
    for line in diff_text.lines() {
        if line.starts_with("diff --git ") {
            sections.push(vec![line]);
        } else if let Some(current) = sections.last_mut() {
            current.push(line);
        }
    }

    let changes: Vec<FileChange> = sections
        .iter()
        .filter_map(|section| parse_section(section, &hunk_re))
        .collect();

    debug!("Parsed {} file section(s) from diff", changes.len());
    changes
}

/// Extract the diff slice belonging to a single file.
///
/// Returns the lines from the file's `diff --git` header up to (not
/// including) the next file header, or an empty string when the path
/// does not appear in the diff.
pub fn extract_file_diff(full_diff: &str, file_path: &str) -> String {
    // Exact-path match on the b/ side; a plain substring test would let
    // `a.rs` select `data.rs`'s section.
    let needle = format!(" b/{file_path}");
    let mut file_lines: Vec<&str> = Vec::new();
    let mut in_target = false;

    for line in full_diff.lines() {
        if line.starts_with("diff --git ") {
            if in_target {
                break;
            }
            in_target = line.ends_with(&needle);
        }
        if in_target {
            file_lines.push(line);
        }
    }

    file_lines.join("\n")
}

/// Header markers collected before the first hunk of a file section.
#[derive(Default)]
struct SectionHeader {
    new_file: bool,
    deleted_file: bool,
    rename_from: Option<String>,
    rename_to: Option<String>,
    mode_change: bool,
    binary: bool,
    submodule: bool,
    old_path_line: Option<String>,
    new_path_line: Option<String>,
}

fn parse_section(lines: &[&str], hunk_re: &Regex) -> Option<FileChange> {
    let git_line = lines.first()?;

    let mut header = SectionHeader::default();
    let mut hunks: Vec<Hunk> = Vec::new();
    let mut conflict = false;

    for line in &lines[1..] {
        if let Some(caps) = hunk_re.captures(line) {
            hunks.push(Hunk {
                old_start: parse_capture(&caps, 1),
                old_lines: caps.get(2).map_or(1, |m| m.as_str().parse().unwrap_or(1)),
                new_start: parse_capture(&caps, 3),
                new_lines: caps.get(4).map_or(1, |m| m.as_str().parse().unwrap_or(1)),
                ..Hunk::default()
            });
            continue;
        }

        if hunks.is_empty() {
            scan_header_line(line, &mut header);
            continue;
        }

        // Hunk body line
        let hunk = hunks.last_mut()?;
        let mut chars = line.chars();
        let content = match chars.next() {
            Some('+') => {
                hunk.added_lines += 1;
                chars.as_str()
            }
            Some('-') => {
                hunk.removed_lines += 1;
                chars.as_str()
            }
            Some(' ') | None => {
                hunk.context_lines += 1;
                chars.as_str()
            }
            // "\ No newline at end of file" and anything else
            _ => continue,
        };
        if is_conflict_marker(content) {
            conflict = true;
        }
    }

    let added_lines: u32 = hunks.iter().map(|h| h.added_lines).sum();
    let removed_lines: u32 = hunks.iter().map(|h| h.removed_lines).sum();

    // Classification priority, first match wins.
    let change_type = if header.new_file {
        ChangeType::New
    } else if header.deleted_file {
        ChangeType::Deleted
    } else if header.rename_from.is_some() || header.rename_to.is_some() {
        ChangeType::Renamed
    } else if header.mode_change && hunks.is_empty() {
        ChangeType::ModeChanged
    } else if header.binary {
        ChangeType::Binary
    } else if header.submodule {
        ChangeType::Submodule
    } else if conflict {
        ChangeType::Conflict
    } else {
        ChangeType::Modified
    };

    let path = resolve_path(&header, git_line)?;
    let old_path = match change_type {
        ChangeType::Renamed => header.rename_from,
        _ => None,
    };

    Some(FileChange {
        path,
        change_type,
        old_path,
        added_lines,
        removed_lines,
        hunks,
        purpose: String::new(),
    })
}

fn parse_capture(caps: &regex_lite::Captures<'_>, idx: usize) -> u32 {
    caps.get(idx)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn scan_header_line(line: &str, header: &mut SectionHeader) {
    if line.starts_with("new file mode ") {
        header.new_file = true;
    } else if line.starts_with("deleted file mode ") {
        header.deleted_file = true;
    } else if let Some(from) = line.strip_prefix("rename from ") {
        header.rename_from = Some(from.trim().to_string());
    } else if let Some(to) = line.strip_prefix("rename to ") {
        header.rename_to = Some(to.trim().to_string());
    } else if line.starts_with("old mode ") || line.starts_with("new mode ") {
        header.mode_change = true;
    } else if line.starts_with("Binary files ") || line.starts_with("GIT binary patch") {
        header.binary = true;
    } else if let Some(old) = line.strip_prefix("--- ") {
        header.old_path_line = Some(old.trim().to_string());
    } else if let Some(new) = line.strip_prefix("+++ ") {
        header.new_path_line = Some(new.trim().to_string());
    }

    // Gitlink entries carry mode 160000 in mode or index lines.
    if (line.starts_with("index ")
        || line.starts_with("old mode")
        || line.starts_with("new mode")
        || line.starts_with("new file mode")
        || line.starts_with("deleted file mode"))
        && line.trim_end().ends_with(SUBMODULE_MODE)
    {
        header.submodule = true;
    }
}

/// Resolve the file path for a section, preferring explicit markers over
/// the `diff --git` line.
fn resolve_path(header: &SectionHeader, git_line: &str) -> Option<String> {
    if let Some(to) = &header.rename_to {
        return Some(to.clone());
    }

    if let Some(new_path) = &header.new_path_line
        && new_path != "/dev/null"
    {
        return Some(strip_path_prefix(new_path));
    }

    if let Some(old_path) = &header.old_path_line
        && old_path != "/dev/null"
    {
        return Some(strip_path_prefix(old_path));
    }

    // Fallback: `diff --git a/X b/Y` — take Y.
    let rest = git_line.strip_prefix("diff --git ")?;
    rest.rfind(" b/").map(|idx| rest[idx + 3..].to_string())
}

/// Strip the `a/` or `b/` prefix git puts on paths in diff headers.
fn strip_path_prefix(path: &str) -> String {
    path.strip_prefix("a/")
        .or_else(|| path.strip_prefix("b/"))
        .unwrap_or(path)
        .to_string()
}

fn is_conflict_marker(content: &str) -> bool {
    content.starts_with("<<<<<<<") || content.starts_with(">>>>>>>")
}
