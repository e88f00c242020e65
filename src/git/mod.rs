//! Git operations using git2-rs: staged diff collection and commit
//! creation.

use std::path::Path;

use git2::{DiffFormat, ErrorCode, Repository, Tree};
use tracing::{debug, info};

use crate::error::GitError;

/// Open the repository at `path`.
pub fn open_repository(path: &Path) -> Result<Repository, GitError> {
    Repository::open(path).map_err(GitError::OpenRepository)
}

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch / not found),
/// `Ok(Some(tree))` for repos with a valid HEAD, or `Err(GitError::DiffFailed)`
/// for real errors (corrupt HEAD, permission issues, missing objects).
fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(GitError::DiffFailed(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::DiffFailed)?;
    Ok(Some(tree))
}

/// Collect the staged diff (HEAD tree vs index) as unified diff text.
///
/// Only staged changes are considered. An empty staged diff is
/// [`GitError::NoStagedChanges`], not an empty string.
pub fn staged_diff(repo: &Repository) -> Result<String, GitError> {
    let head_tree = resolve_head_tree(repo)?;

    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(GitError::DiffFailed)?;

    if diff.deltas().len() == 0 {
        return Err(GitError::NoStagedChanges);
    }

    let mut diff_text = String::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        if origin == '+' || origin == '-' || origin == ' ' {
            diff_text.push(origin);
        }
        diff_text.push_str(std::str::from_utf8(line.content()).unwrap_or(""));
        true
    })
    .map_err(GitError::DiffFailed)?;

    if diff_text.trim().is_empty() {
        return Err(GitError::NoStagedChanges);
    }

    debug!("Collected staged diff of {} bytes", diff_text.len());
    Ok(diff_text)
}

/// Create a commit from the current index with the given message.
///
/// Handles both the initial commit (no parents) and the ordinary case
/// (single HEAD parent). The signature comes from the repo's git config.
pub fn create_commit(repo: &Repository, message: &str) -> Result<git2::Oid, GitError> {
    let signature = repo.signature().map_err(GitError::ConfigError)?;

    let mut index = repo.index().map_err(GitError::CommitFailed)?;
    let tree_id = index.write_tree().map_err(GitError::CommitFailed)?;
    let tree = repo.find_tree(tree_id).map_err(GitError::CommitFailed)?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit().map_err(GitError::CommitFailed)?),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => None,
        Err(e) => return Err(GitError::CommitFailed(e)),
    };
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

    let oid = repo
        .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .map_err(GitError::CommitFailed)?;

    info!("Created commit {}", oid);
    Ok(oid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_repo(dir: &std::path::Path) -> Repository {
        let repo = Repository::init(dir).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test").unwrap();
        config.set_str("user.email", "test@test.com").unwrap();
        repo
    }

    fn stage(repo: &Repository, name: &str, contents: &str) {
        std::fs::write(repo.workdir().unwrap().join(name), contents).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(std::path::Path::new(name)).unwrap();
        index.write().unwrap();
    }

    #[test]
    fn test_open_repository_on_plain_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = open_repository(dir.path());
        assert!(matches!(result, Err(GitError::OpenRepository(_))));
    }

    #[test]
    fn test_open_repository_finds_initialized_repo() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        assert!(open_repository(dir.path()).is_ok());
    }

    #[test]
    fn test_staged_diff_on_clean_repo_is_no_staged_changes() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());

        stage(&repo, "file.txt", "original\n");
        create_commit(&repo, "chore: init").unwrap();

        let result = staged_diff(&repo);
        assert!(matches!(result, Err(GitError::NoStagedChanges)));
    }

    #[test]
    fn test_staged_diff_ignores_unstaged_edits() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());

        stage(&repo, "file.txt", "original\n");
        create_commit(&repo, "chore: init").unwrap();

        // Edit without staging
        std::fs::write(dir.path().join("file.txt"), "modified\n").unwrap();

        let result = staged_diff(&repo);
        assert!(matches!(result, Err(GitError::NoStagedChanges)));
    }

    #[test]
    fn test_staged_diff_contains_patch_text() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());

        stage(&repo, "file.txt", "original\n");
        create_commit(&repo, "chore: init").unwrap();

        stage(&repo, "file.txt", "modified\n");
        let diff = staged_diff(&repo).unwrap();
        assert!(diff.contains("diff --git a/file.txt b/file.txt"));
        assert!(diff.contains("+modified"));
        assert!(diff.contains("-original"));
    }

    #[test]
    fn test_staged_diff_works_on_unborn_branch() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());

        stage(&repo, "new.txt", "hello\n");
        let diff = staged_diff(&repo).unwrap();
        assert!(diff.contains("new.txt"));
        assert!(diff.contains("+hello"));
    }

    #[test]
    fn test_create_commit_initial_and_follow_up() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());

        stage(&repo, "a.txt", "a\n");
        let first = create_commit(&repo, "feat: add a").unwrap();

        stage(&repo, "b.txt", "b\n");
        let second = create_commit(&repo, "feat: add b").unwrap();

        let commit = repo.find_commit(second).unwrap();
        assert_eq!(commit.message().unwrap(), "feat: add b");
        assert_eq!(commit.parent_id(0).unwrap(), first);
    }
}
