//! Integration tests for staged diff collection feeding the diff parser.

mod common;

use commitsmith::diff::{ChangeType, parse_diff};
use commitsmith::error::GitError;
use commitsmith::git::{create_commit, staged_diff};

use common::TestRepo;

#[test]
fn test_staged_new_file_parses_as_new() {
    let repo = TestRepo::new();
    repo.stage_file("base.txt", "base\n");
    repo.commit_staged("chore: init");

    repo.stage_file("src/lib.rs", "pub fn hello() {}\n");
    let diff = staged_diff(&repo.repo).unwrap();
    let files = parse_diff(&diff);

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "src/lib.rs");
    assert_eq!(files[0].change_type, ChangeType::New);
    assert_eq!(files[0].added_lines, 1);
}

#[test]
fn test_staged_modification_counts_lines() {
    let repo = TestRepo::new();
    repo.stage_file("notes.txt", "one\ntwo\n");
    repo.commit_staged("chore: init");

    repo.stage_file("notes.txt", "one\nthree\nfour\n");
    let diff = staged_diff(&repo.repo).unwrap();
    let files = parse_diff(&diff);

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].change_type, ChangeType::Modified);
    assert_eq!(files[0].added_lines, 2);
    assert_eq!(files[0].removed_lines, 1);
}

#[test]
fn test_staged_deletion_parses_as_deleted() {
    let repo = TestRepo::new();
    repo.stage_file("old.txt", "going away\n");
    repo.commit_staged("chore: init");

    {
        let mut index = repo.repo.index().unwrap();
        index.remove_path(std::path::Path::new("old.txt")).unwrap();
        index.write().unwrap();
    }
    std::fs::remove_file(repo.dir.path().join("old.txt")).unwrap();

    let diff = staged_diff(&repo.repo).unwrap();
    let files = parse_diff(&diff);

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "old.txt");
    assert_eq!(files[0].change_type, ChangeType::Deleted);
}

#[test]
fn test_clean_index_is_no_staged_changes() {
    let repo = TestRepo::new();
    repo.stage_file("a.txt", "a\n");
    repo.commit_staged("chore: init");

    let result = staged_diff(&repo.repo);
    assert!(matches!(result, Err(GitError::NoStagedChanges)));
}

#[test]
fn test_commit_from_workflow_message() {
    let repo = TestRepo::new();
    repo.stage_file("a.txt", "a\n");

    let oid = create_commit(&repo.repo, "feat: add a").unwrap();
    let commit = repo.repo.find_commit(oid).unwrap();
    assert_eq!(commit.message().unwrap(), "feat: add a");
    assert_eq!(commit.parent_count(), 0);
}
