//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use git2::{Oid, Repository, Signature};

use commitsmith::error::ModelError;
use commitsmith::model::{ModelClient, ModelRequest};

/// Model fake that pops canned completions in script order. Running out
/// of script surfaces as a transport failure.
pub struct ScriptedModel {
    responses: Mutex<Vec<String>>,
    calls: Mutex<u32>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<&str>) -> Self {
        let mut reversed: Vec<String> = responses.into_iter().map(String::from).collect();
        reversed.reverse();
        Self {
            responses: Mutex::new(reversed),
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    async fn invoke(&self, _request: &ModelRequest) -> Result<String, ModelError> {
        *self.calls.lock().unwrap() += 1;
        self.responses
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| ModelError::ExecutionFailed("script exhausted".into()))
    }
}

/// Create a temporary directory for test output.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        {
            let mut config = repo.config().expect("Failed to open repo config");
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }
        Self { dir, repo }
    }

    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Write a file into the working tree and stage it, creating parent
    /// directories as needed.
    pub fn stage_file(&self, name: &str, contents: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&path, contents).expect("Failed to write file");
        let mut index = self.repo.index().expect("Failed to open index");
        index
            .add_path(std::path::Path::new(name))
            .expect("Failed to stage file");
        index.write().expect("Failed to write index");
    }

    /// Commit whatever is staged. Returns the commit OID.
    pub fn commit_staged(&self, message: &str) -> Oid {
        let sig = self.signature();
        let mut index = self.repo.index().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let parent = self.repo.head().ok().map(|h| h.peel_to_commit().unwrap());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to commit")
    }
}
