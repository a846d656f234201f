//! Schema snapshots read straight from git history

use std::path::Path;

use git2::Repository;
use tracing::debug;

use crate::error::{ReleaseError, Result};

/// The text of a schema file as recorded in one commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSnapshot {
    /// Revision as given by the caller (hash, tag, branch, `HEAD~1`, ...)
    pub revision: String,
    /// Full hex id of the commit the revision resolved to
    pub commit_id: String,
    /// Repository-relative path of the schema file
    pub path: String,
    /// File content
    pub content: String,
}

impl SchemaSnapshot {
    /// Read `path` from the tree of the commit `revision` resolves to
    pub fn at_revision(repo: &Repository, revision: &str, path: &str) -> Result<Self> {
        let commit = repo.revparse_single(revision)?.peel_to_commit()?;
        let entry = commit.tree()?.get_path(Path::new(path))?;
        let blob = entry.to_object(repo)?.peel_to_blob()?;

        let commit_id = commit.id().to_string();
        let content = String::from_utf8(blob.content().to_vec()).map_err(|_| {
            ReleaseError::InvalidUtf8 {
                commit: commit_id.clone(),
                path: path.to_string(),
            }
        })?;

        debug!(
            revision,
            commit = %commit_id,
            path,
            bytes = content.len(),
            "schema snapshot loaded"
        );

        Ok(Self {
            revision: revision.to_string(),
            commit_id,
            path: path.to_string(),
            content,
        })
    }
}

/// Open the repository containing `start`, searching parent directories
pub fn discover_repository(start: impl AsRef<Path>) -> Result<Repository> {
    let start = start.as_ref();
    Repository::discover(start).map_err(|_| ReleaseError::NotARepository(start.to_path_buf()))
}
