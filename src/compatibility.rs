//! Schema compatibility checking
//!
//! Verifies that the current schema script applies on top of a database already
//! initialised by the previous one. Both scripts run, in order, against the same
//! freshly created SQLite file; the check passes only if neither raises an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::error::Result;
use crate::snapshot::SchemaSnapshot;

/// Which stage of the check failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStage {
    /// The previous schema did not execute on an empty database
    Previous,
    /// The current schema did not execute on top of the previous one
    Current,
}

/// Outcome of a compatibility check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompatibilityVerdict {
    Compatible,
    Incompatible {
        stage: FailedStage,
        /// SQLite's error message
        reason: String,
    },
}

impl CompatibilityVerdict {
    pub fn is_compatible(&self) -> bool {
        matches!(self, CompatibilityVerdict::Compatible)
    }
}

/// Result of checking one pair of schema snapshots
#[derive(Debug, Clone)]
pub struct CompatibilityReport {
    pub previous: String,
    pub current: String,
    pub verdict: CompatibilityVerdict,
}

impl CompatibilityReport {
    /// One-line, human-readable summary
    pub fn summary(&self) -> String {
        match &self.verdict {
            CompatibilityVerdict::Compatible => format!(
                "PASS: Schemas are compatible ({} -> {})",
                self.previous, self.current
            ),
            CompatibilityVerdict::Incompatible {
                stage: FailedStage::Previous,
                ..
            } => format!("FAIL: Previous schema ({}) failed to execute", self.previous),
            CompatibilityVerdict::Incompatible {
                stage: FailedStage::Current,
                ..
            } => format!(
                "FAIL: Current schema ({}) failed to execute on top of previous schema",
                self.current
            ),
        }
    }
}

/// A throwaway SQLite database file.
///
/// Any existing file at the path is removed on creation. Dropping the guard
/// closes the connection and deletes the file, whichever way the scope is left.
pub struct ScratchDatabase {
    path: PathBuf,
    conn: Option<Connection>,
}

impl ScratchDatabase {
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        remove_if_exists(&path)?;
        let conn = Connection::open(&path)?;
        debug!(path = %path.display(), "scratch database created");
        Ok(Self {
            path,
            conn: Some(conn),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run a multi-statement SQL script
    pub fn execute_script(&self, sql: &str) -> rusqlite::Result<()> {
        match &self.conn {
            Some(conn) => conn.execute_batch(sql),
            None => Err(rusqlite::Error::InvalidQuery),
        }
    }

    /// Commit a transaction a script left open
    pub fn commit(&self) -> rusqlite::Result<()> {
        match &self.conn {
            Some(conn) if !conn.is_autocommit() => conn.execute_batch("COMMIT"),
            Some(_) => Ok(()),
            None => Err(rusqlite::Error::InvalidQuery),
        }
    }

    fn apply(&self, sql: &str) -> rusqlite::Result<()> {
        self.execute_script(sql)?;
        self.commit()
    }
}

impl Drop for ScratchDatabase {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err((_, e)) = conn.close() {
                warn!(path = %self.path.display(), error = %e, "failed to close scratch database");
            }
        }
        match remove_if_exists(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "scratch database removed"),
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove scratch database"
            ),
        }
    }
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Applies schema scripts cumulatively in a scratch database
pub struct CompatibilityChecker {
    scratch_path: PathBuf,
}

impl CompatibilityChecker {
    /// Create a checker that uses `scratch_path` for its throwaway database
    pub fn new(scratch_path: impl Into<PathBuf>) -> Self {
        Self {
            scratch_path: scratch_path.into(),
        }
    }

    pub fn scratch_path(&self) -> &Path {
        &self.scratch_path
    }

    /// Check that `current` applies on top of `previous`
    pub fn check(
        &self,
        previous: &SchemaSnapshot,
        current: &SchemaSnapshot,
    ) -> Result<CompatibilityReport> {
        let verdict = self.check_scripts(&previous.content, &current.content)?;
        Ok(CompatibilityReport {
            previous: previous.revision.clone(),
            current: current.revision.clone(),
            verdict,
        })
    }

    /// Run `previous` then `current` against one fresh database.
    ///
    /// Only failure to create the database is an `Err`; script failures are
    /// reported through the verdict.
    pub fn check_scripts(&self, previous: &str, current: &str) -> Result<CompatibilityVerdict> {
        let db = ScratchDatabase::create(&self.scratch_path)?;

        if let Err(e) = db.apply(previous) {
            debug!(error = %e, "previous schema failed");
            return Ok(CompatibilityVerdict::Incompatible {
                stage: FailedStage::Previous,
                reason: e.to_string(),
            });
        }

        if let Err(e) = db.apply(current) {
            debug!(error = %e, "current schema failed on top of previous");
            return Ok(CompatibilityVerdict::Incompatible {
                stage: FailedStage::Current,
                reason: e.to_string(),
            });
        }

        Ok(CompatibilityVerdict::Compatible)
    }
}
