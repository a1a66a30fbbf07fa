//! Version resolution
//!
//! The deploy version is the second whitespace-separated token of the first
//! line of the commit log (`commit <sha> ...` -> `<sha>`). Resolution sits
//! behind the [`VersionSource`] trait so the pipeline can be tested without a
//! git checkout.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{FerryError, FerryResult};

/// Source of the deploy version token.
pub trait VersionSource {
    /// Resolve the version for the current deploy.
    fn resolve_latest(&self) -> FerryResult<String>;
}

/// Version source backed by the `git` binary.
pub struct GitLog {
    dir: PathBuf,
}

impl GitLog {
    /// Query the log of the repository at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Check if git is installed and available
    pub fn check_available() -> bool {
        Command::new("git")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn query_log(&self) -> FerryResult<String> {
        let output = Command::new("git")
            .arg("log")
            .arg("-1")
            .current_dir(&self.dir)
            .output()
            .map_err(|e| FerryError::VersionCommand {
                command: "git log -1".to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(FerryError::VersionCommand {
                command: "git log -1".to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VersionSource for GitLog {
    fn resolve_latest(&self) -> FerryResult<String> {
        parse_version(&self.query_log()?)
    }
}

/// Extract the version token from raw log output.
///
/// Takes token 2 of line 1. An empty log or a first line with fewer than two
/// tokens is a hard error rather than a silent empty prefix, which would
/// produce keys like `/index.html`.
fn parse_version(log: &str) -> FerryResult<String> {
    log.lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
        .ok_or(FerryError::UnparseableVersion)
}

/// Fixed version for tests and offline dry runs.
pub struct FixedVersion(pub String);

impl VersionSource for FixedVersion {
    fn resolve_latest(&self) -> FerryResult<String> {
        Ok(self.0.clone())
    }
}
