//! Common test utilities for Ferry integration tests.
//!
//! Provides:
//! - `SiteFixture`: a temp directory holding built assets
//! - `GitRepo`: a throwaway git repository with one commit
//! - `run_ferry`: run the ferry binary against an explicit environment

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Entry page content with the tracking-code placeholder in two places.
pub const ENTRY_PAGE_TEMPLATE: &str = "<html><head>\
<script>ga('create', 'GOOGLE_ANALYTICS_TRACKING_CODE');</script>\
</head><body>GOOGLE_ANALYTICS_TRACKING_CODE</body></html>";

/// A stylesheet that happens to mention the placeholder; non-entry assets
/// must never be rewritten.
pub const STYLESHEET: &str = "body { /* GOOGLE_ANALYTICS_TRACKING_CODE */ }";

/// Temp directory holding built site assets.
pub struct SiteFixture {
    root: TempDir,
}

impl SiteFixture {
    /// Create a fixture from `(name, content)` pairs.
    pub fn with_assets(files: &[(&str, &[u8])]) -> Self {
        let root = TempDir::new().expect("create temp site");
        for (name, content) in files {
            std::fs::write(root.path().join(name), content).expect("write asset");
        }
        Self { root }
    }

    /// Empty built-site directory.
    pub fn empty() -> Self {
        Self::with_assets(&[])
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }
}

/// A throwaway git repository with a single commit.
pub struct GitRepo {
    root: TempDir,
}

impl GitRepo {
    /// Initialize a repository and commit one file. Returns `None` when git
    /// is not installed, so callers can skip.
    pub fn with_one_commit() -> Option<Self> {
        if !ferry::GitLog::check_available() {
            return None;
        }
        let root = TempDir::new().expect("create temp repo");
        let repo = Self { root };
        repo.git(&["init", "-q"]);
        repo.git(&["config", "user.email", "ci@example.org"]);
        repo.git(&["config", "user.name", "CI"]);
        std::fs::write(repo.path().join("README"), "fixture\n").expect("write file");
        repo.git(&["add", "README"]);
        repo.git(&["commit", "-q", "-m", "initial"]);
        Some(repo)
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Full SHA of HEAD.
    pub fn head_sha(&self) -> String {
        let output = Command::new("git")
            .args(["rev-parse", "HEAD"])
            .current_dir(self.path())
            .output()
            .expect("run git rev-parse");
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Build an assets directory inside the repository.
    pub fn add_assets(&self, files: &[(&str, &[u8])]) -> PathBuf {
        let dir = self.path().join("resources").join("public");
        std::fs::create_dir_all(&dir).expect("create assets dir");
        for (name, content) in files {
            std::fs::write(dir.join(name), content).expect("write asset");
        }
        dir
    }

    fn git(&self, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .status()
            .expect("run git");
        assert!(status.success(), "git {:?} failed", args);
    }
}

/// Result of running the ferry binary.
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Run the ferry binary with an explicit environment and working directory.
///
/// The process environment is cleared apart from `PATH` and `HOME` (git needs
/// both on some platforms), so tests control exactly which deploy variables
/// are visible.
pub fn run_ferry(args: &[&str], env: &HashMap<String, String>, cwd: &Path) -> TestResult {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ferry"));
    cmd.args(args).current_dir(cwd).env_clear();
    for var in ["PATH", "HOME", "SystemRoot"] {
        if let Ok(value) = std::env::var(var) {
            cmd.env(var, value);
        }
    }
    // keep host-level git config from changing the log format
    cmd.env("GIT_CONFIG_NOSYSTEM", "1");
    cmd.env("GIT_CONFIG_GLOBAL", "/dev/null");
    for (key, value) in env {
        cmd.env(key, value);
    }

    let Output {
        status,
        stdout,
        stderr,
    } = cmd.output().expect("run ferry binary");

    TestResult {
        success: status.success(),
        exit_code: status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    }
}

/// Deploy environment with every variable set.
pub fn full_env() -> HashMap<String, String> {
    [
        ("AWS_BUCKET", "site-bucket"),
        ("AWS_ACCESS_KEY", "AKIDEXAMPLE"),
        ("AWS_SECRET_KEY", "secret"),
        ("GA_TRACKING_CODE", "UA-12345-6"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
