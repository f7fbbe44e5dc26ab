//! Git-backed version-info provider.
//!
//! Shells out to `git` for the commit hash, commit date, and a browsable
//! commit URL derived from the `origin` remote. Any failure along the way
//! (no git binary, not a repository, no remote) degrades to empty fields;
//! a report without commit metadata is still produced.

use std::path::PathBuf;
use std::process::Command;

use misra_report_core::{VersionInfo, VersionInfoProvider};

/// Reads commit metadata from a git repository.
#[derive(Debug)]
pub struct GitVersionInfo {
    repo: PathBuf,
}

impl GitVersionInfo {
    /// Creates a provider reading from the given repository directory.
    #[must_use]
    pub fn new(repo: PathBuf) -> Self {
        Self { repo }
    }

    fn git(&self, args: &[&str]) -> Option<String> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo)
            .args(args)
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let stdout = String::from_utf8(output.stdout).ok()?;
        let trimmed = stdout.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

impl VersionInfoProvider for GitVersionInfo {
    fn version_info(&self) -> VersionInfo {
        let Some(commit_id) = self.git(&["rev-parse", "HEAD"]) else {
            tracing::warn!(
                "No version-control context in {}, report will omit commit metadata",
                self.repo.display()
            );
            return VersionInfo::default();
        };

        let commit_date = self
            .git(&["log", "-1", "--format=%cd", "--date=format:%b %d, %Y"])
            .unwrap_or_default();

        let commit_url = self
            .git(&["remote", "get-url", "origin"])
            .map(|remote| commit_url(&remote, &commit_id))
            .unwrap_or_default();

        VersionInfo {
            commit_id,
            commit_date,
            commit_url,
        }
    }
}

/// Derives a browsable commit URL from a remote URL.
///
/// `git@host:org/repo.git` and `https://host/org/repo.git` both normalize to
/// `https://host/org/repo/commit/<id>`.
fn commit_url(remote: &str, commit_id: &str) -> String {
    let base = remote.trim_end_matches(".git");
    let base = match base.strip_prefix("git@") {
        Some(rest) => format!("https://{}", rest.replacen(':', "/", 1)),
        None => base.to_string(),
    };
    format!("{base}/commit/{commit_id}")
}
