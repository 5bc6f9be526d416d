#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};
use lint::{MessageFields, Patterns, Policy, Scanner};
use tempfile::TempDir;

pub fn setup() {
  _ = env_logger::builder().is_test(true).try_init();
}

/// Scans `diff` and renders each violation as its diagnostic line.
pub fn scan(diff: &str, message_fields: MessageFields) -> Vec<String> {
  let patterns = Patterns::new().expect("patterns compile");
  Scanner::new(&patterns, Policy::new(message_fields))
    .scan(diff)
    .iter()
    .map(ToString::to_string)
    .collect()
}

/// A throwaway repository driven through the `git` binary.
pub struct TestRepo {
  dir: TempDir
}

impl TestRepo {
  pub fn new() -> Self {
    let repo = TestRepo { dir: TempDir::new().expect("Could not create temp dir") };
    repo.git(&["init", "--quiet"]).expect("git init");
    repo
  }

  pub fn path(&self) -> &Path {
    self.dir.path()
  }

  pub fn write_file(&self, name: &str, content: &str) {
    let path = self.path().join(name);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).expect("Could not create parent dir");
    }
    std::fs::write(path, content).expect("Could not write file");
  }

  pub fn commit_all(&self, message: &str) -> Result<String> {
    self.git(&["add", "--all"])?;
    self.git(&["commit", "--quiet", "-m", message])
  }

  pub fn branch(&self, name: &str) -> Result<String> {
    self.git(&["branch", name])
  }

  pub fn git(&self, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
      .args(["-c", "user.name=Proto Lint", "-c", "user.email=lint@example.com", "-c", "commit.gpgsign=false"])
      .args(args)
      .current_dir(self.path())
      .output()
      .context("Could not run git command")?;

    if !output.status.success() {
      bail!("Git command failed: {}", String::from_utf8_lossy(&output.stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }
}
