use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use git2::{Repository, RepositoryOpenFlags as Flag};
use log::{debug, info, warn};
use thiserror::Error;

use crate::error::{is_revision_error, BASE_REF_HINT};

/// Fewer context lines risk cutting the `oneof` opener out of a hunk.
pub const MIN_CONTEXT_LINES: usize = 10;
pub const DEFAULT_PATHSPEC: &str = "*.proto";

/// Which side of the comparison a reference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefRole {
  Base,
  Head
}

impl RefRole {
  /// Suffix appended to a "not found" message.
  fn hint(&self) -> String {
    match self {
      RefRole::Base => format!(". {BASE_REF_HINT}"),
      RefRole::Head => String::new()
    }
  }
}

impl fmt::Display for RefRole {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RefRole::Base => f.write_str("base"),
      RefRole::Head => f.write_str("head")
    }
  }
}

#[derive(Error, Debug)]
pub enum GitError {
  #[error("not in a git repository or git not available: {0}")]
  NotARepository(#[source] git2::Error),

  #[error("{role} reference '{reference}' not found{}", .role.hint())]
  ReferenceNotFound { role: RefRole, reference: String },

  #[error("git reference not found: {stderr}. Please check that the base reference '{reference}' exists")]
  UnknownRevision { reference: String, stderr: String },

  #[error("git diff failed (exit {code}): {stderr}")]
  DiffFailed { code: i32, stderr: String },

  #[error("failed to run git diff: {0}")]
  Spawn(#[from] std::io::Error)
}

pub type Result<T, E = GitError> = std::result::Result<T, E>;

/// The two revisions being compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRange {
  pub base: String,
  pub head: String
}

impl DiffRange {
  pub fn new(base: impl Into<String>, head: impl Into<String>) -> Self {
    Self { base: base.into(), head: head.into() }
  }

  /// `head == "."` compares the working tree against `base`; anything else
  /// is a merge-base diff.
  pub fn is_worktree(&self) -> bool {
    self.head == "."
  }

  pub fn spec(&self) -> String {
    if self.is_worktree() {
      self.base.clone()
    } else {
      format!("{}...{}", self.base, self.head)
    }
  }
}

/// Arguments for the `git diff` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOptions {
  pub context_lines: usize,
  pub pathspec:      String
}

impl DiffOptions {
  pub fn new(context_lines: usize, pathspec: impl Into<String>) -> Self {
    let context_lines = if context_lines < MIN_CONTEXT_LINES {
      warn!("{context_lines} context lines is too few to see enclosing oneof blocks, using {MIN_CONTEXT_LINES}");
      MIN_CONTEXT_LINES
    } else {
      context_lines
    };

    Self { context_lines, pathspec: pathspec.into() }
  }

  fn args(&self, range: &DiffRange) -> Vec<String> {
    vec![
      "diff".to_string(),
      format!("-U{}", self.context_lines),
      range.spec(),
      "--".to_string(),
      self.pathspec.clone()
    ]
  }
}

impl Default for DiffOptions {
  fn default() -> Self {
    Self::new(MIN_CONTEXT_LINES, DEFAULT_PATHSPEC)
  }
}

pub struct Repo {
  repo: Repository
}

impl Repo {
  pub fn new() -> Result<Self> {
    Self::new_with_path(".")
  }

  pub fn new_with_path(path: impl AsRef<Path>) -> Result<Self> {
    let repo = Repository::open_ext(path.as_ref(), Flag::empty(), Vec::<&Path>::new()).map_err(GitError::NotARepository)?;
    Ok(Repo { repo })
  }

  /// Directory `git diff` runs in, so the pathspec is relative to the
  /// repository root.
  pub fn workdir(&self) -> PathBuf {
    self
      .repo
      .workdir()
      .unwrap_or_else(|| self.repo.path())
      .to_path_buf()
  }

  /// Checks both references resolve before any diff is attempted.
  ///
  /// `HEAD` and `.` are not checked on the head side.
  pub fn validate(&self, range: &DiffRange) -> Result<()> {
    self.resolve(RefRole::Base, &range.base)?;

    if range.head != "HEAD" && !range.is_worktree() {
      self.resolve(RefRole::Head, &range.head)?;
    }

    Ok(())
  }

  fn resolve(&self, role: RefRole, reference: &str) -> Result<()> {
    match self.repo.revparse_single(reference) {
      Ok(object) => {
        debug!("[validate] {role} '{reference}' resolves to {}", object.id());
        Ok(())
      },
      Err(err) => {
        debug!("[validate] {role} '{reference}': {err}");
        Err(GitError::ReferenceNotFound { role, reference: reference.to_string() })
      }
    }
  }

  /// Runs `git diff` and returns its raw output.
  pub fn diff(&self, range: &DiffRange, opts: &DiffOptions) -> Result<String> {
    run_diff(&self.workdir(), range, opts)
  }
}

/// Runs `git diff` in `dir` without any pre-flight checks.
pub fn run_diff(dir: &Path, range: &DiffRange, opts: &DiffOptions) -> Result<String> {
  let args = opts.args(range);
  info!("Running git {}", args.join(" "));

  let output = Command::new("git").args(&args).current_dir(dir).output()?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if is_revision_error(&stderr) {
      return Err(GitError::UnknownRevision { reference: range.base.clone(), stderr });
    }

    return Err(GitError::DiffFailed { code: output.status.code().unwrap_or(-1), stderr });
  }

  let diff = String::from_utf8_lossy(&output.stdout).into_owned();
  debug!("[diff] {} bytes of diff output", diff.len());
  Ok(diff)
}
