//! Unified diff walker.

use std::borrow::Cow;
use std::io::BufRead;

use thiserror::Error;

use crate::field::{strip_comment, unquote_path, LineKind, Patterns};
use crate::oneof::{indentation, OneofTracker};
use crate::policy::{Policy, Violation};

#[derive(Error, Debug)]
pub enum ScanError {
  #[error("Failed to read diff: {0}")]
  Io(#[from] std::io::Error)
}

/// Mutable state threaded through one walk over a diff.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanContext {
  pub current_file: String,
  pub current_line: usize,
  pub oneof:        OneofTracker
}

/// The shape of a raw diff line, before any schema recognition.
#[derive(Debug, PartialEq, Eq)]
enum DiffLine<'a> {
  FileHeader(Cow<'a, str>),
  HunkHeader(Option<usize>),
  Added(&'a str),
  Ignored
}

/// Walks unified diff text and collects violations in scan order.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
  patterns: &'a Patterns,
  policy:   Policy
}

impl<'a> Scanner<'a> {
  pub fn new(patterns: &'a Patterns, policy: Policy) -> Self {
    Self { patterns, policy }
  }

  pub fn scan(&self, diff: &str) -> Vec<Violation> {
    log::debug!("Scanning diff with {} lines", diff.lines().count());

    let mut ctx = ScanContext::default();
    diff
      .lines()
      .filter_map(|line| self.step(&mut ctx, line))
      .collect()
  }

  /// Same as [`Scanner::scan`] but pulls lines from a reader.
  ///
  /// # Returns
  /// * `Result<Vec<Violation>, ScanError>` - Violations, or the first read failure
  pub fn scan_reader<R: BufRead>(&self, reader: R) -> Result<Vec<Violation>, ScanError> {
    let mut ctx = ScanContext::default();
    let mut violations = Vec::new();

    for line in reader.lines() {
      if let Some(violation) = self.step(&mut ctx, &line?) {
        violations.push(violation);
      }
    }

    Ok(violations)
  }

  /// Advances the context by one raw diff line.
  pub fn step(&self, ctx: &mut ScanContext, line: &str) -> Option<Violation> {
    let content = match self.diff_line(line) {
      DiffLine::FileHeader(path) => {
        log::debug!("Entering file {path}");
        ctx.current_file = path.to_string();
        return None;
      },
      DiffLine::HunkHeader(start) => {
        if let Some(start) = start {
          ctx.current_line = start.saturating_sub(1);
        }
        return None;
      },
      DiffLine::Ignored => return None,
      DiffLine::Added(content) => content
    };

    ctx.current_line = ctx.current_line.saturating_add(1);

    let content = strip_comment(content).trim_end();
    if content.trim_start().is_empty() {
      return None;
    }

    let kind = self.patterns.classify(content);
    ctx.oneof.update(&kind, indentation(content));
    if kind == LineKind::OneofStart {
      log::debug!("{}:{}: oneof opened at indent {:?}", ctx.current_file, ctx.current_line, ctx.oneof.indent());
    }

    let violation = self.policy.check(&kind, ctx.oneof.is_inside(), &ctx.current_file, ctx.current_line);
    if let Some(ref violation) = violation {
      log::debug!("Violation: {violation}");
    }
    violation
  }

  fn diff_line<'l>(&self, line: &'l str) -> DiffLine<'l> {
    if let Some(captures) = self.patterns.file_header.captures(line) {
      let path = match (captures.get(1), captures.get(2)) {
        (Some(quoted), _) => Cow::Owned(unquote_path(quoted.as_str())),
        (None, Some(plain)) => Cow::Borrowed(plain.as_str()),
        (None, None) => Cow::Borrowed("")
      };
      return DiffLine::FileHeader(path);
    }

    if let Some(captures) = self.patterns.hunk_header.captures(line) {
      return DiffLine::HunkHeader(captures[1].parse().ok());
    }

    match line.strip_prefix('+') {
      Some(content) if !line.starts_with("+++") => DiffLine::Added(content),
      _ => DiffLine::Ignored
    }
  }
}

/// Scans a diff in one call.
///
/// # Arguments
/// * `diff` - Raw `git diff` output
/// * `patterns` - Compiled recognizer patterns
/// * `policy` - Which fields count as violations
pub fn parse_diff(diff: &str, patterns: &Patterns, policy: Policy) -> Vec<Violation> {
  Scanner::new(patterns, policy).scan(diff)
}
