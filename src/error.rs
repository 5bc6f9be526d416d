//! Helpers for classifying failures reported by the `git` binary.

/// Checks if `git` stderr output means a revision could not be resolved.
///
/// `git diff` fails the same way for a missing ref and for, say, a corrupt
/// object store; only the message text tells them apart.
///
/// # Examples
///
/// ```
/// use lint::error::is_revision_error;
///
/// assert!(is_revision_error("fatal: bad revision 'origin/main...HEAD'"));
/// assert!(!is_revision_error("fatal: not a git repository"));
/// ```
pub fn is_revision_error(stderr: &str) -> bool {
  let msg = stderr.to_lowercase();
  msg.contains("unknown revision") || msg.contains("bad revision")
}

/// Alternatives suggested when the base reference does not exist.
pub const BASE_REF_HINT: &str = "Common alternatives: 'origin/master', 'main', 'HEAD~1'";
