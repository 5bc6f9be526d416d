use crate::field::LineKind;

/// Tracks whether the scan position sits inside a `oneof { ... }` block.
///
/// This is an indentation heuristic rather than a brace counter. Only one
/// threshold is kept: the indentation of the most recent `oneof` opener. A
/// line starting with `}` at that indentation or less closes the block.
///
/// Known limits:
/// - a `oneof` opened inside another open `oneof` replaces the threshold;
/// - braces in the middle of a line are ignored, so a single-line
///   `oneof x { ... }` stays open until the next `}` at its indentation or less;
/// - files that do not indent one level per nesting level are misread.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OneofTracker {
  inside: bool,
  indent: usize
}

impl OneofTracker {
  pub fn new() -> Self {
    Self::default()
  }

  /// Feeds one classified, non-empty line into the tracker.
  ///
  /// # Arguments
  /// * `kind` - What the recognizer made of the line
  /// * `indent` - Leading whitespace of the line, see [`indentation`]
  pub fn update(&mut self, kind: &LineKind, indent: usize) {
    match kind {
      LineKind::OneofStart => {
        self.inside = true;
        self.indent = indent;
      },
      LineKind::BlockEnd if self.inside && indent <= self.indent => {
        self.inside = false;
      },
      _ => {}
    }
  }

  pub fn is_inside(&self) -> bool {
    self.inside
  }

  /// Indentation of the open block, if any.
  pub fn indent(&self) -> Option<usize> {
    self.inside.then_some(self.indent)
  }
}

/// Number of leading spaces and tabs. Tabs count as one column.
pub fn indentation(content: &str) -> usize {
  content.len() - content.trim_start_matches([' ', '\t']).len()
}
