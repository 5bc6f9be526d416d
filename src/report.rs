use colored::Colorize;
use console::Emoji;

use crate::policy::Violation;

const PASS: Emoji<'_, '_> = Emoji("✅ ", "[ok] ");
const FAIL: Emoji<'_, '_> = Emoji("❌ ", "[fail] ");

/// Pass/fail summary for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
  violations: Vec<Violation>
}

impl Report {
  pub fn new(violations: Vec<Violation>) -> Self {
    Self { violations }
  }

  pub fn passed(&self) -> bool {
    self.violations.is_empty()
  }

  pub fn violations(&self) -> &[Violation] {
    &self.violations
  }

  pub fn exit_code(&self) -> i32 {
    if self.passed() {
      0
    } else {
      1
    }
  }

  pub fn banner(&self) -> &'static str {
    if self.passed() {
      "All new proto fields are explicitly optional (or repeated/map/oneof)."
    } else {
      "The following new proto fields are missing the `optional` keyword:"
    }
  }

  /// Writes the banner and every violation, in scan order, to stdout.
  pub fn print(&self) {
    if self.passed() {
      println!("{PASS}{}", self.banner().green());
      return;
    }

    println!("{FAIL}{}", self.banner().red().bold());
    for violation in self.violations() {
      println!("{violation}");
    }
  }
}
