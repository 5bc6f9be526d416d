//! Diff walking.
//!
//! Turns raw unified diff text into an ordered list of violations,
//! keeping track of the current file, new-file line numbers and oneof
//! state as it goes.

pub mod parser;

pub use parser::{parse_diff, ScanContext, ScanError, Scanner};
