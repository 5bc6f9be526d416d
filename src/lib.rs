pub mod config;
pub mod diff;
pub mod error;
pub mod field;
pub mod git;
pub mod oneof;
pub mod policy;
pub mod report;

// Re-exports
pub use diff::{parse_diff, Scanner};
pub use field::Patterns;
pub use policy::{MessageFields, Policy, Violation};
pub use report::Report;
