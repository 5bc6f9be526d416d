use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::git::{DiffOptions, DiffRange, DEFAULT_PATHSPEC, MIN_CONTEXT_LINES};
use crate::policy::{MessageFields, Policy};

// Constants
const DEFAULT_BASE: &str = "origin/main";
const DEFAULT_HEAD: &str = "HEAD";
const ENV_PREFIX: &str = "PROTO_OPTIONAL";

/// Optional per-repository settings, read from the working directory.
pub const CONFIG_FILE: &str = ".proto-optional.ini";

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct App {
  pub base:                   String,
  pub head:                   String,
  pub context_lines:          usize,
  pub pathspec:               String,
  pub enforce_message_fields: bool
}

impl App {
  /// Loads defaults, then [`CONFIG_FILE`], then `PROTO_OPTIONAL_*` variables.
  pub fn new() -> Result<Self> {
    Self::load(Path::new(CONFIG_FILE))
  }

  pub fn load(file: &Path) -> Result<Self> {
    let config = Config::builder()
      .set_default("base", DEFAULT_BASE)?
      .set_default("head", DEFAULT_HEAD)?
      .set_default("context_lines", MIN_CONTEXT_LINES as i64)?
      .set_default("pathspec", DEFAULT_PATHSPEC)?
      .set_default("enforce_message_fields", false)?
      .add_source(File::new(file.to_string_lossy().as_ref(), FileFormat::Ini).required(false))
      .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
      .build()
      .with_context(|| format!("Failed to read config from {}", file.display()))?;

    config
      .try_deserialize()
      .with_context(|| format!("Failed to deserialize config, please check {}", file.display()))
  }

  /// Positional arguments win over configured revisions.
  pub fn range(&self, base: Option<&str>, head: Option<&str>) -> DiffRange {
    DiffRange::new(base.unwrap_or(&self.base), head.unwrap_or(&self.head))
  }

  pub fn diff_options(&self, context_lines: Option<usize>) -> DiffOptions {
    DiffOptions::new(context_lines.unwrap_or(self.context_lines), self.pathspec.as_str())
  }

  pub fn policy(&self, enforce_message_fields: bool) -> Policy {
    if enforce_message_fields || self.enforce_message_fields {
      Policy::new(MessageFields::Enforce)
    } else {
      Policy::new(MessageFields::Ignore)
    }
  }
}
