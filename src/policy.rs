//! Decides which recognized fields are missing an explicit presence marker.

use std::fmt;

use crate::field::{FieldDeclaration, Label, LineKind};

/// How unlabelled message and enum typed fields are treated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MessageFields {
  /// Only scalar fields must say `optional`.
  #[default]
  Ignore,
  /// Every unlabelled field must say `optional`, whatever its type.
  Enforce
}

/// A field that should have been declared `optional`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
  pub file:       String,
  pub line:       usize,
  pub field:      String,
  pub field_type: String
}

impl fmt::Display for Violation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}:{}: field '{}' of type '{}' is missing 'optional' keyword",
      self.file, self.line, self.field, self.field_type
    )
  }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
  message_fields: MessageFields
}

impl Policy {
  pub fn new(message_fields: MessageFields) -> Self {
    Self { message_fields }
  }

  pub fn message_fields(&self) -> MessageFields {
    self.message_fields
  }

  /// Checks one classified line.
  ///
  /// Oneof members, maps, `repeated` and `optional` fields always pass.
  /// Unlabelled scalars always fail. Unlabelled message/enum fields fail only
  /// under [`MessageFields::Enforce`].
  pub fn check(&self, kind: &LineKind, in_oneof: bool, file: &str, line: usize) -> Option<Violation> {
    if in_oneof {
      return None;
    }

    match kind {
      LineKind::Field(field) if self.is_violation(field) => Some(Violation {
        file: file.to_string(),
        line,
        field: field.name.clone(),
        field_type: field.field_type.to_string()
      }),
      _ => None
    }
  }

  fn is_violation(&self, field: &FieldDeclaration) -> bool {
    match field.label {
      Label::Optional | Label::Repeated => false,
      Label::None => field.field_type.is_scalar() || self.message_fields == MessageFields::Enforce
    }
  }
}
