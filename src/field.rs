//! Line-level recognition of proto field declarations.
//!
//! This is surface pattern matching, not a protobuf parser. Each added line
//! of a diff is classified on its own; block context is layered on top by
//! [`crate::oneof::OneofTracker`].

use std::fmt;

use regex::Regex;

/// The fixed set of proto3 scalar type names.
pub const SCALAR_TYPES: [&str; 15] = [
  "double", "float", "int32", "int64", "uint32", "uint64", "sint32", "sint64", "fixed32", "fixed64", "sfixed32", "sfixed64",
  "bool", "string", "bytes"
];

const FIELD: &str = r"^\s*(optional\s+|repeated\s+)?(double|float|int32|int64|uint32|uint64|sint32|sint64|fixed32|fixed64|sfixed32|sfixed64|bool|string|bytes|[A-Z][A-Za-z0-9_]*)\s+([a-z_][A-Za-z0-9_]*)\s*=\s*\d+";
const MAP: &str = r"^\s*map\s*<.*>\s+[a-z_][A-Za-z0-9_]*\s*=";
const ONEOF_START: &str = r"^\s*oneof\s+[a-z_][A-Za-z0-9_]*\s*\{";
const BLOCK_END: &str = r"^\s*\}";
const FILE_HEADER: &str = r#"^\+\+\+ (?:"b/(.+)"|b/(.+))$"#;
const HUNK_HEADER: &str = r"^@@ -\d+(?:,\d+)? \+(\d+)(?:,\d+)? @@";

/// Presence qualifier written in front of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
  None,
  Optional,
  Repeated
}

impl Label {
  fn from_capture(capture: Option<&str>) -> Self {
    match capture.map(str::trim) {
      Some("optional") => Label::Optional,
      Some("repeated") => Label::Repeated,
      _ => Label::None
    }
  }
}

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
  /// One of [`SCALAR_TYPES`].
  Scalar(String),
  /// A capitalized identifier, i.e. a message or enum reference.
  Named(String)
}

impl FieldType {
  fn new(token: &str) -> Self {
    if SCALAR_TYPES.contains(&token) {
      FieldType::Scalar(token.to_string())
    } else {
      FieldType::Named(token.to_string())
    }
  }

  pub fn is_scalar(&self) -> bool {
    matches!(self, FieldType::Scalar(_))
  }

  pub fn as_str(&self) -> &str {
    match self {
      FieldType::Scalar(name) | FieldType::Named(name) => name
    }
  }
}

impl fmt::Display for FieldType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A single field declaration pulled out of an added line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
  pub label:      Label,
  pub field_type: FieldType,
  pub name:       String
}

/// What an added line of schema text turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
  Field(FieldDeclaration),
  Map,
  OneofStart,
  BlockEnd,
  Other
}

/// Compiled patterns shared by the recognizer, the oneof tracker and the
/// diff walker.
///
/// Built once per process and handed around by reference.
#[derive(Debug, Clone)]
pub struct Patterns {
  field:                  Regex,
  map:                    Regex,
  oneof_start:            Regex,
  block_end:              Regex,
  pub(crate) file_header: Regex,
  pub(crate) hunk_header: Regex
}

impl Patterns {
  pub fn new() -> Result<Self, regex::Error> {
    Ok(Self {
      field:       Regex::new(FIELD)?,
      map:         Regex::new(MAP)?,
      oneof_start: Regex::new(ONEOF_START)?,
      block_end:   Regex::new(BLOCK_END)?,
      file_header: Regex::new(FILE_HEADER)?,
      hunk_header: Regex::new(HUNK_HEADER)?
    })
  }

  /// Classifies one line of schema content.
  ///
  /// # Arguments
  /// * `content` - The line without its diff marker and with any trailing
  ///   comment already removed. Leading whitespace is allowed.
  pub fn classify(&self, content: &str) -> LineKind {
    if self.map.is_match(content) {
      return LineKind::Map;
    }

    if let Some(field) = self.parse_field(content) {
      return LineKind::Field(field);
    }

    if self.oneof_start.is_match(content) {
      LineKind::OneofStart
    } else if self.block_end.is_match(content) {
      LineKind::BlockEnd
    } else {
      LineKind::Other
    }
  }

  pub fn parse_field(&self, content: &str) -> Option<FieldDeclaration> {
    let captures = self.field.captures(content)?;

    Some(FieldDeclaration {
      label:      Label::from_capture(captures.get(1).map(|m| m.as_str())),
      field_type: FieldType::new(&captures[2]),
      name:       captures[3].to_string()
    })
  }
}

/// Drops a trailing `//` comment. Leading whitespace is kept so the
/// indentation of the line can still be measured.
pub fn strip_comment(content: &str) -> &str {
  match content.find("//") {
    Some(index) => &content[..index],
    None => content
  }
}

/// Decodes a path that git wrote in C-quoted form (`core.quotePath`), with
/// the surrounding quotes already removed.
pub fn unquote_path(quoted: &str) -> String {
  let mut bytes = Vec::with_capacity(quoted.len());
  let mut rest = quoted.bytes().peekable();

  while let Some(byte) = rest.next() {
    if byte != b'\\' {
      bytes.push(byte);
      continue;
    }

    match rest.next() {
      Some(digit @ b'0'..=b'7') => {
        let mut value = u32::from(digit - b'0');
        for _ in 0..2 {
          match rest.peek() {
            Some(&next @ b'0'..=b'7') => {
              value = value * 8 + u32::from(next - b'0');
              rest.next();
            },
            _ => break
          }
        }
        bytes.push(value as u8);
      },
      Some(b'a') => bytes.push(0x07),
      Some(b'b') => bytes.push(0x08),
      Some(b'f') => bytes.push(0x0c),
      Some(b'n') => bytes.push(b'\n'),
      Some(b'r') => bytes.push(b'\r'),
      Some(b't') => bytes.push(b'\t'),
      Some(b'v') => bytes.push(0x0b),
      Some(other) => bytes.push(other),
      None => bytes.push(b'\\')
    }
  }

  String::from_utf8_lossy(&bytes).into_owned()
}
