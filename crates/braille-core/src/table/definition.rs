//! Validated, strongly-typed table documents.

use serde::Deserialize;
use serde_yaml_ng::{Mapping, Value};

use super::TableError;
use crate::domain::cell::DotWidth;

/// One validated `token → dots` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    /// Lower-cased token; never empty.
    pub token: String,
    /// Sorted, deduplicated 1-based dot numbers within the table width.
    pub dots: Vec<u8>,
}

/// A table document after validation.
///
/// Entries keep their declaration order, which breaks ties between
/// equal-length tokens during greedy matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableDefinition {
    width: DotWidth,
    entries: Vec<TableEntry>,
}

/// Loosely-typed document shape as read from YAML.
#[derive(Debug, Deserialize)]
struct RawTableDocument {
    #[serde(default)]
    dots: Option<u64>,
    #[serde(default)]
    mapping: Option<Mapping>,
}

impl TableDefinition {
    /// A six-dot definition with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validates raw `(token, dots)` pairs.
    ///
    /// Tokens are lower-cased; dot lists are sorted and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::EmptyToken`], [`TableError::DuplicateToken`], or
    /// [`TableError::DotOutOfRange`] for invalid entries.
    pub fn new<I, S>(width: DotWidth, entries: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (S, Vec<u64>)>,
        S: AsRef<str>,
    {
        let mut validated: Vec<TableEntry> = Vec::new();
        for (token, dots) in entries {
            let token = token.as_ref().to_lowercase();
            if token.is_empty() {
                return Err(TableError::EmptyToken);
            }
            if validated.iter().any(|e| e.token == token) {
                return Err(TableError::DuplicateToken(token));
            }
            let mut checked = Vec::with_capacity(dots.len());
            for dot in dots {
                if dot == 0 || dot > u64::from(width.count()) {
                    return Err(TableError::DotOutOfRange {
                        token,
                        dot,
                        width: width.count(),
                    });
                }
                checked.push(dot as u8);
            }
            checked.sort_unstable();
            checked.dedup();
            validated.push(TableEntry {
                token,
                dots: checked,
            });
        }
        Ok(Self {
            width,
            entries: validated,
        })
    }

    /// Parses and validates a YAML table document.
    ///
    /// A blank document is an empty six-dot table.  A missing `dots` field
    /// means six dots; a missing `mapping` means no entries.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Parse`] for malformed YAML, and the validation
    /// errors of [`TableDefinition::new`] for malformed content.
    pub fn from_yaml(src: &str) -> Result<Self, TableError> {
        if src.trim().is_empty() {
            return Ok(Self::empty());
        }
        let raw: RawTableDocument = serde_yaml_ng::from_str(src)?;

        let width = match raw.dots {
            None => DotWidth::Six,
            Some(6) => DotWidth::Six,
            Some(8) => DotWidth::Eight,
            Some(other) => return Err(TableError::UnsupportedWidth(other)),
        };

        let mut pairs = Vec::new();
        for (key, value) in raw.mapping.unwrap_or_default() {
            let token = scalar_to_token(&key).ok_or(TableError::EmptyToken)?;
            let dots = value_to_dots(&value).ok_or_else(|| TableError::InvalidDots {
                token: token.clone(),
            })?;
            pairs.push((token, dots));
        }
        Self::new(width, pairs)
    }

    pub fn width(&self) -> DotWidth {
        self.width
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// YAML keys may come back as numbers or booleans (`1:` or `true:`); all are tokens.
fn scalar_to_token(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `[1, 2]` → dots; `~` or `[]` → no dots.
fn value_to_dots(value: &Value) -> Option<Vec<u64>> {
    match value {
        Value::Null => Some(Vec::new()),
        Value::Sequence(items) => items.iter().map(Value::as_u64).collect(),
        _ => None,
    }
}
