//! Resolves table names to validated definitions.
//!
//! Lookup order for a name `N`:
//!
//! 1. `<table_dir>/N.yaml`, when a table directory is configured;
//! 2. the tables bundled into this crate at compile time ([`BUNDLED_TABLES`]).
//!
//! [`TableLoader::load`] never fails: a miss or an invalid document yields an
//! empty definition, which the [`super::TranslationTable`] compiles to the
//! built-in default entries.  Use [`TableLoader::try_load`] when the caller
//! needs to know why.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{TableDefinition, TableError};

/// Table used when a caller does not name one.
pub const DEFAULT_TABLE_NAME: &str = "ueb_grade1";

/// Table documents compiled into the binary, by name.
pub const BUNDLED_TABLES: &[(&str, &str)] = &[
    ("ueb_grade1", include_str!("../../tables/ueb_grade1.yaml")),
    ("ueb_grade1_8dot", include_str!("../../tables/ueb_grade1_8dot.yaml")),
    ("ueb_grade2", include_str!("../../tables/ueb_grade2.yaml")),
];

/// Looks up named table documents on disk and among the bundled tables.
#[derive(Debug, Clone, Default)]
pub struct TableLoader {
    table_dir: Option<PathBuf>,
}

impl TableLoader {
    /// A loader that only knows the bundled tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// A loader that checks `dir` before the bundled tables.
    pub fn with_table_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            table_dir: Some(dir.into()),
        }
    }

    pub fn table_dir(&self) -> Option<&Path> {
        self.table_dir.as_deref()
    }

    /// Names of every bundled table.
    pub fn bundled_names() -> impl Iterator<Item = &'static str> {
        BUNDLED_TABLES.iter().map(|(name, _)| *name)
    }

    /// Loads `name`, degrading to an empty definition on any failure.
    pub fn load(&self, name: &str) -> TableDefinition {
        match self.try_load(name) {
            Ok(Some(def)) => {
                debug!(table = name, entries = def.entries().len(), "translation table loaded");
                def
            }
            Ok(None) => {
                warn!(table = name, "translation table not found; using built-in default");
                TableDefinition::empty()
            }
            Err(e) => {
                warn!(table = name, error = %e, "translation table rejected; using built-in default");
                TableDefinition::empty()
            }
        }
    }

    /// Loads `name`, reporting why it failed.
    ///
    /// Returns `Ok(None)` when no source knows the name.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidName`] for names that are not plain
    /// identifiers, [`TableError::Io`] if a table file exists but cannot be
    /// read, or a parse/validation error for a malformed document.
    pub fn try_load(&self, name: &str) -> Result<Option<TableDefinition>, TableError> {
        validate_name(name)?;

        if let Some(dir) = &self.table_dir {
            let path = dir.join(format!("{name}.yaml"));
            match std::fs::read_to_string(&path) {
                Ok(src) => return TableDefinition::from_yaml(&src).map(Some),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => return Err(TableError::Io { path, source }),
            }
        }

        BUNDLED_TABLES
            .iter()
            .find(|(bundled, _)| *bundled == name)
            .map(|(_, src)| TableDefinition::from_yaml(src))
            .transpose()
    }
}

/// Table names become file names, so only plain identifiers are accepted.
fn validate_name(name: &str) -> Result<(), TableError> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(TableError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::DotWidth;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "braille_tables_{tag}_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_every_bundled_table_is_valid() {
        let loader = TableLoader::new();
        for name in TableLoader::bundled_names() {
            let def = loader.try_load(name).unwrap().unwrap();
            assert!(!def.is_empty(), "{name} must not be empty");
        }
    }

    #[test]
    fn test_grade1_is_six_dot_and_8dot_variant_is_eight() {
        let loader = TableLoader::new();
        assert_eq!(loader.load("ueb_grade1").width(), DotWidth::Six);
        assert_eq!(loader.load("ueb_grade1_8dot").width(), DotWidth::Eight);
    }

    #[test]
    fn test_unknown_name_loads_empty_definition() {
        let def = TableLoader::new().load("klingon_grade9");
        assert!(def.is_empty());
        assert_eq!(def.width(), DotWidth::Six);
    }

    #[test]
    fn test_try_load_unknown_name_is_none() {
        assert!(TableLoader::new().try_load("nope").unwrap().is_none());
    }

    #[test]
    fn test_path_like_names_are_rejected() {
        let loader = TableLoader::new();
        for name in ["../etc/passwd", "a/b", "", "x.yaml"] {
            assert!(
                matches!(loader.try_load(name), Err(TableError::InvalidName(_))),
                "{name:?} must be rejected"
            );
            assert!(loader.load(name).is_empty());
        }
    }

    #[test]
    fn test_table_dir_overrides_bundled_table() {
        // Arrange
        let dir = temp_dir("override");
        std::fs::write(dir.join("ueb_grade1.yaml"), "dots: 8\nmapping:\n  \"z\": [8]\n").unwrap();
        let loader = TableLoader::with_table_dir(&dir);

        // Act
        let def = loader.load("ueb_grade1");

        // Assert
        assert_eq!(def.width(), DotWidth::Eight);
        assert_eq!(def.entries().len(), 1);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_table_dir_miss_falls_through_to_bundled() {
        let dir = temp_dir("fallthrough");
        let loader = TableLoader::with_table_dir(&dir);
        let def = loader.load("ueb_grade2");
        assert!(def.entries().iter().any(|e| e.token == "and"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_file_degrades_to_empty() {
        let dir = temp_dir("invalid");
        std::fs::write(dir.join("broken.yaml"), "dots: 6\nmapping:\n  \"a\": [9]\n").unwrap();
        let loader = TableLoader::with_table_dir(&dir);

        assert!(matches!(
            loader.try_load("broken"),
            Err(TableError::DotOutOfRange { .. })
        ));
        assert!(loader.load("broken").is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }
}
