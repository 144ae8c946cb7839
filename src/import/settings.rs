//! Import configuration.

use std::path::PathBuf;

use crate::base::constants::JAVA_EXT;
use crate::model::SchemaVersion;

/// How many sweeps a driver makes over the unit set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum ImportMode {
    /// One outline sweep; no cross-references are wired.
    SinglePass,
    /// A skeleton sweep followed by a reference-resolution sweep.
    #[default]
    TwoPass,
}

/// Settings shared by every modeller of one import session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ImportSettings {
    pub mode: ImportMode,
    /// Model fields typed by a modelled classifier as associations.
    pub attributes_as_associations: bool,
    /// Model array types as `T[]` datatypes instead of multiplicity `0..*`.
    pub arrays_as_datatypes: bool,
    /// Synthesize placeholders for unresolved supertypes, imports and
    /// feature types.
    pub force_creation: bool,
    /// Class directories and jar/zip archives for external lookups.
    pub classpath: Vec<PathBuf>,
    /// Extensions picked up when a source import walks a directory.
    pub source_extensions: Vec<String>,
    pub schema: SchemaVersion,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            mode: ImportMode::TwoPass,
            attributes_as_associations: false,
            arrays_as_datatypes: true,
            force_creation: false,
            classpath: Vec::new(),
            source_extensions: vec![JAVA_EXT.to_string()],
            schema: SchemaVersion::default(),
        }
    }
}

impl ImportSettings {
    pub fn single_pass(mut self) -> Self {
        self.mode = ImportMode::SinglePass;
        self
    }

    pub fn with_associations(mut self, enabled: bool) -> Self {
        self.attributes_as_associations = enabled;
        self
    }

    pub fn with_arrays_as_datatypes(mut self, enabled: bool) -> Self {
        self.arrays_as_datatypes = enabled;
        self
    }

    pub fn with_force_creation(mut self, enabled: bool) -> Self {
        self.force_creation = enabled;
        self
    }

    pub fn with_classpath(mut self, entry: impl Into<PathBuf>) -> Self {
        self.classpath.push(entry.into());
        self
    }

    /// Parse settings from JSON; missing keys take their defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
