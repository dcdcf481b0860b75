use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Bookkeeping markers which never register as capabilities
const DEFAULT_EXCLUDED_MARKERS: &[&str] = &[
    "javax.inject.Singleton",
    "javax.inject.Named",
    "io.dinject.Factory",
    "javax.annotation.Generated",
    "io.dinject.Primary",
    "io.dinject.Secondary",
    "kotlin.Metadata",
    "io.dinject.controller.Path",
];

/// Markers (scope, naming, factory, ...) which are filtered out of a
/// component's capabilities during descriptor construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExcludedMarkers(BTreeSet<String>);

impl Default for ExcludedMarkers {
    fn default() -> Self {
        ExcludedMarkers(
            DEFAULT_EXCLUDED_MARKERS
                .iter()
                .map(|marker| marker.to_string())
                .collect(),
        )
    }
}
impl ExcludedMarkers {
    /// No marker is excluded
    pub fn none() -> Self {
        ExcludedMarkers(BTreeSet::new())
    }

    pub fn with(mut self, marker: impl Into<String>) -> Self {
        self.0.insert(marker.into());
        self
    }

    pub fn without(mut self, marker: &str) -> Self {
        self.0.remove(marker);
        self
    }

    pub fn is_excluded(&self, marker: &str) -> bool {
        self.0.contains(marker)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Level unresolved dependency diagnostics are logged at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    #[default]
    Warn,
    Info,
    Debug,
}

/// Facts about the generated context module, handed through to the emitter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextModule {
    /// Name of the generated module
    pub name: Option<String>,
    /// Modules which must be built before this one
    pub depends_on: Vec<String>,
}

/// Configuration of a wiring run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WiringConfig {
    pub excluded_markers: ExcludedMarkers,
    pub unresolved_level: DiagnosticLevel,
    pub module: ContextModule,
}

impl WiringConfig {
    /// Parses a TOML document. Missing fields fall back to their defaults.
    ///
    /// ```toml
    /// unresolved_level = "info"
    /// excluded_markers = ["javax.inject.Singleton"]
    ///
    /// [module]
    /// name = "coffee"
    /// depends_on = ["base"]
    /// ```
    pub fn from_toml_str(config: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(config)?)
    }
}
