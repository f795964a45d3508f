use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::{
    circuit::solver::SolveResult,
    experiment::definition::ExperimentDefinition,
    foundation::core::{ExperimentId, MarkerId},
    foundation::error::{CircuitarError, CircuitarResult},
};

/// Non-fatal experiment conditions. `Display` is the status line shown to the user.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum ExperimentError {
    #[error("No experiment mapped to ID {marker}")]
    UnmappedMarker { marker: MarkerId },

    #[error("File missing: {}", path.display())]
    MissingDefinitionFile { path: PathBuf },

    #[error("Malformed experiment file {}: {reason}", path.display())]
    MalformedDefinition { path: PathBuf, reason: String },

    #[error("Experiment {experiment}: this circuit type is not solved yet (visual only)")]
    UnsolvableExperimentKind { experiment: ExperimentId },
}

/// Per-experiment electrical outcome stored in the session cache.
#[derive(Clone, Debug, PartialEq)]
pub enum ExperimentOutcome {
    /// Series-solvable experiment with its solution.
    Solved(SolveResult),
    /// Recognized experiment that is not solved; carries a message for display.
    Informational(String),
    /// No definition could be produced.
    Unavailable(ExperimentError),
}

impl ExperimentOutcome {
    pub fn solved(&self) -> Option<&SolveResult> {
        match self {
            Self::Solved(r) => Some(r),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CatalogEntry {
    /// Definition file name, relative to the experiments directory.
    pub file: String,
    /// Whether the circuit is solved by the series solver.
    #[serde(default)]
    pub solvable: bool,
}

/// Marker → experiment → definition file table.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExperimentCatalog {
    /// Explicit marker mapping. Markers absent here map to the experiment with the same id.
    #[serde(default)]
    pub markers: BTreeMap<MarkerId, ExperimentId>,
    pub experiments: BTreeMap<ExperimentId, CatalogEntry>,
}

const DEFAULT_TABLE: [(&str, bool); 8] = [
    ("exp1_ohm.json", true),
    ("exp2_series.json", true),
    ("exp3_parallel.json", false),
    ("exp4_led.json", true),
    ("exp5_voltage_divider.json", true),
    ("exp6_rc.json", false),
    ("exp7_transistor.json", false),
    ("exp8_threshold.json", false),
];

impl Default for ExperimentCatalog {
    fn default() -> Self {
        let experiments = DEFAULT_TABLE
            .iter()
            .enumerate()
            .map(|(id, (file, solvable))| {
                (
                    ExperimentId(id as u32),
                    CatalogEntry {
                        file: (*file).to_string(),
                        solvable: *solvable,
                    },
                )
            })
            .collect();
        Self {
            markers: BTreeMap::new(),
            experiments,
        }
    }
}

impl ExperimentCatalog {
    /// Resolve the experiment bound to `marker`, if any.
    pub fn resolve(&self, marker: MarkerId) -> Option<(ExperimentId, &CatalogEntry)> {
        let id = self
            .markers
            .get(&marker)
            .copied()
            .unwrap_or(ExperimentId(marker.0));
        self.experiments.get(&id).map(|entry| (id, entry))
    }

    pub fn is_solvable(&self, id: ExperimentId) -> bool {
        self.experiments.get(&id).is_some_and(|e| e.solvable)
    }

    pub fn validate(&self) -> CircuitarResult<()> {
        let mut files = std::collections::BTreeSet::new();
        for (id, entry) in &self.experiments {
            if entry.file.trim().is_empty() {
                return Err(CircuitarError::validation(format!(
                    "experiment {id} has an empty file name"
                )));
            }
            if !files.insert(entry.file.as_str()) {
                return Err(CircuitarError::validation(format!(
                    "experiment file '{}' is listed more than once",
                    entry.file
                )));
            }
        }
        for (marker, id) in &self.markers {
            if !self.experiments.contains_key(id) {
                return Err(CircuitarError::validation(format!(
                    "marker {marker} maps to unknown experiment {id}"
                )));
            }
        }
        Ok(())
    }
}

/// Producer of experiment definitions, invoked at most once per marker by a session.
pub trait DefinitionSource {
    fn load(
        &mut self,
        experiment: ExperimentId,
        entry: &CatalogEntry,
    ) -> Result<ExperimentDefinition, ExperimentError>;
}

/// Loads definitions from JSON files under a root directory.
#[derive(Clone, Debug)]
pub struct FsDefinitionSource {
    root: PathBuf,
}

impl FsDefinitionSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DefinitionSource for FsDefinitionSource {
    fn load(
        &mut self,
        experiment: ExperimentId,
        entry: &CatalogEntry,
    ) -> Result<ExperimentDefinition, ExperimentError> {
        let path = self.root.join(&entry.file);
        if !path.is_file() {
            return Err(ExperimentError::MissingDefinitionFile { path });
        }
        tracing::debug!(%experiment, path = %path.display(), "reading experiment definition");
        ExperimentDefinition::from_json_path(&path).map_err(|e| {
            ExperimentError::MalformedDefinition {
                path,
                reason: e.to_string(),
            }
        })
    }
}

/// In-memory definitions keyed by experiment id.
#[derive(Clone, Debug, Default)]
pub struct MemoryDefinitionSource {
    definitions: BTreeMap<ExperimentId, ExperimentDefinition>,
}

impl MemoryDefinitionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: ExperimentId, def: ExperimentDefinition) -> Self {
        self.definitions.insert(id, def);
        self
    }
}

impl DefinitionSource for MemoryDefinitionSource {
    fn load(
        &mut self,
        experiment: ExperimentId,
        entry: &CatalogEntry,
    ) -> Result<ExperimentDefinition, ExperimentError> {
        self.definitions
            .get(&experiment)
            .cloned()
            .ok_or_else(|| ExperimentError::MissingDefinitionFile {
                path: PathBuf::from(&entry.file),
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/experiment/catalog.rs"]
mod tests;
