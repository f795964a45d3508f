use std::path::Path;

use anyhow::Context;

use crate::{
    circuit::series::SeriesCircuit,
    experiment::step::ExperimentStep,
    foundation::error::{CircuitarError, CircuitarResult},
};

/// A circuit plus its ordered teaching steps.
///
/// Immutable once loaded; sessions share it behind an `Arc`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExperimentDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub circuit: SeriesCircuit,
    #[serde(default)]
    pub steps: Vec<ExperimentStep>,
}

impl ExperimentDefinition {
    pub fn new(circuit: SeriesCircuit, steps: Vec<ExperimentStep>) -> Self {
        Self {
            name: None,
            circuit,
            steps,
        }
    }

    pub fn from_json_str(s: &str) -> CircuitarResult<Self> {
        let def: Self = serde_json::from_str(s)?;
        def.validate()?;
        Ok(def)
    }

    pub fn from_json_path(path: &Path) -> CircuitarResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read experiment definition '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> CircuitarResult<()> {
        self.circuit.validate()?;
        for (idx, step) in self.steps.iter().enumerate() {
            step.validate()
                .map_err(|e| CircuitarError::validation(format!("step {idx}: {e}")))?;
        }
        Ok(())
    }

    pub fn step(&self, idx: usize) -> Option<&ExperimentStep> {
        self.steps.get(idx)
    }

    /// Display name, falling back to the source component id.
    pub fn title(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.circuit.source.name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/experiment/definition.rs"]
mod tests;
