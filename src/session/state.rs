use std::{collections::HashMap, sync::Arc};

use crate::{
    circuit::solver::solve,
    experiment::catalog::{DefinitionSource, ExperimentCatalog, ExperimentError, ExperimentOutcome},
    experiment::definition::ExperimentDefinition,
    experiment::step::ExperimentStep,
    foundation::core::{ExperimentId, MarkerId},
    session::classify::ComponentKind,
    session::layout::{Layout, LayoutParams, compute_layout},
};

/// Status line shown while no marker is in view.
pub const NO_MARKER_STATUS: &str = "No marker detected";

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Wire between two revealed components (base ids, pins stripped).
pub struct Connection {
    pub from: String,
    pub to: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Component revealed by a `show_component` step.
pub struct VisibleComponent {
    pub id: String,
    /// Sprite family resolved at reveal time.
    pub kind: Option<ComponentKind>,
}

#[derive(Clone, Debug, PartialEq)]
/// Everything learned about a marker the first time it was observed.
pub struct CachedExperiment {
    pub experiment: Option<ExperimentId>,
    pub definition: Option<Arc<ExperimentDefinition>>,
    pub outcome: ExperimentOutcome,
    /// User-facing status line (`Loaded: exp1_ohm.json`, `File missing: ...`).
    pub status: String,
}

impl CachedExperiment {
    fn unavailable(experiment: Option<ExperimentId>, err: ExperimentError) -> Self {
        Self {
            experiment,
            definition: None,
            status: err.to_string(),
            outcome: ExperimentOutcome::Unavailable(err),
        }
    }
}

/// Marker-driven experiment state machine.
///
/// Unbound until the first [`observe`](Self::observe). Each newly bound marker starts with no
/// step shown and nothing revealed; re-observing the bound marker is a no-op so per-frame
/// observation keeps progress. Definitions are loaded at most once per marker, including failed
/// loads.
pub struct ExperimentSession {
    catalog: ExperimentCatalog,
    source: Box<dyn DefinitionSource>,
    layout_params: LayoutParams,

    current_marker: Option<MarkerId>,
    marker_in_view: bool,
    step_cursor: Option<usize>,
    visible: Vec<VisibleComponent>,
    connections: Vec<Connection>,

    cache: HashMap<MarkerId, CachedExperiment>,
    load_count: usize,
}

impl std::fmt::Debug for ExperimentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExperimentSession")
            .field("current_marker", &self.current_marker)
            .field("marker_in_view", &self.marker_in_view)
            .field("step_cursor", &self.step_cursor)
            .field("visible", &self.visible)
            .field("connections", &self.connections)
            .field("cached_markers", &self.cache.len())
            .field("load_count", &self.load_count)
            .finish()
    }
}

impl ExperimentSession {
    pub fn new(
        catalog: ExperimentCatalog,
        source: Box<dyn DefinitionSource>,
        layout_params: LayoutParams,
    ) -> Self {
        Self {
            catalog,
            source,
            layout_params,
            current_marker: None,
            marker_in_view: false,
            step_cursor: None,
            visible: Vec::new(),
            connections: Vec::new(),
            cache: HashMap::new(),
            load_count: 0,
        }
    }

    /// Apply one frame of detections. Only the first detected marker is used; an empty list
    /// leaves the binding and progress untouched.
    pub fn observe_frame(&mut self, detected: &[MarkerId]) -> bool {
        match detected.first() {
            Some(&marker) => self.observe(marker),
            None => {
                self.marker_in_view = false;
                false
            }
        }
    }

    /// Bind `marker`, loading its experiment on first sight. Returns whether the binding changed.
    #[tracing::instrument(skip(self))]
    pub fn observe(&mut self, marker: MarkerId) -> bool {
        self.marker_in_view = true;
        if self.current_marker == Some(marker) {
            return false;
        }

        if self.cache.contains_key(&marker) {
            tracing::debug!("experiment cache hit");
        } else {
            let entry = self.load_entry(marker);
            self.cache.insert(marker, entry);
        }

        self.current_marker = Some(marker);
        self.clear_progress();
        true
    }

    fn load_entry(&mut self, marker: MarkerId) -> CachedExperiment {
        self.load_count += 1;

        let Some((id, entry)) = self.catalog.resolve(marker) else {
            let err = ExperimentError::UnmappedMarker { marker };
            tracing::warn!(%err, "marker has no experiment");
            return CachedExperiment::unavailable(None, err);
        };
        let entry = entry.clone();

        let def = match self.source.load(id, &entry) {
            Ok(def) => def,
            Err(err) => {
                tracing::warn!(%err, experiment = %id, "experiment unavailable");
                return CachedExperiment::unavailable(Some(id), err);
            }
        };

        let outcome = if self.catalog.is_solvable(id) {
            ExperimentOutcome::Solved(solve(&def.circuit))
        } else {
            ExperimentOutcome::Informational(
                ExperimentError::UnsolvableExperimentKind { experiment: id }.to_string(),
            )
        };
        tracing::info!(
            experiment = %id,
            file = %entry.file,
            steps = def.steps.len(),
            "loaded experiment"
        );

        CachedExperiment {
            experiment: Some(id),
            definition: Some(Arc::new(def)),
            outcome,
            status: format!("Loaded: {}", entry.file),
        }
    }

    /// Move to the next step and apply it. Returns `false` when already at the last step or
    /// when nothing is bound.
    pub fn advance_step(&mut self) -> bool {
        let Some(def) = self.current_definition().cloned() else {
            return false;
        };
        let next = self.step_cursor.map_or(0, |c| c + 1);
        let Some(step) = def.steps.get(next) else {
            return false;
        };
        self.step_cursor = Some(next);
        tracing::debug!(step = next, total = def.steps.len(), "advance step");

        match step {
            ExperimentStep::ShowComponent { target, .. } => self.reveal(target),
            ExperimentStep::Connect { from, to, .. } => {
                self.connect(from.component(), to.component())
            }
            ExperimentStep::Info { .. } => {}
        }
        true
    }

    /// Back to "no step shown"; the bound marker and its cached experiment stay.
    pub fn reset_progress(&mut self) {
        tracing::debug!(marker = ?self.current_marker, "reset progress");
        self.clear_progress();
    }

    fn clear_progress(&mut self) {
        self.step_cursor = None;
        self.visible.clear();
        self.connections.clear();
    }

    fn reveal(&mut self, target: &str) {
        if self.is_visible(target) {
            return;
        }
        let kind = ComponentKind::classify(target);
        tracing::debug!(component = target, kind = ?kind, "reveal component");
        self.visible.push(VisibleComponent {
            id: target.to_string(),
            kind,
        });
    }

    fn connect(&mut self, from: &str, to: &str) {
        if !(self.is_visible(from) && self.is_visible(to)) {
            tracing::debug!(from, to, "connect step references a hidden component; dropped");
            return;
        }
        self.connections.push(Connection {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    pub fn is_visible(&self, component: &str) -> bool {
        self.visible.iter().any(|v| v.id == component)
    }

    /// Component placement for the current reveal state.
    pub fn layout(&self) -> Layout {
        let source = self
            .current_definition()
            .map(|d| d.circuit.source.name.as_str());
        compute_layout(
            self.visible.iter().map(|v| v.id.as_str()),
            &self.connections,
            source,
            &self.layout_params,
        )
    }

    pub fn current_marker(&self) -> Option<MarkerId> {
        self.current_marker
    }

    pub fn marker_in_view(&self) -> bool {
        self.marker_in_view
    }

    pub fn current_entry(&self) -> Option<&CachedExperiment> {
        self.current_marker.and_then(|m| self.cache.get(&m))
    }

    pub fn current_definition(&self) -> Option<&Arc<ExperimentDefinition>> {
        self.current_entry().and_then(|e| e.definition.as_ref())
    }

    pub fn current_outcome(&self) -> Option<&ExperimentOutcome> {
        self.current_entry().map(|e| &e.outcome)
    }

    /// Index of the last applied step; `None` before the first advance.
    pub fn step_cursor(&self) -> Option<usize> {
        self.step_cursor
    }

    pub fn current_step(&self) -> Option<&ExperimentStep> {
        let idx = self.step_cursor?;
        self.current_definition()?.step(idx)
    }

    pub fn step_count(&self) -> usize {
        self.current_definition().map_or(0, |d| d.steps.len())
    }

    pub fn visible_components(&self) -> &[VisibleComponent] {
        &self.visible
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn cached(&self, marker: MarkerId) -> Option<&CachedExperiment> {
        self.cache.get(&marker)
    }

    /// Number of definition loads attempted so far (one per distinct marker).
    pub fn load_count(&self) -> usize {
        self.load_count
    }

    /// Status line for the current frame.
    pub fn status(&self) -> &str {
        if !self.marker_in_view {
            return NO_MARKER_STATUS;
        }
        self.current_entry()
            .map_or(NO_MARKER_STATUS, |e| e.status.as_str())
    }

    pub fn layout_params(&self) -> &LayoutParams {
        &self.layout_params
    }

    pub fn catalog(&self) -> &ExperimentCatalog {
        &self.catalog
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/state.rs"]
mod tests;
