use std::{cell::Cell, rc::Rc};

use super::*;
use crate::{
    circuit::components::{Led, Resistor, VoltageSource},
    circuit::series::SeriesCircuit,
    experiment::catalog::{CatalogEntry, MemoryDefinitionSource},
};

fn led_experiment() -> ExperimentDefinition {
    let circuit = SeriesCircuit::new(VoltageSource::new("V1", 5.0))
        .with_resistor(Resistor::new("R1", 220.0))
        .with_led(Led::new("LED1", 2.0, 0.02));
    ExperimentDefinition::new(
        circuit,
        vec![
            ExperimentStep::show("V1"),
            ExperimentStep::connect("V1.+", "R1.1"),
            ExperimentStep::show("R1"),
            ExperimentStep::connect("V1.+", "R1.1"),
            ExperimentStep::show("LED1"),
            ExperimentStep::show("R1"),
            ExperimentStep::connect("R1.2", "LED1.a"),
            ExperimentStep::info("observe", "Check the LED"),
        ],
    )
}

/// Wraps a source and counts how often it is asked for a definition.
struct CountingSource {
    inner: MemoryDefinitionSource,
    calls: Rc<Cell<usize>>,
}

impl DefinitionSource for CountingSource {
    fn load(
        &mut self,
        experiment: ExperimentId,
        entry: &CatalogEntry,
    ) -> Result<ExperimentDefinition, ExperimentError> {
        self.calls.set(self.calls.get() + 1);
        self.inner.load(experiment, entry)
    }
}

fn session_with_calls() -> (ExperimentSession, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let source = CountingSource {
        inner: MemoryDefinitionSource::new()
            .with(ExperimentId(0), led_experiment())
            .with(ExperimentId(2), led_experiment()),
        calls: Rc::clone(&calls),
    };
    let session = ExperimentSession::new(
        ExperimentCatalog::default(),
        Box::new(source),
        LayoutParams::default(),
    );
    (session, calls)
}

fn session() -> ExperimentSession {
    session_with_calls().0
}

fn visible_ids(s: &ExperimentSession) -> Vec<&str> {
    s.visible_components().iter().map(|v| v.id.as_str()).collect()
}

#[test]
fn starts_unbound() {
    let mut s = session();
    assert_eq!(s.current_marker(), None);
    assert_eq!(s.status(), NO_MARKER_STATUS);
    assert!(!s.advance_step());
    assert_eq!(s.step_cursor(), None);
    assert!(s.layout().is_empty());
}

#[test]
fn observe_binds_and_solves_whitelisted_kind() {
    let mut s = session();
    assert!(s.observe(MarkerId(0)));
    assert_eq!(s.current_marker(), Some(MarkerId(0)));
    assert_eq!(s.status(), "Loaded: exp1_ohm.json");
    let result = s.current_outcome().and_then(ExperimentOutcome::solved).unwrap();
    assert!((result.current - 3.0 / 220.0).abs() < 1e-12);
    assert_eq!(s.step_count(), 8);
}

#[test]
fn non_series_kind_is_informational() {
    let mut s = session();
    s.observe(MarkerId(2));
    let entry = s.current_entry().unwrap();
    assert!(entry.definition.is_some());
    assert!(matches!(entry.outcome, ExperimentOutcome::Informational(_)));
    assert_eq!(entry.status, "Loaded: exp3_parallel.json");
}

#[test]
fn reobserving_same_marker_keeps_progress() {
    let mut s = session();
    s.observe(MarkerId(0));
    s.advance_step();
    s.advance_step();
    s.advance_step();
    let cursor = s.step_cursor();
    let visible = s.visible_components().to_vec();
    let wires = s.connections().to_vec();

    assert!(!s.observe(MarkerId(0)));
    assert!(!s.observe_frame(&[MarkerId(0), MarkerId(2)]));

    assert_eq!(s.step_cursor(), cursor);
    assert_eq!(s.visible_components(), visible.as_slice());
    assert_eq!(s.connections(), wires.as_slice());
}

#[test]
fn steps_reveal_and_wire_in_order() {
    let mut s = session();
    s.observe(MarkerId(0));

    assert!(s.advance_step());
    assert_eq!(visible_ids(&s), ["V1"]);
    assert_eq!(s.visible_components()[0].kind, Some(ComponentKind::Prefix('V')));

    // R1 is not visible yet: the wire is dropped.
    assert!(s.advance_step());
    assert!(s.connections().is_empty());

    s.advance_step();
    s.advance_step();
    assert_eq!(
        s.connections(),
        [Connection {
            from: "V1".to_string(),
            to: "R1".to_string()
        }]
    );

    s.advance_step();
    // Revealing R1 a second time does not duplicate it.
    s.advance_step();
    assert_eq!(visible_ids(&s), ["V1", "R1", "LED1"]);
    assert_eq!(s.visible_components()[2].kind, Some(ComponentKind::Led));

    s.advance_step();
    assert_eq!(s.connections().len(), 2);
    assert_eq!(s.connections()[1].to, "LED1");

    for (from, to) in s.connections().iter().map(|c| (&c.from, &c.to)) {
        assert!(s.is_visible(from) && s.is_visible(to));
    }
}

#[test]
fn advance_clamps_at_last_step() {
    let mut s = session();
    s.observe(MarkerId(0));
    let n = s.step_count();
    for _ in 0..n {
        assert!(s.advance_step());
    }
    assert!(!s.advance_step());
    assert_eq!(s.step_cursor(), Some(n - 1));
    assert_eq!(
        s.current_step(),
        Some(&ExperimentStep::info("observe", "Check the LED"))
    );
}

#[test]
fn reset_keeps_binding() {
    let mut s = session();
    s.observe(MarkerId(0));
    s.advance_step();
    s.advance_step();
    s.reset_progress();
    assert_eq!(s.step_cursor(), None);
    assert!(s.visible_components().is_empty());
    assert!(s.connections().is_empty());
    assert_eq!(s.current_marker(), Some(MarkerId(0)));
    assert!(s.current_definition().is_some());
    assert!(s.advance_step());
    assert_eq!(s.step_cursor(), Some(0));
}

#[test]
fn switching_markers_clears_progress_and_loads_once() {
    let (mut s, calls) = session_with_calls();
    s.observe(MarkerId(0));
    s.advance_step();
    assert!(s.observe(MarkerId(2)));
    assert_eq!(s.step_cursor(), None);
    assert!(s.visible_components().is_empty());

    for _ in 0..5 {
        s.observe(MarkerId(0));
        s.observe(MarkerId(2));
    }
    assert_eq!(calls.get(), 2);
    assert_eq!(s.load_count(), 2);
}

#[test]
fn unmapped_marker_is_cached_without_loading() {
    let (mut s, calls) = session_with_calls();
    s.observe(MarkerId(40));
    assert_eq!(s.status(), "No experiment mapped to ID 40");
    assert!(s.current_definition().is_none());
    assert!(!s.advance_step());

    s.observe(MarkerId(0));
    s.observe(MarkerId(40));
    assert_eq!(calls.get(), 1);
    assert_eq!(s.load_count(), 2);
    let entry = s.cached(MarkerId(40)).unwrap();
    assert!(matches!(
        entry.outcome,
        ExperimentOutcome::Unavailable(ExperimentError::UnmappedMarker { .. })
    ));
}

#[test]
fn missing_definition_degrades_to_status() {
    let mut s = session();
    s.observe(MarkerId(5));
    assert_eq!(s.status(), "File missing: exp6_rc.json");
    assert!(s.visible_components().is_empty());
    assert!(!s.advance_step());
}

#[test]
fn empty_frame_keeps_binding_but_reports_no_marker() {
    let mut s = session();
    s.observe(MarkerId(0));
    s.advance_step();
    assert!(!s.observe_frame(&[]));
    assert!(!s.marker_in_view());
    assert_eq!(s.status(), NO_MARKER_STATUS);
    assert_eq!(s.current_marker(), Some(MarkerId(0)));
    assert_eq!(s.step_cursor(), Some(0));

    s.observe_frame(&[MarkerId(0)]);
    assert_eq!(s.status(), "Loaded: exp1_ohm.json");
    assert_eq!(s.step_cursor(), Some(0));
}

#[test]
fn layout_places_revealed_components() {
    let mut s = session();
    s.observe(MarkerId(0));
    for _ in 0..4 {
        s.advance_step();
    }
    let layout = s.layout();
    let p = s.layout_params();
    assert_eq!(layout.slots.len(), 2);
    assert_eq!(layout.position("V1").unwrap().x, p.origin_x);
    // R1 is the first branch off the source.
    assert_eq!(
        layout.position("R1").unwrap().y,
        p.baseline_y - p.branch_offset_y
    );
}
