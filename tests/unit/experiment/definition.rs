use super::*;

const OHM: &str = r#"{
    "name": "Ohm's law",
    "source": {"name": "V1", "voltage": 5},
    "resistors": [{"name": "R1", "resistance": 1000}],
    "steps": [
        {"action": "show_component", "target": "V1"},
        {"action": "show_component", "target": "R1"},
        {"action": "connect", "from": "V1.+", "to": "R1.1"}
    ]
}"#;

#[test]
fn parses_flat_circuit_and_steps() {
    let def = ExperimentDefinition::from_json_str(OHM).unwrap();
    assert_eq!(def.title(), "Ohm's law");
    assert_eq!(def.circuit.source.voltage, 5.0);
    assert_eq!(def.circuit.resistors[0].resistance, 1000.0);
    assert!(def.circuit.leds.is_empty());
    assert_eq!(def.steps.len(), 3);
    assert_eq!(def.step(2), Some(&ExperimentStep::connect("V1.+", "R1.1")));
    assert_eq!(def.step(3), None);
}

#[test]
fn optional_sections_default_to_empty() {
    let def =
        ExperimentDefinition::from_json_str(r#"{"source": {"name": "V1", "voltage": 3.3}}"#)
            .unwrap();
    assert!(def.steps.is_empty());
    assert!(def.circuit.resistors.is_empty());
    assert_eq!(def.title(), "V1");
}

#[test]
fn missing_source_is_a_serde_error() {
    let err = ExperimentDefinition::from_json_str(r#"{"resistors": []}"#).unwrap_err();
    assert!(matches!(err, CircuitarError::Serde(_)));
}

#[test]
fn duplicate_ids_fail_validation() {
    let err = ExperimentDefinition::from_json_str(
        r#"{"source": {"name": "R1", "voltage": 5}, "resistors": [{"name": "R1", "resistance": 10}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, CircuitarError::Validation(_)));
}

#[test]
fn bad_step_reports_its_index() {
    let err = ExperimentDefinition::from_json_str(
        r#"{"source": {"name": "V1", "voltage": 5}, "steps": [{"action": "show_component", "target": ""}]}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("step 0"));
}

#[test]
fn missing_file_is_a_wrapped_io_error() {
    let err = ExperimentDefinition::from_json_path(Path::new("does/not/exist.json")).unwrap_err();
    assert!(matches!(err, CircuitarError::Other(_)));
}
