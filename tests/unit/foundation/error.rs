use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CircuitarError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(CircuitarError::load("x").to_string().contains("load error:"));
    assert!(
        CircuitarError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        CircuitarError::composite("x")
            .to_string()
            .contains("composite error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CircuitarError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde_variant() {
    let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = CircuitarError::from(err);
    assert!(matches!(err, CircuitarError::Serde(_)));
}
