use super::*;

#[test]
fn default_table_matches_marker_ids() {
    let cat = ExperimentCatalog::default();
    assert_eq!(cat.experiments.len(), 8);
    let (id, entry) = cat.resolve(MarkerId(3)).unwrap();
    assert_eq!(id, ExperimentId(3));
    assert_eq!(entry.file, "exp4_led.json");
    assert!(cat.resolve(MarkerId(8)).is_none());
    cat.validate().unwrap();
}

#[test]
fn solvable_whitelist_is_0_1_3_4() {
    let cat = ExperimentCatalog::default();
    let solvable: Vec<u32> = (0..8)
        .filter(|&i| cat.is_solvable(ExperimentId(i)))
        .collect();
    assert_eq!(solvable, [0, 1, 3, 4]);
    assert!(!cat.is_solvable(ExperimentId(42)));
}

#[test]
fn explicit_marker_mapping_overrides_identity() {
    let mut cat = ExperimentCatalog::default();
    cat.markers.insert(MarkerId(17), ExperimentId(2));
    let (id, entry) = cat.resolve(MarkerId(17)).unwrap();
    assert_eq!(id, ExperimentId(2));
    assert_eq!(entry.file, "exp3_parallel.json");
}

#[test]
fn validate_rejects_dangling_marker_and_duplicate_files() {
    let mut cat = ExperimentCatalog::default();
    cat.markers.insert(MarkerId(1), ExperimentId(99));
    assert!(cat.validate().is_err());

    let mut cat = ExperimentCatalog::default();
    cat.experiments.insert(
        ExperimentId(9),
        CatalogEntry {
            file: "exp1_ohm.json".to_string(),
            solvable: true,
        },
    );
    assert!(cat.validate().is_err());
}

#[test]
fn catalog_round_trips_through_json_with_numeric_keys() {
    let json = r#"{
        "markers": {"23": 0},
        "experiments": {"0": {"file": "a.json", "solvable": true}}
    }"#;
    let cat: ExperimentCatalog = serde_json::from_str(json).unwrap();
    assert_eq!(cat.resolve(MarkerId(23)).unwrap().1.file, "a.json");
    assert!(cat.resolve(MarkerId(1)).is_none());
}

#[test]
fn status_messages_are_user_facing() {
    assert_eq!(
        ExperimentError::UnmappedMarker {
            marker: MarkerId(9)
        }
        .to_string(),
        "No experiment mapped to ID 9"
    );
    assert_eq!(
        ExperimentError::MissingDefinitionFile {
            path: PathBuf::from("experiments/exp6_rc.json")
        }
        .to_string(),
        "File missing: experiments/exp6_rc.json"
    );
}

#[test]
fn fs_source_reports_missing_file() {
    let mut src = FsDefinitionSource::new("no/such/dir");
    let entry = CatalogEntry {
        file: "x.json".to_string(),
        solvable: true,
    };
    let err = src.load(ExperimentId(0), &entry).unwrap_err();
    assert!(matches!(err, ExperimentError::MissingDefinitionFile { .. }));
}
