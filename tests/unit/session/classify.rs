use super::*;

#[test]
fn named_prefixes_map_to_families() {
    assert_eq!(ComponentKind::classify("LED1"), Some(ComponentKind::Led));
    assert_eq!(ComponentKind::classify("GND"), Some(ComponentKind::Ground));
    assert_eq!(ComponentKind::classify("Q1"), Some(ComponentKind::Transistor));
    assert_eq!(ComponentKind::classify("D2"), Some(ComponentKind::Diode));
    assert_eq!(ComponentKind::classify("C1"), Some(ComponentKind::Capacitor));
    assert_eq!(ComponentKind::classify("GPIO4"), Some(ComponentKind::Gpio));
}

#[test]
fn other_ids_use_first_character() {
    assert_eq!(ComponentKind::classify("V1"), Some(ComponentKind::Prefix('V')));
    assert_eq!(ComponentKind::classify("R12"), Some(ComponentKind::Prefix('R')));
    assert_eq!(ComponentKind::classify("L"), Some(ComponentKind::Prefix('L')));
    assert_eq!(ComponentKind::classify(""), None);
}

#[test]
fn tags_match_asset_names() {
    let tags: Vec<String> = ["V1", "R1", "LED1", "C1", "D1", "Q1", "GND", "GPIO2"]
        .iter()
        .filter_map(|id| ComponentKind::classify(id))
        .map(ComponentKind::tag)
        .collect();
    assert_eq!(tags, ["V", "R", "LED", "C", "D", "Q", "GND", "GPIO"]);
}
