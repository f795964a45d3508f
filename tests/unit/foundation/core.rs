use super::*;

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert_eq!(Canvas::new(4, 3).unwrap().width, 4);
}

#[test]
fn canvas_contains_rect_is_inclusive_of_edges() {
    let canvas = Canvas::new(100, 50).unwrap();
    assert!(canvas.contains_rect(Rect::new(0.0, 0.0, 100.0, 50.0)));
    assert!(!canvas.contains_rect(Rect::new(-1.0, 0.0, 10.0, 10.0)));
    assert!(!canvas.contains_rect(Rect::new(95.0, 0.0, 101.0, 10.0)));
}

#[test]
fn rgba8_premul_scales_channels() {
    assert_eq!(Rgba8::opaque(10, 20, 30).to_premul(), [10, 20, 30, 255]);
    let half = Rgba8 {
        r: 200,
        g: 100,
        b: 0,
        a: 128,
    };
    assert_eq!(half.to_premul(), [100, 50, 0, 128]);
}

#[test]
fn ids_serialize_as_plain_numbers() {
    assert_eq!(serde_json::to_string(&MarkerId(3)).unwrap(), "3");
    let id: ExperimentId = serde_json::from_str("7").unwrap();
    assert_eq!(id, ExperimentId(7));
}
