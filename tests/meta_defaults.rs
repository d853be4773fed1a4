use vatplay::vat::{VatMeta, VatParams, DEFAULT_Y_RESOLUTION};

#[test]
fn empty_record_takes_documented_defaults() {
    let meta: VatMeta = serde_json::from_str("{}").expect("parse");
    assert_eq!(meta.frames, 60);
    assert_eq!(meta.min, [-1.0, -1.0, -1.0]);
    assert_eq!(meta.max, [1.0, 1.0, 1.0]);
    assert!(meta.position.is_none());

    let params = VatParams::from_meta(&meta, None).expect("construct");
    assert_eq!(params.frame_count, 60);
    assert!((params.y_resolution - DEFAULT_Y_RESOLUTION).abs() < f32::EPSILON);
    assert!(params.offset.is_none());
}

#[test]
fn full_record_parses() {
    let json = r#"{
        "Frames": 120,
        "Min": [-3.5, -1.0, 0.0],
        "Max": [3.5, 1.0, 2.25],
        "Position": [0.0, 0.5, 0.0]
    }"#;
    let meta: VatMeta = serde_json::from_str(json).expect("parse");
    assert_eq!(meta.frames, 120);
    assert_eq!(meta.min[0], -3.5);
    assert_eq!(meta.max[2], 2.25);

    let params = VatParams::from_meta(&meta, Some(256)).expect("construct");
    assert_eq!(params.frame_count, 120);
    assert!((params.y_resolution - 256.0).abs() < f32::EPSILON);
    let offset = params.offset.expect("offset");
    assert!((offset.y - 0.5).abs() < f32::EPSILON);
}

#[test]
fn partial_record_mixes_fields_and_defaults() {
    let meta: VatMeta = serde_json::from_str(r#"{"Frames": 30}"#).expect("parse");
    assert_eq!(meta.frames, 30);
    assert_eq!(meta.min, [-1.0, -1.0, -1.0]);
    assert!(meta.position.is_none());
}

#[test]
fn zero_frames_is_a_load_error() {
    let meta: VatMeta = serde_json::from_str(r#"{"Frames": 0}"#).expect("parse");
    assert!(VatParams::from_meta(&meta, Some(512)).is_err());
}

#[test]
fn metadata_file_roundtrip() {
    let dir = std::env::temp_dir().join(format!("vatplay-meta-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("meta.json");
    std::fs::write(&path, r#"{"Frames": 48, "Max": [2.0, 2.0, 2.0]}"#).expect("write");

    let meta = vatplay::assets::load_vat_meta(&path).expect("load");
    assert_eq!(meta.frames, 48);
    assert_eq!(meta.max, [2.0, 2.0, 2.0]);
    assert_eq!(meta.min, [-1.0, -1.0, -1.0]);

    std::fs::remove_dir_all(&dir).ok();
}
