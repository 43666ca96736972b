//! Roundtrip-Tests für die Persistenz-Form: `PathData` über serde_json
//! serialisieren, deserialisieren und den Pfad deterministisch neu aufbauen.

use bezier_track_editor::{BezierPath, PathData};
use glam::Vec3;

fn edited_path() -> BezierPath {
    let mut path = BezierPath::new(Vec3::new(10.0, 0.0, -3.0));
    path.add_segment(Vec3::new(14.0, 1.0, -1.0)).unwrap();
    path.add_segment(Vec3::new(18.0, 0.0, 2.0)).unwrap();
    path.split_segment(Vec3::new(12.0, 0.5, 0.0), 1).unwrap();
    path.move_point(3, Vec3::new(13.0, 0.0, -2.0)).unwrap();
    path.set_points_per_segment(12).unwrap();
    path
}

#[test]
fn test_json_roundtrip_open_path() {
    let path = edited_path();

    let json = serde_json::to_string(&path.to_data()).expect("Serialisierung");
    let data: PathData = serde_json::from_str(&json).expect("Deserialisierung");
    let rebuilt = BezierPath::from_data(data).expect("Aufbau aus Persistenz-Form");

    assert_eq!(rebuilt, path, "Handles und Sample-Sequenz muessen exakt uebereinstimmen");
}

#[test]
fn test_json_roundtrip_smooth_loop() {
    let mut path = edited_path();
    path.set_smooth(true);
    path.set_loop(true);

    let json = serde_json::to_string(&path.to_data()).expect("Serialisierung");
    let data: PathData = serde_json::from_str(&json).expect("Deserialisierung");
    let rebuilt = BezierPath::from_data(data).expect("Aufbau aus Persistenz-Form");

    assert_eq!(rebuilt.num_segments(), path.num_segments());
    assert!(rebuilt.is_loop());
    assert!(rebuilt.is_smooth());
    assert_eq!(rebuilt, path);
}

#[test]
fn test_data_omits_derived_points() {
    let path = edited_path();
    let json = serde_json::to_string(&path.to_data()).expect("Serialisierung");

    // Die abgeleitete Sample-Sequenz gehört nicht in die Persistenz-Form
    assert!(!json.contains("segment_points"));
    assert!(json.contains("handles"));
    assert!(json.contains("points_per_segment"));
}

#[test]
fn test_from_data_validates_before_building() {
    let data = PathData {
        handles: vec![Vec3::ZERO; 4],
        points_per_segment: 0,
        is_loop: false,
        is_smooth: false,
    };
    assert!(BezierPath::from_data(data).is_err());

    // 4 Handles sind fuer einen Loop ungueltig (3N-Regel)
    let data = PathData {
        handles: vec![Vec3::ZERO; 4],
        points_per_segment: 20,
        is_loop: true,
        is_smooth: false,
    };
    assert!(BezierPath::from_data(data).is_err());
}
