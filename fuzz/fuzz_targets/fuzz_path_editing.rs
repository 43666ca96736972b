//! Fuzzt beliebige Editier-Folgen gegen die beiden globalen Invarianten:
//! Sample-Anzahl == NumSegments * pps und die Handle-Anzahl-Regel.

#![no_main]

use bezier_track_editor::BezierPath;
use glam::Vec3;
use libfuzzer_sys::fuzz_target;

fn assert_invariants(path: &BezierPath) {
    assert_eq!(
        path.points().len(),
        path.num_segments() * path.points_per_segment()
    );
    let expected = if path.is_loop() {
        3 * path.num_segments()
    } else {
        3 * path.num_segments() + 1
    };
    assert_eq!(path.num_handles(), expected);
    assert!(path.num_segments() >= 1);
}

fuzz_target!(|data: &[u8]| {
    let mut path = BezierPath::new(Vec3::ZERO);

    for chunk in data.chunks_exact(4).take(64) {
        let arg = chunk[1] as usize;
        let pos = Vec3::new(
            chunk[2] as f32 - 128.0,
            chunk[3] as f32 - 128.0,
            arg as f32 - 128.0,
        );

        match chunk[0] % 8 {
            0 => {
                let _ = path.add_segment(pos);
            }
            1 => {
                let segment = arg % path.num_segments();
                let _ = path.split_segment(pos, segment);
            }
            2 => {
                let mut anchor = arg % path.num_handles();
                anchor -= anchor % 3;
                let _ = path.delete_segment(anchor);
            }
            3 => {
                let handle = arg % path.num_handles();
                let _ = path.move_point(handle, pos);
            }
            4 => path.set_loop(arg % 2 == 0),
            5 => path.set_smooth(arg % 2 == 0),
            6 => {
                let _ = path.set_points_per_segment(1 + arg % 32);
            }
            _ => path.flatten(),
        }

        assert_invariants(&path);
    }
});
