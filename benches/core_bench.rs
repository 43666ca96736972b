use bezier_track_editor::{polyline_length, BezierPath, FollowerConfig, PathFollower};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use std::hint::black_box;

/// Offener Pfad mit `segments` Segmenten entlang einer leichten S-Kurve.
fn build_path(segments: usize) -> BezierPath {
    let mut path = BezierPath::new(Vec3::ZERO);
    for i in 1..segments {
        let x = 2.0 + i as f32 * 2.0;
        let z = if i % 2 == 0 { 1.5 } else { -1.5 };
        path.add_segment(Vec3::new(x, 0.0, z)).expect("offener Pfad");
    }
    path
}

fn bench_move_point(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_point");

    for &segments in &[16usize, 256usize] {
        group.bench_with_input(
            BenchmarkId::new("anchor_hotpath", segments),
            &segments,
            |b, &segments| {
                let mut path = build_path(segments);
                let anchor = (segments / 2) * 3;
                let base = path.handle(anchor as isize);
                let mut toggle = 0.0f32;
                b.iter(|| {
                    toggle = 1.0 - toggle;
                    path.move_point(anchor, base + Vec3::new(0.0, 0.0, toggle))
                        .expect("gueltiger Anker");
                    black_box(path.points().len())
                })
            },
        );
    }

    group.finish();
}

fn bench_full_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_resample");

    for &segments in &[16usize, 256usize] {
        group.bench_with_input(
            BenchmarkId::new("set_points_per_segment", segments),
            &segments,
            |b, &segments| {
                let mut path = build_path(segments);
                let mut pps = 20usize;
                b.iter(|| {
                    pps = if pps == 20 { 21 } else { 20 };
                    path.set_points_per_segment(pps).expect("pps > 0");
                    black_box(polyline_length(path.points()))
                })
            },
        );
    }

    group.finish();
}

fn bench_smooth_all(c: &mut Criterion) {
    let path = build_path(256);

    c.bench_function("smooth_all_256_segments", |b| {
        b.iter(|| {
            let mut p = path.clone();
            p.set_smooth(true);
            black_box(p.points().len())
        })
    });
}

fn bench_follower_step(c: &mut Criterion) {
    let mut path = build_path(64);
    path.set_loop(true);
    let mut follower = PathFollower::new(FollowerConfig::default());

    c.bench_function("follower_update", |b| {
        b.iter(|| {
            let target = follower.target(&path);
            let cmd = follower.update(
                black_box(&path),
                target + Vec3::new(0.5, 0.0, 0.5),
                Vec3::X,
                10.0,
                0.02,
            );
            black_box(cmd.steer_angle_deg)
        })
    });
}

criterion_group!(
    benches,
    bench_move_point,
    bench_full_resample,
    bench_smooth_all,
    bench_follower_step
);
criterion_main!(benches);
