//! # Pure Pursuit Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use nalgebra::Vector2;
use pursuit_lib::{
    loc::Pose,
    path::Path,
    pure_pursuit::{wcs_to_rcs, Params, PursuitCtrl, PursuitGeometry},
    pursuit_mgr::PursuitMgr,
    sim_client::SimRobot,
};
use util::module::State;

fn pure_pursuit_benchmark(c: &mut Criterion) {
    // ---- Build a test path ----

    // Figure of eight of 1000 points
    let points: Vec<(f64, f64)> = (0..1000)
        .map(|i| {
            let t = i as f64 * 2.0 * std::f64::consts::PI / 1000.0;
            (4.0 * t.sin(), 2.0 * (2.0 * t).sin())
        })
        .collect();
    let path = Path::from_xy(&points);

    let params = Params {
        look_ahead_m: 0.7,
        cycle_period_s: 0.0,
    };

    // ---- Benchmarks ----

    c.bench_function("goal geometry", |b| {
        let pose = Pose::new(0.3, -0.2, 0.4);
        let goal = Vector2::new(1.5, 0.8);

        b.iter(|| {
            let goal_rcs = wcs_to_rcs(&pose.position_m, black_box(&goal), pose.heading_rad);
            PursuitGeometry::from_rcs(&goal_rcs, params.look_ahead_m)
        })
    });

    c.bench_function("walk path", |b| {
        let pose = Pose::new(-10.0, 0.0, 0.0);

        b.iter(|| {
            let mut ctrl = PursuitCtrl::new(params.clone()).unwrap();
            ctrl.begin_path(path.clone()).unwrap();

            while ctrl.has_pending_points() {
                black_box(ctrl.proc(&pose).unwrap());
            }
        })
    });

    c.bench_function("simulated run", |b| {
        b.iter(|| {
            let robot = SimRobot::new(Pose::default(), 0.2);
            let ctrl = PursuitCtrl::new(params.clone()).unwrap();

            PursuitMgr::new(ctrl, path.clone(), robot.pose_source(), robot.actuator())
                .unwrap()
                .run()
                .unwrap()
        })
    });
}

criterion_group!(benches, pure_pursuit_benchmark);
criterion_main!(benches);
