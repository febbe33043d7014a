use cgmath::{Point3, Vector3};
use criterion::{Criterion, criterion_group, criterion_main};
use orrery::{GravityLaw, ObjectInfo, PlanarDirectSim, Simulation, SimulationImpl};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn gen_random(count: usize) -> (Vec<ObjectInfo>, Vec<Vector3<f64>>) {
    let mut rng = StdRng::seed_from_u64(42);
    let mut objs = Vec::new();
    for _ in 0..count {
        objs.push(ObjectInfo {
            pos: Point3::new(rng.random_range(-1e2..1e2), 0.0, rng.random_range(-1e2..1e2)),
            vel: Vector3::new(rng.random_range(-1.0..1.0), 0.0, rng.random_range(-1.0..1.0)),
            mass: rng.random_range(1.0..100.0),
        });
    }

    let out_buffer = vec![Vector3::<f64>::new(0.0, 0.0, 0.0); objs.len()];

    (objs, out_buffer)
}

fn bench_direct_random(c: &mut Criterion) {
    let (objs, mut out_buffer) = gen_random(1000);

    c.bench_function("direct_forces_1k", |b| {
        b.iter(|| {
            let mut sim = PlanarDirectSim::new(GravityLaw::default());
            sim.iter_single_threaded(&objs, &mut out_buffer);
        })
    });
}

fn bench_direct_random_par(c: &mut Criterion) {
    let (objs, mut out_buffer) = gen_random(1000);

    c.bench_function("direct_forces_1k_par", |b| {
        b.iter(|| {
            let mut sim = PlanarDirectSim::new(GravityLaw::default());
            sim.iter(&objs, &mut out_buffer);
        })
    });
}

fn bench_step_small(c: &mut Criterion) {
    let (objs, _) = gen_random(8);
    let mut sim = Simulation::planar(objs, GravityLaw::default(), 0.01);

    c.bench_function("step_8", |b| b.iter(|| sim.exec_iter()));
}

criterion_group!(
    benches,
    bench_direct_random,
    bench_direct_random_par,
    bench_step_small
);
criterion_main!(benches);
