use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use core_sim::{
    config::OrderFlowConfig, generators::seeded_rng, orders::OrderFlowSim, SimConfig, Simulator,
    SimulatorSet,
};
use runtime::DashboardStore;
use time::OffsetDateTime;

const BENCH_STEPS: u64 = 10_000;

fn bench_order_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_flow");
    group.throughput(Throughput::Elements(BENCH_STEPS));

    group.bench_function(BenchmarkId::new("tick", BENCH_STEPS), |b| {
        b.iter(|| {
            let now = OffsetDateTime::UNIX_EPOCH;
            let mut sim = OrderFlowSim::new(OrderFlowConfig::default(), seeded_rng(7), now);
            for _ in 0..BENCH_STEPS {
                let _ = sim.tick(now);
            }
        });
    });

    group.finish();
}

fn bench_slice_replace(c: &mut Criterion) {
    let now = OffsetDateTime::UNIX_EPOCH;
    let mut sims = SimulatorSet::new(&SimConfig::default(), Some(7), now);
    let (store, mut writers) = DashboardStore::new(&sims);
    let snapshot = sims.orders.tick(now);

    let mut group = c.benchmark_group("slice_replace");
    group.throughput(Throughput::Elements(BENCH_STEPS));

    group.bench_function(BenchmarkId::new("orders", BENCH_STEPS), |b| {
        b.iter(|| {
            for _ in 0..BENCH_STEPS {
                writers.orders.replace(snapshot.clone());
            }
        });
    });

    group.finish();
    drop(store);
}

criterion_group!(benches, bench_order_flow, bench_slice_replace);
criterion_main!(benches);
