use std::sync::Arc;

use chrono::Utc;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use cryptotasks_core::SessionKey;
use cryptotasks_infra::ledger::BalanceLedger;
use cryptotasks_infra::persistence::InMemoryGateway;
use cryptotasks_infra::visitors::VisitorRegistry;

fn bench_tap(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_tap");

    for threads in [1usize, 4, 8] {
        let taps_per_thread = 1_000;
        group.throughput(Throughput::Elements((threads * taps_per_thread) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            let ledger = BalanceLedger::open(Arc::new(InMemoryGateway::new()));
            let token = ledger.register("bench").unwrap();

            b.iter(|| {
                std::thread::scope(|s| {
                    for _ in 0..threads {
                        s.spawn(|| {
                            for _ in 0..taps_per_thread {
                                black_box(ledger.tap(&token).unwrap());
                            }
                        });
                    }
                });
            });
        });
    }

    group.finish();
}

fn bench_track_visit(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_track_visit");

    for live_sessions in [10usize, 100, 1_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(live_sessions),
            &live_sessions,
            |b, &live_sessions| {
                let registry = VisitorRegistry::default();
                let now = Utc::now();
                let keys: Vec<_> = (0..live_sessions)
                    .map(|i| {
                        SessionKey::new(format!("10.{}.{}.{}", i / 65536, (i / 256) % 256, i % 256))
                    })
                    .collect();
                for k in &keys {
                    registry.track_visit_at(k.clone(), now);
                }

                let mut i = 0;
                b.iter(|| {
                    registry.track_visit_at(keys[i % keys.len()].clone(), now);
                    i += 1;
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_tap, bench_track_visit);
criterion_main!(benches);
