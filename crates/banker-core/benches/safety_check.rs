//! Criterion micro-benchmarks for the safety scan.

use std::hint::black_box;

use banker_core::{safe_sequence, AllocationState, ResourceVector};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

/// A safe state that forces the worst-case scan: consumer `i` needs
/// `consumers - i` of each class, so only the last unfinished consumer
/// ever fits and every pass walks the whole table.
fn staircase(consumers: u32, classes: usize) -> AllocationState {
    let available = ResourceVector::from(vec![1; classes]);
    let maximum: Vec<ResourceVector> = (0..consumers)
        .map(|i| ResourceVector::from(vec![consumers - i + 1; classes]))
        .collect();
    let allocation = vec![ResourceVector::from(vec![1; classes]); consumers as usize];
    AllocationState::with_allocation(available, maximum, allocation)
        .expect("staircase fixture is well-formed")
}

fn bench_safety(c: &mut Criterion) {
    let mut group = c.benchmark_group("safe_sequence");
    for consumers in [4u32, 16, 64] {
        let state = staircase(consumers, 4);
        group.bench_with_input(
            BenchmarkId::from_parameter(consumers),
            &state,
            |b, state| {
                b.iter(|| {
                    black_box(safe_sequence(
                        state.available(),
                        state.allocation_matrix(),
                        state.need_matrix(),
                    ))
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_safety);
criterion_main!(benches);
