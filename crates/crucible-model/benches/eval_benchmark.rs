// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use crucible_model::table::{InstanceFormat, PseudoBooleanTable, Subfunction};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use smallvec::SmallVec;
use std::hint::black_box;

/// Builds a synthetic instance with `num_rows` random sub-functions of the
/// given arity over `num_variables` variables.
fn synthetic_table(
    rng: &mut ChaCha8Rng,
    num_variables: usize,
    arity: usize,
    num_rows: usize,
) -> PseudoBooleanTable {
    let index_count = arity + 1;
    let table_count = 1usize << index_count;

    let rows = (0..num_rows)
        .map(|_| {
            let indices: SmallVec<[usize; 8]> = (0..index_count)
                .map(|_| rng.random_range(0..num_variables))
                .collect();
            let table = (0..table_count).map(|_| rng.random::<f64>()).collect();
            Subfunction::new(indices, table)
        })
        .collect();

    PseudoBooleanTable::new(num_variables, 1_000_000, arity, InstanceFormat::Indexed, rows)
}

fn random_candidate(rng: &mut ChaCha8Rng, length: usize) -> Vec<bool> {
    (0..length).map(|_| rng.random_bool(0.5)).collect()
}

fn bench_evaluate(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut group = c.benchmark_group("table_evaluate");

    for &(num_variables, arity, num_rows) in
        &[(64usize, 2usize, 64usize), (128, 4, 256), (512, 4, 1024)]
    {
        let table = synthetic_table(&mut rng, num_variables, arity, num_rows);
        let candidate = random_candidate(&mut rng, num_variables);

        group.throughput(Throughput::Elements(num_rows as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("n{num_variables}_k{arity}_m{num_rows}")),
            &table,
            |b, table| {
                b.iter(|| black_box(table.evaluate(black_box(&candidate)).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
