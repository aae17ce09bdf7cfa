use criterion::{criterion_group, criterion_main, Criterion};
use oncoranges::{prelude::*, test_utilities::random_cohort};

const NSAMPLES: usize = 20;
const NSEGMENTS: usize = 200;
const NGENES: usize = 20_000;

fn bench_gene_matrix(c: &mut Criterion) {
    // create the benchmark group
    let mut group = c.benchmark_group("gene_matrix");

    // create the test data
    let (segments, genes) = random_cohort(NSAMPLES, NSEGMENTS, NGENES);

    // configure the sample size for the group
    group.sample_size(10);

    for policy in [
        AggregationPolicy::Weighted,
        AggregationPolicy::Mean,
        AggregationPolicy::Closest,
    ] {
        let config = GeneMatrixConfig::new(policy);
        group.bench_function(policy.to_string(), |b| {
            b.iter(|| {
                let matrix = to_gene_matrix(&segments, &genes, &config).unwrap();
                matrix.nrows()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_gene_matrix);
criterion_main!(benches);
