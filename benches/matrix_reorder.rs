//! Benchmarks for matrix reordering performance
//!
//! Measures element swaps and full re-sorts on large, densely connected
//! matrices.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dsmscope::analysis::Analyzer;
use dsmscope::graph::{Dependable, DependencyGraph, Scope};
use dsmscope::matrix::{DependencyMatrix, MatrixOrdering};

/// Create a graph where every item depends on its next few neighbours
fn create_graph(items: usize, fan_out: usize) -> DependencyGraph {
    let mut graph = DependencyGraph::with_capacity(Scope::Classes, items, items * fan_out);
    // Reverse names so natural ordering has work to do
    for i in 0..items {
        let name = format!("Item{:05}", items - i);
        graph.add_item(Dependable::new(&name, format!("bench.{}", name), Scope::Classes));
    }
    for i in 0..items {
        for step in 1..=fan_out {
            let from = format!("bench.Item{:05}", items - i);
            let to = format!("bench.Item{:05}", items - (i + step) % items);
            graph.add_dependency(&from, &to, (step % 7 + 1) as u32);
        }
    }
    graph
}

fn create_matrix(items: usize) -> DependencyMatrix {
    let graph = create_graph(items, 4);
    let analysis = Analyzer::new().analyze(&graph);
    DependencyMatrix::new(graph, analysis, MatrixOrdering::Instability)
}

/// Benchmark a single element swap
fn bench_swap(c: &mut Criterion) {
    let mut group = c.benchmark_group("swap_elements");

    for size in [100, 500, 1000] {
        let mut matrix = create_matrix(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                matrix
                    .swap_elements(black_box(0), black_box(size - 1))
                    .unwrap();
            });
        });
    }

    group.finish();
}

/// Benchmark natural re-sort from the default layout
fn bench_natural_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_natural");
    group.sample_size(20);

    for size in [100, 500] {
        let matrix = create_matrix(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &matrix, |b, matrix| {
            b.iter(|| {
                let mut matrix = matrix.clone();
                matrix.sort(black_box(MatrixOrdering::Natural));
                matrix
            });
        });
    }

    group.finish();
}

/// Benchmark building a matrix from a graph
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    group.sample_size(20);

    for size in [100, 500] {
        let graph = create_graph(size, 4);
        let analysis = Analyzer::new().analyze(&graph);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                DependencyMatrix::new(
                    black_box(graph.clone()),
                    black_box(analysis.clone()),
                    MatrixOrdering::Instability,
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_swap, bench_natural_sort, bench_build);
criterion_main!(benches);
