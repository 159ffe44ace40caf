//! Criterion benchmarks for the network engine and the genetic algorithm.
//!
//! Covers the forward pass, one backpropagation step and one GA generation
//! over a population of small networks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use routed_evo::ga::{Fitness, GaConfig, GeneticAlgorithm};
use routed_evo::network::{Activation, Network};

fn dense(inputs: usize, outputs: usize, width: usize, hidden: usize, seed: u64) -> Network {
    let mut net = Network::new(inputs, outputs, width).with_seed(seed);
    net.add_hidden_layers(hidden);
    net.set_random_weights(-1, 1);
    net.set_activations(Activation::Sigmoid);
    net
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("forward");

    for (width, hidden) in [(8usize, 1usize), (32, 2), (64, 3)] {
        let mut net = dense(8, 4, width, hidden, 42);
        let inputs = vec![0.5; 8];
        group.bench_with_input(
            BenchmarkId::new(format!("w{}_h{}", width, hidden), width),
            &inputs,
            |b, inputs| b.iter(|| black_box(net.evaluate(black_box(inputs)))),
        );
    }
    group.finish();
}

fn bench_backprop(c: &mut Criterion) {
    let mut group = c.benchmark_group("backprop");

    for (width, hidden) in [(8usize, 1usize), (32, 2)] {
        let mut net = dense(8, 4, width, hidden, 7);
        let inputs = vec![0.25; 8];
        let targets = vec![0.75; 4];
        group.bench_with_input(
            BenchmarkId::new(format!("w{}_h{}", width, hidden), width),
            &(inputs, targets),
            |b, (inputs, targets)| {
                b.iter(|| {
                    net.set_inputs(inputs).ok();
                    black_box(net.propagate_error(black_box(targets)))
                })
            },
        );
    }
    group.finish();
}

fn score(net: &mut Network) -> Fitness {
    match net.evaluate(&[1.0]) {
        Ok(out) if out[0].is_finite() => (100.0 - (100.0 - out[0]).abs()).max(0.0) as Fitness,
        _ => -1,
    }
}

fn bench_ga_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_generation");
    group.sample_size(10);

    for pop in [50usize, 200] {
        let config = GaConfig::default().with_hall_of_fame_size(2).with_seed(42);
        let mut ga = match GeneticAlgorithm::new(score, config) {
            Ok(ga) => ga,
            Err(e) => panic!("bad config: {e}"),
        };
        for seed in 0..pop as u64 {
            let mut net = dense(1, 1, 4, 1, seed);
            net.set_random_weights(-50, 50);
            net.set_activations(Activation::Identity);
            ga.add_network(net).ok();
        }
        group.bench_function(BenchmarkId::from_parameter(pop), |b| {
            b.iter(|| black_box(ga.next_generation()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_forward, bench_backprop, bench_ga_generation);
criterion_main!(benches);
