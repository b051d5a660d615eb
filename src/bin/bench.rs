//! Performance benchmarks for huffpack compression.
//!
//! Measures sub-stream compression and decompression throughput over
//! synthetic inputs. Use for relative comparisons between builds.
//!
//! Usage:
//!   cargo run --release --bin bench          # Run with default 20 iterations
//!   cargo run --release --bin bench -- 100   # Run with custom iteration count

#![allow(clippy::cast_precision_loss)]

use huffpack::{compress, decompress};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::env;
use std::time::Instant;

const DEFAULT_ITERATIONS: usize = 20;
const INPUT_SIZE: usize = 1 << 20;

const TEXT: &[u8] = b"It is a truth universally acknowledged, that a single man in \
possession of a good fortune, must be in want of a wife. However little known the \
feelings or views of such a man may be on his first entering a neighbourhood, this \
truth is so well fixed in the minds of the surrounding families.\n";

struct BenchConfig {
    name: &'static str,
    generate: fn(usize) -> Vec<u8>,
}

const BENCHMARKS: &[BenchConfig] = &[
    BenchConfig {
        name: "uniform",
        generate: uniform,
    },
    BenchConfig {
        name: "text",
        generate: text,
    },
    BenchConfig {
        name: "skewed",
        generate: skewed,
    },
    BenchConfig {
        name: "single-symbol",
        generate: single_symbol,
    },
];

/// Fixed seed so every run sees the same bytes.
const SEED: u64 = 0x9E37_79B9_7F4A_7C15;

fn uniform(len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..len).map(|_| rng.gen::<u8>()).collect()
}

fn text(len: usize) -> Vec<u8> {
    TEXT.iter().copied().cycle().take(len).collect()
}

/// Mostly one symbol with a thin tail of 15 others.
fn skewed(len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..len)
        .map(|_| {
            if rng.gen_bool(1.0 / 16.0) {
                rng.gen_range(0..16u8)
            } else {
                b'a'
            }
        })
        .collect()
}

fn single_symbol(len: usize) -> Vec<u8> {
    vec![b'z'; len]
}

fn report(name: &str, bytes: usize, iterations: usize, elapsed_s: f64, ratio: f64) {
    let per_iter_ms = elapsed_s * 1000.0 / iterations as f64;
    let throughput_mbps = bytes as f64 / (1024.0 * 1024.0) / (per_iter_ms / 1000.0);

    println!(
        "{name:<20} {per_iter_ms:>9.2} ms/iter  {throughput_mbps:>8.1} MiB/s  ({ratio:.3})"
    );
}

fn bench_compress(config: &BenchConfig, input: &[u8], iterations: usize) {
    let compressed = match compress(input) {
        Ok(data) => data,
        Err(e) => {
            println!("{:<20} SKIP (compression failed: {e})", config.name);
            return;
        }
    };

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = compress(input);
    }
    let elapsed = start.elapsed().as_secs_f64();

    let ratio = compressed.len() as f64 / input.len() as f64;
    report(config.name, input.len(), iterations, elapsed, ratio);
}

fn bench_decompress(config: &BenchConfig, input: &[u8], iterations: usize) {
    let compressed = match compress(input) {
        Ok(data) => data,
        Err(e) => {
            println!("{:<20} SKIP (compression failed: {e})", config.name);
            return;
        }
    };

    // Warmup run
    let _ = decompress(&compressed);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = decompress(&compressed);
    }
    let elapsed = start.elapsed().as_secs_f64();

    let ratio = compressed.len() as f64 / input.len() as f64;
    report(config.name, input.len(), iterations, elapsed, ratio);
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let iterations = if args.len() >= 2 {
        args[1].parse().unwrap_or(DEFAULT_ITERATIONS)
    } else {
        DEFAULT_ITERATIONS
    };

    println!("huffpack Benchmarks");
    println!("===================");
    println!("Iterations: {iterations}");
    println!("Input size: {INPUT_SIZE} bytes\n");

    println!("{:<20} {:>17}  {:>14}  Ratio", "Test", "Time", "Throughput");
    println!("{:<20} {:>17}  {:>14}  -----", "----", "----", "----------");

    let inputs: Vec<Vec<u8>> = BENCHMARKS
        .iter()
        .map(|config| (config.generate)(INPUT_SIZE))
        .collect();

    println!("\nCompression:");
    for (config, input) in BENCHMARKS.iter().zip(&inputs) {
        bench_compress(config, input, iterations);
    }

    println!("\nDecompression:");
    for (config, input) in BENCHMARKS.iter().zip(&inputs) {
        bench_decompress(config, input, iterations);
    }
}
