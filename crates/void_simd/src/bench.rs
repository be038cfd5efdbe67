//! Micro-benchmarks for a kernel
//!
//! Each function times a fixed workload against one [`Kernel`] and returns
//! a [`BenchReport`]. Passing the kernel explicitly lets one process
//! compare the portable and vectorized paths side by side.

use std::fmt;
use std::hint::black_box;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::kernel::{Kernel, KernelPath};
use crate::matrix::Matrix4;
use crate::vector::Vec4;

/// Elements per batch in [`benchmark_batch_operations`]
pub const BATCH_LEN: usize = 1024;

/// Timing of one workload
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub name: &'static str,
    pub path: KernelPath,
    pub iterations: u32,
    pub elapsed: Duration,
}

impl BenchReport {
    /// Mean time per iteration in nanoseconds
    pub fn ns_per_iter(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        self.elapsed.as_nanos() as f64 / f64::from(self.iterations)
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<8} [{:<10}] {:>10} iters  {:>10.2} ns/iter",
            self.name,
            self.path.to_string(),
            self.iterations,
            self.ns_per_iter()
        )
    }
}

fn run<F: FnMut()>(name: &'static str, kernel: &dyn Kernel, iterations: u32, mut body: F) -> BenchReport {
    let start = Instant::now();
    for _ in 0..iterations {
        body();
    }
    let report = BenchReport {
        name,
        path: kernel.path(),
        iterations,
        elapsed: start.elapsed(),
    };
    log::debug!("{}", report);
    report
}

/// Add, dot, cross and normalize-style scale on single vectors
pub fn benchmark_vector_operations(kernel: &dyn Kernel, iterations: u32) -> BenchReport {
    let a = Vec4::new(1.0, 2.0, 3.0, 4.0);
    let b = Vec4::new(5.0, 6.0, 7.0, 8.0);

    run("vector", kernel, iterations, || {
        let (a, b) = (black_box(&a), black_box(&b));
        let sum = kernel.add(a, b);
        let cross = kernel.cross(a, &sum);
        let len = kernel.sqrt(kernel.dot(&cross, &cross));
        black_box(kernel.scale(&cross, 1.0 / (len + 1.0)));
    })
}

/// Matrix product followed by a vector transform
pub fn benchmark_matrix_operations(kernel: &dyn Kernel, iterations: u32) -> BenchReport {
    let a = Matrix4::from_rows([
        [0.9, -0.1, 0.2, 1.0],
        [0.1, 0.8, -0.3, 2.0],
        [-0.2, 0.3, 0.7, 3.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);
    let b = Matrix4::scale(1.5, 0.5, 2.0);
    let v = Vec4::new(1.0, 1.0, 1.0, 1.0);

    run("matrix", kernel, iterations, || {
        let m = kernel.mat_mul(black_box(&a), black_box(&b));
        black_box(kernel.transform(&m, black_box(&v)));
    })
}

/// Batch add and scale over [`BATCH_LEN`] vectors
pub fn benchmark_batch_operations(kernel: &dyn Kernel, iterations: u32) -> BenchReport {
    let a: Vec<Vec4> = (0..BATCH_LEN).map(|i| Vec4::splat(i as f32)).collect();
    let b = vec![Vec4::ONE; BATCH_LEN];
    let mut out = vec![Vec4::ZERO; BATCH_LEN];

    run("batch", kernel, iterations, || {
        kernel.batch_add(black_box(&a), black_box(&b), &mut out);
        kernel.batch_scale(black_box(&a), 0.5, &mut out);
        black_box(&out);
    })
}

/// All three workloads on one kernel
pub fn run_all(kernel: &dyn Kernel, iterations: u32) -> Vec<BenchReport> {
    vec![
        benchmark_vector_operations(kernel, iterations),
        benchmark_matrix_operations(kernel, iterations),
        benchmark_batch_operations(kernel, iterations),
    ]
}
