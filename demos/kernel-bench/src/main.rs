//! Kernel benchmark
//!
//! Prints the detected processor capabilities, then times the vector,
//! matrix and batch workloads on every kernel this machine can run.
//!
//! Usage: `kernel-bench [ITERATIONS]` (default 100000). `RUST_LOG=debug`
//! shows each report as it finishes, `VOID_SIMD_PATH` picks the kernel used
//! by the summary line.

use std::process::ExitCode;

use void_simd::bench::{run_all, BenchReport};
use void_simd::kernel::{self, Kernel, PortableKernel};
use void_simd::{capabilities, KernelConfig};

const DEFAULT_ITERATIONS: u32 = 100_000;

fn print_reports(reports: &[BenchReport]) {
    for report in reports {
        println!("  {}", report);
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let iterations = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<u32>() {
            Ok(n) => n,
            Err(e) => {
                log::error!("Invalid iteration count '{}': {}", arg, e);
                return ExitCode::FAILURE;
            }
        },
        None => DEFAULT_ITERATIONS,
    };

    let caps = capabilities();
    match serde_json::to_string_pretty(caps) {
        Ok(json) => println!("Capabilities: {}", json),
        Err(e) => log::warn!("Could not serialize capabilities: {}", e),
    }

    let config = match KernelConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let active = match kernel::init(&config) {
        Ok(active) => active,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("Active kernel: {}", active.path());

    let mut kernels: Vec<Box<dyn Kernel>> = vec![Box::new(PortableKernel)];
    if let Ok(vectorized) = kernel::select(&KernelConfig::vectorized(), caps) {
        kernels.push(vectorized);
    } else {
        log::info!("Vectorized kernel unavailable; benchmarking the portable path only");
    }

    log::info!("Running {} iterations per workload", iterations);
    for kernel in &kernels {
        println!("{} kernel:", kernel.path());
        print_reports(&run_all(kernel.as_ref(), iterations));
    }

    ExitCode::SUCCESS
}
