//! mid-proto transport benchmark
//!
//! Mengukur throughput `Writer` / `Reader` pada setiap transport:
//! - Loopback: in-memory, single-threaded
//! - Pipe: lock-free SPSC ring antar thread
//! - Mmap: file-backed storage
//!
//! Usage:
//!   cargo run --release --bin mid_proto_bench -- [OPTIONS]

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use mid_proto::protocol::{read_exact, write_all};
use mid_proto::transport::{pipe, Loopback, MmapStorage};
use mid_proto::{Error, Reader, Result, Writer};

/// Benchmark configuration
struct BenchConfig {
    iterations: usize,
    chunk_size: usize,
    storage_path: String,
    pipe_capacity: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: 100_000,
            chunk_size: 64,
            storage_path: "mid_proto_bench.dat".to_string(),
            pipe_capacity: 64 * 1024,
        }
    }
}

fn report(name: &str, config: &BenchConfig, elapsed: Duration) {
    let total_bytes = (config.iterations * config.chunk_size) as f64;
    let per_op_ns = elapsed.as_nanos() as f64 / config.iterations as f64;

    println!("📊 {}", name);
    println!("  Chunk size:  {} bytes", config.chunk_size);
    println!("  Operations:  {}", config.iterations);
    println!(
        "  Latency:     {:.2} ns/op ({:.3} μs/op)",
        per_op_ns,
        per_op_ns / 1000.0
    );
    println!(
        "  Throughput:  {:.2} MB/sec\n",
        total_bytes / elapsed.as_secs_f64() / 1_000_000.0
    );
}

fn bench_loopback(config: &BenchConfig) -> Result<Duration> {
    let mut lo = Loopback::new();
    let chunk = vec![0xA5u8; config.chunk_size];
    let mut out = vec![0u8; config.chunk_size];

    let start = Instant::now();
    for _ in 0..config.iterations {
        write_all(&mut lo, &chunk)?;
        read_exact(&mut lo, &mut out)?;
    }
    Ok(start.elapsed())
}

fn bench_pipe(config: &BenchConfig) -> Result<Duration> {
    let (mut tx, mut rx) = pipe(config.pipe_capacity);
    let chunk = vec![0x5Au8; config.chunk_size];
    let iterations = config.iterations;

    let start = Instant::now();
    let producer = thread::spawn(move || -> Result<()> {
        for _ in 0..iterations {
            write_all(&mut tx, &chunk)?;
        }
        Ok(())
    });

    let mut out = vec![0u8; config.chunk_size];
    let mut received = 0usize;
    loop {
        match rx.read(&mut out)? {
            0 => break,
            n => received += n,
        }
    }
    let elapsed = start.elapsed();

    producer.join().map_err(|_| {
        Error::Io(io::Error::new(
            io::ErrorKind::Other,
            "pipe producer thread panicked",
        ))
    })??;
    if received != config.iterations * config.chunk_size {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "pipe delivered {} bytes, expected {}",
                received,
                config.iterations * config.chunk_size
            ),
        )));
    }
    Ok(elapsed)
}

fn bench_mmap(config: &BenchConfig) -> Result<Duration> {
    let capacity = (config.iterations * config.chunk_size).max(1);
    let mut storage = MmapStorage::open(&config.storage_path, capacity)?;
    let chunk = vec![0x3Cu8; config.chunk_size];

    let start = Instant::now();
    for _ in 0..config.iterations {
        write_all(&mut storage, &chunk)?;
    }
    let mut out = vec![0u8; config.chunk_size];
    while storage.read(&mut out)? > 0 {}
    let elapsed = start.elapsed();

    drop(storage);
    std::fs::remove_file(&config.storage_path).ok();
    Ok(elapsed)
}

fn run(config: &BenchConfig) -> Result<()> {
    println!("🚀 mid-proto transport benchmark");
    println!("================================\n");

    report("Loopback (write + read)", config, bench_loopback(config)?);
    report("Pipe (cross-thread)", config, bench_pipe(config)?);
    report("Mmap storage (append + scan)", config, bench_mmap(config)?);

    println!("✅ All benchmarks complete!");
    Ok(())
}

fn parse_args() -> BenchConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = BenchConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--iterations" | "-n" => {
                if i + 1 < args.len() {
                    config.iterations = args[i + 1].parse().unwrap_or(100_000);
                    i += 1;
                }
            }
            "--chunk" | "-c" => {
                if i + 1 < args.len() {
                    config.chunk_size = args[i + 1].parse().unwrap_or(64).max(1);
                    i += 1;
                }
            }
            "--storage" | "-s" => {
                if i + 1 < args.len() {
                    config.storage_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--pipe-capacity" => {
                if i + 1 < args.len() {
                    config.pipe_capacity = args[i + 1].parse().unwrap_or(64 * 1024).max(1);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("mid-proto transport benchmark\n");
                println!("Usage: mid_proto_bench [OPTIONS]\n");
                println!("Options:");
                println!("  -n, --iterations <N>       Operations per transport (default: 100000)");
                println!("  -c, --chunk <BYTES>        Bytes per write (default: 64)");
                println!("  -s, --storage <PATH>       Mmap file path (default: mid_proto_bench.dat)");
                println!("      --pipe-capacity <N>    Pipe ring size in bytes (default: 65536)");
                println!("  -h, --help                 Show this help");
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn main() {
    let config = parse_args();

    if let Err(e) = run(&config) {
        eprintln!("❌ Benchmark error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(name: &str) -> BenchConfig {
        BenchConfig {
            iterations: 200,
            chunk_size: 16,
            storage_path: std::env::temp_dir()
                .join(format!("mid_proto_bench_{}_{}.dat", name, std::process::id()))
                .to_string_lossy()
                .into_owned(),
            pipe_capacity: 32,
        }
    }

    #[test]
    fn test_benches_report_ok() {
        let config = small_config("ok");
        assert!(bench_loopback(&config).is_ok());
        assert!(bench_pipe(&config).is_ok());
        assert!(bench_mmap(&config).is_ok());
    }
}
