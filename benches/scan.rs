use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use kfs_memleaks::{scan, LineClassifier, ScanConfig};

/// A trace of `calls` nested function calls, each allocating and freeing
/// a buffer, with a timestamp on every line and one leak per 100 calls.
fn synthetic_trace(calls: u64) -> Vec<String> {
    let mut lines = Vec::new();
    for i in 0..calls {
        let address = 0x1000_0000 + i * 0x40;
        lines.push(format!("1262304000.{:06} [kfs_trace] kenny_read: enter", i % 1_000_000));
        lines.push(format!(
            "1262304000.{:06} [kfs_debug] kfs_memory.c:23 kfs_malloc: Allocated {} bytes of memory at 0x{:x}.",
            i % 1_000_000,
            64 + i % 512,
            address
        ));
        lines.push("1262304000.000000 kfs_info: reading block".to_string());
        if i % 100 != 0 {
            lines.push(format!(
                "1262304000.{:06} [kfs_debug] kfs_memory.c:57 kfs_free: Freeing 0x{:x}.",
                i % 1_000_000,
                address
            ));
        }
        lines.push(format!("1262304000.{:06} [kfs_trace] kenny_read: return", i % 1_000_000));
    }
    lines
}

fn bench_classify(c: &mut Criterion) {
    let classifier = LineClassifier::new(&ScanConfig::default()).unwrap();
    let line = "1262304000.123456 [kfs_debug] kfs_memory.c:23 kfs_malloc: Allocated 128 bytes of memory at 0x8a3b010.";

    c.bench_function("classify_alloc_line", |b| {
        b.iter(|| classifier.classify(black_box(line)))
    });
}

fn bench_scan(c: &mut Criterion) {
    let trace = synthetic_trace(10_000);
    let config = ScanConfig::default();

    let mut group = c.benchmark_group("scan");
    group.throughput(Throughput::Elements(trace.len() as u64));
    group.bench_function("10k_calls", |b| {
        b.iter(|| scan(black_box(&trace), &config).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_classify, bench_scan);
criterion_main!(benches);
