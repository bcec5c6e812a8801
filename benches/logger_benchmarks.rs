//! Criterion benchmarks for unified_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;
use unified_logger::prelude::*;
use unified_logger::{debug, info};

fn memory_service(builder: unified_logger::LoggingServiceConfigBuilder) -> (LoggingService, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let service = LoggingService::new(builder.sink(sink.clone()).build());
    (service, sink)
}

// ============================================================================
// Registry Benchmarks
// ============================================================================

fn bench_get_logger(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_logger");
    group.throughput(Throughput::Elements(1));

    let (service, _) = memory_service(LoggingServiceConfig::builder());
    service.get_logger("Cached");

    group.bench_function("memoized", |b| {
        b.iter(|| black_box(service.get_logger(black_box("Cached"))));
    });

    group.bench_function("sub_logger", |b| {
        let logger = service.get_logger("Cached");
        b.iter(|| black_box(logger.sub_logger(Some("request")).sub_logger(None)));
    });

    group.finish();
}

// ============================================================================
// Call Site Benchmarks
// ============================================================================

fn bench_call_sites(c: &mut Criterion) {
    let mut group = c.benchmark_group("call_sites");
    group.throughput(Throughput::Elements(1));

    let (service, sink) = memory_service(LoggingServiceConfig::builder());
    let logger = service.get_logger("Bench");

    group.bench_function("disabled_accessor", |b| {
        b.iter(|| logger.info().emit_message(black_box("never rendered")));
    });

    group.bench_function("disabled_macro", |b| {
        b.iter(|| info!(logger, "value {:?}", black_box(vec![0u8; 64])));
    });

    group.bench_function("enabled_accessor", |b| {
        b.iter(|| {
            logger.debug().emit_message(black_box("rendered"));
            sink.clear();
        });
    });

    group.bench_function("enabled_macro", |b| {
        b.iter(|| {
            debug!(logger, "value {}", black_box(42));
            sink.clear();
        });
    });

    group.finish();
}

// ============================================================================
// Rendering Benchmarks
// ============================================================================

fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");
    group.throughput(Throughput::Elements(1));

    let (service, sink) = memory_service(LoggingServiceConfig::builder().json_output(true));
    let logger = service.get_logger("Json");

    group.bench_function("json_output", |b| {
        b.iter(|| {
            logger
                .debug()
                .emit(vec![serde_json::json!({"order": black_box(7), "items": [1, 2, 3]}).into()]);
            sink.clear();
        });
    });

    let (service, _) = memory_service(
        LoggingServiceConfig::builder()
            .local_logging(false)
            .remote_logging(true)
            .stack_traces(false)
            .cache_line_threshold(0),
    );
    let logger = service.get_logger("Buffered");

    group.bench_function("buffered_line", |b| {
        b.iter(|| {
            logger.debug().emit(vec!["step".into(), black_box(3).into()]);
            if service.cached_lines().len() > 1000 {
                service.flush();
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_get_logger, bench_call_sites, bench_rendering);
criterion_main!(benches);
