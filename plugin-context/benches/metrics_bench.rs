//! Benchmarks for metric export and checkpoint reads.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use plugin_context::prelude::*;
use std::sync::Arc;

fn pipeline(config_name: &str, records: usize) -> Arc<PipelineContext> {
    let ctx = Arc::new(PipelineContext::new(Arc::new(InMemoryCheckpointStore::new())));
    ctx.init_context("proj", "store", config_name);
    for i in 0..records {
        let record = ctx.register_metric_record(vec![LabelPair::new("plugin_id", i.to_string())]);
        record.create_counter("proc_in_records_total").add(i as u64);
        record.create_gauge("proc_queue_size").set(1.5);
    }
    ctx
}

fn metrics_benchmark(c: &mut Criterion) {
    let registry = Arc::new(ConfigRegistry::new());
    for i in 0..10 {
        registry.insert(pipeline(&format!("cfg-{i}"), 20));
    }
    let dispatcher = MetricsDispatcher::with_defaults(registry, Arc::new(plugin_context::metrics::NoopMetaCache));

    c.bench_function("export_direct_200_records", |b| {
        b.iter(|| black_box(dispatcher.get_metrics("direct")))
    });

    c.bench_function("export_cpp_provided", |b| {
        b.iter(|| black_box(dispatcher.get_metrics("cpp_provided")))
    });
}

fn checkpoint_benchmark(c: &mut Criterion) {
    let ctx = pipeline("cfg/1", 0);
    ctx.save_checkpoint("offset", b"{\"offset\":4096}").ok();

    c.bench_function("get_checkpoint_migrated_name", |b| {
        b.iter(|| black_box(ctx.get_checkpoint("offset")))
    });
}

criterion_group!(benches, metrics_benchmark, checkpoint_benchmark);
criterion_main!(benches);
