//! End-to-end export tests: contexts in a registry through the dispatcher.

#[cfg(test)]
mod tests {
    use crate::checkpoint::InMemoryCheckpointStore;
    use crate::context::PipelineContext;
    use crate::metrics::{
        AgentStatSampler, ConfigRegistry, FlatMetrics, HostProvidedMetricsProvider, LabelPair,
        MetricExportType, MetricsDispatcher, NativeMetricsProvider, Sample, SampleValue,
        METRIC_AGENT_MEMORY_USED_MB, METRIC_AGENT_TASKS_TOTAL, METRIC_AGENT_THREADS_TOTAL,
    };
    use crate::testing::{FixedRuntimeSource, StaticMetaCache};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn pipeline(config_name: &str) -> Arc<PipelineContext> {
        let ctx = Arc::new(PipelineContext::new(Arc::new(InMemoryCheckpointStore::new())));
        ctx.init_context("proj", "store", config_name);
        ctx
    }

    fn cache_entry(name: &str) -> FlatMetrics {
        FlatMetrics::from([("k8s_cache".to_string(), name.to_string())])
    }

    fn dispatcher(registry: Arc<ConfigRegistry>) -> MetricsDispatcher {
        let source = FixedRuntimeSource::new()
            .with("/memory/resident:bytes", SampleValue::Uint64(64 * 1024 * 1024))
            .with("/sched/tasks:tasks", SampleValue::Uint64(12))
            .with("/sched/threads:threads", SampleValue::Uint64(4));
        MetricsDispatcher::new(
            Box::new(NativeMetricsProvider::new(
                registry,
                Arc::new(StaticMetaCache::new(vec![cache_entry("pods")])),
            )),
            Box::new(HostProvidedMetricsProvider::new(AgentStatSampler::new(Box::new(source)))),
        )
    }

    #[test]
    fn test_direct_export_walks_every_pipeline_then_cache() {
        let registry = Arc::new(ConfigRegistry::new());
        let a = pipeline("cfg-a");
        let b = pipeline("cfg-b");
        a.register_metric_record(vec![LabelPair::new("plugin_id", "a1")])
            .create_counter("proc_in_records_total")
            .add(3);
        a.register_metric_record(vec![LabelPair::new("plugin_id", "a2")]);
        b.register_metric_record(vec![LabelPair::new("plugin_id", "b1")])
            .create_gauge("proc_queue_size")
            .set(2.5);
        registry.insert(a);
        registry.insert(b);

        let metrics = dispatcher(registry).get_metrics("direct");

        assert_eq!(metrics.len(), 4);
        let per_context: Vec<_> = metrics[..3].iter().map(|m| m["labels"].clone()).collect();
        assert!(per_context[..2].contains(&r#"{"plugin_id":"a1"}"#.to_string()));
        assert!(per_context.contains(&r#"{"plugin_id":"b1"}"#.to_string()));
        assert_eq!(metrics[3], cache_entry("pods"));

        let a1 = metrics.iter().find(|m| m.get("labels").map(String::as_str) == Some(r#"{"plugin_id":"a1"}"#)).unwrap();
        assert_eq!(a1["counters"], r#"{"proc_in_records_total":"3"}"#);
        let b1 = metrics.iter().find(|m| m.get("labels").map(String::as_str) == Some(r#"{"plugin_id":"b1"}"#)).unwrap();
        assert_eq!(b1["gauges"], r#"{"proc_queue_size":"2.5"}"#);
    }

    #[test]
    fn test_records_within_a_pipeline_keep_registration_order() {
        let registry = Arc::new(ConfigRegistry::new());
        let ctx = pipeline("cfg");
        for i in 0..5 {
            ctx.register_metric_record(vec![LabelPair::new("seq", i.to_string())]);
        }
        registry.insert(ctx);

        let metrics = dispatcher(registry).collect(MetricExportType::Direct);
        let labels: Vec<_> = metrics[..5].iter().map(|m| m["labels"].clone()).collect();
        let expected: Vec<_> = (0..5).map(|i| format!(r#"{{"seq":"{i}"}}"#)).collect();
        assert_eq!(labels, expected);
    }

    #[test]
    fn test_removed_pipeline_is_no_longer_exported() {
        let registry = Arc::new(ConfigRegistry::new());
        let ctx = pipeline("cfg");
        ctx.register_metric_record(Vec::new());
        registry.insert(ctx.clone());
        let dispatcher = dispatcher(registry.clone());
        assert_eq!(dispatcher.get_metrics("direct").len(), 2);

        registry.remove("cfg");

        assert_eq!(dispatcher.get_metrics("direct"), vec![cache_entry("pods")]);
        assert!(ctx.runtime_token().is_cancelled());
    }

    #[test]
    fn test_cpp_provided_export_is_agent_stats() {
        let registry = Arc::new(ConfigRegistry::new());
        registry.insert(pipeline("cfg"));

        let metrics = dispatcher(registry).get_metrics("cpp_provided");

        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0][METRIC_AGENT_MEMORY_USED_MB], "64");
        assert_eq!(metrics[0][METRIC_AGENT_TASKS_TOTAL], "12");
        assert_eq!(metrics[0][METRIC_AGENT_THREADS_TOTAL], "4");
    }

    #[test]
    fn test_unknown_export_type_is_empty() {
        let registry = Arc::new(ConfigRegistry::new());
        registry.insert(pipeline("cfg"));

        let dispatcher = dispatcher(registry);
        assert!(dispatcher.get_metrics("").is_empty());
        assert!(dispatcher.get_metrics("Direct").is_empty());
        assert!(dispatcher.get_metrics("prometheus").is_empty());
    }

    #[test]
    fn test_sample_names_match_sampler_table() {
        let mut samples = vec![Sample::new("/sched/tasks:tasks"), Sample::new("/nope:x")];
        crate::metrics::RuntimeMetricsSource::read(
            &FixedRuntimeSource::new().with("/sched/tasks:tasks", SampleValue::Uint64(1)),
            &mut samples,
        );
        assert_eq!(samples[0].value, SampleValue::Uint64(1));
        assert_eq!(samples[1].value, SampleValue::Unsupported);
    }
}
