mod common;

use std::collections::HashSet;
use std::sync::Arc;

use learnhub::LearnHubClient;
use learnhub::cache::CacheConfig;
use learnhub::endpoints::{ProjectMutation, ProjectQuery};
use learnhub_api_types::ProjectUpdateRequest;
use metrics_util::debugging::DebuggingRecorder;

use common::CountingTransport;

fn project(id: &str) -> ProjectQuery {
    ProjectQuery::Get {
        project_id: id.to_string(),
    }
}

#[tokio::test]
async fn cache_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    // Store hit/miss/evict
    let config = CacheConfig {
        query_limit: 1,
        ..Default::default()
    };
    let client = LearnHubClient::new(Arc::new(CountingTransport::default()), config);
    client.query(project("p1")).await.expect("miss");
    client.query(project("p1")).await.expect("hit");
    client.query(project("p2")).await.expect("evicts p1");

    // Queue length, invalidation, refetch and consumer latency
    let _watch = client.subscribe(project("p2")).await;
    client
        .mutate(ProjectMutation::Update {
            project_id: "p2".into(),
            body: ProjectUpdateRequest {
                title: Some("Renamed".into()),
                ..Default::default()
            },
        })
        .await
        .expect("update");

    let keys: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(key, _, _, _)| key.key().name().to_string())
        .collect();

    let expected = [
        "learnhub_cache_hit_total",
        "learnhub_cache_miss_total",
        "learnhub_cache_evict_total",
        "learnhub_cache_invalidated_total",
        "learnhub_cache_refetch_total",
        "learnhub_cache_event_queue_len",
        "learnhub_cache_consume_ms",
    ];

    for name in expected {
        assert!(keys.contains(name), "missing metric key: {name}");
    }
}
