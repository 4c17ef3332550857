mod common;

use std::sync::Arc;

use learnhub::LearnHubClient;
use learnhub::cache::CacheConfig;
use learnhub::endpoints::{ProjectListFilter, ProjectMutation, ProjectQuery};
use learnhub_api_types::{ProjectCreateRequest, ProjectUpdateRequest};
use serde_json::Value;

use common::CountingTransport;

fn setup() -> (Arc<CountingTransport>, LearnHubClient) {
    let transport = Arc::new(CountingTransport::default());
    let client = LearnHubClient::new(transport.clone(), CacheConfig::default());
    (transport, client)
}

fn project(id: &str) -> ProjectQuery {
    ProjectQuery::Get {
        project_id: id.to_string(),
    }
}

fn rename(id: &str) -> ProjectMutation {
    ProjectMutation::Update {
        project_id: id.to_string(),
        body: ProjectUpdateRequest {
            title: Some("Renamed".into()),
            ..Default::default()
        },
    }
}

fn revision(envelope: &Value) -> u64 {
    envelope["data"]["revision"]
        .as_u64()
        .expect("revision in envelope")
}

#[tokio::test]
async fn watched_query_is_refetched_before_mutation_returns() {
    let (transport, client) = setup();
    let watch = client.subscribe(project("p1")).await;
    assert_eq!(revision(watch.current().value().expect("loaded")), 1);

    client.mutate(rename("p1")).await.expect("update");

    assert_eq!(transport.reads("/projects/p1"), 2);
    let snapshot = watch.current();
    assert!(snapshot.is_ready());
    assert_eq!(revision(snapshot.value().expect("refetched")), 2);
    assert_eq!(transport.writes(), vec!["/projects/p1".to_string()]);
}

#[tokio::test]
async fn unwatched_query_is_refetched_lazily() {
    let (transport, client) = setup();
    client.query(project("p1")).await.expect("first read");

    client.mutate(rename("p1")).await.expect("update");
    assert_eq!(transport.reads("/projects/p1"), 1);

    let value = client.query(project("p1")).await.expect("second read");
    assert_eq!(revision(&value), 2);
    assert_eq!(transport.reads("/projects/p1"), 2);
}

#[tokio::test]
async fn unrelated_entries_stay_fresh() {
    let (transport, client) = setup();
    client.query(project("p1")).await.expect("p1");
    client.query(project("p2")).await.expect("p2");

    client.mutate(rename("p2")).await.expect("update p2");

    client.query(project("p1")).await.expect("p1 again");
    assert_eq!(transport.reads("/projects/p1"), 1);
    client.query(project("p2")).await.expect("p2 again");
    assert_eq!(transport.reads("/projects/p2"), 2);
}

#[tokio::test]
async fn create_invalidates_list_queries() {
    let (transport, client) = setup();
    let list = client
        .subscribe(ProjectQuery::List(ProjectListFilter::default()))
        .await;

    client
        .mutate(ProjectMutation::Create {
            body: ProjectCreateRequest {
                title: "Compiler".into(),
                description: "Build a toy compiler".into(),
                member_ids: Vec::new(),
                mentor_ids: Vec::new(),
                start_date: None,
                end_date: None,
            },
        })
        .await
        .expect("create");

    assert_eq!(transport.reads("/projects"), 2);
    assert_eq!(revision(list.current().value().expect("list")), 2);
}

#[tokio::test]
async fn dropped_subscription_stops_refetching() {
    let (transport, client) = setup();
    let watch = client.subscribe(project("p1")).await;
    drop(watch);

    client.mutate(rename("p1")).await.expect("update");
    assert_eq!(transport.reads("/projects/p1"), 1);
}

#[tokio::test]
async fn search_terms_with_reserved_characters_get_their_own_entry() {
    let (transport, client) = setup();
    let smuggled = ProjectQuery::List(ProjectListFilter {
        search: Some("x&limit=5".into()),
        ..Default::default()
    });
    let genuine = ProjectQuery::List(ProjectListFilter {
        search: Some("x".into()),
        limit: Some(5),
        ..Default::default()
    });

    client.query(smuggled).await.expect("first list");
    let value = client.query(genuine).await.expect("second list");

    assert_eq!(transport.reads("/projects"), 2);
    assert_eq!(revision(&value), 2);
}
