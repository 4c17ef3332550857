//! Cached API client.
//!
//! Reads go through the query cache; writes go straight to the server and,
//! only once the server confirmed them, invalidate the tags they declare.

mod transport;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use bytes::Bytes;
use learnhub_api_types::ApiResponse;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

pub use transport::{HttpTransport, Transport};

use crate::cache::{
    CacheConfig, CacheConsumer, CacheTrigger, EventQueue, QueryCache, Subscription,
};
use crate::config::ApiSettings;
use crate::endpoints::{Download, Mutation, Query};
use crate::error::ClientError;

pub struct LearnHubClient {
    transport: Arc<dyn Transport>,
    cache: Arc<QueryCache>,
    trigger: CacheTrigger,
}

impl LearnHubClient {
    pub fn new(transport: Arc<dyn Transport>, config: CacheConfig) -> Self {
        let cache = Arc::new(QueryCache::new(config.clone()));
        let queue = Arc::new(EventQueue::new());
        let consumer = Arc::new(CacheConsumer::new(
            config.clone(),
            Arc::clone(&cache),
            Arc::clone(&queue),
            Arc::clone(&transport),
        ));
        let trigger = CacheTrigger::new(config, queue, consumer);
        Self {
            transport,
            cache,
            trigger,
        }
    }

    /// HTTP client for `api`, caching per `cache`.
    pub fn from_settings(api: &ApiSettings, cache: CacheConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(api.base_url.as_str(), api.token.clone(), api.timeout)?;
        Ok(Self::new(Arc::new(transport), cache))
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Cached read. Stale or missing entries are fetched; fresh ones are not.
    pub async fn query(&self, query: impl Into<Query>) -> Result<Arc<Value>, ClientError> {
        let query = query.into();
        let key = query.key();

        if let Some(value) = self.cache.fresh(&key) {
            debug!(key = %key, "Query served from cache");
            return Ok(value);
        }
        self.fetch(&query).await
    }

    /// Cached read decoded into a typed envelope.
    pub async fn query_data<T: DeserializeOwned>(
        &self,
        query: impl Into<Query>,
    ) -> Result<ApiResponse<T>, ClientError> {
        let value = self.query(query).await?;
        decode_envelope(&value)
    }

    /// Watch a query. The result is fetched first when nothing fresh is
    /// cached; a failed fetch shows up in the snapshot instead of an error.
    pub async fn subscribe(&self, query: impl Into<Query>) -> Subscription {
        let query = query.into();
        let subscription = self.cache.subscribe(&query);
        if self.cache.fresh(&query.key()).is_none() {
            let _ = self.fetch(&query).await;
        }
        subscription
    }

    /// Perform a write. On success the tags it declares are invalidated and
    /// watched reads are re-fetched before this returns; on failure the cache
    /// is left untouched.
    pub async fn mutate(&self, mutation: impl Into<Mutation>) -> Result<Arc<Value>, ClientError> {
        let mutation = mutation.into();
        let request = mutation.request()?;

        let envelope = match self.transport.execute(&request).await {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(
                    mutation = mutation.name(),
                    error = %err,
                    "Mutation failed; cache untouched"
                );
                return Err(err);
            }
        };

        info!(mutation = mutation.name(), request = %request, "Mutation succeeded");
        self.trigger.mutation_succeeded(&mutation).await;
        Ok(Arc::new(envelope))
    }

    pub async fn mutate_data<T: DeserializeOwned>(
        &self,
        mutation: impl Into<Mutation>,
    ) -> Result<ApiResponse<T>, ClientError> {
        let value = self.mutate(mutation).await?;
        decode_envelope(&value)
    }

    /// Uncached binary download.
    pub async fn download(&self, download: impl Into<Download>) -> Result<Bytes, ClientError> {
        let download = download.into();
        debug!(download = download.name(), "Downloading");
        self.transport.download(&download.request()).await
    }

    async fn fetch(&self, query: &Query) -> Result<Arc<Value>, ClientError> {
        match self.transport.execute(&query.request()).await {
            Ok(envelope) => Ok(self.cache.fill(query, envelope)),
            Err(err) => {
                self.cache.fail(&query.key(), &err);
                Err(err)
            }
        }
    }
}

/// Decode a raw envelope into `ApiResponse<T>`.
pub fn decode_envelope<T: DeserializeOwned>(value: &Value) -> Result<ApiResponse<T>, ClientError> {
    ApiResponse::<T>::deserialize(value).map_err(|e| ClientError::decode("response envelope", e))
}

/// The envelope's `data`, which the caller expects to be present.
pub fn require_data<T>(response: ApiResponse<T>, what: &'static str) -> Result<T, ClientError> {
    response.data.ok_or(ClientError::MissingData { what })
}

#[cfg(test)]
mod tests {
    use learnhub_api_types::{LearningMilestone, MilestoneCreateRequest, MilestoneType};
    use serde_json::json;

    use super::testing::ScriptedTransport;
    use super::*;
    use crate::cache::{CacheTag, QuerySnapshot, TagSet, TagType};
    use crate::endpoints::{
        LearningPathDownload, LearningPathMutation, LearningPathQuery, ProjectListFilter,
        ProjectMutation, ProjectQuery,
    };

    fn client(config: CacheConfig) -> (Arc<ScriptedTransport>, LearnHubClient) {
        let transport = Arc::new(ScriptedTransport::default());
        let client = LearnHubClient::new(transport.clone(), config);
        (transport, client)
    }

    fn dashboard(project: &str) -> LearningPathQuery {
        LearningPathQuery::Dashboard {
            project_id: project.into(),
        }
    }

    fn create_milestone(project: &str, title: &str) -> LearningPathMutation {
        LearningPathMutation::CreateMilestone {
            project_id: project.into(),
            body: MilestoneCreateRequest {
                title: title.into(),
                description: String::new(),
                milestone_type: MilestoneType::Custom,
                required_task_ids: Vec::new(),
                required_area_ids: Vec::new(),
                required_skills: Vec::new(),
                skills_awarded: Vec::new(),
                order: None,
                custom_fields: Default::default(),
            },
        }
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let (transport, client) = client(CacheConfig::default());
        client.query(dashboard("p1")).await.expect("first");
        client.query(dashboard("p1")).await.expect("second");
        assert_eq!(transport.calls("/learning-paths/p1/dashboard"), 1);
    }

    #[tokio::test]
    async fn disabled_cache_always_hits_the_network() {
        let (transport, client) = client(CacheConfig::disabled());
        client.query(dashboard("p1")).await.expect("first");
        client.query(dashboard("p1")).await.expect("second");
        assert_eq!(transport.calls("/learning-paths/p1/dashboard"), 2);
    }

    #[tokio::test]
    async fn create_milestone_refreshes_only_the_affected_dashboard() {
        let (transport, client) = client(CacheConfig::default());
        client.query(dashboard("p1")).await.expect("p1");
        client.query(dashboard("p2")).await.expect("p2");

        client
            .mutate(create_milestone("p1", "Parser"))
            .await
            .expect("create");

        assert!(client.cache().fresh(&Query::from(dashboard("p2")).key()).is_some());
        client.query(dashboard("p1")).await.expect("p1 again");
        client.query(dashboard("p2")).await.expect("p2 again");
        assert_eq!(transport.calls("/learning-paths/p1/dashboard"), 2);
        assert_eq!(transport.calls("/learning-paths/p2/dashboard"), 1);
    }

    #[tokio::test]
    async fn watched_query_is_refetched_before_mutate_returns() {
        let (transport, client) = client(CacheConfig::default());
        transport.respond(
            "/learning-paths/p1/dashboard",
            json!({"success": true, "data": {"rev": 1}}),
        );
        let sub = client.subscribe(dashboard("p1")).await;
        assert!(sub.current().is_ready());

        transport.respond(
            "/learning-paths/p1/dashboard",
            json!({"success": true, "data": {"rev": 2}}),
        );
        client
            .mutate(create_milestone("p1", "Parser"))
            .await
            .expect("create");

        assert_eq!(transport.calls("/learning-paths/p1/dashboard"), 2);
        assert_eq!(
            sub.current(),
            QuerySnapshot::Ready(Arc::new(json!({"success": true, "data": {"rev": 2}})))
        );
    }

    #[tokio::test]
    async fn failed_mutation_leaves_cache_unchanged() {
        let (transport, client) = client(CacheConfig::default());
        client.query(dashboard("p1")).await.expect("p1");
        transport.fail("/learning-paths/p1/milestones", "duplicate title");

        let err = client
            .mutate(create_milestone("p1", "Parser"))
            .await
            .expect_err("server rejected");
        assert_eq!(err.user_message(), "duplicate title");

        let key = Query::from(dashboard("p1")).key();
        assert!(client.cache().fresh(&key).is_some());
        client.query(dashboard("p1")).await.expect("cached");
        assert_eq!(transport.calls("/learning-paths/p1/dashboard"), 1);
    }

    #[tokio::test]
    async fn validation_failure_never_reaches_the_network() {
        let (transport, client) = client(CacheConfig::default());
        let err = client
            .mutate(create_milestone("p1", "   "))
            .await
            .expect_err("blank title");
        assert!(matches!(err, ClientError::InvalidInput(_)));
        assert_eq!(transport.total_calls(), 0);
    }

    #[tokio::test]
    async fn delete_milestone_stales_its_detail_read() {
        let (_, client) = client(CacheConfig::default());
        let detail = LearningPathQuery::Milestone {
            project_id: "p1".into(),
            milestone_id: "m1".into(),
        };
        let other = LearningPathQuery::Milestone {
            project_id: "p1".into(),
            milestone_id: "m2".into(),
        };
        client.query(detail.clone()).await.expect("m1");
        client.query(other.clone()).await.expect("m2");

        client
            .mutate(LearningPathMutation::DeleteMilestone {
                project_id: "p1".into(),
                milestone_id: "m1".into(),
            })
            .await
            .expect("delete");

        assert!(client.cache().fresh(&Query::from(detail).key()).is_none());
        assert!(client.cache().fresh(&Query::from(other).key()).is_some());
    }

    #[tokio::test]
    async fn repeating_a_write_invalidates_the_same_reads() {
        let (_, client) = client(CacheConfig::default());
        let list = ProjectQuery::List(ProjectListFilter::default());
        let mutation = ProjectMutation::Delete {
            project_id: "p1".into(),
        };
        let tags: TagSet = Mutation::from(mutation.clone()).invalidates();

        client.query(list.clone()).await.expect("list");
        client.mutate(mutation.clone()).await.expect("first delete");
        let first = client.cache().keys_for_tags(&tags);

        client.query(list.clone()).await.expect("list again");
        client.mutate(mutation).await.expect("second delete");
        let second = client.cache().keys_for_tags(&tags);

        assert_eq!(first, second);
        assert!(tags.contains(&CacheTag::list(TagType::Project)));
        assert!(client.cache().fresh(&Query::from(list).key()).is_none());
    }

    #[tokio::test]
    async fn query_data_decodes_typed_payload() {
        let (transport, client) = client(CacheConfig::default());
        transport.respond(
            "/learning-paths/p1/milestones/m1",
            json!({
                "success": true,
                "data": {
                    "id": "m1",
                    "title": "Parser",
                    "type": "custom",
                    "status": "in-progress",
                    "order": 1
                }
            }),
        );
        let resp: ApiResponse<LearningMilestone> = client
            .query_data(LearningPathQuery::Milestone {
                project_id: "p1".into(),
                milestone_id: "m1".into(),
            })
            .await
            .expect("decode");
        assert_eq!(resp.data.expect("data").title, "Parser");
    }

    #[tokio::test]
    async fn downloads_bypass_the_cache() {
        let (transport, client) = client(CacheConfig::default());
        let export = LearningPathDownload::Export {
            project_id: "p1".into(),
            format: learnhub_api_types::ExportFormat::Json,
        };
        client.download(export.clone()).await.expect("first");
        client.download(export).await.expect("second");
        assert_eq!(transport.calls("/learning-paths/p1/export"), 2);
        assert!(client.cache().is_empty());
    }
}
