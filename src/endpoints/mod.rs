//! Endpoint registry.
//!
//! Every REST operation the platform exposes is a variant of [`Query`],
//! [`Mutation`] or [`Download`]. Each variant knows its HTTP method and URL,
//! and queries/mutations additionally know the cache tags they provide or
//! invalidate. Nothing here performs I/O.

mod learning_paths;
mod projects;
mod sessions;

use std::fmt;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::cache::{CacheTag, QueryKey, TagSet, TagType};
use crate::error::ClientError;

pub use learning_paths::{LearningPathDownload, LearningPathMutation, LearningPathQuery};
pub use projects::{ProjectListFilter, ProjectMutation, ProjectQuery};
pub use sessions::{SessionListFilter, SessionMutation, SessionQuery};

/// Method, path segments, query string and optional JSON body.
///
/// Path segments are kept unencoded; the transport percent-encodes them.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, segments)
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_opt_query<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.with_query(key, value),
            None => self,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// `/a/b/c`, unencoded.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Form-encoded path plus query string; used as the canonical cache
    /// argument, so distinct requests never share a key.
    pub fn path_and_query(&self) -> String {
        let path: String = self
            .segments
            .iter()
            .map(|segment| {
                let encoded: String = form_urlencoded::byte_serialize(segment.as_bytes()).collect();
                format!("/{encoded}")
            })
            .collect();
        if self.query.is_empty() {
            return if path.is_empty() { "/".to_string() } else { path };
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.query)
            .finish();
        format!("{path}?{query}")
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path_and_query())
    }
}

/// Serialize a request payload into a JSON body.
pub(crate) fn to_body<T: Serialize>(payload: &T) -> Result<Value, ClientError> {
    serde_json::to_value(payload).map_err(|e| ClientError::invalid_input(e.to_string()))
}

/// Reject blank required text fields before any request is sent.
pub(crate) fn require(field: &str, value: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::invalid_input(format!("{field} is required")));
    }
    Ok(())
}

/// Detail tags for every `{ "id": ... }` object in the envelope's `data` array.
pub(crate) fn item_tags(kind: TagType, envelope: &Value) -> impl Iterator<Item = CacheTag> + '_ {
    envelope
        .get("data")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("id").and_then(Value::as_str))
        .map(move |id| CacheTag::id(kind, id))
}

/// A cached, tagged read operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    LearningPath(LearningPathQuery),
    Project(ProjectQuery),
    Session(SessionQuery),
}

impl Query {
    pub fn name(&self) -> &'static str {
        match self {
            Query::LearningPath(q) => q.name(),
            Query::Project(q) => q.name(),
            Query::Session(q) => q.name(),
        }
    }

    pub fn request(&self) -> ApiRequest {
        match self {
            Query::LearningPath(q) => q.request(),
            Query::Project(q) => q.request(),
            Query::Session(q) => q.request(),
        }
    }

    /// Tags the result is indexed under. `envelope` is the raw response body.
    pub fn provides(&self, envelope: &Value) -> TagSet {
        match self {
            Query::LearningPath(q) => q.provides(envelope),
            Query::Project(q) => q.provides(envelope),
            Query::Session(q) => q.provides(envelope),
        }
    }

    pub fn key(&self) -> QueryKey {
        QueryKey::new(self.name(), self.request().path_and_query())
    }
}

impl From<LearningPathQuery> for Query {
    fn from(q: LearningPathQuery) -> Self {
        Query::LearningPath(q)
    }
}

impl From<ProjectQuery> for Query {
    fn from(q: ProjectQuery) -> Self {
        Query::Project(q)
    }
}

impl From<SessionQuery> for Query {
    fn from(q: SessionQuery) -> Self {
        Query::Session(q)
    }
}

/// A write operation with its invalidation contract.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    LearningPath(LearningPathMutation),
    Project(ProjectMutation),
    Session(SessionMutation),
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::LearningPath(m) => m.name(),
            Mutation::Project(m) => m.name(),
            Mutation::Session(m) => m.name(),
        }
    }

    pub fn request(&self) -> Result<ApiRequest, ClientError> {
        match self {
            Mutation::LearningPath(m) => m.request(),
            Mutation::Project(m) => m.request(),
            Mutation::Session(m) => m.request(),
        }
    }

    /// Tags that become stale once this write succeeds.
    pub fn invalidates(&self) -> TagSet {
        match self {
            Mutation::LearningPath(m) => m.invalidates(),
            Mutation::Project(m) => m.invalidates(),
            Mutation::Session(m) => m.invalidates(),
        }
    }
}

impl From<LearningPathMutation> for Mutation {
    fn from(m: LearningPathMutation) -> Self {
        Mutation::LearningPath(m)
    }
}

impl From<ProjectMutation> for Mutation {
    fn from(m: ProjectMutation) -> Self {
        Mutation::Project(m)
    }
}

impl From<SessionMutation> for Mutation {
    fn from(m: SessionMutation) -> Self {
        Mutation::Session(m)
    }
}

/// Binary downloads; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Download {
    LearningPath(LearningPathDownload),
}

impl Download {
    pub fn name(&self) -> &'static str {
        match self {
            Download::LearningPath(d) => d.name(),
        }
    }

    pub fn request(&self) -> ApiRequest {
        match self {
            Download::LearningPath(d) => d.request(),
        }
    }
}

impl From<LearningPathDownload> for Download {
    fn from(d: LearningPathDownload) -> Self {
        Download::LearningPath(d)
    }
}
