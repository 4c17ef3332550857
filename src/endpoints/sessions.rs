//! `/sessions`: mentoring session listings and enrollment.

use learnhub_api_types::{SessionCreateRequest, SessionStatus};
use reqwest::Method;
use serde_json::Value;

use super::{ApiRequest, item_tags, require, to_body};
use crate::cache::{CacheTag, TagSet, TagType};
use crate::error::ClientError;

const ROOT: &str = "sessions";

/// Server-side filter for `/sessions`. Paged by cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SessionListFilter {
    pub status: Option<SessionStatus>,
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionQuery {
    List(SessionListFilter),
    Open,
    Created,
    Get { session_id: String },
}

impl SessionQuery {
    pub fn name(&self) -> &'static str {
        match self {
            Self::List(_) => "sessions.list",
            Self::Open => "sessions.open",
            Self::Created => "sessions.created",
            Self::Get { .. } => "sessions.get",
        }
    }

    pub fn request(&self) -> ApiRequest {
        match self {
            Self::List(filter) => ApiRequest::get([ROOT])
                .with_opt_query("status", filter.status.map(SessionStatus::as_str))
                .with_opt_query("cursor", filter.cursor.as_deref())
                .with_opt_query("limit", filter.limit),
            Self::Open => ApiRequest::get([ROOT, "open"]),
            Self::Created => ApiRequest::get([ROOT, "created"]),
            Self::Get { session_id } => ApiRequest::get([ROOT, session_id.as_str()]),
        }
    }

    pub fn provides(&self, envelope: &Value) -> TagSet {
        let mut tags = TagSet::new();
        match self {
            Self::List(_) => {
                tags.insert(CacheTag::list(TagType::Session));
                tags.extend(item_tags(TagType::Session, envelope));
            }
            Self::Open | Self::Created => {
                tags.insert(CacheTag::list(TagType::Session));
            }
            Self::Get { session_id } => {
                tags.insert(CacheTag::id(TagType::Session, session_id));
            }
        }
        tags
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionMutation {
    Create { body: SessionCreateRequest },
    Join { session_id: String },
    Cancel { session_id: String },
}

impl SessionMutation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "sessions.create",
            Self::Join { .. } => "sessions.join",
            Self::Cancel { .. } => "sessions.cancel",
        }
    }

    pub fn request(&self) -> Result<ApiRequest, ClientError> {
        let req = match self {
            Self::Create { body } => {
                require("title", &body.title)?;
                if body.duration_minutes == 0 {
                    return Err(ClientError::invalid_input(
                        "duration_minutes must be greater than zero",
                    ));
                }
                ApiRequest::new(Method::POST, [ROOT]).with_body(to_body(body)?)
            }
            Self::Join { session_id } => {
                ApiRequest::new(Method::POST, [ROOT, session_id.as_str(), "join"])
            }
            Self::Cancel { session_id } => {
                ApiRequest::new(Method::POST, [ROOT, session_id.as_str(), "cancel"])
            }
        };
        Ok(req)
    }

    pub fn invalidates(&self) -> TagSet {
        let mut tags = TagSet::from([CacheTag::list(TagType::Session)]);
        match self {
            Self::Create { .. } => {}
            Self::Join { session_id } | Self::Cancel { session_id } => {
                tags.insert(CacheTag::id(TagType::Session, session_id));
            }
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::datetime;

    use super::*;

    #[test]
    fn open_and_created_share_the_list_tag() {
        let list = CacheTag::list(TagType::Session);
        assert!(SessionQuery::Open.provides(&json!({})).contains(&list));
        assert!(SessionQuery::Created.provides(&json!({})).contains(&list));
    }

    #[test]
    fn join_invalidates_detail_and_list() {
        let tags = SessionMutation::Join {
            session_id: "s1".into(),
        }
        .invalidates();
        assert_eq!(
            tags,
            TagSet::from([
                CacheTag::list(TagType::Session),
                CacheTag::id(TagType::Session, "s1"),
            ])
        );
    }

    #[test]
    fn join_and_cancel_are_posts_on_sub_resources() {
        let join = SessionMutation::Join {
            session_id: "s1".into(),
        }
        .request()
        .expect("request");
        assert_eq!(join.method, Method::POST);
        assert_eq!(join.path(), "/sessions/s1/join");

        let cancel = SessionMutation::Cancel {
            session_id: "s1".into(),
        }
        .request()
        .expect("request");
        assert_eq!(cancel.path(), "/sessions/s1/cancel");
    }

    #[test]
    fn list_filter_carries_cursor() {
        let query = SessionQuery::List(SessionListFilter {
            status: Some(SessionStatus::Scheduled),
            cursor: Some("abc".into()),
            limit: Some(5),
        });
        assert_eq!(
            query.request().path_and_query(),
            "/sessions?status=scheduled&cursor=abc&limit=5"
        );
    }

    #[test]
    fn create_requires_title() {
        let mutation = SessionMutation::Create {
            body: SessionCreateRequest {
                title: "  ".into(),
                description: String::new(),
                start_time: datetime!(2025-03-05 10:00 UTC),
                duration_minutes: 60,
                max_participants: None,
                topics: Vec::new(),
            },
        };
        assert!(matches!(
            mutation.request(),
            Err(ClientError::InvalidInput(_))
        ));
    }
}
